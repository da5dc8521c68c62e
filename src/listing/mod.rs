//! # Listing Module
//!
//! Shapes raw API records into presentation-ready listing entries and decides
//! which navigation controls accompany them.
//!
//! ## Entries
//!
//! A [`ListingEntry`] carries a label, structured [`InfoLabels`] for display
//! columns, a context-action list, an optional thumbnail, a playable flag and
//! the [`NavigationTarget`] activated when the entry is selected.
//!
//! ## Pagination
//!
//! The API never reports total counts. A "next page" control is offered if and
//! only if the current page returned at least `limit` records; a short page is
//! the last one. A full final page therefore still shows a "next" control that
//! leads to an empty listing. A "previous page" control is offered whenever the
//! page number is greater than 1.
//!
//! ## Sort Order Switching
//!
//! Sortable listings (albums, artists, tracks) get a "change sort order" entry.
//! It opens the fixed sort-method list of the entity kind; picking one re-issues
//! the original listing with every parameter kept except `sort_method`, which
//! is replaced, and `page`, which is dropped.

mod format;
mod pagination;

pub use format::{
    format_albums, format_artists, format_downloads, format_playlist_tracks, format_playlists,
    format_radios, format_tracks, menu_item,
};
pub use pagination::{format_sort_methods, pagination_items, sort_method_label, sort_method_switcher_item};

use serde::Serialize;

use crate::navigation::NavigationTarget;

/// Display metadata of a listing entry.
///
/// `count` orders entries for hosts that sort by it: the previous-page control
/// uses 1, the sort switcher 0, records start at 2 and the next-page control
/// follows the last record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfoLabels {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracknumber: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// What a context-menu action does when triggered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "lowercase")]
pub enum Action {
    /// Opens the host's info dialog for the entry.
    Info,
    /// Replaces the current listing with the target's listing.
    View(NavigationTarget),
    /// Runs the target without changing the current listing.
    Run(NavigationTarget),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextAction {
    pub label: String,
    pub action: Action,
}

impl ContextAction {
    pub fn new(label: &str, action: Action) -> Self {
        Self {
            label: label.to_string(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingEntry {
    pub label: String,
    pub info: InfoLabels,
    pub context_menu: Vec<ContextAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub is_playable: bool,
    pub target: NavigationTarget,
}

impl ListingEntry {
    /// A plain, non-playable entry without metadata or context actions.
    pub fn new(label: &str, target: NavigationTarget) -> Self {
        Self {
            label: label.to_string(),
            info: InfoLabels::default(),
            context_menu: Vec::new(),
            thumbnail: None,
            is_playable: false,
            target,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.info.count = count;
        self
    }
}

/// Kind of content a listing shows, used by hosts to pick column layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Menu,
    Songs,
    Albums,
    Artists,
    Music,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Thumbnail,
}

/// A complete listing handed to the host for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Listing {
    pub content: ContentKind,
    pub entries: Vec<ListingEntry>,
    /// Replace the current listing instead of pushing a new one.
    pub update_listing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewMode>,
}

impl Listing {
    pub fn new(content: ContentKind, entries: Vec<ListingEntry>) -> Self {
        Self {
            content,
            entries,
            update_listing: false,
            view_mode: None,
        }
    }
}
