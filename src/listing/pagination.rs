use super::{Action, ContextAction, ListingEntry};
use crate::{
    jamendo::{EntityKind, JamendoApi},
    navigation::{Endpoint, NavigationTarget},
};

/// Human readable name of a sort method id; unknown ids are returned as-is.
pub fn sort_method_label(sort_method: &str) -> String {
    let label = match sort_method {
        "default" => "Default",
        "buzzrate" => "Buzz rate",
        "releasedate" => "Release date",
        "releasedate_desc" => "Release date (newest first)",
        "name" => "Name",
        "id" => "Id",
        "joindate" => "Join date",
        "downloads_week" => "Downloads (week)",
        "downloads_month" => "Downloads (month)",
        "downloads_total" => "Downloads (all time)",
        "listens_week" => "Listens (week)",
        "listens_month" => "Listens (month)",
        "listens_total" => "Listens (all time)",
        "popularity_week" => "Popularity (week)",
        "popularity_month" => "Popularity (month)",
        "popularity_total" => "Popularity (all time)",
        other => other,
    };
    label.to_string()
}

/// Target of the same listing on another page, replacing the current listing.
fn page_target(current: &NavigationTarget, page: u32) -> NavigationTarget {
    current
        .clone()
        .with_param("page", page)
        .with_param("is_update", "true")
}

/// Builds the next/previous page controls for a listing.
///
/// The next-page control appears if and only if `results_len >= limit`; the
/// previous-page control if and only if the current page is greater than 1.
/// Both keep every parameter of `current` and only change `page`.
///
/// # Example
///
/// ```
/// let current = NavigationTarget::new(Endpoint::ShowTracks).with_param("page", 2);
/// let controls = pagination_items(&current, 100, 100);
/// assert_eq!(controls.len(), 2);
/// ```
pub fn pagination_items(
    current: &NavigationTarget,
    results_len: usize,
    limit: u32,
) -> Vec<ListingEntry> {
    let current_page = current.page();
    let has_next_page = results_len >= limit as usize;
    let has_previous_page = current_page > 1;

    let mut items = Vec::new();
    if has_next_page {
        let next_page = current_page.saturating_add(1);
        items.push(
            ListingEntry::new(
                &format!(">> Page {} >>", next_page),
                page_target(current, next_page),
            )
            .with_count(results_len + 2),
        );
    }
    if has_previous_page {
        let previous_page = current_page - 1;
        items.push(
            ListingEntry::new(
                &format!("<< Page {} <<", previous_page),
                page_target(current, previous_page),
            )
            .with_count(1),
        );
    }
    items
}

/// Builds the "change sort order" entry of a sortable listing.
///
/// The entry leads to the sort-method list for `entity` and carries the
/// current listing's parameters (without `page`) so the chosen method can be
/// applied to the same listing.
pub fn sort_method_switcher_item(current: &NavigationTarget, entity: EntityKind) -> ListingEntry {
    let current_sort_method = current.param("sort_method").unwrap_or("default");

    let mut target = NavigationTarget::new(Endpoint::ShowSortMethods);
    target.params = current.params.clone();
    let target = target
        .without_param("page")
        .with_param("entity", entity.as_str())
        .with_param("is_update", "true");

    let mut item = ListingEntry::new(
        &format!("[[ {} ]]", sort_method_label(current_sort_method)),
        target,
    );
    item.context_menu = vec![ContextAction::new(
        "Settings",
        Action::Run(NavigationTarget::new(Endpoint::OpenSettings)),
    )];
    item.with_count(0)
}

/// Lists the sort methods of the entity named by `current`'s `entity` param.
///
/// Every entry re-issues the originating listing with its parameters intact,
/// `sort_method` replaced and no `page`. Unknown entities yield no entries.
pub fn format_sort_methods(current: &NavigationTarget) -> Vec<ListingEntry> {
    let Some(entity) = current.param("entity") else {
        return Vec::new();
    };
    let Some(endpoint) = Endpoint::sortable_listing(entity) else {
        return Vec::new();
    };

    let mut base = NavigationTarget::new(endpoint);
    base.params = current.params.clone();
    let base = base.without_param("entity").without_param("page");

    JamendoApi::sort_methods_for(entity)
        .iter()
        .enumerate()
        .map(|(i, sort_method)| {
            let target = base
                .clone()
                .with_param("sort_method", sort_method)
                .with_param("is_update", "true");
            ListingEntry::new(&sort_method_label(sort_method), target).with_count(i)
        })
        .collect()
}
