//! Navigation handlers.
//!
//! The [`Router`] is what a host calls: it receives a [`NavigationTarget`],
//! calls the API client with the target's page, sort and search parameters,
//! hands the records to the listing formatter and returns a [`Response`] for
//! the host to render. Playback targets resolve to stream URLs (and record the
//! play history), download targets run the [`Downloader`].
//!
//! API and connection errors are not handled here; they propagate to the
//! host's top-level invocation boundary.

use std::path::PathBuf;

use crate::{
    config::{self, Settings},
    debug,
    downloader::{
        CancelToken, DownloadError, DownloadItem, DownloadOutcome, Downloader, ProgressReporter,
    },
    jamendo::{EntityKind, JamendoApi, JamendoError, Params},
    listing::{self, ContentKind, Listing, ListingEntry, ViewMode},
    management::{DownloadsManager, HISTORY_LIMIT, HistoryManager, StoreError},
    navigation::{Endpoint, NavigationError, NavigationTarget},
    types::Track,
    utils, warning,
};

/// Sort method of the track listing when none is selected.
pub const DEFAULT_TRACK_SORT: &str = "buzzrate";

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    Jamendo(#[from] JamendoError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error("{0} not found")]
    NotFound(String),
}

/// Finished download of a track and the outcome of the transfer.
#[derive(Debug)]
pub struct DownloadReport {
    pub track: Track,
    pub outcome: DownloadOutcome,
}

/// What the host has to do with the result of a navigation.
#[derive(Debug)]
pub enum Response {
    /// Render these entries.
    Listing(Listing),
    /// Play this URL or local file.
    Resolved(String),
    /// Ask the user for text under `heading`, then dispatch `target` with the
    /// answer as its `query` parameter.
    Input {
        heading: String,
        target: NavigationTarget,
    },
    Download(DownloadReport),
    /// Open the host's settings dialog.
    Settings,
}

type ReporterFactory = Box<dyn Fn() -> Box<dyn ProgressReporter>>;

pub struct Router {
    api: JamendoApi,
    settings: Settings,
    history: HistoryManager,
    downloads: DownloadsManager,
    temp_dir: PathBuf,
    reporter_factory: Option<ReporterFactory>,
    cancel: CancelToken,
}

impl Router {
    pub fn new(
        api: JamendoApi,
        settings: Settings,
        history: HistoryManager,
        downloads: DownloadsManager,
    ) -> Self {
        Self {
            api,
            settings,
            history,
            downloads,
            temp_dir: config::data_dir().join("tmp"),
            reporter_factory: None,
            cancel: CancelToken::new(),
        }
    }

    /// Directory where downloads are staged before they are moved.
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Supplies a progress reporter for every download when progress is enabled.
    pub fn with_progress<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ProgressReporter> + 'static,
    {
        self.reporter_factory = Some(Box::new(factory));
        self
    }

    /// Shares `cancel` with every download started by this router.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels the running download when triggered.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn downloads(&self) -> &DownloadsManager {
        &self.downloads
    }

    /// Parses `url` and dispatches it.
    pub fn open(&mut self, url: &str) -> Result<Response, RouterError> {
        let target: NavigationTarget = url.parse()?;
        self.dispatch(&target)
    }

    pub fn dispatch(&mut self, target: &NavigationTarget) -> Result<Response, RouterError> {
        debug!("dispatching {}", target);

        match target.endpoint {
            Endpoint::Root => Ok(self.menu(
                target,
                vec![
                    listing::menu_item("Browse", Endpoint::BrowseRoot),
                    listing::menu_item("Search", Endpoint::SearchRoot),
                    listing::menu_item("Radios", Endpoint::ShowRadios),
                    listing::menu_item("History", Endpoint::ShowHistory),
                    listing::menu_item("Downloads", Endpoint::ShowDownloads),
                ],
            )),
            Endpoint::BrowseRoot => Ok(self.menu(
                target,
                vec![
                    listing::menu_item("Tracks", Endpoint::ShowTracks),
                    listing::menu_item("Albums", Endpoint::ShowAlbums),
                    listing::menu_item("Artists", Endpoint::ShowArtists),
                    listing::menu_item("Playlists", Endpoint::ShowPlaylists),
                ],
            )),
            Endpoint::SearchRoot => Ok(self.menu(
                target,
                vec![
                    listing::menu_item("Search tracks", Endpoint::SearchTracks),
                    listing::menu_item("Search albums", Endpoint::SearchAlbums),
                    listing::menu_item("Search artists", Endpoint::SearchArtists),
                    listing::menu_item("Search playlists", Endpoint::SearchPlaylists),
                ],
            )),
            Endpoint::ShowAlbums => self.show_albums(target),
            Endpoint::SearchAlbums => self.search(target, "Search albums", |api, query, page| {
                let albums = api.list_albums(page, None, None, Some(query))?;
                Ok((ContentKind::Albums, albums.len(), listing::format_albums(&albums)))
            }),
            Endpoint::ShowAlbumsByArtist => {
                let artist_id = target.require("artist_id")?;
                let albums = self.api.list_albums(target.page(), Some(artist_id), None, None)?;
                let entries = listing::format_albums(&albums);
                Ok(self.paginated(target, ContentKind::Albums, entries, albums.len()))
            }
            Endpoint::ShowPlaylists => {
                let playlists = self.api.list_playlists(target.page(), None)?;
                let entries = listing::format_playlists(&playlists);
                Ok(self.paginated(target, ContentKind::Music, entries, playlists.len()))
            }
            Endpoint::SearchPlaylists => {
                self.search(target, "Search playlists", |api, query, page| {
                    let playlists = api.list_playlists(page, Some(query))?;
                    Ok((
                        ContentKind::Music,
                        playlists.len(),
                        listing::format_playlists(&playlists),
                    ))
                })
            }
            Endpoint::ShowArtists => self.show_artists(target),
            Endpoint::SearchArtists => self.search(target, "Search artists", |api, query, page| {
                let artists = api.list_artists(page, None, Some(query))?;
                Ok((ContentKind::Artists, artists.len(), listing::format_artists(&artists)))
            }),
            Endpoint::ShowRadios => {
                let radios = self.api.list_radios(target.page())?;
                let entries = listing::format_radios(&radios);
                Ok(self.paginated(target, ContentKind::Music, entries, radios.len()))
            }
            Endpoint::ShowTracks => self.show_tracks(target),
            Endpoint::SearchTracks => self.search(target, "Search tracks", |api, query, page| {
                let tracks = api.search_tracks(query, page)?;
                Ok((ContentKind::Songs, tracks.len(), listing::format_tracks(&tracks)))
            }),
            Endpoint::ShowTracksInAlbum => {
                let mut filter = Params::new();
                filter.insert("album_id".to_string(), target.require("album_id")?.to_string());
                let tracks = self.api.list_tracks(target.page(), None, Some(&filter))?;
                let entries = listing::format_tracks(&tracks);
                Ok(self.paginated(target, ContentKind::Songs, entries, tracks.len()))
            }
            Endpoint::ShowTracksInPlaylist => {
                let playlist_id = target.require("playlist_id")?;
                let (playlist, tracks) = self.api.get_playlist_with_tracks(playlist_id)?;
                let entries = listing::format_playlist_tracks(&playlist, &tracks);
                Ok(self.paginated(target, ContentKind::Songs, entries, tracks.len()))
            }
            Endpoint::ShowSimilarTracks => {
                let track_id = target.require("track_id")?;
                let tracks = self.api.list_similar_tracks(track_id, target.page())?;
                let entries = listing::format_tracks(&tracks);
                Ok(self.paginated(target, ContentKind::Songs, entries, tracks.len()))
            }
            Endpoint::ShowSortMethods => {
                let entries = listing::format_sort_methods(target);
                let mut listing = Listing::new(ContentKind::Menu, entries);
                listing.update_listing = true;
                Ok(Response::Listing(listing))
            }
            Endpoint::ShowHistory => self.show_history(target),
            Endpoint::ShowDownloads => {
                let entries = listing::format_downloads(&self.downloads.all());
                Ok(self.finish(target, ContentKind::Songs, entries))
            }
            Endpoint::PlayTrack => {
                let track_id = target.require("track_id")?;
                let stream_url = self
                    .api
                    .resolve_track_stream_url(track_id, self.settings.audio_format)?;
                self.remember_played(track_id);
                Ok(Response::Resolved(stream_url))
            }
            Endpoint::PlayRadio => {
                let radio_id = target.require("radio_id")?;
                match self.api.resolve_radio_stream_url(radio_id)? {
                    Some(stream_url) => Ok(Response::Resolved(stream_url)),
                    None => Err(RouterError::NotFound(format!("stream of radio {}", radio_id))),
                }
            }
            Endpoint::PlayDownloaded => {
                let track_id = target.require("track_id")?.to_string();
                let path = match self.downloads.get(&track_id) {
                    Some(download) => download.path.display().to_string(),
                    None => return Err(RouterError::NotFound(format!("download of track {}", track_id))),
                };
                self.remember_played(&track_id);
                Ok(Response::Resolved(path))
            }
            Endpoint::DownloadTrack => {
                let track_id = target.require("track_id")?.to_string();
                self.download_track(&track_id).map(Response::Download)
            }
            Endpoint::OpenSettings => Ok(Response::Settings),
        }
    }

    fn show_albums(&self, target: &NavigationTarget) -> Result<Response, RouterError> {
        let albums = self
            .api
            .list_albums(target.page(), None, target.param("sort_method"), None)?;
        let mut entries = listing::format_albums(&albums);
        entries.push(listing::sort_method_switcher_item(target, EntityKind::Album));
        Ok(self.paginated(target, ContentKind::Albums, entries, albums.len()))
    }

    fn show_artists(&self, target: &NavigationTarget) -> Result<Response, RouterError> {
        let artists = self
            .api
            .list_artists(target.page(), target.param("sort_method"), None)?;
        let mut entries = listing::format_artists(&artists);
        entries.push(listing::sort_method_switcher_item(target, EntityKind::Artist));
        Ok(self.paginated(target, ContentKind::Artists, entries, artists.len()))
    }

    fn show_tracks(&self, target: &NavigationTarget) -> Result<Response, RouterError> {
        let sort_method = target.param("sort_method").unwrap_or(DEFAULT_TRACK_SORT);
        let tracks = self.api.list_tracks(target.page(), Some(sort_method), None)?;
        let mut entries = listing::format_tracks(&tracks);
        entries.push(listing::sort_method_switcher_item(target, EntityKind::Track));
        Ok(self.paginated(target, ContentKind::Songs, entries, tracks.len()))
    }

    fn show_history(&self, target: &NavigationTarget) -> Result<Response, RouterError> {
        if self.history.is_empty() {
            return Ok(self.finish(target, ContentKind::Songs, Vec::new()));
        }

        let ids = self.history.track_ids();
        let mut filter = Params::new();
        filter.insert("id".to_string(), ids.join("+"));
        filter.insert("limit".to_string(), HISTORY_LIMIT.to_string());
        filter.insert("offset".to_string(), "0".to_string());

        let mut tracks = self.api.list_tracks(1, None, Some(&filter))?;
        // most recently played first
        tracks.sort_by_key(|track| {
            std::cmp::Reverse(ids.iter().position(|id| *id == track.id).unwrap_or(0))
        });

        let entries = listing::format_tracks(&tracks);
        Ok(self.finish(target, ContentKind::Songs, entries))
    }

    /// Runs a search handler, or asks for the search terms first.
    fn search<F>(
        &self,
        target: &NavigationTarget,
        heading: &str,
        handler: F,
    ) -> Result<Response, RouterError>
    where
        F: Fn(&JamendoApi, &str, u32) -> Result<(ContentKind, usize, Vec<ListingEntry>), JamendoError>,
    {
        let Some(query) = target.param("query") else {
            return Ok(Response::Input {
                heading: heading.to_string(),
                target: target.clone(),
            });
        };

        let (content, results_len, entries) = handler(&self.api, query, target.page())?;
        Ok(self.paginated(target, content, entries, results_len))
    }

    /// Resolves, downloads and indexes a track (plus its cover when enabled).
    pub fn download_track(&mut self, track_id: &str) -> Result<DownloadReport, RouterError> {
        let mut filter = Params::new();
        filter.insert("id".to_string(), track_id.to_string());
        let track = self
            .api
            .list_tracks(1, None, Some(&filter))?
            .into_iter()
            .next()
            .ok_or_else(|| RouterError::NotFound(format!("track {}", track_id)))?;

        let audio_format = self.settings.audio_format;
        let stream_url = self.api.resolve_track_stream_url(&track.id, audio_format)?;

        let base_name = utils::sanitize_filename(&format!("{} - {}", track.artist_name, track.name));
        let mut items = vec![DownloadItem::new(
            &stream_url,
            &format!("{}.{}", base_name, audio_format.extension()),
        )];
        if self.settings.download_cover {
            if let Some(cover_url) = utils::image_url(&track.album_image) {
                let cover_name =
                    utils::sanitize_filename(&format!("{} - {}", track.artist_name, track.album_name));
                items.push(DownloadItem::new(&cover_url, &format!("{}.jpg", cover_name)));
            }
        }

        let mut downloader =
            Downloader::new(self.settings.download_path.clone(), self.temp_dir.clone())?
                .with_cancel_token(self.cancel.clone());
        if self.settings.download_show_progress {
            if let Some(factory) = &self.reporter_factory {
                downloader = downloader.with_reporter(factory());
            }
        }

        let outcome = downloader.download(&items);
        if let Some(audio_path) = outcome.paths().first() {
            self.downloads.add(track.clone(), audio_path.clone());
            if let Err(e) = self.downloads.persist() {
                warning!("Cannot persist downloaded tracks. Err: {}", e);
            }
        }

        Ok(DownloadReport { track, outcome })
    }

    fn remember_played(&mut self, track_id: &str) {
        self.history.add(track_id);
        if let Err(e) = self.history.persist() {
            warning!("Cannot persist play history. Err: {}", e);
        }
    }

    fn menu(&self, target: &NavigationTarget, entries: Vec<ListingEntry>) -> Response {
        let mut listing = Listing::new(ContentKind::Menu, entries);
        listing.update_listing = target.is_update();
        Response::Listing(listing)
    }

    fn paginated(
        &self,
        target: &NavigationTarget,
        content: ContentKind,
        mut entries: Vec<ListingEntry>,
        results_len: usize,
    ) -> Response {
        entries.extend(listing::pagination_items(
            target,
            results_len,
            self.api.current_limit(),
        ));
        self.finish(target, content, entries)
    }

    fn finish(&self, target: &NavigationTarget, content: ContentKind, entries: Vec<ListingEntry>) -> Response {
        let mut listing = Listing::new(content, entries);
        listing.update_listing = target.is_update();
        if self.settings.force_viewmode {
            listing.view_mode = Some(ViewMode::Thumbnail);
        }
        Response::Listing(listing)
    }
}
