//! Navigation endpoints and targets.
//!
//! Every listing entry, context action and pagination control points at a
//! [`NavigationTarget`]: an [`Endpoint`] plus its named parameters. Targets
//! render to and parse from `plugin://jamcli/...` URLs so a host can hand
//! them back verbatim, and the formatter builds "next page" or "change sort
//! order" targets directly from the target of the current request.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Serialize, Serializer};

/// URL prefix of every navigation target.
pub const PLUGIN_URL: &str = "plugin://jamcli";

/// All navigation endpoints the host can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Root,
    BrowseRoot,
    SearchRoot,
    ShowAlbums,
    SearchAlbums,
    ShowAlbumsByArtist,
    ShowPlaylists,
    SearchPlaylists,
    ShowArtists,
    SearchArtists,
    ShowRadios,
    ShowTracks,
    SearchTracks,
    ShowTracksInAlbum,
    ShowTracksInPlaylist,
    ShowSimilarTracks,
    ShowSortMethods,
    ShowHistory,
    ShowDownloads,
    PlayTrack,
    PlayRadio,
    PlayDownloaded,
    DownloadTrack,
    OpenSettings,
}

impl Endpoint {
    /// Every endpoint in route-matching order. Literal routes precede
    /// parameterised routes sharing the same prefix.
    pub const ALL: &'static [Endpoint] = &[
        Endpoint::Root,
        Endpoint::BrowseRoot,
        Endpoint::SearchRoot,
        Endpoint::ShowAlbums,
        Endpoint::SearchAlbums,
        Endpoint::ShowAlbumsByArtist,
        Endpoint::ShowPlaylists,
        Endpoint::SearchPlaylists,
        Endpoint::ShowArtists,
        Endpoint::SearchArtists,
        Endpoint::ShowRadios,
        Endpoint::ShowTracks,
        Endpoint::SearchTracks,
        Endpoint::ShowTracksInAlbum,
        Endpoint::ShowTracksInPlaylist,
        Endpoint::ShowSimilarTracks,
        Endpoint::ShowSortMethods,
        Endpoint::ShowHistory,
        Endpoint::ShowDownloads,
        Endpoint::PlayTrack,
        Endpoint::PlayRadio,
        Endpoint::PlayDownloaded,
        Endpoint::DownloadTrack,
        Endpoint::OpenSettings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Root => "root_menu",
            Endpoint::BrowseRoot => "browse_root",
            Endpoint::SearchRoot => "search_root",
            Endpoint::ShowAlbums => "show_albums",
            Endpoint::SearchAlbums => "search_albums",
            Endpoint::ShowAlbumsByArtist => "show_albums_by_artist",
            Endpoint::ShowPlaylists => "show_playlists",
            Endpoint::SearchPlaylists => "search_playlists",
            Endpoint::ShowArtists => "show_artists",
            Endpoint::SearchArtists => "search_artists",
            Endpoint::ShowRadios => "show_radios",
            Endpoint::ShowTracks => "show_tracks",
            Endpoint::SearchTracks => "search_tracks",
            Endpoint::ShowTracksInAlbum => "show_tracks_in_album",
            Endpoint::ShowTracksInPlaylist => "show_tracks_in_playlist",
            Endpoint::ShowSimilarTracks => "show_similar_tracks",
            Endpoint::ShowSortMethods => "show_sort_methods",
            Endpoint::ShowHistory => "show_history",
            Endpoint::ShowDownloads => "show_downloads",
            Endpoint::PlayTrack => "play_track",
            Endpoint::PlayRadio => "play_radio",
            Endpoint::PlayDownloaded => "play_downloaded",
            Endpoint::DownloadTrack => "download_track",
            Endpoint::OpenSettings => "open_settings",
        }
    }

    /// Route template; `<name>` segments are path parameters.
    pub fn route(&self) -> &'static str {
        match self {
            Endpoint::Root => "/",
            Endpoint::BrowseRoot => "/browse/",
            Endpoint::SearchRoot => "/search/",
            Endpoint::ShowAlbums => "/albums/",
            Endpoint::SearchAlbums => "/albums/search/",
            Endpoint::ShowAlbumsByArtist => "/albums/<artist_id>/",
            Endpoint::ShowPlaylists => "/playlists/",
            Endpoint::SearchPlaylists => "/playlists/search/",
            Endpoint::ShowArtists => "/artists/",
            Endpoint::SearchArtists => "/artists/search/",
            Endpoint::ShowRadios => "/radios/",
            Endpoint::ShowTracks => "/tracks/",
            Endpoint::SearchTracks => "/tracks/search/",
            Endpoint::ShowTracksInAlbum => "/tracks/album/<album_id>/",
            Endpoint::ShowTracksInPlaylist => "/tracks/playlist/<playlist_id>/",
            Endpoint::ShowSimilarTracks => "/tracks/similar/<track_id>/",
            Endpoint::ShowSortMethods => "/sort_methods/<entity>/",
            Endpoint::ShowHistory => "/history/",
            Endpoint::ShowDownloads => "/downloads/",
            Endpoint::PlayTrack => "/play/track/<track_id>",
            Endpoint::PlayRadio => "/play/radio/<radio_id>",
            Endpoint::PlayDownloaded => "/play/downloaded/<track_id>",
            Endpoint::DownloadTrack => "/download/track/<track_id>",
            Endpoint::OpenSettings => "/settings",
        }
    }

    /// Names of the path parameters this endpoint requires.
    pub fn path_params(&self) -> Vec<&'static str> {
        self.route()
            .split('/')
            .filter_map(|segment| segment.strip_prefix('<')?.strip_suffix('>'))
            .collect()
    }

    /// Listing endpoint whose results can be re-sorted for an entity kind.
    pub fn sortable_listing(entity: &str) -> Option<Endpoint> {
        match entity {
            "albums" => Some(Endpoint::ShowAlbums),
            "artists" => Some(Endpoint::ShowArtists),
            "tracks" => Some(Endpoint::ShowTracks),
            _ => None,
        }
    }

    fn match_path(&self, path: &str) -> Option<BTreeMap<String, String>> {
        // trailing slashes are optional
        let template: Vec<&str> = self.route().trim_end_matches('/').split('/').collect();
        let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
        if template.len() != segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, actual) in template.iter().zip(segments.iter()) {
            match expected.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                Some(name) => {
                    if actual.is_empty() {
                        return None;
                    }
                    params.insert(name.to_string(), decode(actual));
                }
                None if expected == actual => {}
                None => return None,
            }
        }
        Some(params)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NavigationError {
    #[error("no matching view found for {0}")]
    NotFound(String),
    #[error("missing parameter {param} for {endpoint}")]
    MissingParam {
        endpoint: &'static str,
        param: &'static str,
    },
}

/// An endpoint plus its named parameters.
///
/// Path parameters (`artist_id`, `album_id`, ...) and query parameters
/// (`page`, `sort_method`, `query`, `is_update`, ...) share one map; the
/// split only matters when rendering the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub endpoint: Endpoint,
    pub params: BTreeMap<String, String>,
}

impl NavigationTarget {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn without_param(mut self, key: &str) -> Self {
        self.params.remove(key);
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Like [`NavigationTarget::param`] but fails for absent path parameters.
    pub fn require(&self, key: &'static str) -> Result<&str, NavigationError> {
        self.param(key).ok_or(NavigationError::MissingParam {
            endpoint: self.endpoint.name(),
            param: key,
        })
    }

    /// Current 1-based page; absent or malformed values mean page 1.
    pub fn page(&self) -> u32 {
        self.param("page")
            .and_then(|page| page.parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }

    /// Whether the listing replaces the current one instead of stacking.
    pub fn is_update(&self) -> bool {
        self.params.contains_key("is_update")
    }

    /// Renders the `plugin://jamcli/...` URL of this target.
    pub fn to_url(&self) -> String {
        let path_params = self.endpoint.path_params();
        let path: Vec<String> = self
            .endpoint
            .route()
            .split('/')
            .map(|segment| {
                match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                    Some(name) => urlencoding::encode(self.param(name).unwrap_or_default())
                        .into_owned(),
                    None => segment.to_string(),
                }
            })
            .collect();

        let query: Vec<String> = self
            .params
            .iter()
            .filter(|(key, _)| !path_params.contains(&key.as_str()))
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect();

        if query.is_empty() {
            format!("{}{}", PLUGIN_URL, path.join("/"))
        } else {
            format!("{}{}?{}", PLUGIN_URL, path.join("/"), query.join("&"))
        }
    }
}

impl FromStr for NavigationTarget {
    type Err = NavigationError;

    /// Parses a target URL; the `plugin://jamcli` prefix is optional.
    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let rest = url.trim().strip_prefix(PLUGIN_URL).unwrap_or(url.trim());
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        for endpoint in Endpoint::ALL {
            if let Some(mut params) = endpoint.match_path(path) {
                for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    params.entry(decode(key)).or_insert_with(|| decode(value));
                }
                return Ok(Self {
                    endpoint: *endpoint,
                    params,
                });
            }
        }

        Err(NavigationError::NotFound(url.to_string()))
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

impl Serialize for NavigationTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_url())
    }
}

fn decode(value: &str) -> String {
    let value = value.replace('+', " ");
    urlencoding::decode(&value)
        .map(|v| v.into_owned())
        .unwrap_or(value)
}
