//! # Jamendo Integration Module
//!
//! This module provides the interface to the Jamendo REST API (v3.0). It is the
//! only place in the crate that talks HTTP for catalog data: every listing
//! handler goes through [`JamendoApi`] with page, sort and search parameters and
//! receives an ordered sequence of typed records back.
//!
//! ## Architecture
//!
//! ```text
//! Router (navigation handlers)
//!          ↓
//! Jamendo Integration Layer
//!     ├── Albums     (listing, search, album-with-tracks)
//!     ├── Artists    (listing, search)
//!     ├── Tracks     (listing, filters, similar tracks, stream resolution)
//!     ├── Playlists  (listing, search, playlist-with-tracks)
//!     └── Radios     (listing, stream resolution)
//!          ↓
//! HTTP Layer (reqwest blocking, JSON)
//!          ↓
//! https://api.jamendo.com/v3.0/
//! ```
//!
//! ## Request Construction
//!
//! Every call attaches `client_id` and `format=json`. Listing calls attach
//! `limit` (clamped to [`MAX_LIMIT`]) and `offset = limit * (page - 1)`, so
//! page numbers are 1-based. Search calls add `namesearch` (or `search` for
//! tracks) and scoped calls add `artist_id`, `album_id` or `id` filters.
//!
//! ## Response Handling
//!
//! The remote envelope carries a status code and a result list:
//! - code `0`: success, the (possibly empty) result list is returned
//! - code `5`: [`JamendoError::Authentication`]
//! - any other code: [`JamendoError::Api`] with the server-provided message
//!
//! Transport failures (DNS, TLS, timeouts, refused connections) surface as
//! [`JamendoError::Connection`] so the caller can tell "check your network"
//! apart from "the service reported an error".
//!
//! ## Blocking Model
//!
//! The client issues exactly one blocking request per call and never retries.
//! Retry policy, if any, belongs to the caller.
//!
//! ## Stream Resolution
//!
//! Track streams are resolved through a redirecting endpoint. The client uses a
//! second HTTP client with redirects disabled and captures the `Location`
//! header instead of downloading the audio payload.

mod albums;
mod artists;
mod playlists;
mod radios;
mod tracks;

use std::{collections::BTreeMap, fmt, str::FromStr};

use reqwest::{
    blocking::{Client, Response},
    header::{CONTENT_TYPE, LOCATION},
    redirect::Policy,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{debug, types::ResponseEnvelope};

/// Host of the public Jamendo API, without scheme.
pub const API_HOST: &str = "api.jamendo.com/v3.0/";

/// Largest page size the API accepts.
pub const MAX_LIMIT: u32 = 100;

/// Status code Jamendo uses for a rejected client id.
pub const AUTH_ERROR_CODE: i64 = 5;

const USER_AGENT: &str = "jamcli Jamendo API";

const ALBUM_SORT_METHODS: &[&str] = &[
    "releasedate_desc",
    "popularity_total",
    "popularity_month",
    "popularity_week",
];

const ARTIST_SORT_METHODS: &[&str] = &[
    "name",
    "id",
    "joindate",
    "popularity_total",
    "popularity_month",
    "popularity_week",
];

const TRACK_SORT_METHODS: &[&str] = &[
    "buzzrate",
    "downloads_week",
    "downloads_month",
    "downloads_total",
    "listens_week",
    "listens_month",
    "listens_total",
    "popularity_week",
    "popularity_month",
    "popularity_total",
    "releasedate",
];

/// Query parameters of a single request.
///
/// A sorted map keeps request URLs deterministic and lets later inserts
/// override earlier ones, which is how filters refine the shared parameters.
pub type Params = BTreeMap<String, String>;

/// Failure categories of an API call.
#[derive(Debug, thiserror::Error)]
pub enum JamendoError {
    /// Remote code 5: the client id was rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Any other non-zero remote code.
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },
    /// The service could not be reached (DNS, TLS, timeout, refused).
    #[error("connection failed: {0}")]
    Connection(#[from] reqwest::Error),
    /// The service answered with a body that is not a valid envelope.
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl JamendoError {
    /// Guidance shown to the user next to the error.
    pub fn remediation(&self) -> &'static str {
        match self {
            JamendoError::Authentication(_) => {
                "Jamendo rejected the client id. Check JAMENDO_CLIENT_ID in your .env file."
            }
            JamendoError::Api { .. } => {
                "The Jamendo service reported an error. Please try again later."
            }
            JamendoError::Connection(_) => {
                "Jamendo could not be reached. Please check your network connection."
            }
            JamendoError::Decode(_) => {
                "Jamendo sent an unexpected response. Please try again later."
            }
        }
    }
}

/// Category of remote record a listing call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Track,
    Album,
    Artist,
    Playlist,
    Radio,
}

impl EntityKind {
    /// Plural resource name as used in URLs (`tracks`, `albums`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Track => "tracks",
            EntityKind::Album => "albums",
            EntityKind::Artist => "artists",
            EntityKind::Playlist => "playlists",
            EntityKind::Radio => "radios",
        }
    }

    /// Fixed, ordered list of sort methods this entity kind supports.
    pub fn sort_methods(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Album => ALBUM_SORT_METHODS,
            EntityKind::Artist => ARTIST_SORT_METHODS,
            EntityKind::Track => TRACK_SORT_METHODS,
            EntityKind::Playlist | EntityKind::Radio => &[],
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "track" | "tracks" => Ok(EntityKind::Track),
            "album" | "albums" => Ok(EntityKind::Album),
            "artist" | "artists" => Ok(EntityKind::Artist),
            "playlist" | "playlists" => Ok(EntityKind::Playlist),
            "radio" | "radios" => Ok(EntityKind::Radio),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio encodings offered by the `tracks/file` resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AudioFormat {
    /// MP3, 96 kbps
    Mp31,
    /// MP3 VBR, very good quality
    Mp32,
    /// Ogg Vorbis
    #[default]
    Ogg,
    /// FLAC, lossless
    Flac,
}

impl AudioFormat {
    /// Value of the `audioformat` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp31 => "mp31",
            AudioFormat::Mp32 => "mp32",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
        }
    }

    /// File extension used for downloaded files.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp31 | AudioFormat::Mp32 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp31" => Ok(AudioFormat::Mp31),
            "mp32" | "mp3" => Ok(AudioFormat::Mp32),
            "ogg" => Ok(AudioFormat::Ogg),
            "flac" => Ok(AudioFormat::Flac),
            other => Err(format!("unknown audio format: {}", other)),
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration of a [`JamendoApi`] client.
///
/// Built once from [`crate::config::Settings`] (or by hand in tests) and moved
/// into the client; there is no ambient global client state.
///
/// # Example
///
/// ```
/// let config = ClientConfig::new("de0f381a")
///     .with_limit(50)
///     .with_audio_format(AudioFormat::Mp32);
/// assert_eq!(config.limit(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    client_id: String,
    limit: u32,
    audio_format: AudioFormat,
    use_https: bool,
    base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            limit: MAX_LIMIT,
            audio_format: AudioFormat::default(),
            use_https: true,
            base_url: None,
        }
    }

    /// Sets the page size, clamped to `1..=MAX_LIMIT`.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    pub fn with_audio_format(mut self, audio_format: AudioFormat) -> Self {
        self.audio_format = audio_format;
        self
    }

    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Points the client at another API root (mirrors, local mock servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let mut url = base_url.to_string();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = Some(url);
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn audio_format(&self) -> AudioFormat {
        self.audio_format
    }

    /// Root URL every resource path is appended to.
    pub fn api_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => {
                let scheme = if self.use_https { "https" } else { "http" };
                format!("{scheme}://{API_HOST}")
            }
        }
    }
}

/// Blocking client for the Jamendo REST API.
///
/// Resource operations live in the submodules (`albums`, `artists`, `tracks`,
/// `playlists`, `radios`) as further `impl JamendoApi` blocks; this file holds
/// the shared request plumbing.
pub struct JamendoApi {
    config: ClientConfig,
    client: Client,
    redirect_client: Client,
}

impl JamendoApi {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`JamendoError::Connection`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: ClientConfig) -> Result<Self, JamendoError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let redirect_client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            config,
            client,
            redirect_client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Page size used for every listing call.
    ///
    /// The formatter compares result counts against this value to decide
    /// whether a "next page" control is offered.
    pub fn current_limit(&self) -> u32 {
        self.config.limit
    }

    /// Fixed sort methods for an entity kind given by name.
    ///
    /// Unknown entity kinds yield an empty slice.
    ///
    /// # Example
    ///
    /// ```
    /// assert_eq!(JamendoApi::sort_methods_for("albums")[0], "releasedate_desc");
    /// assert!(JamendoApi::sort_methods_for("podcasts").is_empty());
    /// ```
    pub fn sort_methods_for(entity: &str) -> &'static [&'static str] {
        entity
            .parse::<EntityKind>()
            .map(|kind| kind.sort_methods())
            .unwrap_or(&[])
    }

    /// Builds the `limit`/`offset` pair for a 1-based page.
    ///
    /// Page numbers below 1 are treated as the first page.
    pub fn page_params(&self, page: u32) -> Params {
        let limit = self.config.limit;
        let page = page.max(1);
        let mut params = Params::new();
        params.insert("limit".to_string(), limit.to_string());
        params.insert("offset".to_string(), limit.saturating_mul(page - 1).to_string());
        params
    }

    /// Performs a JSON API call and returns the typed result list.
    ///
    /// Attaches `client_id` and `format=json` to `params`, checks the
    /// envelope's status code and deserializes `results` into `T`.
    ///
    /// # Errors
    ///
    /// - [`JamendoError::Connection`] for transport failures
    /// - [`JamendoError::Authentication`] for code 5
    /// - [`JamendoError::Api`] for any other non-zero (or missing) code
    /// - [`JamendoError::Decode`] when the body is not a valid envelope
    pub(crate) fn api_call<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: Params,
    ) -> Result<Vec<T>, JamendoError> {
        params.insert("client_id".to_string(), self.config.client_id.clone());
        params.insert("format".to_string(), "json".to_string());

        let url = format!("{}{}", self.config.api_url(), path);
        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .query(&params)
            .send()?;
        debug!("api call using URL: {}", response.url());

        let body = response.text()?;
        debug!("api call got {} bytes response", body.len());

        let results = parse_envelope(&body)?;
        Ok(serde_json::from_value(results)?)
    }

    /// Requests a redirecting resource and returns its target location.
    ///
    /// Redirects are not followed: the `Location` header of the first
    /// response is the result. A non-redirect answer yields the final
    /// request URL.
    pub(crate) fn api_redirect(&self, path: &str, mut params: Params) -> Result<String, JamendoError> {
        params.insert("client_id".to_string(), self.config.client_id.clone());

        let url = format!("{}{}", self.config.api_url(), path);
        let response = self.redirect_client.get(&url).query(&params).send()?;
        debug!("api redirect using URL: {}", response.url());

        Ok(redirect_target(&response))
    }
}

fn redirect_target(response: &Response) -> String {
    if response.status().is_redirection() {
        if let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
        {
            return match response.url().join(location) {
                Ok(absolute) => absolute.to_string(),
                Err(_) => location.to_string(),
            };
        }
    }

    response.url().to_string()
}

/// Checks the status code of a response envelope and extracts its results.
///
/// A successful envelope without a `results` member yields an empty list.
///
/// # Errors
///
/// - [`JamendoError::Authentication`] when `headers.code` is 5
/// - [`JamendoError::Api`] when `headers.code` is missing or any other non-zero value
/// - [`JamendoError::Decode`] when `body` is not a JSON envelope
pub fn parse_envelope(body: &str) -> Result<serde_json::Value, JamendoError> {
    let envelope: ResponseEnvelope = serde_json::from_str(body)?;
    let headers = envelope.headers;
    let message = headers.error_message.unwrap_or_default();

    match headers.code {
        Some(0) => {}
        Some(AUTH_ERROR_CODE) => return Err(JamendoError::Authentication(message)),
        Some(code) => return Err(JamendoError::Api { code, message }),
        None => {
            return Err(JamendoError::Api {
                code: -1,
                message: "response carries no status code".to_string(),
            });
        }
    }

    if let Some(warnings) = headers.warnings.filter(has_content) {
        debug!("API-Warning: {}", warnings);
    }

    Ok(match envelope.results {
        serde_json::Value::Null => serde_json::Value::Array(Vec::new()),
        results => results,
    })
}

fn has_content(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}
