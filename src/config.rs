//! Configuration management for the Jamendo catalog browser.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It replaces the settings storage of a media-center
//! host: page size, preferred audio format, view mode and download preferences
//! are all read here and frozen into an immutable [`Settings`] value.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf};

use crate::jamendo::{AudioFormat, ClientConfig};

/// Client identifier registered for this application with Jamendo.
pub const DEFAULT_CLIENT_ID: &str = "de0f381a";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `jamcli/.env`. A missing file is not an error:
/// every setting has a default.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/jamcli/.env`
/// - macOS: `~/Library/Application Support/jamcli/.env`
/// - Windows: `%LOCALAPPDATA%/jamcli/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
pub fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

/// Returns the application's local data directory (`<data_local_dir>/jamcli`).
///
/// History, the downloaded-tracks index and temporary download files all
/// live below this directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("jamcli");
    path
}

/// Returns the Jamendo API client ID.
///
/// Retrieves the `JAMENDO_CLIENT_ID` environment variable, falling back to the
/// client id registered for this application.
pub fn jamendo_client_id() -> String {
    env::var("JAMENDO_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string())
}

/// Returns an optional override of the API base URL.
///
/// Retrieves the `JAMENDO_API_URL` environment variable. When unset the
/// client talks to `api.jamendo.com` using the scheme selected by
/// [`jamendo_use_https`].
///
/// # Example
///
/// ```
/// let url = jamendo_api_url(); // e.g., Some("http://127.0.0.1:8080/v3.0/")
/// ```
pub fn jamendo_api_url() -> Option<String> {
    env::var("JAMENDO_API_URL").ok().filter(|v| !v.is_empty())
}

/// Returns whether API requests use HTTPS (`JAMENDO_USE_HTTPS`, default true).
pub fn jamendo_use_https() -> bool {
    bool_var("JAMENDO_USE_HTTPS", true)
}

/// Returns the configured page size (`JAMENDO_LIMIT`, default 100).
///
/// The value is clamped by the API client to the provider's maximum.
pub fn jamendo_limit() -> u32 {
    env::var("JAMENDO_LIMIT")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(100)
}

/// Returns the preferred audio format (`JAMENDO_AUDIO_FORMAT`, default `ogg`).
///
/// Unknown values fall back to the default.
pub fn jamendo_audio_format() -> AudioFormat {
    env::var("JAMENDO_AUDIO_FORMAT")
        .ok()
        .and_then(|v| v.parse::<AudioFormat>().ok())
        .unwrap_or_default()
}

/// Returns whether listings ask for the thumbnail view (`JAMCLI_FORCE_VIEWMODE`).
pub fn force_viewmode() -> bool {
    bool_var("JAMCLI_FORCE_VIEWMODE", false)
}

/// Returns the download destination directory (`JAMCLI_DOWNLOAD_PATH`).
///
/// Defaults to a `Jamendo` folder inside the user's audio directory, or the
/// home directory when the platform has no audio directory.
pub fn download_path() -> PathBuf {
    match env::var("JAMCLI_DOWNLOAD_PATH") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => dirs::audio_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Jamendo"),
    }
}

/// Returns whether a progress bar is shown while downloading.
pub fn download_show_progress() -> bool {
    bool_var("JAMCLI_DOWNLOAD_SHOW_PROGRESS", true)
}

/// Returns whether album cover art is downloaded next to the track.
pub fn download_cover() -> bool {
    bool_var("JAMCLI_DOWNLOAD_COVER", false)
}

/// Returns whether diagnostic output is enabled (`JAMCLI_DEBUG`).
pub fn debug_enabled() -> bool {
    bool_var("JAMCLI_DEBUG", false)
}

fn bool_var(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

/// Parses the boolean spellings accepted in the `.env` file.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Immutable snapshot of every setting the application consumes.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub api_url: Option<String>,
    pub use_https: bool,
    pub limit: u32,
    pub audio_format: AudioFormat,
    pub force_viewmode: bool,
    pub download_path: PathBuf,
    pub download_show_progress: bool,
    pub download_cover: bool,
}

impl Settings {
    /// Reads all settings from the environment once.
    pub fn from_env() -> Self {
        Self {
            client_id: jamendo_client_id(),
            api_url: jamendo_api_url(),
            use_https: jamendo_use_https(),
            limit: jamendo_limit(),
            audio_format: jamendo_audio_format(),
            force_viewmode: force_viewmode(),
            download_path: download_path(),
            download_show_progress: download_show_progress(),
            download_cover: download_cover(),
        }
    }

    /// Derives the configuration handed to [`crate::jamendo::JamendoApi::new`].
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.client_id)
            .with_https(self.use_https)
            .with_limit(self.limit)
            .with_audio_format(self.audio_format);

        match &self.api_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            api_url: None,
            use_https: true,
            limit: 100,
            audio_format: AudioFormat::default(),
            force_viewmode: false,
            download_path: PathBuf::from("Jamendo"),
            download_show_progress: true,
            download_cover: false,
        }
    }
}
