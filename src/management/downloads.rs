use std::{collections::BTreeMap, path::PathBuf};

use chrono::Utc;

use super::StoreError;
use crate::types::{DownloadedTrack, Track};

/// Persisted index of downloaded tracks, keyed by track id.
pub struct DownloadsManager {
    path: PathBuf,
    downloads: BTreeMap<String, DownloadedTrack>,
}

impl DownloadsManager {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            downloads: BTreeMap::new(),
        }
    }

    /// Loads the index from `path`; a missing file is an empty index.
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        if !path.is_file() {
            return Ok(Self::new(path));
        }

        let json = std::fs::read_to_string(&path)?;
        let downloads: BTreeMap<String, DownloadedTrack> = serde_json::from_str(&json)?;
        Ok(Self { path, downloads })
    }

    pub fn load_default() -> Result<Self, StoreError> {
        Self::load(Self::default_path())
    }

    pub fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.downloads)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Records a finished download; an earlier entry for the track is replaced.
    pub fn add(&mut self, track: Track, path: PathBuf) -> &mut Self {
        self.downloads.insert(
            track.id.clone(),
            DownloadedTrack {
                path,
                track,
                downloaded_at: Utc::now().timestamp(),
            },
        );
        self
    }

    pub fn get(&self, track_id: &str) -> Option<&DownloadedTrack> {
        self.downloads.get(track_id)
    }

    /// All downloads, most recent first.
    pub fn all(&self) -> Vec<DownloadedTrack> {
        let mut downloads: Vec<DownloadedTrack> = self.downloads.values().cloned().collect();
        downloads.sort_by(|a, b| b.downloaded_at.cmp(&a.downloaded_at));
        downloads
    }

    pub fn count(&self) -> usize {
        self.downloads.len()
    }

    pub fn default_path() -> PathBuf {
        let mut path = crate::config::data_dir();
        path.push("state/downloads.json");
        path
    }
}
