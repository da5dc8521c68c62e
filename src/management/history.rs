use std::path::PathBuf;

use super::StoreError;

/// Maximum number of tracks kept in the play history.
pub const HISTORY_LIMIT: usize = 25;

/// Persisted list of recently played track ids, most recent last.
pub struct HistoryManager {
    path: PathBuf,
    track_ids: Vec<String>,
}

impl HistoryManager {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            track_ids: Vec::new(),
        }
    }

    /// Loads the history from `path`; a missing file is an empty history.
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        if !path.is_file() {
            return Ok(Self::new(path));
        }

        let json = std::fs::read_to_string(&path)?;
        let track_ids: Vec<String> = serde_json::from_str(&json)?;
        Ok(Self { path, track_ids })
    }

    /// Loads the history from the application data directory.
    pub fn load_default() -> Result<Self, StoreError> {
        Self::load(Self::default_path())
    }

    pub fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.track_ids)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Appends a played track, evicting the oldest entries beyond the limit.
    ///
    /// A track that is already present moves to the most recent position.
    pub fn add(&mut self, track_id: &str) {
        self.track_ids.retain(|id| id != track_id);
        self.track_ids.push(track_id.to_string());

        if self.track_ids.len() > HISTORY_LIMIT {
            let overflow = self.track_ids.len() - HISTORY_LIMIT;
            self.track_ids.drain(..overflow);
        }
    }

    /// Track ids in play order, oldest first.
    pub fn track_ids(&self) -> &[String] {
        &self.track_ids
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    pub fn default_path() -> PathBuf {
        let mut path = crate::config::data_dir();
        path.push("state/history.json");
        path
    }
}
