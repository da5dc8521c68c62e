mod downloads;
mod history;

pub use downloads::DownloadsManager;
pub use history::{HISTORY_LIMIT, HistoryManager};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("store serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
