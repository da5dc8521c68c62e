//! Sequential track downloader.
//!
//! Downloads one item after another into a temporary directory and moves each
//! finished file into the destination directory. Progress is reported as an
//! integer percentage weighted per item, and a [`CancelToken`] is polled after
//! every received chunk.
//!
//! ```text
//! Idle → Preparing → Downloading(i of n) → Finalizing → Done
//!                          ↓
//!                      Cancelled
//! ```
//!
//! A failing item stops the run and the items finished so far are returned as
//! [`DownloadOutcome::PartiallyCompleted`]. Cancelling stops before the next
//! item; the partial file of the current item never reaches the destination.

use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use reqwest::blocking::Client;

use crate::debug;

const CHUNK_SIZE: usize = 8 * 1024;

/// Cooperative cancellation flag shared between a downloader and its host.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receives progress updates of a running download.
pub trait ProgressReporter {
    /// `percent` is the overall progress in `0..=100`.
    fn update(&mut self, percent: u8, message: &str);

    fn finish(&mut self) {}
}

/// A remote resource and the file name it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadItem {
    pub url: String,
    pub filename: String,
}

impl DownloadItem {
    pub fn new(url: &str, filename: &str) -> Self {
        Self {
            url: url.to_string(),
            filename: filename.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    Preparing,
    Downloading { index: usize, total: usize },
    Finalizing,
    Done,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("transfer failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(u16),
}

/// Result of a download run. Every variant carries the final paths of the
/// items that completed, in item order.
#[derive(Debug)]
pub enum DownloadOutcome {
    Completed(Vec<PathBuf>),
    PartiallyCompleted {
        completed: Vec<PathBuf>,
        error: DownloadError,
    },
    Cancelled(Vec<PathBuf>),
}

impl DownloadOutcome {
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            DownloadOutcome::Completed(paths) => paths,
            DownloadOutcome::PartiallyCompleted { completed, .. } => completed,
            DownloadOutcome::Cancelled(paths) => paths,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, DownloadOutcome::Completed(_))
    }
}

enum Transfer {
    Finished,
    Cancelled,
}

pub struct Downloader {
    client: Client,
    download_dir: PathBuf,
    temp_dir: PathBuf,
    cancel: CancelToken,
    reporter: Option<Box<dyn ProgressReporter>>,
    state: DownloadState,
}

impl Downloader {
    /// Creates a downloader storing files in `download_dir`, staging them in
    /// `temp_dir`.
    pub fn new(download_dir: PathBuf, temp_dir: PathBuf) -> Result<Self, DownloadError> {
        // body reads can outlast the default 30s request timeout
        let client = Client::builder().timeout(None::<Duration>).build()?;

        Ok(Self {
            client,
            download_dir,
            temp_dir,
            cancel: CancelToken::new(),
            reporter: None,
            state: DownloadState::Idle,
        })
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Replaces the cancellation flag with one owned by the host.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token the host can use to cancel the running download.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> DownloadState {
        self.state
    }

    /// Downloads `items` in order.
    ///
    /// The destination directory is created before the first transfer. Each
    /// item is written to the temp directory and moved into the destination
    /// once complete.
    pub fn download(&mut self, items: &[DownloadItem]) -> DownloadOutcome {
        let total = items.len();
        let mut completed: Vec<PathBuf> = Vec::new();

        self.state = DownloadState::Preparing;
        self.report(1, "Preparing download...");

        if let Err(e) = fs::create_dir_all(&self.download_dir)
            .and_then(|_| fs::create_dir_all(&self.temp_dir))
        {
            return self.fail(completed, e.into());
        }
        let message = format!("Downloading to {}", self.download_dir.display());
        self.report(2, &message);

        for (index, item) in items.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return self.cancelled(completed);
            }

            self.state = DownloadState::Downloading {
                index: index + 1,
                total,
            };
            let temp_path = self.temp_dir.join(format!("{}.part", item.filename));
            let final_path = self.download_dir.join(&item.filename);
            debug!("Downloading \"{}\" to \"{}\"", item.url, final_path.display());

            match self.transfer(index, total, item, &temp_path) {
                Ok(Transfer::Finished) => {}
                Ok(Transfer::Cancelled) => {
                    let _ = fs::remove_file(&temp_path);
                    return self.cancelled(completed);
                }
                Err(e) => {
                    let _ = fs::remove_file(&temp_path);
                    return self.fail(completed, e);
                }
            }

            if let Err(e) = move_file(&temp_path, &final_path) {
                let _ = fs::remove_file(&temp_path);
                return self.fail(completed, e.into());
            }
            debug!("Item done");
            completed.push(final_path);
        }

        self.state = DownloadState::Finalizing;
        self.report(100, "Download finished");
        self.finish();
        self.state = DownloadState::Done;
        debug!("All done");
        DownloadOutcome::Completed(completed)
    }

    fn transfer(
        &mut self,
        index: usize,
        total: usize,
        item: &DownloadItem,
        temp_path: &Path,
    ) -> Result<Transfer, DownloadError> {
        let mut response = self.client.get(&item.url).send()?;
        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status().as_u16()));
        }

        let content_length = response.content_length();
        let mut file = File::create(temp_path)?;
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut received: u64 = 0;

        loop {
            let read = response.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])?;
            received += read as u64;

            let percent = item_percent(index, total, received, content_length);
            let message = format!(
                "Current progress: {:.2} MB - {}",
                received as f64 / 1024.0 / 1024.0,
                item.filename
            );
            self.report(percent, &message);

            if self.cancel.is_cancelled() {
                debug!("Cancelled");
                return Ok(Transfer::Cancelled);
            }
        }

        file.flush()?;
        Ok(Transfer::Finished)
    }

    fn cancelled(&mut self, completed: Vec<PathBuf>) -> DownloadOutcome {
        self.state = DownloadState::Cancelled;
        self.finish();
        DownloadOutcome::Cancelled(completed)
    }

    fn fail(&mut self, completed: Vec<PathBuf>, error: DownloadError) -> DownloadOutcome {
        debug!("Download failed: {}", error);
        self.state = DownloadState::Done;
        self.finish();
        DownloadOutcome::PartiallyCompleted { completed, error }
    }

    fn report(&mut self, percent: u8, message: &str) {
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.update(percent, message);
        }
    }

    fn finish(&mut self) {
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.finish();
        }
    }
}

/// Overall percentage after `received` bytes of item `index` (0-based) of
/// `total`. Without a known length the item counts as done.
pub fn item_percent(index: usize, total: usize, received: u64, content_length: Option<u64>) -> u8 {
    if total == 0 {
        return 100;
    }

    let share = 100.0 / total as f64;
    let progress = match content_length {
        Some(length) if length > 0 => {
            index as f64 * share + share * (received.min(length) as f64 / length as f64)
        }
        _ => (index + 1) as f64 * share,
    };
    progress.clamp(0.0, 100.0) as u8
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    // rename fails across file systems; copy next to the target first so a
    // failed copy never leaves a partial file under the final name
    let staged = staged_path(to);
    if let Err(e) = fs::copy(from, &staged).and_then(|_| fs::rename(&staged, to)) {
        let _ = fs::remove_file(&staged);
        return Err(e);
    }
    fs::remove_file(from)
}

fn staged_path(to: &Path) -> PathBuf {
    let mut name = to.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    to.with_file_name(name)
}
