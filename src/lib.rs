//! Jamendo Catalog Browser Library
//!
//! This library provides functionality for browsing the Jamendo music catalog
//! from a navigation-driven host. It includes modules for API communication,
//! response shaping into paginated listings, navigation targets, persisted
//! history and download stores, and a sequential track downloader.
//!
//! # Modules
//!
//! - `cli` - Terminal host: prompts, table rendering and progress display
//! - `config` - Configuration management and environment variables
//! - `downloader` - Fetch-to-temp-then-move track downloader
//! - `jamendo` - Jamendo REST API client implementation
//! - `listing` - Formatting of API records into listing entries and pagination
//! - `management` - Persisted play history and downloaded-tracks index
//! - `navigation` - Navigation endpoints and targets
//! - `router` - Dispatches navigation targets to their handlers
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use jamcli::{config, jamendo::JamendoApi};
//!
//! fn main() -> jamcli::Res<()> {
//!     config::load_env()?;
//!     let settings = config::Settings::from_env();
//!     let api = JamendoApi::new(settings.client_config())?;
//!     let tracks = api.list_tracks(1, Some("buzzrate"), None)?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod downloader;
pub mod jamendo;
pub mod listing;
pub mod management;
pub mod navigation;
pub mod router;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for the command-line layer
/// using a boxed dynamic error trait object. Library modules return their
/// own typed errors which convert into this alias with `?`.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Resolving stream for track {}", track_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Downloaded {} files", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used at the top-level invocation
/// boundary where API and connection failures are presented to the user.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Cannot persist play history. Err: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a diagnostic message to stderr when `JAMCLI_DEBUG` is enabled.
///
/// Keeps request tracing out of regular output so listings stay readable
/// and machine-parsable. The check is done on every call, so the variable
/// can be toggled through the `.env` file without rebuilding.
///
/// # Example
///
/// ```
/// debug!("api call using URL: {}", url);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::debug_enabled() {
      use colored::Colorize;
      eprintln!("[{}] {}", "~".dimmed(), std::format_args!($($arg)*));
    }
  })
}
