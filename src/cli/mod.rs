//! # CLI Module
//!
//! Terminal host for the catalog browser. Every command resolves to a
//! [`NavigationTarget`], which is dispatched once through the [`Router`]; the
//! resulting [`Response`] is rendered as a table, a plain URL or JSON.
//!
//! ## Data Flow
//!
//! ```text
//! clap command / plugin:// URL
//!     ↓
//! NavigationTarget
//!     ↓
//! Router (API client, formatter, stores, downloader)
//!     ↓
//! Response → table | URL | JSON
//! ```
//!
//! Listings print the URL of every entry, so browsing continues with
//! `jamcli open <url>`.
//!
//! ## Error Presentation
//!
//! API and connection failures end the program with their message and a
//! hint how to resolve them. Failures to load the persisted stores only
//! warn and start from an empty store.

mod progress;
mod render;

pub use progress::BarReporter;
pub use render::EntryRow;

use std::io::{self, BufRead, Write};

use crate::{
    Res,
    config::Settings,
    error,
    jamendo::JamendoApi,
    management::{DownloadsManager, HistoryManager},
    navigation::NavigationTarget,
    router::{Response, Router, RouterError},
    warning,
};

/// Dispatches `target` and prints the result.
///
/// # Arguments
///
/// * `target` - Where to navigate
/// * `json` - Print machine-readable JSON instead of tables
pub fn open(target: NavigationTarget, json: bool) {
    let settings = Settings::from_env();
    let mut router = match build_router(settings) {
        Ok(router) => router,
        Err(e) => error!("Cannot initialize Jamendo client. Err: {}", e),
    };

    match dispatch(&mut router, &target) {
        Ok(Some(response)) => render::print_response(response, json),
        Ok(None) => warning!("Nothing entered, search cancelled."),
        Err(RouterError::Jamendo(e)) => error!("{}\n    {}", e, e.remediation()),
        Err(e) => error!("{}", e),
    }
}

/// Parses a `plugin://jamcli/...` URL and opens it.
pub fn open_url(url: &str, json: bool) {
    match url.parse::<NavigationTarget>() {
        Ok(target) => open(target, json),
        Err(e) => error!("Cannot open {}. Err: {}", url, e),
    }
}

fn build_router(settings: Settings) -> Res<Router> {
    let api = JamendoApi::new(settings.client_config())?;

    let history = HistoryManager::load_default().unwrap_or_else(|e| {
        warning!("Cannot load play history, starting empty. Err: {}", e);
        HistoryManager::new(HistoryManager::default_path())
    });
    let downloads = DownloadsManager::load_default().unwrap_or_else(|e| {
        warning!("Cannot load downloaded tracks, starting empty. Err: {}", e);
        DownloadsManager::new(DownloadsManager::default_path())
    });

    let router = Router::new(api, settings, history, downloads)
        .with_progress(|| Box::new(BarReporter::new()));
    Ok(router)
}

/// Dispatches `target`, prompting for search terms when the router asks for
/// them. `None` means the prompt was left empty.
fn dispatch(router: &mut Router, target: &NavigationTarget) -> Result<Option<Response>, RouterError> {
    match router.dispatch(target)? {
        Response::Input { heading, target } => {
            let Some(query) = prompt(&heading) else {
                return Ok(None);
            };
            router.dispatch(&target.with_param("query", query)).map(Some)
        }
        response => Ok(Some(response)),
    }
}

fn prompt(heading: &str) -> Option<String> {
    print!("{}: ", heading);
    io::stdout().flush().ok()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    let query = line.trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}
