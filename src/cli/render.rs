use serde_json::json;
use tabled::{Table, Tabled};

use crate::{
    downloader::DownloadOutcome,
    info,
    listing::{Listing, ListingEntry},
    router::{DownloadReport, Response},
    success, utils, warning,
};

/// Table row of a rendered listing entry.
#[derive(Tabled)]
pub struct EntryRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub length: String,
    pub year: String,
    pub open: String,
}

impl From<&ListingEntry> for EntryRow {
    fn from(entry: &ListingEntry) -> Self {
        let title = if entry.is_playable {
            format!("▶ {}", entry.label)
        } else {
            entry.label.clone()
        };

        Self {
            position: entry.info.count,
            title,
            length: entry.info.duration.map(utils::format_duration).unwrap_or_default(),
            year: entry
                .info
                .year
                .filter(|year| *year > 0)
                .map(|year| year.to_string())
                .unwrap_or_default(),
            open: entry.target.to_url(),
        }
    }
}

pub(super) fn print_response(response: Response, as_json: bool) {
    match response {
        Response::Listing(listing) => print_listing(&listing, as_json),
        Response::Resolved(url) => {
            if as_json {
                println!("{}", json!({ "url": url }));
            } else {
                println!("{}", url);
            }
        }
        Response::Download(report) => print_download(&report, as_json),
        Response::Input { heading, target } => {
            // only reached when the router asks twice
            warning!("{} requires input: {}", heading, target);
        }
        Response::Settings => {
            let env_path = crate::config::data_dir().join(".env");
            if as_json {
                println!("{}", json!({ "settings": env_path.display().to_string() }));
            } else {
                info!(
                    "Settings are read from the environment and {}",
                    env_path.display()
                );
            }
        }
    }
}

fn print_listing(listing: &Listing, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(listing) {
            Ok(out) => println!("{}", out),
            Err(e) => warning!("Cannot serialize listing. Err: {}", e),
        }
        return;
    }

    if listing.entries.is_empty() {
        info!("Nothing to show.");
        return;
    }

    let mut entries: Vec<&ListingEntry> = listing.entries.iter().collect();
    entries.sort_by_key(|entry| entry.info.count);
    let rows: Vec<EntryRow> = entries.into_iter().map(EntryRow::from).collect();

    let table = Table::new(rows);
    println!("{table}");
}

fn print_download(report: &DownloadReport, as_json: bool) {
    let track = &report.track;
    let paths: Vec<String> = report
        .outcome
        .paths()
        .iter()
        .map(|path| path.display().to_string())
        .collect();

    if as_json {
        let (status, error) = match &report.outcome {
            DownloadOutcome::Completed(_) => ("completed", None),
            DownloadOutcome::PartiallyCompleted { error, .. } => {
                ("partially_completed", Some(error.to_string()))
            }
            DownloadOutcome::Cancelled(_) => ("cancelled", None),
        };
        println!(
            "{}",
            json!({
                "track_id": track.id,
                "status": status,
                "paths": paths,
                "error": error,
            })
        );
        return;
    }

    match &report.outcome {
        DownloadOutcome::Completed(_) => success!(
            "Downloaded {} - {} to {}",
            track.artist_name,
            track.name,
            paths.join(", ")
        ),
        DownloadOutcome::PartiallyCompleted { error, .. } => {
            if paths.is_empty() {
                warning!("Download of {} failed. Err: {}", track.name, error);
            } else {
                warning!(
                    "Download of {} incomplete, kept {}. Err: {}",
                    track.name,
                    paths.join(", "),
                    error
                );
            }
        }
        DownloadOutcome::Cancelled(_) => warning!("Download of {} cancelled.", track.name),
    }
}
