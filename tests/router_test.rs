mod common;

use std::path::Path;

use axum::{
    Router as MockRouter,
    extract::Query,
    response::Redirect,
    routing::get,
};
use serde_json::json;
use tempfile::TempDir;

use common::*;
use jamcli::{
    config::Settings,
    downloader::{CancelToken, DownloadOutcome, ProgressReporter},
    listing::{Listing, ViewMode},
    management::{DownloadsManager, HistoryManager},
    navigation::{Endpoint, NavigationTarget},
    router::{Response, Router, RouterError},
    types::Track,
};

fn settings(base_url: &str, dir: &Path) -> Settings {
    Settings {
        api_url: Some(base_url.to_string()),
        download_path: dir.join("music"),
        download_show_progress: false,
        ..Settings::default()
    }
}

fn router(base_url: &str, dir: &Path, settings: Settings) -> Router {
    let api = api(base_url, settings.limit);
    Router::new(
        api,
        settings,
        HistoryManager::new(dir.join("state/history.json")),
        DownloadsManager::new(dir.join("state/downloads.json")),
    )
    .with_temp_dir(dir.join("tmp"))
}

fn listing(response: Response) -> Listing {
    match response {
        Response::Listing(listing) => listing,
        other => panic!("expected listing, got {:?}", other),
    }
}

fn labels(listing: &Listing) -> Vec<&str> {
    listing.entries.iter().map(|e| e.label.as_str()).collect()
}

#[test]
fn test_full_second_page_offers_both_page_controls() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/tracks",
        json_route(&recorder, "tracks", envelope(tracks_json(101, 100))),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let target = NavigationTarget::new(Endpoint::ShowTracks)
        .with_param("sort_method", "popularity_month")
        .with_param("page", 2);
    let listing = listing(router.dispatch(&target).unwrap());

    assert_eq!(recorder.last("tracks")["offset"], "100");
    assert_eq!(recorder.last("tracks")["order"], "popularity_month");

    // 100 tracks, sort switcher, next and previous page
    assert_eq!(listing.entries.len(), 103);
    let labels = labels(&listing);
    assert!(labels.contains(&"[[ Popularity (month) ]]"));

    let next = listing
        .entries
        .iter()
        .find(|e| e.label == ">> Page 3 >>")
        .expect("next page control");
    assert_eq!(next.target.param("page"), Some("3"));
    assert_eq!(next.target.param("sort_method"), Some("popularity_month"));
    assert!(next.target.is_update());

    let previous = listing
        .entries
        .iter()
        .find(|e| e.label == "<< Page 1 <<")
        .expect("previous page control");
    assert_eq!(previous.target.param("page"), Some("1"));
    assert_eq!(previous.target.param("sort_method"), Some("popularity_month"));
}

#[test]
fn test_tracks_default_to_buzzrate() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/tracks",
        json_route(&recorder, "tracks", envelope(tracks_json(1, 3))),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let listing = listing(
        router
            .dispatch(&NavigationTarget::new(Endpoint::ShowTracks))
            .unwrap(),
    );

    assert_eq!(recorder.last("tracks")["order"], "buzzrate");
    // three tracks plus the switcher, no page controls
    assert_eq!(listing.entries.len(), 4);
    assert!(!listing.update_listing);
}

#[test]
fn test_sort_method_selection_reissues_listing() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/albums",
        json_route(&recorder, "albums", envelope(json!([]))),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let origin = NavigationTarget::new(Endpoint::ShowAlbums)
        .with_param("sort_method", "popularity_week")
        .with_param("page", 4);
    let albums = listing(router.dispatch(&origin).unwrap());
    let switcher = albums
        .entries
        .iter()
        .find(|e| e.target.endpoint == Endpoint::ShowSortMethods)
        .expect("sort switcher");

    let methods = listing(router.dispatch(&switcher.target).unwrap());
    assert!(methods.update_listing);
    let by_name = methods
        .entries
        .iter()
        .find(|e| e.target.param("sort_method") == Some("name"))
        .expect("name sort method");

    let expected = NavigationTarget::new(Endpoint::ShowAlbums)
        .with_param("sort_method", "name")
        .with_param("is_update", "true");
    assert_eq!(by_name.target, expected);

    router.dispatch(&by_name.target).unwrap();
    assert_eq!(recorder.last("albums")["order"], "name");
    assert_eq!(recorder.last("albums")["offset"], "0");
}

#[test]
fn test_search_without_query_asks_for_input() {
    let dir = TempDir::new().unwrap();
    let base_url = closed_base_url();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    match router
        .dispatch(&NavigationTarget::new(Endpoint::SearchArtists))
        .unwrap()
    {
        Response::Input { heading, target } => {
            assert_eq!(heading, "Search artists");
            assert_eq!(target.endpoint, Endpoint::SearchArtists);
        }
        other => panic!("expected input request, got {:?}", other),
    }
}

#[test]
fn test_search_with_query_filters_by_name() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/artists",
        json_route(
            &recorder,
            "artists",
            envelope(json!([{ "id": 7, "name": "TriFace", "image": "" }])),
        ),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let listing = listing(
        router
            .open("plugin://jamcli/artists/search/?query=tri+face")
            .unwrap(),
    );

    assert_eq!(recorder.last("artists")["namesearch"], "tri face");
    assert_eq!(labels(&listing), vec!["TriFace"]);
    assert_eq!(listing.entries[0].target.endpoint, Endpoint::ShowAlbumsByArtist);
}

#[test]
fn test_playing_tracks_records_history() {
    let recorder = Recorder::default();
    let file_recorder = recorder.clone();
    let app = MockRouter::new()
        .route(
            "/v3.0/tracks/file",
            get(move |Query(params): Query<QueryParams>| {
                let recorder = file_recorder.clone();
                async move {
                    let location = format!("https://storage.example/{}.ogg", params["id"]);
                    recorder.record("tracks/file", params);
                    Redirect::temporary(&location)
                }
            }),
        )
        .route(
            "/v3.0/tracks",
            json_route(
                &recorder,
                "tracks",
                envelope(json!([track_json(1), track_json(2)])),
            ),
        );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    for id in ["1", "2"] {
        let target = NavigationTarget::new(Endpoint::PlayTrack).with_param("track_id", id);
        match router.dispatch(&target).unwrap() {
            Response::Resolved(url) => assert_eq!(url, format!("https://storage.example/{id}.ogg")),
            other => panic!("expected stream url, got {:?}", other),
        }
    }
    assert_eq!(router.history().track_ids(), ["1", "2"]);

    let persisted = HistoryManager::load(dir.path().join("state/history.json")).unwrap();
    assert_eq!(persisted.track_ids(), ["1", "2"]);

    let listing = listing(
        router
            .dispatch(&NavigationTarget::new(Endpoint::ShowHistory))
            .unwrap(),
    );
    assert_eq!(recorder.last("tracks")["id"], "1+2");
    assert_eq!(listing.entries[0].target.param("track_id"), Some("2"));
    assert_eq!(listing.entries[1].target.param("track_id"), Some("1"));
}

#[test]
fn test_empty_history_needs_no_request() {
    let dir = TempDir::new().unwrap();
    let base_url = closed_base_url();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let listing = listing(
        router
            .dispatch(&NavigationTarget::new(Endpoint::ShowHistory))
            .unwrap(),
    );
    assert!(listing.entries.is_empty());
}

#[test]
fn test_download_track_stores_file_and_index() {
    let recorder = Recorder::default();
    let app = MockRouter::new()
        .route(
            "/v3.0/tracks",
            json_route(&recorder, "tracks", envelope(json!([track_json(7)]))),
        )
        .route(
            "/v3.0/tracks/file",
            get(|| async { Redirect::temporary("/files/track7.ogg") }),
        )
        .route("/files/track7.ogg", get(|| async { "OggS fake audio" }));
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let target = NavigationTarget::new(Endpoint::DownloadTrack).with_param("track_id", "7");
    let report = match router.dispatch(&target).unwrap() {
        Response::Download(report) => report,
        other => panic!("expected download report, got {:?}", other),
    };

    let expected = dir.path().join("music/Both - Track 7.ogg");
    assert!(matches!(report.outcome, DownloadOutcome::Completed(_)));
    assert_eq!(report.outcome.paths(), [expected.clone()]);
    assert_eq!(std::fs::read_to_string(&expected).unwrap(), "OggS fake audio");
    assert_eq!(recorder.last("tracks")["id"], "7");

    let downloads = DownloadsManager::load(dir.path().join("state/downloads.json")).unwrap();
    assert_eq!(downloads.get("7").unwrap().path, expected);

    let target = NavigationTarget::new(Endpoint::PlayDownloaded).with_param("track_id", "7");
    match router.dispatch(&target).unwrap() {
        Response::Resolved(path) => assert_eq!(path, expected.display().to_string()),
        other => panic!("expected local file, got {:?}", other),
    }
}

#[test]
fn test_forced_view_mode_marks_listings() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/radios",
        json_route(
            &recorder,
            "radios",
            envelope(json!([{ "id": 5, "name": "bestof", "dispname": "Best Of" }])),
        ),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&base_url, dir.path());
    settings.force_viewmode = true;
    let mut router = router(&base_url, dir.path(), settings);

    let listing = listing(router.open("plugin://jamcli/radios").unwrap());
    assert_eq!(listing.view_mode, Some(ViewMode::Thumbnail));
    assert_eq!(labels(&listing), vec!["Best Of"]);
}

#[test]
fn test_missing_route_param_is_reported() {
    let dir = TempDir::new().unwrap();
    let base_url = closed_base_url();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let err = router
        .dispatch(&NavigationTarget::new(Endpoint::ShowTracksInAlbum))
        .unwrap_err();
    assert!(err.to_string().contains("album_id"));
}

#[test]
fn test_album_tracks_are_filtered_and_paginated() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/tracks",
        json_route(&recorder, "tracks", envelope(tracks_json(101, 100))),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&base_url, dir.path());
    settings.limit = 100;
    let mut router = router(&base_url, dir.path(), settings);

    let listing = listing(router.open("plugin://jamcli/tracks/album/24/?page=2").unwrap());

    let request = recorder.last("tracks");
    assert_eq!(request["album_id"], "24");
    assert_eq!(request["offset"], "100");
    assert_eq!(request["include"], "musicinfo");

    // no sort switcher on album tracks
    assert_eq!(listing.entries.len(), 102);
    let labels = labels(&listing);
    assert!(labels.contains(&">> Page 3 >>"));
    assert!(labels.contains(&"<< Page 1 <<"));
    let next = listing.entries.iter().find(|e| e.label == ">> Page 3 >>").unwrap();
    assert_eq!(next.target.param("album_id"), Some("24"));
}

#[test]
fn test_playlist_tracks_get_page_controls() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/playlists/tracks",
        json_route(
            &recorder,
            "playlists/tracks",
            envelope(json!([{
                "id": 500,
                "name": "Mix",
                "user_name": "bob",
                "tracks": tracks_json(1, 100),
            }])),
        ),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&base_url, dir.path());
    settings.limit = 100;
    let mut router = router(&base_url, dir.path(), settings);

    let target = NavigationTarget::new(Endpoint::ShowTracksInPlaylist)
        .with_param("playlist_id", "500")
        .with_param("page", 2);
    let listing = listing(router.dispatch(&target).unwrap());

    assert_eq!(recorder.last("playlists/tracks")["id"], "500");
    assert_eq!(listing.entries.len(), 102);
    let controls: Vec<_> = listing
        .entries
        .iter()
        .filter(|e| e.target.endpoint == Endpoint::ShowTracksInPlaylist)
        .collect();
    assert_eq!(controls.len(), 2);
    assert!(controls.iter().all(|e| e.target.param("playlist_id") == Some("500")));
}

#[test]
fn test_similar_tracks_listing() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/tracks/similar",
        json_route(&recorder, "tracks/similar", envelope(tracks_json(1, 2))),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let target = NavigationTarget::new(Endpoint::ShowSimilarTracks).with_param("track_id", "7");
    let listing = listing(router.dispatch(&target).unwrap());

    assert_eq!(recorder.last("tracks/similar")["id"], "7");
    assert_eq!(labels(&listing), vec!["Track 1", "Track 2"]);
    assert!(listing.entries.iter().all(|e| e.target.endpoint == Endpoint::PlayTrack));
}

#[test]
fn test_radios_list_and_play() {
    let recorder = Recorder::default();
    let app = MockRouter::new()
        .route(
            "/v3.0/radios",
            json_route(
                &recorder,
                "radios",
                envelope(json!([
                    { "id": 5, "name": "bestof", "dispname": "Best Of" },
                    { "id": 6, "name": "quiet", "dispname": "" },
                ])),
            ),
        )
        .route(
            "/v3.0/radios/stream",
            get(|Query(params): Query<QueryParams>| async move {
                let stream = if params["id"] == "5" {
                    "https://streaming.example/bestof.mp3"
                } else {
                    ""
                };
                axum::Json(envelope(json!([{ "id": params["id"], "stream": stream }])))
            }),
        );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let radios = listing(router.dispatch(&NavigationTarget::new(Endpoint::ShowRadios)).unwrap());
    assert_eq!(recorder.last("radios")["type"], "www");
    assert_eq!(labels(&radios), vec!["Best Of", "quiet"]);
    assert_eq!(radios.entries[0].target.endpoint, Endpoint::PlayRadio);

    match router.dispatch(&radios.entries[0].target).unwrap() {
        Response::Resolved(url) => assert_eq!(url, "https://streaming.example/bestof.mp3"),
        other => panic!("expected stream url, got {:?}", other),
    }

    let err = router.dispatch(&radios.entries[1].target).unwrap_err();
    assert!(matches!(err, RouterError::NotFound(_)));
    // radios are not part of the track history
    assert!(router.history().is_empty());
}

#[test]
fn test_playlists_open_their_tracks() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/playlists",
        json_route(
            &recorder,
            "playlists",
            envelope(json!([{ "id": 500, "name": "Mix", "user_name": "bob" }])),
        ),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let listing = listing(router.open("plugin://jamcli/playlists/?page=3").unwrap());

    assert_eq!(recorder.last("playlists")["offset"], (2 * Settings::default().limit).to_string());
    assert_eq!(listing.entries[0].label, "Mix (bob)");
    assert_eq!(listing.entries[0].target.endpoint, Endpoint::ShowTracksInPlaylist);
    assert_eq!(listing.entries[0].target.param("playlist_id"), Some("500"));
    // short page: only the previous control follows
    assert_eq!(labels(&listing), vec!["Mix (bob)", "<< Page 2 <<"]);
}

#[test]
fn test_albums_of_an_artist() {
    let recorder = Recorder::default();
    let app = MockRouter::new().route(
        "/v3.0/albums",
        json_route(
            &recorder,
            "albums",
            envelope(json!([{ "id": 24, "name": "Premiers Jets", "artist_name": "TriFace" }])),
        ),
    );
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut router = router(&base_url, dir.path(), settings(&base_url, dir.path()));

    let listing = listing(router.open("plugin://jamcli/albums/338/").unwrap());

    assert_eq!(recorder.last("albums")["artist_id"], "338");
    assert_eq!(labels(&listing), vec!["TriFace - Premiers Jets"]);
    assert_eq!(listing.entries[0].target.endpoint, Endpoint::ShowTracksInAlbum);
    assert_eq!(listing.entries[0].target.param("album_id"), Some("24"));
}

#[test]
fn test_downloaded_tracks_play_from_disk() {
    let dir = TempDir::new().unwrap();
    let base_url = closed_base_url();
    let path = dir.path().join("music/Both - Lonely.ogg");

    let mut downloads = DownloadsManager::new(dir.path().join("state/downloads.json"));
    downloads.add(
        Track {
            id: "1".to_string(),
            name: "Lonely".to_string(),
            artist_name: "Both".to_string(),
            ..Track::default()
        },
        path.clone(),
    );
    let settings = settings(&base_url, dir.path());
    let mut router = Router::new(
        api(&base_url, settings.limit),
        settings,
        HistoryManager::new(dir.path().join("state/history.json")),
        downloads,
    );

    let listing = listing(router.open("plugin://jamcli/downloads/").unwrap());
    assert_eq!(labels(&listing), vec!["Both - Lonely"]);
    assert_eq!(listing.entries[0].target.endpoint, Endpoint::PlayDownloaded);

    match router.dispatch(&listing.entries[0].target).unwrap() {
        Response::Resolved(local) => assert_eq!(local, path.display().to_string()),
        other => panic!("expected local file, got {:?}", other),
    }
    assert_eq!(router.history().track_ids(), ["1"]);

    let unknown = NavigationTarget::new(Endpoint::PlayDownloaded).with_param("track_id", "2");
    assert!(matches!(router.dispatch(&unknown), Err(RouterError::NotFound(_))));
}

struct CancelOnTransfer(CancelToken);

impl ProgressReporter for CancelOnTransfer {
    fn update(&mut self, _percent: u8, message: &str) {
        if message.starts_with("Current progress") {
            self.0.cancel();
        }
    }
}

#[test]
fn test_cancelled_download_is_not_indexed() {
    let recorder = Recorder::default();
    let app = MockRouter::new()
        .route(
            "/v3.0/tracks",
            json_route(&recorder, "tracks", envelope(json!([track_json(7)]))),
        )
        .route(
            "/v3.0/tracks/file",
            get(|| async { Redirect::temporary("/files/large.ogg") }),
        )
        .route("/files/large.ogg", get(|| async { vec![7u8; 256 * 1024] }));
    let base_url = spawn(app);
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&base_url, dir.path());
    settings.download_show_progress = true;
    settings.download_cover = false;

    let token = CancelToken::new();
    let cancel = token.clone();
    let mut router = router(&base_url, dir.path(), settings)
        .with_cancel_token(token.clone())
        .with_progress(move || Box::new(CancelOnTransfer(cancel.clone())));

    let report = match router.download_track("7") {
        Ok(report) => report,
        Err(e) => panic!("download failed: {e}"),
    };

    assert!(token.is_cancelled());
    assert!(router.cancel_token().is_cancelled());
    assert!(matches!(report.outcome, DownloadOutcome::Cancelled(ref paths) if paths.is_empty()));
    assert_eq!(router.downloads().count(), 0);
    assert!(!dir.path().join("state/downloads.json").exists());
    assert_eq!(std::fs::read_dir(dir.path().join("music")).unwrap().count(), 0);
}
