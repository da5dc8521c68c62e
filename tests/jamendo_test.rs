mod common;

use axum::{Router, response::Redirect, routing::get};
use serde_json::json;

use common::*;
use jamcli::jamendo::{AudioFormat, JamendoError, Params};

#[test]
fn test_list_tracks_second_page_offsets_by_limit() {
    let recorder = Recorder::default();
    let app = Router::new().route(
        "/v3.0/tracks",
        json_route(&recorder, "tracks", envelope(tracks_json(101, 100))),
    );
    let api = api(&spawn(app), 100);

    let tracks = api.list_tracks(2, Some("popularity_month"), None).unwrap();
    assert_eq!(tracks.len(), 100);
    assert_eq!(tracks[0].id, "101");

    let query = recorder.last("tracks");
    assert_eq!(query["offset"], "100");
    assert_eq!(query["limit"], "100");
    assert_eq!(query["order"], "popularity_month");
    assert_eq!(query["include"], "musicinfo");
    assert_eq!(query["client_id"], "test-client");
    assert_eq!(query["format"], "json");
}

#[test]
fn test_track_filter_overrides_shared_params() {
    let recorder = Recorder::default();
    let app = Router::new().route(
        "/v3.0/tracks",
        json_route(&recorder, "tracks", envelope(tracks_json(1, 2))),
    );
    let api = api(&spawn(app), 10);

    let mut filter = Params::new();
    filter.insert("album_id".to_string(), "24".to_string());
    filter.insert("limit".to_string(), "25".to_string());
    api.list_tracks(1, None, Some(&filter)).unwrap();

    let query = recorder.last("tracks");
    assert_eq!(query["album_id"], "24");
    assert_eq!(query["limit"], "25");
    assert!(!query.contains_key("order"));
}

#[test]
fn test_search_endpoints_send_text_filters() {
    let recorder = Recorder::default();
    let app = Router::new()
        .route(
            "/v3.0/tracks",
            json_route(&recorder, "tracks", envelope(json!([]))),
        )
        .route(
            "/v3.0/albums",
            json_route(&recorder, "albums", envelope(json!([]))),
        )
        .route(
            "/v3.0/artists",
            json_route(&recorder, "artists", envelope(json!([]))),
        )
        .route(
            "/v3.0/playlists",
            json_route(&recorder, "playlists", envelope(json!([]))),
        );
    let api = api(&spawn(app), 100);

    api.search_tracks("rock ballad", 1).unwrap();
    api.list_albums(1, None, None, Some("premiers")).unwrap();
    api.list_artists(1, Some("joindate"), Some("both")).unwrap();
    api.list_playlists(3, Some("chill")).unwrap();

    assert_eq!(recorder.last("tracks")["search"], "rock ballad");
    assert_eq!(recorder.last("albums")["namesearch"], "premiers");
    assert_eq!(recorder.last("albums")["imagesize"], "400");
    assert_eq!(recorder.last("artists")["namesearch"], "both");
    assert_eq!(recorder.last("artists")["order"], "joindate");
    assert_eq!(recorder.last("playlists")["namesearch"], "chill");
    assert_eq!(recorder.last("playlists")["offset"], "200");
}

#[test]
fn test_empty_results_are_not_an_error() {
    let recorder = Recorder::default();
    let app = Router::new()
        .route(
            "/v3.0/albums",
            json_route(&recorder, "albums", envelope(json!([]))),
        )
        .route(
            "/v3.0/radios",
            json_route(&recorder, "radios", json!({ "headers": { "code": 0 } })),
        );
    let api = api(&spawn(app), 100);

    let albums = api.list_albums(7, Some("3"), None, None).unwrap();
    assert!(albums.is_empty());
    assert_eq!(recorder.last("albums")["artist_id"], "3");

    let radios = api.list_radios(1).unwrap();
    assert!(radios.is_empty());
    assert_eq!(recorder.last("radios")["type"], "www");
}

#[test]
fn test_code_five_is_authentication_error() {
    let recorder = Recorder::default();
    let app = Router::new().route(
        "/v3.0/tracks",
        json_route(&recorder, "tracks", failure(5, "Your credential is invalid")),
    );
    let api = api(&spawn(app), 100);

    match api.list_tracks(1, None, None) {
        Err(JamendoError::Authentication(message)) => {
            assert_eq!(message, "Your credential is invalid")
        }
        other => panic!("expected authentication error, got {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn test_other_codes_are_api_errors() {
    let recorder = Recorder::default();
    let app = Router::new().route(
        "/v3.0/artists",
        json_route(&recorder, "artists", failure(8, "Rate limit exceeded")),
    );
    let api = api(&spawn(app), 100);

    let err = api.list_artists(1, None, None).unwrap_err();
    match &err {
        JamendoError::Api { code, message } => {
            assert_eq!(*code, 8);
            assert_eq!(message, "Rate limit exceeded");
        }
        other => panic!("expected api error, got {other}"),
    }
    assert!(err.remediation().contains("try again"));
}

#[test]
fn test_unreachable_service_is_connection_error() {
    let api = api(&closed_base_url(), 100);

    let err = api.list_radios(1).unwrap_err();
    assert!(matches!(err, JamendoError::Connection(_)));
    assert!(err.remediation().contains("network"));
}

#[test]
fn test_track_stream_url_is_redirect_location() {
    let recorder = Recorder::default();
    let file_recorder = recorder.clone();
    let app = Router::new().route(
        "/v3.0/tracks/file",
        get(
            move |axum::extract::Query(params): axum::extract::Query<QueryParams>| {
                let recorder = file_recorder.clone();
                async move {
                    recorder.record("tracks/file", params);
                    Redirect::temporary("https://prod-1.storage.jamendo.com/?trackid=1204669&format=flac")
                }
            },
        ),
    );
    let api = api(&spawn(app), 100);

    let url = api
        .resolve_track_stream_url("1204669", AudioFormat::Flac)
        .unwrap();
    assert_eq!(
        url,
        "https://prod-1.storage.jamendo.com/?trackid=1204669&format=flac"
    );

    let query = recorder.last("tracks/file");
    assert_eq!(query["id"], "1204669");
    assert_eq!(query["audioformat"], "flac");
    assert_eq!(query["client_id"], "test-client");
}

#[test]
fn test_album_tracks_inherit_album_fields() {
    let recorder = Recorder::default();
    let body = envelope(json!([{
        "id": "24",
        "name": "Premiers Jets",
        "artist_id": "7",
        "artist_name": "TriFace",
        "image": "https://img.jamendo.com/albums/24.jpg",
        "releasedate": "2004-12-17",
        "tracks": [
            { "id": "241", "name": "Intro", "duration": "92", "position": "1" },
            { "id": "242", "name": "Outro", "duration": 120, "position": 2 }
        ]
    }]));
    let app = Router::new().route("/v3.0/albums/tracks", json_route(&recorder, "albums/tracks", body));
    let api = api(&spawn(app), 100);

    let (album, tracks) = api.get_album_with_tracks("24").unwrap();
    assert_eq!(album.name, "Premiers Jets");
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].album_name, "Premiers Jets");
    assert_eq!(tracks[0].artist_name, "TriFace");
    assert_eq!(tracks[0].duration, 92);
    assert_eq!(tracks[1].position, 2);
    assert_eq!(tracks[1].album_image, "https://img.jamendo.com/albums/24.jpg");
    assert_eq!(recorder.last("albums/tracks")["id"], "24");
}

#[test]
fn test_unknown_playlist_yields_nothing() {
    let recorder = Recorder::default();
    let app = Router::new().route(
        "/v3.0/playlists/tracks",
        json_route(&recorder, "playlists/tracks", envelope(json!([]))),
    );
    let api = api(&spawn(app), 100);

    let (playlist, tracks) = api.get_playlist_with_tracks("404").unwrap();
    assert!(playlist.id.is_empty());
    assert!(tracks.is_empty());
}

#[test]
fn test_radio_without_stream_resolves_to_none() {
    let recorder = Recorder::default();
    let app = Router::new().route(
        "/v3.0/radios/stream",
        json_route(
            &recorder,
            "radios/stream",
            envelope(json!([{ "id": 5, "stream": "" }])),
        ),
    );
    let api = api(&spawn(app), 100);

    assert_eq!(api.resolve_radio_stream_url("5").unwrap(), None);
}

#[test]
fn test_similar_tracks_request_audio_format() {
    let recorder = Recorder::default();
    let app = Router::new().route(
        "/v3.0/tracks/similar",
        json_route(&recorder, "tracks/similar", envelope(tracks_json(1, 3))),
    );
    let api = api(&spawn(app), 100);

    let tracks = api.list_similar_tracks("1204669", 1).unwrap();
    assert_eq!(tracks.len(), 3);

    let query = recorder.last("tracks/similar");
    assert_eq!(query["id"], "1204669");
    assert_eq!(query["audioformat"], "ogg");
}
