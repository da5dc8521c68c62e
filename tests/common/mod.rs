#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::TcpListener as StdTcpListener,
    sync::{Arc, Mutex, mpsc},
    thread,
};

use axum::{Json, Router, extract::Query, routing::MethodRouter, routing::get};
use serde_json::{Value, json};

use jamcli::jamendo::{ClientConfig, JamendoApi};

pub type QueryParams = HashMap<String, String>;

/// Collects every request a mock route received.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<(String, QueryParams)>>>);

impl Recorder {
    pub fn record(&self, path: &str, params: QueryParams) {
        self.0.lock().unwrap().push((path.to_string(), params));
    }

    pub fn requests(&self, path: &str) -> Vec<QueryParams> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn last(&self, path: &str) -> QueryParams {
        self.requests(path)
            .pop()
            .unwrap_or_else(|| panic!("no request to {path}"))
    }
}

/// Route answering with a fixed JSON body and recording the query.
pub fn json_route(recorder: &Recorder, path: &'static str, body: Value) -> MethodRouter {
    let recorder = recorder.clone();
    get(move |Query(params): Query<QueryParams>| {
        let recorder = recorder.clone();
        let body = body.clone();
        async move {
            recorder.record(path, params);
            Json(body)
        }
    })
}

/// Serves `app` on an ephemeral port from a background thread and returns
/// the API base URL (`http://127.0.0.1:<port>/v3.0/`).
pub fn spawn(app: Router) -> String {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind mock server");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("report address");
            axum::serve(listener, app).await.expect("serve mock api");
        });
    });

    let addr = rx.recv().expect("mock server address");
    format!("http://{}/v3.0/", addr)
}

/// Base URL of a port nobody listens on.
pub fn closed_base_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/v3.0/", addr)
}

pub fn api(base_url: &str, limit: u32) -> JamendoApi {
    JamendoApi::new(
        ClientConfig::new("test-client")
            .with_limit(limit)
            .with_base_url(base_url),
    )
    .expect("client")
}

pub fn envelope(results: Value) -> Value {
    let count = results.as_array().map(|r| r.len()).unwrap_or(0);
    json!({
        "headers": {
            "status": "success",
            "code": 0,
            "error_message": "",
            "warnings": "",
            "results_count": count,
        },
        "results": results,
    })
}

pub fn failure(code: i64, message: &str) -> Value {
    json!({
        "headers": {
            "status": "failed",
            "code": code,
            "error_message": message,
            "warnings": "",
            "results_count": 0,
        },
        "results": [],
    })
}

pub fn track_json(id: u32) -> Value {
    json!({
        "id": id.to_string(),
        "name": format!("Track {id}"),
        "duration": 180 + id,
        "artist_id": "3",
        "artist_name": "Both",
        "album_id": "9",
        "album_name": "Singles",
        "album_image": "https://img.jamendo.com/albums/9/covers/1.200.jpg",
        "releasedate": "2014-05-13",
        "position": 1,
        "musicinfo": {
            "lang": "en",
            "tags": {
                "genres": ["pop"],
                "instruments": ["guitar"],
                "vartags": ["happy"]
            }
        }
    })
}

pub fn tracks_json(first_id: u32, n: u32) -> Value {
    Value::Array((first_id..first_id + n).map(track_json).collect())
}
