use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Bytes served for every file under `/files/`.
pub const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42-fake-video";

/// Scriptable stand-in for the video API.
///
/// Job lookups replay `job_bodies` in order and keep repeating the last
/// one. A JSON string body is served as `text/plain`.
#[derive(Clone)]
pub struct MockApi {
    hits: Arc<AtomicUsize>,
    job_hits: Arc<AtomicUsize>,
    create_body: Arc<Mutex<Value>>,
    job_bodies: Arc<Mutex<VecDeque<Value>>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            hits: Arc::default(),
            job_hits: Arc::default(),
            create_body: Arc::new(Mutex::new(json!({"id": "video_123", "status": "queued"}))),
            job_bodies: Arc::new(Mutex::new(VecDeque::from([json!({"status": "running"})]))),
        }
    }
}

impl MockApi {
    /// Total requests of any kind received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Job lookups received.
    pub fn job_hits(&self) -> usize {
        self.job_hits.load(Ordering::SeqCst)
    }

    pub fn set_create_body(&self, body: Value) {
        *self.create_body.lock().unwrap() = body;
    }

    pub fn set_job_bodies(&self, bodies: Vec<Value>) {
        *self.job_bodies.lock().unwrap() = bodies.into();
    }

    /// Serve on an ephemeral local port and return the base URL.
    pub async fn start(&self) -> String {
        let router = Router::new()
            .route("/v1/videos", post(create))
            .route("/v1/videos/{id}", get(job))
            .route("/raw/{id}", get(raw_video))
            .route("/files/{name}", get(file))
            .route("/missing/{name}", get(missing))
            .route("/slow", post(slow))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock api");
        });
        format!("http://{addr}")
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

async fn create(State(api): State<MockApi>, mut multipart: Multipart) -> Json<Value> {
    api.hit();
    while let Ok(Some(_field)) = multipart.next_field().await {}
    let body = api.create_body.lock().unwrap().clone();
    Json(body)
}

async fn job(State(api): State<MockApi>, Path(_id): Path<String>) -> Response {
    api.hit();
    api.job_hits.fetch_add(1, Ordering::SeqCst);
    let body = {
        let mut bodies = api.job_bodies.lock().unwrap();
        if bodies.len() > 1 {
            bodies.pop_front().unwrap_or(Value::Null)
        } else {
            bodies.front().cloned().unwrap_or(Value::Null)
        }
    };
    match body {
        Value::String(text) => text.into_response(),
        other => Json(other).into_response(),
    }
}

async fn raw_video(State(api): State<MockApi>) -> impl IntoResponse {
    api.hit();
    ([(header::CONTENT_TYPE, "video/mp4")], VIDEO_BYTES)
}

async fn file(State(api): State<MockApi>) -> impl IntoResponse {
    api.hit();
    ([(header::CONTENT_TYPE, "video/mp4")], VIDEO_BYTES)
}

async fn missing(State(api): State<MockApi>) -> impl IntoResponse {
    api.hit();
    (StatusCode::NOT_FOUND, "gone")
}

async fn slow(State(api): State<MockApi>) -> &'static str {
    api.hit();
    tokio::time::sleep(Duration::from_secs(5)).await;
    "too late"
}

/// Read a saved result and delete it.
pub fn take_saved(path: &str) -> Vec<u8> {
    let data = std::fs::read(path).expect("saved file exists");
    std::fs::remove_file(path).expect("remove saved file");
    data
}
