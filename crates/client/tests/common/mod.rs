use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use sora_client::upload::FileOpener;

/// One multipart field as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Shared state of the mock API: a request counter plus the last
/// upload and auth header received.
#[derive(Clone, Default)]
pub struct Recorder {
    pub hits: Arc<AtomicUsize>,
    pub parts: Arc<Mutex<Vec<RecordedPart>>>,
    pub auth: Arc<Mutex<Option<String>>>,
}

impl Recorder {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn part(&self, name: &str) -> Option<RecordedPart> {
        self.parts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    fn record_auth(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        *self.auth.lock().unwrap() = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
    }
}

async fn create_video(
    State(rec): State<Recorder>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<serde_json::Value> {
    rec.record_auth(&headers);
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let data = field.bytes().await.unwrap().to_vec();
        parts.push(RecordedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    *rec.parts.lock().unwrap() = parts;
    Json(json!({"id": "video_123", "status": "queued"}))
}

async fn failing_create(
    State(rec): State<Recorder>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    rec.record_auth(&headers);
    while let Ok(Some(_field)) = multipart.next_field().await {}
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn get_video(
    State(rec): State<Recorder>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Json<serde_json::Value> {
    rec.record_auth(&headers);
    Json(json!({"id": id, "status": "running"}))
}

async fn video_file(State(rec): State<Recorder>, headers: HeaderMap) -> impl IntoResponse {
    rec.record_auth(&headers);
    ([(header::CONTENT_TYPE, "video/mp4")], vec![0u8, 1, 2, 3, 255])
}

async fn slow(State(rec): State<Recorder>, headers: HeaderMap) -> &'static str {
    rec.record_auth(&headers);
    tokio::time::sleep(Duration::from_secs(5)).await;
    "too late"
}

/// Router exposing the endpoints the transport tests exercise.
pub fn router(rec: Recorder) -> Router {
    Router::new()
        .route("/v1/videos", post(create_video))
        .route("/v1/broken", post(failing_create))
        .route("/v1/videos/{id}", get(get_video))
        .route("/v1/jobs/{id}/detail", get(get_video))
        .route("/files/out.mp4", get(video_file))
        .route("/slow", get(slow).post(slow))
        .with_state(rec)
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve mock api");
    });
    format!("http://{addr}")
}

/// Start the mock API and return its base URL with the shared recorder.
pub async fn start() -> (String, Recorder) {
    let rec = Recorder::default();
    let base_url = spawn(router(rec.clone())).await;
    (base_url, rec)
}

/// A base URL nothing is listening on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Tracking file opener
// ---------------------------------------------------------------------------

/// Counts opened and closed handles for files served from memory.
#[derive(Clone, Default)]
pub struct TrackingOpener {
    files: HashMap<String, Vec<u8>>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

impl TrackingOpener {
    pub fn with_file(mut self, path: &str, data: &[u8]) -> Self {
        self.files.insert(path.to_string(), data.to_vec());
        self
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

struct TrackedHandle {
    inner: Cursor<Vec<u8>>,
    closed: Arc<AtomicUsize>,
}

impl Read for TrackedHandle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for TrackedHandle {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl FileOpener for TrackingOpener {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + Send>> {
        let key = path.to_string_lossy().into_owned();
        let data = self
            .files
            .get(&key)
            .cloned()
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TrackedHandle {
            inner: Cursor::new(data),
            closed: Arc::clone(&self.closed),
        }))
    }
}
