//! In-process stand-in for the document backend, used by the test suites.
//!
//! Serves `/upload`, `/ask` and `/download_summary` on an ephemeral port,
//! records what it received, and can be told to fail, to answer 2xx with a
//! body that does not fit the schema, or to hold a request open until
//! released.

use crate::models::{AskRequest, AskResponse, SummaryRequest, UploadResponse};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use url::Url;

pub const SUMMARY_BYTES: &[u8] = b"%PDF-1.4\n% mock summary\n%%EOF";

#[derive(Default)]
pub struct MockBackend {
    pub doc_id: Mutex<String>,
    pub answer: Mutex<String>,
    pub failure: Mutex<Option<u16>>,
    pub held: Mutex<Option<&'static str>>,
    pub malformed: Mutex<Vec<&'static str>>,
    /// Signalled when a held request arrives.
    pub arrived: Notify,
    /// Lets a held request finish.
    pub release: Notify,
    pub hits: AtomicUsize,
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
    pub asks: Mutex<Vec<AskRequest>>,
    pub summaries: Mutex<Vec<SummaryRequest>>,
}

impl MockBackend {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, status: u16) {
        *self.failure.lock().unwrap() = Some(status);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn hold(&self, endpoint: &'static str) {
        *self.held.lock().unwrap() = Some(endpoint);
    }

    /// Answer `endpoint` with `200 {"nope":1}`.
    pub fn respond_malformed(&self, endpoint: &'static str) {
        self.malformed.lock().unwrap().push(endpoint);
    }

    pub fn set_doc_id(&self, doc_id: &str) {
        *self.doc_id.lock().unwrap() = doc_id.to_string();
    }

    pub fn set_answer(&self, answer: &str) {
        *self.answer.lock().unwrap() = answer.to_string();
    }

    async fn gate(&self, endpoint: &'static str) {
        let is_held = *self.held.lock().unwrap() == Some(endpoint);
        if is_held {
            self.arrived.notify_one();
            self.release.notified().await;
        }
    }

    fn scripted_response(&self, endpoint: &'static str) -> Option<Response> {
        if self.malformed.lock().unwrap().contains(&endpoint) {
            return Some(Json(serde_json::json!({ "nope": 1 })).into_response());
        }
        let status = (*self.failure.lock().unwrap())?;
        let status = StatusCode::from_u16(status).unwrap();
        Some((status, Json(serde_json::json!({ "error": "mock failure" }))).into_response())
    }
}

/// Start a mock backend. It answers `doc_id: "abc123"` and `answer: "42"`
/// until told otherwise.
pub async fn spawn() -> (Url, Arc<MockBackend>) {
    let mock = Arc::new(MockBackend::default());
    mock.set_doc_id("abc123");
    mock.set_answer("42");

    let app = Router::new()
        .route("/upload", post(upload))
        .route("/ask", post(ask))
        .route("/download_summary", post(download_summary))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{}/", addr)).unwrap(), mock)
}

async fn upload(State(mock): State<Arc<MockBackend>>, mut multipart: Multipart) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);

    let mut received = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("").to_string();
            let bytes = field.bytes().await.unwrap_or_default().to_vec();
            received = Some((name, bytes));
        }
    }

    mock.gate("upload").await;
    if let Some(response) = mock.scripted_response("upload") {
        return response;
    }

    let Some(received) = received else {
        return (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": "No file provided" })))
            .into_response();
    };
    mock.uploads.lock().unwrap().push(received);

    let doc_id = mock.doc_id.lock().unwrap().clone();
    (StatusCode::CREATED, Json(UploadResponse { doc_id })).into_response()
}

async fn ask(State(mock): State<Arc<MockBackend>>, Json(request): Json<AskRequest>) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    mock.gate("ask").await;
    if let Some(response) = mock.scripted_response("ask") {
        return response;
    }

    mock.asks.lock().unwrap().push(request);
    let answer = mock.answer.lock().unwrap().clone();
    Json(AskResponse { answer }).into_response()
}

async fn download_summary(
    State(mock): State<Arc<MockBackend>>,
    Json(request): Json<SummaryRequest>,
) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    mock.gate("download_summary").await;
    if let Some(response) = mock.scripted_response("download_summary") {
        return response;
    }

    mock.summaries.lock().unwrap().push(request);
    ([("content-type", "application/pdf")], SUMMARY_BYTES).into_response()
}
