//! Tests for the page routes, driven through the real router.

use super::*;
use crate::config::Config;
use crate::mock_backend::{self, MockBackend};
use crate::models::SessionView;
use crate::router;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::Router;
use tower::ServiceExt;

// ============================================================================
// Helpers
// ============================================================================

const BOUNDARY: &str = "studysync-test-boundary";

async fn test_app() -> (Router, Arc<AppState>, Arc<MockBackend>) {
    let (url, mock) = mock_backend::spawn().await;
    let config = Config {
        backend_url: Some(url),
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config));
    (router(state.clone()), state, mock)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(session: &str, file: Option<(&str, &str)>) -> Request<Body> {
    let mut body = String::new();
    match file {
        Some((name, content)) => body.push_str(&format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n",
            b = BOUNDARY,
            name = name,
            content = content
        )),
        // What a browser sends for an empty file input
        None => body.push_str(&format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"\"\r\nContent-Type: application/octet-stream\r\n\r\n\r\n",
            b = BOUNDARY
        )),
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::builder()
        .method("POST")
        .uri(format!("/api/upload?session={}", session))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn error_of(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body).unwrap().error
}

/// Start a session and upload a file through the API.
async fn uploaded_session(app: &Router, state: &AppState) -> String {
    let session_id = state.sessions.create().id().to_string();
    let (status, _, _) = send(app, upload_request(&session_id, Some(("notes.txt", "Cells divide.")))).await;
    assert_eq!(status, StatusCode::OK);
    session_id
}

// ============================================================================
// Page
// ============================================================================

#[tokio::test]
async fn test_index_renders_page_with_new_session() {
    let (app, state, _mock) = test_app().await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, headers, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("STUDYSync"));
    assert_eq!(state.sessions.len(), 1);
}

#[tokio::test]
async fn test_reload_starts_over() {
    let (app, state, _mock) = test_app().await;
    let first = uploaded_session(&app, &state).await;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    send(&app, request).await;

    assert_eq!(state.sessions.len(), 2);
    let first = state.sessions.get(&first).unwrap();
    assert_eq!(first.doc_id().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_session_view() {
    let (app, state, _mock) = test_app().await;
    let session_id = uploaded_session(&app, &state).await;

    let request = Request::builder()
        .uri(format!("/api/session/{}", session_id))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let view: SessionView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.session_id, session_id);
    assert_eq!(view.doc_id.as_deref(), Some("abc123"));
    assert_eq!(view.file_name.as_deref(), Some("notes.txt"));
    assert!(!view.uploading && !view.submitting && !view.downloading);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (app, _state, mock) = test_app().await;

    let request = Request::builder()
        .uri("/api/session/doesnotexist")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), SESSION_EXPIRED);

    let request = json_request(
        "/api/ask",
        serde_json::json!({ "session": "doesnotexist", "question": "Hi?" }),
    );
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(mock.hits(), 0);
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_upload_returns_doc_id_and_message() {
    let (app, state, mock) = test_app().await;
    let session_id = state.sessions.create().id().to_string();

    let (status, _, body) = send(
        &app,
        upload_request(&session_id, Some(("notes.txt", "Cells divide."))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result: UploadResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.doc_id, "abc123");
    assert_eq!(
        result.message,
        "Document uploaded successfully! Document ID: abc123"
    );

    let uploads = mock.uploads.lock().unwrap();
    assert_eq!(uploads[0].0, "notes.txt");
    assert_eq!(uploads[0].1, b"Cells divide.".to_vec());
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let (app, state, mock) = test_app().await;
    let session_id = state.sessions.create().id().to_string();

    let (status, _, body) = send(&app, upload_request(&session_id, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Please select a file first.");
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let (url, mock) = mock_backend::spawn().await;
    let config = Config {
        backend_url: Some(url),
        max_upload_bytes: 64,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config));
    let app = router(state.clone());
    let session_id = state.sessions.create().id().to_string();

    let big = "x".repeat(4096);
    let (status, _, body) = send(&app, upload_request(&session_id, Some(("big.txt", &big)))).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_of(&body), "Error uploading document. Please try again.");
    assert_eq!(mock.hits(), 0);
}

// ============================================================================
// Ask
// ============================================================================

#[tokio::test]
async fn test_ask_returns_answer() {
    let (app, state, mock) = test_app().await;
    let session_id = uploaded_session(&app, &state).await;

    let request = json_request(
        "/api/ask",
        serde_json::json!({ "session": session_id, "question": "What happens to cells?" }),
    );
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let result: AskResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.answer, "42");

    let asks = mock.asks.lock().unwrap();
    assert_eq!(asks[0].doc_id, "abc123");
    assert_eq!(asks[0].question, "What happens to cells?");
}

#[tokio::test]
async fn test_ask_before_upload_is_rejected() {
    let (app, state, mock) = test_app().await;
    let session_id = state.sessions.create().id().to_string();

    let request = json_request(
        "/api/ask",
        serde_json::json!({ "session": session_id, "question": "Anything?" }),
    );
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Please upload a document and enter a question.");
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn test_ask_backend_failure_is_bad_gateway() {
    let (app, state, mock) = test_app().await;
    let session_id = uploaded_session(&app, &state).await;
    mock.fail_with(500);

    let request = json_request(
        "/api/ask",
        serde_json::json!({ "session": session_id, "question": "Why?" }),
    );
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error = error_of(&body);
    assert_eq!(error, "Error getting answer. Please try again.");
    assert!(!error.contains("mock failure"));

    let session = state.sessions.get(&session_id).unwrap();
    assert_eq!(session.doc_id().as_deref(), Some("abc123"));
    assert_eq!(session.answer(), "");
}

// ============================================================================
// Download
// ============================================================================

#[tokio::test]
async fn test_download_is_pdf_attachment() {
    let (app, state, mock) = test_app().await;
    let session_id = uploaded_session(&app, &state).await;

    let request = json_request(
        "/api/download_summary",
        serde_json::json!({ "session": session_id }),
    );
    let (status, headers, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"summary.pdf\""
    );
    assert_eq!(body, mock_backend::SUMMARY_BYTES.to_vec());
    assert_eq!(mock.summaries.lock().unwrap()[0].doc_id, "abc123");
}

#[tokio::test]
async fn test_download_before_upload_is_rejected() {
    let (app, state, mock) = test_app().await;
    let session_id = state.sessions.create().id().to_string();

    let request = json_request(
        "/api/download_summary",
        serde_json::json!({ "session": session_id }),
    );
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Please upload a document first.");
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn test_download_backend_failure() {
    let (app, state, mock) = test_app().await;
    let session_id = uploaded_session(&app, &state).await;
    mock.fail_with(404);

    let request = json_request(
        "/api/download_summary",
        serde_json::json!({ "session": session_id }),
    );
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error_of(&body), "Error downloading summary. Please try again.");
}
