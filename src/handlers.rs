//! HTTP route handlers for the STUDYSync page.
//!
//! `GET /` mints a page session and renders the page. The `/api/*` routes
//! run one action each against that session and report either the result or
//! a `{ "error": ... }` body carrying the notice for the user.

use crate::backend::BackendClient;
use crate::models::{
    AskBody, AskResult, DownloadBody, ErrorBody, SelectedFile, UploadQuery, UploadResult,
};
use crate::session::{uploaded_message, Operation, Session, UiError};
use crate::templates::render_page;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;

pub const SESSION_EXPIRED: &str = "Session expired. Please reload the page.";

// ============================================================================
// Responses
// ============================================================================

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

fn session_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, SESSION_EXPIRED)
}

fn ui_error_response(err: UiError) -> Response {
    let status = match err {
        UiError::Validation(_) => StatusCode::BAD_REQUEST,
        UiError::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    error_response(status, err.to_string())
}

/// Resolve the session and a backend client, or the response to send instead.
fn prepare(
    state: &AppState,
    headers: &HeaderMap,
    session_id: &str,
    op: Operation,
) -> Result<(Arc<Session>, BackendClient), Response> {
    let session = state.sessions.get(session_id).ok_or_else(session_not_found)?;
    let backend = state.backend_for(headers).map_err(|e| {
        log::error!("[{}] cannot reach backend for {}: {}", session.id(), op.as_str(), e);
        error_response(StatusCode::BAD_GATEWAY, op.failure_message())
    })?;
    Ok((session, backend))
}

// ============================================================================
// Page Handlers
// ============================================================================

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let session = state.sessions.create();
    Html(render_page(&session.view()))
}

pub async fn session_view(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.sessions.get(&id) {
        Some(session) => Json(session.view()).into_response(),
        None => session_not_found(),
    }
}

// ============================================================================
// Action Handlers
// ============================================================================

pub async fn upload(
    Query(query): Query<UploadQuery>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let (session, backend) = match prepare(&state, &headers, &query.session, Operation::Upload) {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };

    // A missing or nameless file part leaves the previous selection in place
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                log::warn!("[{}] unreadable upload body: {}", session.id(), e);
                return error_response(e.status(), Operation::Upload.failure_message());
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }
        match field.bytes().await {
            Ok(bytes) => session.select_file(SelectedFile::new(name, bytes.to_vec())),
            Err(e) => {
                log::warn!("[{}] failed to read file {}: {}", session.id(), name, e);
                return error_response(e.status(), Operation::Upload.failure_message());
            }
        }
        break;
    }

    match session.upload(&backend).await {
        Ok(doc_id) => Json(UploadResult {
            message: uploaded_message(&doc_id),
            doc_id,
        })
        .into_response(),
        Err(e) => ui_error_response(e),
    }
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AskBody>,
) -> Response {
    let (session, backend) = match prepare(&state, &headers, &body.session, Operation::Ask) {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };

    session.set_question(body.question);
    match session.ask(&backend).await {
        Ok(answer) => Json(AskResult { answer }).into_response(),
        Err(e) => ui_error_response(e),
    }
}

pub async fn download_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<DownloadBody>,
) -> Response {
    let (session, backend) = match prepare(&state, &headers, &body.session, Operation::Download) {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };

    match session.download_summary(&backend).await {
        Ok(pdf) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", pdf.filename),
                ),
            ],
            pdf.bytes,
        )
            .into_response(),
        Err(e) => ui_error_response(e),
    }
}

#[cfg(test)]
#[path = "handlers_test.rs"]
mod handlers_test;
