//! STUDYSync library - the document Q&A page and its backend plumbing.
//!
//! The binary serves one page. Each page load gets a server-side session
//! holding the selected file, document id, question, answer and busy flags.
//! The page's actions go through this crate to the document backend.
//!
//! - `config`: environment configuration
//! - `models`: backend wire types and page API bodies
//! - `backend`: HTTP client for the document backend
//! - `session`: the per-page component and its three actions
//! - `store`: live page sessions
//! - `handlers`: HTTP route handlers
//! - `templates`: HTML/CSS/JS of the page

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderMap},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub mod backend;
pub mod config;
pub mod handlers;
pub mod models;
pub mod session;
pub mod store;
pub mod templates;

#[cfg(test)]
mod mock_backend;

use backend::{resolve_backend_url, BackendClient, BackendError};
use config::Config;
use store::SessionStore;

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::new(config.session_ttl_minutes, config.max_sessions);
        Self {
            config,
            sessions,
            http: reqwest::Client::new(),
        }
    }

    /// Backend client for a page request, addressed by the page's `Host`.
    pub fn backend_for(&self, headers: &HeaderMap) -> Result<BackendClient, BackendError> {
        let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
        let base = resolve_backend_url(&self.config, host)?;
        Ok(BackendClient::new(self.http.clone(), base))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/session/{id}", get(handlers::session_view))
        .route(
            "/api/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/ask", post(handlers::ask))
        .route("/api/download_summary", post(handlers::download_summary))
        .with_state(state)
}

// Re-export commonly used types
pub use models::{
    AskRequest, AskResponse, SelectedFile, SessionView, SummaryPdf, SummaryRequest,
    UploadResponse, SUMMARY_FILENAME,
};

pub use session::{Operation, Session, UiError};
