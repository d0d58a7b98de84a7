//! Data models for the STUDYSync front end.
//!
//! Wire types for the document backend, request/response bodies of the page
//! API, and the serializable view of a page session.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Filename the generated summary is saved under.
pub const SUMMARY_FILENAME: &str = "summary.pdf";

// ============================================================================
// Backend Protocol
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub doc_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskRequest {
    pub doc_id: String,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRequest {
    pub doc_id: String,
}

// ============================================================================
// Session Types
// ============================================================================

/// A file picked in the page, held until another one replaces it.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Arc<Vec<u8>>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes),
        }
    }
}

/// The summary PDF as returned by the backend.
#[derive(Debug, Clone)]
pub struct SummaryPdf {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
}

/// Snapshot of a page session, used to render the page and by
/// `GET /api/session/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionView {
    pub session_id: String,
    pub file_name: Option<String>,
    pub doc_id: Option<String>,
    pub question: String,
    pub answer: String,
    pub uploading: bool,
    pub submitting: bool,
    pub downloading: bool,
}

// ============================================================================
// Page API
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub session: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResult {
    pub doc_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AskBody {
    pub session: String,
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResult {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadBody {
    pub session: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
