//! Page session: the state behind one loaded page and its three actions.
//!
//! A session holds the selected file, the document id handed out by the
//! backend, the question and the latest answer, plus one busy flag per
//! action. Actions validate first and only then mark themselves busy and talk
//! to the backend, so a rejected action never issues a request. A failed
//! action leaves every field as it was.

use crate::backend::{BackendClient, BackendError};
use crate::models::{
    AskRequest, SelectedFile, SessionView, SummaryPdf, SummaryRequest, SUMMARY_FILENAME,
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

// ============================================================================
// Operations and Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Ask,
    Download,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Upload => "upload",
            Operation::Ask => "ask",
            Operation::Download => "download",
        }
    }

    /// Notice shown when the action is attempted without its inputs.
    pub fn validation_message(self) -> &'static str {
        match self {
            Operation::Upload => "Please select a file first.",
            Operation::Ask => "Please upload a document and enter a question.",
            Operation::Download => "Please upload a document first.",
        }
    }

    /// Notice shown when the backend call fails, whatever the cause.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Upload => "Error uploading document. Please try again.",
            Operation::Ask => "Error getting answer. Please try again.",
            Operation::Download => "Error downloading summary. Please try again.",
        }
    }
}

/// User-facing failure of an action. `Display` is the notice text only;
/// backend detail stays in `source`.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("{}", .0.validation_message())]
    Validation(Operation),
    #[error("{}", .op.failure_message())]
    Failed {
        op: Operation,
        #[source]
        source: BackendError,
    },
}

pub fn uploaded_message(doc_id: &str) -> String {
    format!("Document uploaded successfully! Document ID: {}", doc_id)
}

// ============================================================================
// Busy Flags
// ============================================================================

/// One in-flight counter per action. An action reads as busy while any of
/// its requests is outstanding.
#[derive(Debug, Default)]
struct BusyFlags {
    uploading: AtomicUsize,
    submitting: AtomicUsize,
    downloading: AtomicUsize,
}

impl BusyFlags {
    fn counter(&self, op: Operation) -> &AtomicUsize {
        match op {
            Operation::Upload => &self.uploading,
            Operation::Ask => &self.submitting,
            Operation::Download => &self.downloading,
        }
    }

    fn enter(&self, op: Operation) -> BusyGuard<'_> {
        let counter = self.counter(op);
        counter.fetch_add(1, Ordering::SeqCst);
        BusyGuard { counter }
    }

    fn is_busy(&self, op: Operation) -> bool {
        self.counter(op).load(Ordering::SeqCst) > 0
    }
}

/// Clears its busy flag when dropped, on success, failure or cancellation.
struct BusyGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Default)]
struct SessionState {
    file: Option<SelectedFile>,
    doc_id: Option<String>,
    question: String,
    answer: String,
}

#[derive(Debug)]
pub struct Session {
    id: String,
    last_seen: Mutex<DateTime<Utc>>,
    state: Mutex<SessionState>,
    busy: BusyFlags,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            last_seen: Mutex::new(Utc::now()),
            state: Mutex::new(SessionState::default()),
            busy: BusyFlags::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn touch(&self) {
        self.touch_at(Utc::now());
    }

    pub fn touch_at(&self, at: DateTime<Utc>) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    // Never held across an await.
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn select_file(&self, file: SelectedFile) {
        self.state().file = Some(file);
    }

    pub fn set_question(&self, question: impl Into<String>) {
        self.state().question = question.into();
    }

    pub fn doc_id(&self) -> Option<String> {
        self.state().doc_id.clone()
    }

    pub fn answer(&self) -> String {
        self.state().answer.clone()
    }

    pub fn is_busy(&self, op: Operation) -> bool {
        self.busy.is_busy(op)
    }

    pub fn view(&self) -> SessionView {
        let state = self.state();
        SessionView {
            session_id: self.id.clone(),
            file_name: state.file.as_ref().map(|f| f.name.clone()),
            doc_id: state.doc_id.clone(),
            question: state.question.clone(),
            answer: state.answer.clone(),
            uploading: self.busy.is_busy(Operation::Upload),
            submitting: self.busy.is_busy(Operation::Ask),
            downloading: self.busy.is_busy(Operation::Download),
        }
    }

    /// Upload the selected file and keep the document id the backend returns.
    pub async fn upload(&self, backend: &BackendClient) -> Result<String, UiError> {
        let file = self.state().file.clone();
        let Some(file) = file else {
            return Err(self.rejected(Operation::Upload));
        };

        let _busy = self.busy.enter(Operation::Upload);
        match backend.upload(&file).await {
            Ok(response) => {
                log::info!(
                    "[{}] uploaded {} ({} bytes) as {}",
                    self.id,
                    file.name,
                    file.bytes.len(),
                    response.doc_id
                );
                self.state().doc_id = Some(response.doc_id.clone());
                Ok(response.doc_id)
            }
            Err(source) => Err(self.failed(Operation::Upload, source)),
        }
    }

    /// Ask the current question about the current document. The answer
    /// replaces the previous one.
    pub async fn ask(&self, backend: &BackendClient) -> Result<String, UiError> {
        let request = {
            let state = self.state();
            match &state.doc_id {
                Some(doc_id) if !state.question.trim().is_empty() => Some(AskRequest {
                    doc_id: doc_id.clone(),
                    question: state.question.clone(),
                }),
                _ => None,
            }
        };
        let Some(request) = request else {
            return Err(self.rejected(Operation::Ask));
        };

        let _busy = self.busy.enter(Operation::Ask);
        match backend.ask(&request).await {
            Ok(response) => {
                log::info!("[{}] answered question about {}", self.id, request.doc_id);
                self.state().answer = response.answer.clone();
                Ok(response.answer)
            }
            Err(source) => Err(self.failed(Operation::Ask, source)),
        }
    }

    /// Fetch the summary PDF of the current document.
    pub async fn download_summary(&self, backend: &BackendClient) -> Result<SummaryPdf, UiError> {
        let doc_id = self.doc_id();
        let Some(doc_id) = doc_id else {
            return Err(self.rejected(Operation::Download));
        };

        let _busy = self.busy.enter(Operation::Download);
        match backend.download_summary(&SummaryRequest { doc_id: doc_id.clone() }).await {
            Ok(bytes) => {
                log::info!("[{}] downloaded summary of {} ({} bytes)", self.id, doc_id, bytes.len());
                Ok(SummaryPdf {
                    filename: SUMMARY_FILENAME,
                    bytes,
                })
            }
            Err(source) => Err(self.failed(Operation::Download, source)),
        }
    }

    fn rejected(&self, op: Operation) -> UiError {
        log::warn!("[{}] {} rejected: {}", self.id, op.as_str(), op.validation_message());
        UiError::Validation(op)
    }

    fn failed(&self, op: Operation, source: BackendError) -> UiError {
        log::error!("[{}] {} failed: {}", self.id, op.as_str(), source);
        UiError::Failed { op, source }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
