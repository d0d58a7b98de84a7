//! Client for the document backend.
//!
//! The backend exposes three endpoints (`/upload`, `/ask`,
//! `/download_summary`). Anything other than a 2xx answer is an error, and
//! the status and body are kept on the error for the developer log.

use crate::config::Config;
use crate::models::{AskRequest, AskResponse, SelectedFile, SummaryRequest, UploadResponse};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to /{endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("/{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("/{endpoint} returned an unexpected body: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("/{endpoint} returned an empty document id")]
    EmptyDocId { endpoint: &'static str },
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

// ============================================================================
// URL Resolution
// ============================================================================

/// Work out where the backend lives for a request.
///
/// A configured URL wins. Otherwise the backend is assumed to run on the
/// same host the page was loaded from, on the configured port.
pub fn resolve_backend_url(config: &Config, host_header: Option<&str>) -> Result<Url, BackendError> {
    if let Some(url) = &config.backend_url {
        return Ok(url.clone());
    }

    let host = host_header
        .and_then(page_hostname)
        .unwrap_or_else(|| "localhost".to_string());

    Ok(Url::parse(&format!("http://{}:{}/", host, config.backend_port))?)
}

/// Hostname part of a `Host` header value, port dropped. IPv6 literals keep
/// their brackets.
fn page_hostname(header: &str) -> Option<String> {
    let header = header.trim();
    if header.is_empty() || header.contains(&['/', '@', '?', '#'][..]) {
        return None;
    }
    let url = Url::parse(&format!("http://{}", header)).ok()?;
    url.host_str().map(|h| h.to_string())
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, mut base: Url) -> Self {
        // Url::join replaces the last path segment unless it ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { http, base }
    }

    pub async fn upload(&self, file: &SelectedFile) -> Result<UploadResponse, BackendError> {
        const ENDPOINT: &str = "upload";

        let part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.base.join(ENDPOINT)?)
            .multipart(form)
            .send()
            .await
            .map_err(|source| BackendError::Request { endpoint: ENDPOINT, source })?;

        let response = check_status(ENDPOINT, response).await?;
        let body = response
            .json::<UploadResponse>()
            .await
            .map_err(|source| BackendError::Decode { endpoint: ENDPOINT, source })?;

        // Ask and download need an id to send, so "" is no document at all
        if body.doc_id.trim().is_empty() {
            return Err(BackendError::EmptyDocId { endpoint: ENDPOINT });
        }
        Ok(body)
    }

    pub async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        const ENDPOINT: &str = "ask";

        let response = self
            .http
            .post(self.base.join(ENDPOINT)?)
            .json(request)
            .send()
            .await
            .map_err(|source| BackendError::Request { endpoint: ENDPOINT, source })?;

        let response = check_status(ENDPOINT, response).await?;
        response
            .json::<AskResponse>()
            .await
            .map_err(|source| BackendError::Decode { endpoint: ENDPOINT, source })
    }

    /// Fetch the summary PDF. The body is returned as-is.
    pub async fn download_summary(&self, request: &SummaryRequest) -> Result<Vec<u8>, BackendError> {
        const ENDPOINT: &str = "download_summary";

        let response = self
            .http
            .post(self.base.join(ENDPOINT)?)
            .json(request)
            .send()
            .await
            .map_err(|source| BackendError::Request { endpoint: ENDPOINT, source })?;

        let response = check_status(ENDPOINT, response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| BackendError::Request { endpoint: ENDPOINT, source })?;

        Ok(bytes.to_vec())
    }
}

async fn check_status(endpoint: &'static str, response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        endpoint,
        status: status.as_u16(),
        body,
    })
}
