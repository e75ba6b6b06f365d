#![warn(missing_docs)]
//! # preview-gate-upload
//!
//! ## Purpose
//! Runs the upload-then-process sequence for one selected file.
//!
//! ## Responsibilities
//! - Wait the fixed simulated upload latency.
//! - Package image files into a single-field multipart body.
//! - POST once to the processing endpoint through an injectable transport.
//! - Report the result as an explicit [`UploadOutcome`].
//!
//! ## Data flow
//! [`SelectedFile`] -> [`ProcessClient::run`] -> delay -> [`MultipartUpload`]
//! -> [`ProcessTransport::post_multipart`] -> [`ProcessResponse`] ->
//! [`UploadOutcome`].
//!
//! ## Ownership and lifetimes
//! Multipart bodies clone the file's [`bytes::Bytes`] handle, so the request
//! owns its payload independently of UI state.
//!
//! ## Error model
//! Processing is best-effort. Transport failures and non-2xx statuses become
//! [`UploadOutcome::Failed`] and are logged; [`ProcessClient::run`] itself never
//! fails. Only client construction can return [`ProcessError`].
//!
//! ## Concurrency notes
//! The delay is unconditional and not cancellable. There is no retry and no
//! timeout on the request itself.

mod transport;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use preview_gate_core::{Blob, MediaKind, SelectedFile};
use thiserror::Error;
use url::Url;

pub use transport::ReqwestTransport;

/// Fixed local processing endpoint.
pub const PROCESS_ENDPOINT: &str = "http://localhost:3000/manipulate-image";

/// Artificial latency applied before every processing attempt.
pub const SIMULATED_UPLOAD_DELAY: Duration = Duration::from_millis(2_000);

/// Multipart field carrying the raw file.
pub const IMAGE_FIELD_NAME: &str = "image";

/// One-part multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUpload {
    /// Form field name.
    pub field_name: String,
    /// File name forwarded in the part headers.
    pub file_name: String,
    /// Declared media type of the part (may be empty).
    pub content_type: String,
    /// Raw file content.
    pub bytes: Bytes,
}

impl MultipartUpload {
    /// Packages a file under the [`IMAGE_FIELD_NAME`] field.
    pub fn image(file: &SelectedFile) -> Self {
        Self {
            field_name: IMAGE_FIELD_NAME.to_string(),
            file_name: file.name.clone(),
            content_type: file.media_type.clone(),
            bytes: file.bytes.clone(),
        }
    }
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value, when present.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl ProcessResponse {
    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by [`ProcessClient`].
#[async_trait]
pub trait ProcessTransport: Send + Sync {
    /// Issues one POST with a multipart body.
    async fn post_multipart(
        &self,
        endpoint: &str,
        upload: MultipartUpload,
    ) -> Result<ProcessResponse, ProcessError>;
}

/// Result of one upload-then-process sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Endpoint answered 2xx; body is the processed blob.
    Processed(Blob),
    /// Processing was attempted and failed.
    Failed(ProcessError),
    /// File is not an image, so no request was made.
    NotAttempted,
}

/// Client executing the simulated upload and remote processing.
#[derive(Clone)]
pub struct ProcessClient {
    endpoint: String,
    upload_delay: Duration,
    transport: Arc<dyn ProcessTransport>,
}

impl ProcessClient {
    /// Creates a validated client.
    ///
    /// # Errors
    /// Returns [`ProcessError::InvalidEndpoint`] when `endpoint` is not an
    /// absolute `http`/`https` URL.
    pub fn new(
        endpoint: impl Into<String>,
        upload_delay: Duration,
        transport: Arc<dyn ProcessTransport>,
    ) -> Result<Self, ProcessError> {
        let endpoint = endpoint.into();
        validate_process_endpoint(&endpoint)?;
        Ok(Self {
            endpoint,
            upload_delay,
            transport,
        })
    }

    /// Client for [`PROCESS_ENDPOINT`] with [`SIMULATED_UPLOAD_DELAY`].
    pub fn with_defaults(transport: Arc<dyn ProcessTransport>) -> Result<Self, ProcessError> {
        Self::new(PROCESS_ENDPOINT, SIMULATED_UPLOAD_DELAY, transport)
    }

    /// Runs the full sequence for `file`.
    ///
    /// # Semantics
    /// 1. Sleeps for the configured delay, whatever the file type.
    /// 2. Non-image files stop here with [`UploadOutcome::NotAttempted`].
    /// 3. Image files are posted exactly once; 2xx yields
    ///    [`UploadOutcome::Processed`], anything else [`UploadOutcome::Failed`].
    pub async fn run(&self, file: &SelectedFile) -> UploadOutcome {
        tokio::time::sleep(self.upload_delay).await;

        if file.kind() != MediaKind::Image {
            tracing::debug!(
                file = %file.name,
                media_type = %file.media_type,
                "skipping processing for non-image file"
            );
            return UploadOutcome::NotAttempted;
        }

        let fingerprint = file.fingerprint();
        let result = self
            .transport
            .post_multipart(&self.endpoint, MultipartUpload::image(file))
            .await;

        let error = match result {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    file = %file.name,
                    %fingerprint,
                    status = response.status,
                    processed_bytes = response.body.len(),
                    "image processed"
                );
                return UploadOutcome::Processed(Blob::new(
                    response.body,
                    response.content_type.unwrap_or_default(),
                ));
            }
            Ok(response) => ProcessError::Status(response.status),
            Err(error) => error,
        };

        tracing::warn!(file = %file.name, %fingerprint, %error, "error manipulating image");
        UploadOutcome::Failed(error)
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the configured simulated delay.
    pub fn upload_delay(&self) -> Duration {
        self.upload_delay
    }
}

/// Validates that the processing endpoint is an absolute HTTP(S) URL.
///
/// # Errors
/// Returns [`ProcessError::InvalidEndpoint`] for unparsable URLs, other
/// schemes, or a missing host.
pub fn validate_process_endpoint(endpoint: &str) -> Result<(), ProcessError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| ProcessError::InvalidEndpoint(format!("invalid url: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ProcessError::InvalidEndpoint(
            "endpoint must use http or https".to_string(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(ProcessError::InvalidEndpoint(
            "endpoint must name a host".to_string(),
        ));
    }

    Ok(())
}

/// Processing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// Endpoint violates URL requirements.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Endpoint answered with a non-2xx status.
    #[error("processing endpoint returned status {0}")]
    Status(u16),
    /// Request could not be built, sent, or read.
    #[error("transport failure: {0}")]
    Transport(String),
}
