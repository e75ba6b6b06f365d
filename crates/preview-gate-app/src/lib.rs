#![warn(missing_docs)]
//! # preview-gate-app
//!
//! ## Purpose
//! Orchestrates the session gate, preview derivation, upload processing, and
//! object-URL bookkeeping around one [`FileUploadPreview`] component.
//!
//! ## Responsibilities
//! - Deliver rejected-login alerts through an injectable [`AlertSink`].
//! - Derive previews off the UI task and apply them by file identity.
//! - Run the upload-then-process sequence and expose its result as an
//!   [`UploadReport`].
//! - Register processed blobs and revoke the ones they replace.
//! - Bootstrap `tracing` output for the binary.
//!
//! ## Data flow
//! User events -> [`App`] -> component reducers -> jobs (preview, upload) ->
//! [`ProcessClient`] / blocking pool -> results fed back -> [`App::render`].
//!
//! ## Ownership and lifetimes
//! [`App`] owns the component and the object-URL registry. Every operation
//! takes `&mut self`, so one app instance never runs two sequences at once.
//!
//! ## Error model
//! Setup and event-routing failures are [`AppError`]. Processing failures are
//! not errors: they surface as [`UploadReport::Failed`] and a log line.
//!
//! ## Security and privacy notes
//! Secrets are masked in views and redacted in `Debug` output; file bytes are
//! logged only as fingerprints.

pub mod cli;

use std::sync::Arc;
use std::time::Duration;

use preview_gate_auth::SessionGate;
use preview_gate_core::{Blob, ObjectUrl, ObjectUrlRegistry, SelectedFile};
use preview_gate_ui::{FileUploadPreview, LoginOutcome, UiError, View};
use preview_gate_upload::{
    PROCESS_ENDPOINT, ProcessClient, ProcessError, ProcessTransport, SIMULATED_UPLOAD_DELAY,
    UploadOutcome,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("PREVIEW_GATE_VERSION");

/// Log filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// The filter comes from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
///
/// # Errors
/// Returns [`AppError::Logging`] when a global subscriber is already installed.
pub fn init_logging() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}

/// Runtime configuration.
///
/// Defaults are the fixed literals; nothing is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Image processing endpoint.
    pub process_endpoint: String,
    /// Simulated upload latency before processing.
    pub upload_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            process_endpoint: PROCESS_ENDPOINT.to_string(),
            upload_delay: SIMULATED_UPLOAD_DELAY,
        }
    }
}

/// Receiver for blocking user-visible alerts.
pub trait AlertSink: Send + Sync {
    /// Shows `message` and returns once the user acknowledged it.
    fn alert(&self, message: &str);
}

/// Alert sink printing to stderr, used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAlertSink;

impl AlertSink for StderrAlertSink {
    fn alert(&self, message: &str) {
        eprintln!("ALERT: {message}");
    }
}

/// Observable result of [`App::upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReport {
    /// Upload was not started: no file, already uploading, or logged out.
    Skipped,
    /// Processed image is available under this reference.
    Processed(ObjectUrl),
    /// Processing was attempted and failed; nothing was stored.
    Failed(ProcessError),
    /// Non-image file: only the simulated delay ran.
    NotAttempted,
}

/// Application orchestrator.
pub struct App {
    component: FileUploadPreview,
    gate: SessionGate,
    client: ProcessClient,
    blobs: ObjectUrlRegistry,
    alerts: Arc<dyn AlertSink>,
}

impl App {
    /// Creates an app gated by the demo credentials.
    ///
    /// # Errors
    /// Returns [`AppError::Process`] when the configured endpoint is invalid.
    pub fn new(
        config: AppConfig,
        transport: Arc<dyn ProcessTransport>,
        alerts: Arc<dyn AlertSink>,
    ) -> Result<Self, AppError> {
        let client = ProcessClient::new(config.process_endpoint, config.upload_delay, transport)?;
        Ok(Self {
            component: FileUploadPreview::new(),
            gate: SessionGate::with_demo_credentials(),
            client,
            blobs: ObjectUrlRegistry::new(),
            alerts,
        })
    }

    /// Returns the component snapshot.
    pub fn component(&self) -> &FileUploadPreview {
        &self.component
    }

    /// Types into the identifier field.
    pub fn type_identifier(&mut self, value: &str) {
        self.component.set_identifier(value);
    }

    /// Types into the secret field.
    pub fn type_secret(&mut self, value: &str) {
        self.component.set_secret(value);
    }

    /// Submits the typed credentials.
    ///
    /// A rejection is delivered to the alert sink exactly once. The sink is
    /// blocking, so the alert is already acknowledged when this returns.
    pub fn submit_login(&mut self) -> LoginOutcome {
        let outcome = self.component.submit_login(&self.gate);
        if let LoginOutcome::Rejected(alert) = &outcome {
            self.alerts.alert(&alert.message);
            self.component.dismiss_alert();
        }
        outcome
    }

    /// Types both fields and submits.
    pub fn login(&mut self, identifier: &str, secret: &str) -> LoginOutcome {
        self.type_identifier(identifier);
        self.type_secret(secret);
        self.submit_login()
    }

    /// Selects `file` and derives its preview on the blocking pool.
    ///
    /// Returns `true` when the derived preview was applied.
    ///
    /// # Errors
    /// Returns [`AppError::Ui`] before login and [`AppError::PreviewTask`] when
    /// the derivation task panicked.
    pub async fn choose_file(&mut self, file: SelectedFile) -> Result<bool, AppError> {
        let job = self.component.select_file(file)?;
        let file_id = job.file_id;
        let preview = tokio::task::spawn_blocking(move || job.derive()).await?;
        Ok(self.component.apply_preview(file_id, preview))
    }

    /// Runs upload-then-process for the selected file.
    ///
    /// Never fails: every path ends with the widget interactive again.
    pub async fn upload(&mut self) -> UploadReport {
        let Some(ticket) = self.component.begin_upload() else {
            tracing::debug!("upload ignored: widget not ready");
            return UploadReport::Skipped;
        };

        let (processed, report) = match self.client.run(&ticket.file).await {
            UploadOutcome::Processed(blob) => {
                let url = self.blobs.create(blob);
                (Some(url.clone()), UploadReport::Processed(url))
            }
            UploadOutcome::Failed(error) => (None, UploadReport::Failed(error)),
            UploadOutcome::NotAttempted => (None, UploadReport::NotAttempted),
        };

        if let Some(replaced) = self.component.complete_upload(ticket, processed) {
            self.blobs.revoke(&replaced);
        }
        report
    }

    /// Renders the component.
    pub fn render(&self) -> View {
        self.component.render()
    }

    /// Returns the blob behind the current processed result.
    pub fn resolve_processed(&self) -> Option<&Blob> {
        self.component
            .processed_result()
            .and_then(|url| self.blobs.resolve(url))
    }

    /// Number of live object-reference URIs.
    pub fn live_object_urls(&self) -> usize {
        self.blobs.len()
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Processing client could not be configured.
    #[error("process error: {0}")]
    Process(#[from] ProcessError),
    /// Preview could not be decoded.
    #[error("core error: {0}")]
    Core(#[from] preview_gate_core::CoreError),
    /// Event does not apply to the current screen.
    #[error("ui error: {0}")]
    Ui(#[from] UiError),
    /// Preview derivation task did not complete.
    #[error("preview task failed: {0}")]
    PreviewTask(#[from] tokio::task::JoinError),
    /// Global log subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
    /// Local file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// View could not be encoded.
    #[error("render error: {0}")]
    Render(#[from] serde_json::Error),
}
