//! Shared fakes and fixtures for app integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use preview_gate_app::{AlertSink, App, AppConfig};
use preview_gate_core::SelectedFile;
use preview_gate_upload::{MultipartUpload, ProcessError, ProcessResponse, ProcessTransport};

/// Canned reply returned by [`ScriptedTransport`].
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with a status and body.
    Status(u16, &'static [u8]),
    /// Fail before any response.
    TransportError(&'static str),
}

/// Transport that records every request and answers from a script.
#[derive(Debug)]
pub struct ScriptedTransport {
    reply: Reply,
    requests: Mutex<Vec<(String, MultipartUpload)>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<(String, MultipartUpload)> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ProcessTransport for ScriptedTransport {
    async fn post_multipart(
        &self,
        endpoint: &str,
        upload: MultipartUpload,
    ) -> Result<ProcessResponse, ProcessError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push((endpoint.to_string(), upload));

        match &self.reply {
            Reply::Status(status, body) => Ok(ProcessResponse {
                status: *status,
                content_type: Some("image/png".to_string()),
                body: Bytes::from_static(*body),
            }),
            Reply::TransportError(message) => Err(ProcessError::Transport(message.to_string())),
        }
    }
}

/// Alert sink counting delivered alerts.
#[derive(Debug, Default)]
pub struct CountingAlerts {
    count: AtomicUsize,
    last: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl CountingAlerts {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<String> {
        self.last.lock().expect("alert lock").clone()
    }
}

impl AlertSink for CountingAlerts {
    fn alert(&self, message: &str) {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().expect("alert lock") = Some(message.to_string());
    }
}

/// Builds an app with default config around the given fakes.
#[allow(dead_code)]
pub fn app_with(transport: Arc<ScriptedTransport>, alerts: Arc<CountingAlerts>) -> App {
    App::new(AppConfig::default(), transport, alerts).expect("app should build")
}

/// Builds an app that already passed the gate.
#[allow(dead_code)]
pub fn logged_in_app(transport: Arc<ScriptedTransport>) -> App {
    let mut app = app_with(transport, Arc::new(CountingAlerts::default()));
    app.login("demo", "password");
    app
}

#[allow(dead_code)]
pub fn png_file() -> SelectedFile {
    SelectedFile::new("photo.png", "image/png", vec![0x89, b'P', b'N', b'G'])
}

#[allow(dead_code)]
pub fn pdf_file() -> SelectedFile {
    SelectedFile::new("report.pdf", "application/pdf", b"%PDF-1.7".to_vec())
}
