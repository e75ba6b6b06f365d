//! Integration tests for upload preconditions.

mod common;

use std::sync::Arc;

use common::{CountingAlerts, Reply, ScriptedTransport, app_with, logged_in_app, png_file};
use preview_gate_app::{AppError, UploadReport};
use preview_gate_ui::UiError;

#[tokio::test(start_paused = true)]
async fn upload_guard_tests_without_file_is_noop() {
    let transport = ScriptedTransport::new(Reply::Status(200, b"out"));
    let mut app = logged_in_app(transport.clone());

    assert_eq!(app.upload().await, UploadReport::Skipped);
    assert!(!app.component().is_uploading());
    assert!(transport.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn upload_guard_tests_before_login_is_noop() {
    let transport = ScriptedTransport::new(Reply::Status(200, b"out"));
    let mut app = app_with(transport.clone(), Arc::new(CountingAlerts::default()));

    assert_eq!(app.upload().await, UploadReport::Skipped);
    assert!(matches!(
        app.choose_file(png_file()).await,
        Err(AppError::Ui(UiError::NotAuthenticated))
    ));
    assert!(transport.requests().is_empty());
}
