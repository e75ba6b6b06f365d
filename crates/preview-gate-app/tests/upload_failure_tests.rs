//! Integration tests for silent processing failures.

mod common;

use common::{Reply, ScriptedTransport, logged_in_app, png_file};
use preview_gate_app::UploadReport;
use preview_gate_ui::Node;
use preview_gate_upload::ProcessError;

#[tokio::test(start_paused = true)]
async fn upload_failure_tests_non_success_status_stores_nothing() {
    for status in [199, 302, 404, 500, 503] {
        let transport = ScriptedTransport::new(Reply::Status(status, b"error page"));
        let mut app = logged_in_app(transport.clone());
        app.choose_file(png_file()).await.expect("file should be chosen");

        assert_eq!(
            app.upload().await,
            UploadReport::Failed(ProcessError::Status(status))
        );
        assert!(app.component().processed_result().is_none());
        assert!(!app.component().is_uploading());
        assert!(app.component().can_upload());
        assert_eq!(transport.requests().len(), 1, "no retry for status {status}");
    }
}

#[tokio::test(start_paused = true)]
async fn upload_failure_tests_transport_error_stores_nothing() {
    let transport = ScriptedTransport::new(Reply::TransportError("connection refused"));
    let mut app = logged_in_app(transport.clone());
    app.choose_file(png_file()).await.expect("file should be chosen");

    let report = app.upload().await;
    assert!(matches!(report, UploadReport::Failed(ProcessError::Transport(_))));
    assert!(app.component().processed_result().is_none());
    assert!(!app.component().is_uploading());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn upload_failure_tests_show_no_user_visible_error() {
    let transport = ScriptedTransport::new(Reply::TransportError("reset"));
    let mut app = logged_in_app(transport);
    app.choose_file(png_file()).await.expect("file should be chosen");
    app.upload().await;

    let view = app.render();
    assert!(!view.walk().any(|node| matches!(node, Node::Alert { .. } | Node::Notice { .. })));
    assert!(view.section("Manipulated Image:").is_none());
}
