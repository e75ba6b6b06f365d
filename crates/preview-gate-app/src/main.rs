#![warn(missing_docs)]
//! # preview-gate-app binary
//!
//! Drives the component once from the command line: log in, pick a file from
//! disk, upload it, and print the resulting view.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use preview_gate_app::cli::CliArgs;
use preview_gate_app::{App, AppConfig, AppError, StderrAlertSink, UploadReport, app_version};
use preview_gate_core::SelectedFile;
use preview_gate_ui::{LoginOutcome, View};
use preview_gate_upload::ReqwestTransport;

/// CLI entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    if let Err(error) = preview_gate_app::init_logging() {
        eprintln!("preview-gate-app: {error}");
        return ExitCode::FAILURE;
    }
    tracing::info!(version = app_version(), "preview-gate-app starting");

    match run(args).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("preview-gate-app: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<ExitCode, AppError> {
    let mut app = App::new(
        AppConfig::default(),
        Arc::new(ReqwestTransport::new()),
        Arc::new(StderrAlertSink),
    )?;

    if let LoginOutcome::Rejected(_) = app.login(&args.identifier, &args.secret) {
        print_view(&app.render(), args.json)?;
        return Ok(ExitCode::FAILURE);
    }

    let bytes = tokio::fs::read(&args.file).await?;
    let file = SelectedFile::new(args.file_name(), args.media_type.clone(), bytes);
    app.choose_file(file).await?;
    if let Some(preview) = app.component().preview() {
        let (media_type, content) = preview.decode()?;
        tracing::info!(%media_type, size = content.len(), "preview derived");
    }

    match app.upload().await {
        UploadReport::Processed(url) => {
            let size = app.resolve_processed().map_or(0, |blob| blob.bytes.len());
            tracing::info!(%url, size, "processed image stored");
        }
        UploadReport::Failed(error) => tracing::info!(%error, "no processed image"),
        UploadReport::NotAttempted => tracing::info!("file type is not processed"),
        UploadReport::Skipped => tracing::info!("upload skipped"),
    }

    print_view(&app.render(), args.json)?;
    Ok(ExitCode::SUCCESS)
}

fn print_view(view: &View, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{view}");
    }
    Ok(())
}
