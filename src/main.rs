use std::env;
use std::path::Path;
use std::process::ExitCode;

use asksiri::{
    AnalysisClientConfig, ControllerConfig, HttpAnalysisClient, LogFile, SubmissionController,
    TelemetryConfig, UiEvent, UiState, init_tracing, render_page_html,
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

/// Read every comma-separated path into memory.
async fn load_log_files(paths: &str) -> std::io::Result<Vec<LogFile>> {
    let mut files = Vec::new();
    for path in paths.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let bytes = tokio::fs::read(path).await?;
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        debug!(path, bytes = bytes.len(), "Loaded log file");
        files.push(LogFile::new(name, bytes));
    }
    Ok(files)
}

async fn write_output(html: &str) -> std::io::Result<()> {
    match env::var("ASKSIRI_OUTPUT").ok().filter(|p| !p.is_empty()) {
        Some(path) => {
            tokio::fs::write(&path, html).await?;
            info!(path = %path, generated_at = %chrono::Utc::now().to_rfc3339(), "Page exported");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing(&TelemetryConfig::from_env()) {
        eprintln!("failed to initialize logging: {e}");
    }

    let client_config = AnalysisClientConfig::from_env();
    let client = match HttpAnalysisClient::new(client_config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Invalid analysis client configuration");
            return ExitCode::from(2);
        }
    };
    info!(endpoint = %client.endpoint(), "Analysis client ready");

    let files = match env::var("ASKSIRI_LOG_FILES") {
        Ok(paths) => match load_log_files(&paths).await {
            Ok(files) => files,
            Err(e) => {
                error!(error = %e, "Failed to read log files");
                return ExitCode::from(2);
            }
        },
        Err(_) => Vec::new(),
    };

    let mut controller = SubmissionController::new(client, ControllerConfig::from_env());
    controller.dispatch(UiEvent::PromptChanged(
        env::var("ASKSIRI_PROMPT").unwrap_or_default(),
    ));
    controller.dispatch(UiEvent::LogTextChanged(
        env::var("ASKSIRI_LOG_TEXT").unwrap_or_default(),
    ));
    if !files.is_empty() {
        controller.dispatch(UiEvent::FilesSelected(files));
    }
    controller.dispatch(UiEvent::SubmitIntent);
    controller.run_until_idle().await;

    for notice in controller.page().notices() {
        eprintln!("{notice}");
    }

    let html = match render_page_html(controller.page(), &controller.charts().configs()) {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Failed to render exported page");
            return ExitCode::from(2);
        }
    };
    controller.release_charts();
    if let Err(e) = write_output(&html).await {
        error!(error = %e, "Failed to write exported page");
        return ExitCode::from(2);
    }

    if let Some(metrics) = controller.metrics() {
        match metrics.gather_text() {
            Ok(text) => debug!(metrics = %text, "Submission metrics"),
            Err(e) => error!(error = %e, "Failed to encode metrics"),
        }
    }

    match controller.state() {
        UiState::Success => ExitCode::SUCCESS,
        state => {
            info!(state = ?state, "Submission did not succeed");
            ExitCode::FAILURE
        }
    }
}
