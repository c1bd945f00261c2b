//! Ask Siri - client for an AI log-analysis service
//!
//! The crate collects a prompt and log content from a form, submits them as a
//! multipart request, and renders the outcome into an in-memory page:
//! - Validation and multipart request building
//! - A submission state machine driven by UI events
//! - Markdown-like result formatting into HTML
//! - Statistics displays and Chart.js chart data
//! - Prometheus metrics and structured `tracing` logs
//!
//! ## Architecture
//!
//! - `models/` - Request/response types, chart specs, and the page model
//! - `services/` - Request builder, HTTP transport, formatter, charts, controller
//! - `utils/` - HTML helpers
//! - `config/` - Environment loading
//! - `telemetry` - Log subscriber setup and build metadata
//!
//! ## Quick Start
//!
//! ```no_run
//! use asksiri::{
//!     AnalysisClientConfig, ControllerConfig, HttpAnalysisClient, SubmissionController, UiEvent,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpAnalysisClient::new(AnalysisClientConfig::from_env())?;
//!     let mut controller = SubmissionController::new(client, ControllerConfig::from_env());
//!     controller.dispatch(UiEvent::PromptChanged("What failed?".into()));
//!     controller.dispatch(UiEvent::LogTextChanged("ERROR: disk full".into()));
//!     controller.dispatch(UiEvent::SubmitIntent);
//!     controller.run_until_idle().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use models::{
    AnalysisRequest, AnalysisResponse, ChartDataset, ChartKind, ChartSpec, ChartTarget,
    FormInputs, LogFile, Page, Region, Stats, UiEvent, UiState,
};
pub use services::{
    AnalysisClientConfig, AnalysisTransport, ChartBackend, ChartJsBackend, ControllerConfig,
    HttpAnalysisClient, ResultFormatter, SubmissionController, SubmissionError,
    SubmissionMetrics, TransportError, TransportReply, ValidationError, build_payload,
    render_page_html,
};
pub use telemetry::{BuildInfo, TelemetryConfig, init_tracing};
