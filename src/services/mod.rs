//! Submission pipeline services.
//!
//! Request building, the HTTP transport, result formatting, statistics and
//! chart rendering, and the controller that drives them from UI events.

pub mod affordances;
pub mod analysis_client;
pub mod charts;
pub mod controller;
pub mod errors;
pub mod formatter;
pub mod metrics;
pub mod page_export;
pub mod request_builder;
pub mod statistics;

pub use analysis_client::{AnalysisClientConfig, AnalysisTransport, HttpAnalysisClient, TransportReply};
pub use charts::{ChartBackend, ChartHandle, ChartJsBackend, ChartSlots};
pub use controller::{ControllerConfig, SubmissionController};
pub use errors::{SubmissionError, TransportError, ValidationError};
pub use formatter::ResultFormatter;
pub use metrics::SubmissionMetrics;
pub use page_export::render_page_html;
pub use request_builder::{FormPart, MultipartPayload, build_payload};
pub use statistics::render_statistics;
