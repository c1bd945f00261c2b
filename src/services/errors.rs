//! Error kinds surfaced by a submission.

/// Input problems caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload log files or paste log content.")]
    MissingLogs,

    #[error("Please enter a question or analysis request.")]
    EmptyPrompt,
}

/// Failures below HTTP: the request never produced a status line.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to reach analysis service: {0}")]
    Network(String),

    #[error("Analysis request timed out")]
    Timeout,

    #[error("Invalid analysis endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid multipart part: {0}")]
    InvalidPart(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// Every way a submission can end up in the error state.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP error! Status: {status}")]
    HttpStatus { status: u16, detail: Option<String> },

    #[error("{0}")]
    Service(String),

    #[error("Failed to decode analysis response: {0}")]
    Decode(String),
}

impl SubmissionError {
    /// Message for the error panel. A service-supplied message wins over the
    /// status line, which wins over the transport's own description.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::HttpStatus {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            other => other.to_string(),
        }
    }

    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::Validation(_) => "validation_error",
            SubmissionError::Transport(_) => "transport_error",
            SubmissionError::HttpStatus { .. } => "http_status_error",
            SubmissionError::Service(_) => "service_error",
            SubmissionError::Decode(_) => "decode_error",
        }
    }
}
