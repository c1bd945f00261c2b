//! HTTP transport to the analysis service.
//!
//! The controller talks to the service through [`AnalysisTransport`], which
//! only moves bytes: it returns the status and body of whatever came back and
//! leaves interpretation to [`interpret_reply`]. No retries happen here, and
//! no timeout is applied unless one is configured.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use url::Url;

use crate::models::AnalysisResponse;
use crate::services::errors::{SubmissionError, TransportError};
use crate::services::request_builder::MultipartPayload;

/// Configuration for the analysis HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisClientConfig {
    /// Scheme, host, and port of the analysis service
    pub base_url: String,

    /// Path of the analyze endpoint
    pub analyze_path: String,

    /// Connection timeout (in seconds); transport default when unset
    pub connect_timeout_seconds: Option<u64>,

    /// Whole-request timeout (in seconds); transport default when unset
    pub request_timeout_seconds: Option<u64>,

    /// Log every request and response
    pub enable_detailed_logging: bool,
}

impl Default for AnalysisClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            analyze_path: "/api/analyze".to_string(),
            connect_timeout_seconds: None,
            request_timeout_seconds: None,
            enable_detailed_logging: true,
        }
    }
}

impl AnalysisClientConfig {
    /// Absolute URL of the analyze endpoint.
    pub fn endpoint(&self) -> Result<Url, TransportError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {e}", self.base_url)))?;
        base.join(&self.analyze_path)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {e}", self.analyze_path)))
    }
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

impl TransportReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a payload to the analysis service.
pub trait AnalysisTransport {
    fn send(
        &self,
        payload: MultipartPayload,
    ) -> impl Future<Output = Result<TransportReply, TransportError>> + Send;
}

/// Turn a transport outcome into a response or the most specific error.
///
/// Order of precedence: a non-empty `error` in the body, then the HTTP
/// status, then the transport failure itself.
pub fn interpret_reply(
    outcome: Result<TransportReply, TransportError>,
) -> Result<AnalysisResponse, SubmissionError> {
    let reply = outcome?;

    if !reply.is_success() {
        let detail = serde_json::from_str::<AnalysisResponse>(&reply.body)
            .ok()
            .and_then(|body| body.service_error().map(str::to_string));
        return Err(SubmissionError::HttpStatus {
            status: reply.status,
            detail,
        });
    }

    let response: AnalysisResponse = serde_json::from_str(&reply.body)
        .map_err(|e| SubmissionError::Decode(e.to_string()))?;

    if let Some(message) = response.service_error() {
        return Err(SubmissionError::Service(message.to_string()));
    }

    Ok(response)
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    endpoint: Url,
    config: AnalysisClientConfig,
}

impl HttpAnalysisClient {
    pub fn new(config: AnalysisClientConfig) -> Result<Self, TransportError> {
        let endpoint = config.endpoint()?;

        let mut builder = Client::builder();
        if let Some(seconds) = config.connect_timeout_seconds {
            builder = builder.connect_timeout(Duration::from_secs(seconds));
        }
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl AnalysisTransport for HttpAnalysisClient {
    async fn send(&self, payload: MultipartPayload) -> Result<TransportReply, TransportError> {
        let start = Instant::now();
        let field_count = payload.parts().len();
        let form = payload.into_form()?;

        let response = match self.client.post(self.endpoint.clone()).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                if self.config.enable_detailed_logging {
                    error!(
                        url = %self.endpoint,
                        error = %e,
                        duration_ms = start.elapsed().as_millis(),
                        "Analysis request failed with network error"
                    );
                }
                return Err(e.into());
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await?;

        if self.config.enable_detailed_logging {
            if (200..300).contains(&status) {
                info!(
                    url = %self.endpoint,
                    status,
                    fields = field_count,
                    body_bytes = body.len(),
                    duration_ms = start.elapsed().as_millis(),
                    "Analysis request completed"
                );
            } else {
                warn!(
                    url = %self.endpoint,
                    status,
                    duration_ms = start.elapsed().as_millis(),
                    "Analysis service returned error status"
                );
            }
        }

        Ok(TransportReply { status, body })
    }
}
