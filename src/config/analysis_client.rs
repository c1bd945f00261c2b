//! Environment loading for the analysis HTTP client.

use std::env;

use crate::services::analysis_client::AnalysisClientConfig;

impl AnalysisClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("ASKSIRI_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let analyze_path = env::var("ASKSIRI_ANALYZE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.analyze_path);

        // Unset or unparseable leaves the transport default in place
        let connect_timeout_seconds = env::var("ASKSIRI_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok());

        let request_timeout_seconds = env::var("ASKSIRI_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok());

        let enable_detailed_logging = env::var("ASKSIRI_DETAILED_LOGGING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.enable_detailed_logging);

        Self {
            base_url,
            analyze_path,
            connect_timeout_seconds,
            request_timeout_seconds,
            enable_detailed_logging,
        }
    }
}
