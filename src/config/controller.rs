//! Environment loading for the submission controller.

use std::env;

use crate::services::controller::ControllerConfig;

impl ControllerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let chart_render_delay_ms = env::var("ASKSIRI_CHART_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.chart_render_delay_ms);

        let serialize_submissions = env::var("ASKSIRI_SERIALIZE_SUBMISSIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.serialize_submissions);

        let metrics_enabled = env::var("ASKSIRI_METRICS_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.metrics_enabled);

        Self {
            chart_render_delay_ms,
            serialize_submissions,
            metrics_enabled,
        }
    }
}
