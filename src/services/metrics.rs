//! Prometheus metrics for submissions.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::Duration;

/// Submission outcome counters and latency.
#[derive(Clone)]
pub struct SubmissionMetrics {
    pub registry: Registry,
    pub submissions_total: CounterVec,
    pub submission_duration_seconds: HistogramVec,
    pub chart_renders_total: CounterVec,
}

impl SubmissionMetrics {
    /// Create a collector with its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let submissions_total = CounterVec::new(
            Opts::new(
                "asksiri_submissions_total",
                "Analysis submissions by outcome",
            ),
            &["outcome"],
        )?;

        let submission_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "asksiri_submission_duration_seconds",
                "Time from dispatch to response for analysis submissions",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
            &["outcome"],
        )?;

        let chart_renders_total = CounterVec::new(
            Opts::new("asksiri_chart_renders_total", "Charts drawn by target"),
            &["target"],
        )?;

        registry.register(Box::new(submissions_total.clone()))?;
        registry.register(Box::new(submission_duration_seconds.clone()))?;
        registry.register(Box::new(chart_renders_total.clone()))?;

        Ok(Self {
            registry,
            submissions_total,
            submission_duration_seconds,
            chart_renders_total,
        })
    }

    /// Count an outcome that never reached the network (validation).
    pub fn record_rejected(&self, outcome: &str) {
        self.submissions_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_completed(&self, outcome: &str, elapsed: Duration) {
        self.submissions_total.with_label_values(&[outcome]).inc();
        self.submission_duration_seconds
            .with_label_values(&[outcome])
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_chart_render(&self, target: &str) {
        self.chart_renders_total.with_label_values(&[target]).inc();
    }

    pub fn submissions(&self, outcome: &str) -> u64 {
        self.submissions_total.with_label_values(&[outcome]).get() as u64
    }

    /// Prometheus text exposition of everything in the registry.
    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&self.registry.gather())
    }
}
