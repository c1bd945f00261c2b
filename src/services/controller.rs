//! The submission state machine.
//!
//! Input arrives as [`UiEvent`]s on a queue. [`SubmissionController::dispatch`]
//! enqueues, [`SubmissionController::run_until_idle`] drains the queue and
//! awaits outstanding work: in-flight requests (tasks on a `JoinSet`) and the
//! deferred chart render. Request futures are the only suspension point, so
//! events queued behind a submit are handled while it is in flight.
//!
//! ```text
//! Idle|Success|ErrorState --SubmitIntent--> Validating --invalid--> Idle
//!                                           Validating --valid----> Loading
//! Loading --2xx, no error--> Success
//! Loading --transport/status/decode/service error--> ErrorState
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::{
    AnalysisRequest, AnalysisResponse, ChartTarget, FormInputs, LogFile, Page, Region, Stats,
    UiEvent, UiState,
};
use crate::services::affordances::{
    auto_resize_rows, example_prompt, file_selection_summary, log_text_summary,
};
use crate::services::analysis_client::{AnalysisTransport, TransportReply, interpret_reply};
use crate::services::charts::{
    ChartBackend, ChartJsBackend, ChartSlots, distribution_spec, timeline_spec,
};
use crate::services::errors::{SubmissionError, TransportError};
use crate::services::formatter::ResultFormatter;
use crate::services::metrics::SubmissionMetrics;
use crate::services::request_builder::build_payload;
use crate::services::statistics::render_statistics;
use crate::utils::{escape_html, text_content};

pub const NO_RESULTS_TEXT: &str = "No results found.";
pub const COPIED_NOTICE: &str = "Copied!";
pub const SAVED_NOTICE: &str = "Analysis saved to your history!";

const MIN_LOG_TEXT_ROWS: usize = 4;

/// Controller behaviour knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Delay between revealing the visualization section and drawing charts
    pub chart_render_delay_ms: u64,

    /// Ignore submits while a request is in flight and disable the submit
    /// control during loading. Off by default: concurrent submits race.
    pub serialize_submissions: bool,

    /// Record prometheus metrics
    pub metrics_enabled: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            chart_render_delay_ms: 100,
            serialize_submissions: false,
            metrics_enabled: true,
        }
    }
}

/// Result of one in-flight request.
struct Completion {
    submission_id: Uuid,
    started: Instant,
    outcome: Result<TransportReply, TransportError>,
}

struct PendingCharts {
    due: Instant,
    stats: Stats,
}

/// Owns the page, the form inputs, the chart handles, and every submission.
pub struct SubmissionController<T, B = ChartJsBackend>
where
    T: AnalysisTransport + Send + Sync + 'static,
    B: ChartBackend,
{
    transport: Arc<T>,
    charts: B,
    slots: ChartSlots,
    config: ControllerConfig,
    formatter: ResultFormatter,
    metrics: Option<SubmissionMetrics>,
    rng: StdRng,
    state: UiState,
    inputs: FormInputs,
    page: Page,
    queue: VecDeque<UiEvent>,
    in_flight: JoinSet<Completion>,
    pending_charts: Option<PendingCharts>,
    dispatched: u64,
}

impl<T> SubmissionController<T, ChartJsBackend>
where
    T: AnalysisTransport + Send + Sync + 'static,
{
    pub fn new(transport: T, config: ControllerConfig) -> Self {
        Self::with_backend(transport, ChartJsBackend::new(), config)
    }
}

impl<T, B> SubmissionController<T, B>
where
    T: AnalysisTransport + Send + Sync + 'static,
    B: ChartBackend,
{
    pub fn with_backend(transport: T, charts: B, config: ControllerConfig) -> Self {
        let metrics = if config.metrics_enabled {
            SubmissionMetrics::new()
                .map_err(|e| warn!(error = %e, "Failed to create submission metrics"))
                .ok()
        } else {
            None
        };

        let mut page = Page::new();
        page.set_content(Region::LogTextHelp, log_text_summary(""));
        page.set_log_text_rows(MIN_LOG_TEXT_ROWS);

        Self {
            transport: Arc::new(transport),
            charts,
            slots: ChartSlots::new(),
            config,
            formatter: ResultFormatter::new(),
            metrics,
            rng: StdRng::from_os_rng(),
            state: UiState::Idle,
            inputs: FormInputs::default(),
            page,
            queue: VecDeque::new(),
            in_flight: JoinSet::new(),
            pending_charts: None,
            dispatched: 0,
        }
    }

    /// Replace the random source behind the timeline fill.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn charts(&self) -> &B {
        &self.charts
    }

    pub fn chart_slots(&self) -> &ChartSlots {
        &self.slots
    }

    pub fn metrics(&self) -> Option<&SubmissionMetrics> {
        self.metrics.as_ref()
    }

    /// Requests handed to the transport so far.
    pub fn dispatched_requests(&self) -> u64 {
        self.dispatched
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        self.queue.push_back(event);
    }

    /// Process queued events and wait for every in-flight request. Deferred
    /// chart renders stay pending.
    pub async fn settle_requests(&mut self) {
        loop {
            while let Some(event) = self.queue.pop_front() {
                self.handle_event(event);
            }

            let Some(joined) = self.in_flight.join_next().await else {
                break;
            };
            match joined {
                Ok(completion) => self.complete(completion),
                Err(e) => {
                    error!(error = %e, "Analysis request task failed");
                    self.finish_loading();
                    self.fail(SubmissionError::Transport(TransportError::Network(
                        e.to_string(),
                    )));
                }
            }
        }
    }

    /// Process queued events and wait for everything they started,
    /// including the deferred chart render.
    pub async fn run_until_idle(&mut self) {
        loop {
            self.settle_requests().await;

            let Some(pending) = self.pending_charts.take() else {
                break;
            };
            tokio::time::sleep_until(pending.due).await;
            self.render_charts(&pending.stats);
        }
    }

    /// Whether a chart render is scheduled but has not fired yet.
    pub fn chart_render_pending(&self) -> bool {
        self.pending_charts.is_some()
    }

    /// Release every chart the controller owns.
    pub fn release_charts(&mut self) {
        self.slots.release_all(&mut self.charts);
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::PromptChanged(prompt) => self.inputs.prompt = prompt,
            UiEvent::LogTextChanged(text) => {
                self.page
                    .set_content(Region::LogTextHelp, log_text_summary(&text));
                self.page
                    .set_log_text_rows(auto_resize_rows(&text, MIN_LOG_TEXT_ROWS));
                self.inputs.log_text = text;
            }
            UiEvent::FilesSelected(files) => self.select_files(files),
            UiEvent::DragEntered => self.page.set_drop_highlighted(true),
            UiEvent::DragLeft => self.page.set_drop_highlighted(false),
            UiEvent::FilesDropped(files) => self.select_files(files),
            UiEvent::ExampleChosen(n) => {
                self.inputs.prompt = example_prompt(n).unwrap_or_default().to_string();
                self.page.scroll_into_view(Region::UploadForm);
            }
            UiEvent::SubmitIntent => self.begin_submission(),
            UiEvent::CopyRequested => {
                let text = text_content(self.page.content(Region::AnalysisOutput));
                self.page.set_clipboard(text.trim().to_string());
                self.page.push_notice(COPIED_NOTICE);
            }
            UiEvent::SaveRequested => {
                // History persistence lives server-side behind login.
                self.page.push_notice(SAVED_NOTICE);
            }
        }
    }

    fn select_files(&mut self, files: Vec<LogFile>) {
        self.page.set_drop_highlighted(false);
        if let Some(summary) = file_selection_summary(&files) {
            self.page.set_content(Region::FileHelp, summary);
        }
        self.inputs.log_files = files;
    }

    fn begin_submission(&mut self) {
        if self.config.serialize_submissions && self.state == UiState::Loading {
            warn!(
                in_flight = self.in_flight.len(),
                "Submission already in flight, ignoring submit"
            );
            return;
        }

        self.state = UiState::Validating;
        let request = match AnalysisRequest::from_inputs(&self.inputs) {
            Ok(request) => request,
            Err(e) => {
                warn!(reason = %e, "Submission rejected by validation");
                if let Some(metrics) = &self.metrics {
                    metrics.record_rejected(SubmissionError::from(e.clone()).kind());
                }
                self.page.push_notice(e.to_string());
                self.page.hide(Region::Loading);
                self.page.hide(Region::Results);
                self.state = UiState::Idle;
                return;
            }
        };

        self.state = UiState::Loading;
        self.page.show(Region::Loading);
        self.page.hide(Region::Results);
        self.page.hide(Region::StatsSection);
        self.page.hide(Region::VisualizationSection);
        self.page.scroll_into_view(Region::Loading);
        if self.config.serialize_submissions {
            self.page.set_submit_enabled(false);
        }

        let submission_id = Uuid::new_v4();
        info!(
            submission_id = %submission_id,
            prompt_chars = request.prompt.chars().count(),
            log_text_chars = request.log_text.chars().count(),
            files = request.log_files.len(),
            "Submitting analysis request"
        );

        let payload = build_payload(request);
        let transport = Arc::clone(&self.transport);
        let started = Instant::now();
        self.in_flight.spawn(async move {
            let outcome = transport.send(payload).await;
            Completion {
                submission_id,
                started,
                outcome,
            }
        });
        self.dispatched += 1;
    }

    fn complete(&mut self, completion: Completion) {
        let Completion {
            submission_id,
            started,
            outcome,
        } = completion;

        self.finish_loading();

        let result = interpret_reply(outcome);
        let outcome_label = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        if let Some(metrics) = &self.metrics {
            metrics.record_completed(outcome_label, started.elapsed());
        }
        debug!(
            submission_id = %submission_id,
            outcome = outcome_label,
            elapsed_ms = started.elapsed().as_millis(),
            "Analysis submission finished"
        );

        match result {
            Ok(response) => self.succeed(response),
            Err(e) => {
                error!(submission_id = %submission_id, error = ?e, "Error during analysis");
                self.fail(e);
            }
        }
    }

    /// Runs whatever the outcome; the loading indicator never outlives a request.
    fn finish_loading(&mut self) {
        self.page.hide(Region::Loading);
        if self.config.serialize_submissions {
            self.page.set_submit_enabled(true);
        }
    }

    fn succeed(&mut self, response: AnalysisResponse) {
        let text = response
            .result
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(NO_RESULTS_TEXT);
        self.page
            .set_content(Region::AnalysisOutput, self.formatter.render_panel(text));
        self.page.set_error_message(None);

        if let Some(stats) = response.stats {
            render_statistics(&mut self.page, &stats);
            self.pending_charts = Some(PendingCharts {
                due: Instant::now() + Duration::from_millis(self.config.chart_render_delay_ms),
                stats,
            });
        }

        self.page.show(Region::Results);
        self.page.scroll_into_view(Region::Results);
        self.state = UiState::Success;
    }

    fn fail(&mut self, err: SubmissionError) {
        let message = err.user_message();
        self.page
            .set_content(Region::AnalysisOutput, error_panel(&message));
        self.page.set_error_message(Some(message));
        self.page.show(Region::Results);
        self.page.scroll_into_view(Region::Results);
        self.state = UiState::ErrorState;
    }

    fn render_charts(&mut self, stats: &Stats) {
        if !self.page.is_visible(Region::VisualizationSection) {
            error!("Chart targets not on screen, skipping chart render");
            return;
        }

        let distribution = distribution_spec(stats);
        let timeline = timeline_spec(stats, &mut self.rng);
        self.slots
            .replace(&mut self.charts, ChartTarget::Distribution, distribution);
        self.slots
            .replace(&mut self.charts, ChartTarget::Timeline, timeline);

        if let Some(metrics) = &self.metrics {
            metrics.record_chart_render(ChartTarget::Distribution.as_label());
            metrics.record_chart_render(ChartTarget::Timeline.as_label());
        }
    }
}

fn error_panel(message: &str) -> String {
    format!(
        concat!(
            r#"<div class="alert alert-danger">"#,
            r#"<h5><i class="fas fa-exclamation-triangle me-2"></i>Analysis Error</h5>"#,
            "<p>{}</p>",
            r#"<small class="text-muted">Please check your log format and try again. "#,
            "If the problem persists, contact support.</small>",
            "</div>"
        ),
        escape_html(message)
    )
}
