use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use asksiri::services::request_builder::{
    FIELD_LOG_FILES, FIELD_LOG_TEXT, FIELD_PROMPT, FormPart, MultipartPayload,
};
use asksiri::{
    AnalysisTransport, ChartTarget, ControllerConfig, LogFile, Region, SubmissionController,
    TransportError, TransportReply, UiEvent, UiState, ValidationError,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Transport that plays back scripted outcomes and records every payload.
struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<TransportReply, TransportError>>>,
    sent: Arc<Mutex<Vec<MultipartPayload>>>,
}

impl ScriptedTransport {
    fn replying(replies: Vec<Result<TransportReply, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared view of the payloads this transport receives.
    fn recorder(&self) -> Arc<Mutex<Vec<MultipartPayload>>> {
        Arc::clone(&self.sent)
    }

    fn ok(body: &str) -> Result<TransportReply, TransportError> {
        Ok(TransportReply::new(200, body))
    }
}

impl AnalysisTransport for ScriptedTransport {
    async fn send(&self, payload: MultipartPayload) -> Result<TransportReply, TransportError> {
        self.sent.lock().unwrap().push(payload);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".to_string())))
    }
}

fn test_config() -> ControllerConfig {
    ControllerConfig {
        chart_render_delay_ms: 0,
        ..ControllerConfig::default()
    }
}

fn controller_with(
    replies: Vec<Result<TransportReply, TransportError>>,
    config: ControllerConfig,
) -> SubmissionController<ScriptedTransport> {
    SubmissionController::new(ScriptedTransport::replying(replies), config)
        .with_rng(StdRng::seed_from_u64(17))
}

fn fill_form(controller: &mut SubmissionController<ScriptedTransport>, prompt: &str, text: &str) {
    controller.dispatch(UiEvent::PromptChanged(prompt.to_string()));
    controller.dispatch(UiEvent::LogTextChanged(text.to_string()));
}

const FINDINGS_BODY: &str = r#"{
    "result": "1. Findings\n- disk full issue",
    "stats": { "total_lines": 1, "error_count": 1 }
}"#;

#[tokio::test]
async fn test_empty_prompt_is_rejected_without_network_call() {
    let mut c = controller_with(vec![], test_config());
    fill_form(&mut c, "   ", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::Idle);
    assert_eq!(c.dispatched_requests(), 0);
    assert_eq!(
        c.page().notices(),
        &[ValidationError::EmptyPrompt.to_string()]
    );
    assert!(!c.page().is_visible(Region::Loading));
    assert!(!c.page().is_visible(Region::Results));
}

#[tokio::test]
async fn test_missing_logs_are_reported_before_missing_prompt() {
    let mut c = controller_with(vec![], test_config());
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::Idle);
    assert_eq!(c.dispatched_requests(), 0);
    assert_eq!(
        c.page().notices(),
        &["Please upload log files or paste log content.".to_string()]
    );
    assert_eq!(c.metrics().unwrap().submissions("validation_error"), 1);
}

#[tokio::test]
async fn test_successful_analysis_renders_everything() {
    let mut c = controller_with(vec![ScriptedTransport::ok(FINDINGS_BODY)], test_config());
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::Success);
    let page = c.page();
    let output = page.content(Region::AnalysisOutput);
    assert!(output.contains(r#"<h6 class="text-aqua mt-3 mb-2">Findings</h6>"#));
    assert!(output.contains("<ul><li>disk full issue</li></ul>"));
    assert!(output.contains("AI Analysis Results"));

    assert_eq!(page.content(Region::TotalLines), "1");
    assert_eq!(page.content(Region::ErrorCount), "1");
    assert_eq!(page.content(Region::WarningCount), "0");
    assert_eq!(page.content(Region::CriticalCount), "0");

    assert!(!page.is_visible(Region::Loading));
    assert!(page.is_visible(Region::Results));
    assert!(page.is_visible(Region::StatsSection));
    assert!(page.is_visible(Region::VisualizationSection));
    assert_eq!(
        page.scroll_history(),
        &[Region::Loading, Region::Results]
    );

    let distribution = c.charts().spec_for(ChartTarget::Distribution).unwrap();
    assert_eq!(distribution.dataset.values, vec![1, 0, 0, 0]);
    let timeline = c.charts().spec_for(ChartTarget::Timeline).unwrap();
    assert_eq!(timeline.dataset.labels, vec!["T1", "T2", "T3", "T4", "T5", "T6"]);
    assert_eq!(c.charts().live_count(), 2);
    assert_eq!(c.metrics().unwrap().submissions("success"), 1);
}

#[tokio::test]
async fn test_request_carries_form_fields_in_order() {
    let transport = ScriptedTransport::replying(vec![ScriptedTransport::ok("{}")]);
    let sent = transport.recorder();
    let mut c = SubmissionController::new(transport, test_config());
    fill_form(&mut c, "what broke?", "line one\n");
    c.dispatch(UiEvent::FilesSelected(vec![
        LogFile::new("a.log", b"A".to_vec()),
        LogFile::new("b.log", b"B".to_vec()).with_content_type("text/plain"),
    ]));
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.dispatched_requests(), 1);
    assert_eq!(c.page().content(Region::FileHelp), "2 files selected: a.log, b.log");
    assert_eq!(c.state(), UiState::Success);

    let sent = sent.lock().unwrap();
    let payload = &sent[0];
    assert_eq!(
        payload.field_names(),
        vec![FIELD_PROMPT, FIELD_LOG_TEXT, FIELD_LOG_FILES, FIELD_LOG_FILES]
    );
    assert_eq!(
        payload.parts()[1],
        FormPart::Text {
            name: FIELD_LOG_TEXT,
            value: "line one\n".to_string(),
        }
    );
    match &payload.parts()[3] {
        FormPart::File {
            file_name,
            content_type,
            bytes,
            ..
        } => {
            assert_eq!(file_name, "b.log");
            assert_eq!(content_type, "text/plain");
            assert_eq!(bytes, b"B");
        }
        other => panic!("expected a file part, got {other:?}"),
    }
}

#[tokio::test]
async fn test_payload_omits_empty_log_text() {
    let transport = ScriptedTransport::replying(vec![ScriptedTransport::ok("{}")]);
    let sent = transport.recorder();
    let mut c = SubmissionController::new(transport, test_config());
    c.dispatch(UiEvent::PromptChanged("summarize".to_string()));
    c.dispatch(UiEvent::DragEntered);
    c.dispatch(UiEvent::FilesDropped(vec![LogFile::new("app.log", b"x".to_vec())]));
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::Success);
    assert!(!c.page().drop_highlighted());
    assert_eq!(
        sent.lock().unwrap()[0].field_names(),
        vec![FIELD_PROMPT, FIELD_LOG_FILES]
    );
}

#[tokio::test]
async fn test_service_error_in_ok_body() {
    let mut c = controller_with(
        vec![ScriptedTransport::ok(r#"{"error":"invalid log format"}"#)],
        test_config(),
    );
    fill_form(&mut c, "find errors", "garbage");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::ErrorState);
    assert_eq!(c.page().error_message(), Some("invalid log format"));
    let panel = c.page().content(Region::AnalysisOutput);
    assert!(panel.contains("Analysis Error"));
    assert!(panel.contains("<p>invalid log format</p>"));
    assert!(!c.page().is_visible(Region::Loading));
    assert!(c.page().is_visible(Region::Results));
    assert_eq!(c.metrics().unwrap().submissions("service_error"), 1);
}

#[tokio::test]
async fn test_connectivity_failure() {
    let mut c = controller_with(
        vec![Err(TransportError::Network("connection refused".to_string()))],
        test_config(),
    );
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::ErrorState);
    let message = c.page().error_message().unwrap();
    assert!(message.contains("connection refused"), "{message}");
    assert!(!c.page().is_visible(Region::Loading));
    assert_eq!(c.metrics().unwrap().submissions("transport_error"), 1);
}

#[tokio::test]
async fn test_http_status_without_detail() {
    let mut c = controller_with(
        vec![Ok(TransportReply::new(500, "Internal Server Error"))],
        test_config(),
    );
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::ErrorState);
    assert_eq!(c.page().error_message(), Some("HTTP error! Status: 500"));
}

#[tokio::test]
async fn test_error_message_is_escaped() {
    let mut c = controller_with(
        vec![ScriptedTransport::ok(r#"{"error":"<script>alert(1)</script>"}"#)],
        test_config(),
    );
    fill_form(&mut c, "find errors", "x");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    let panel = c.page().content(Region::AnalysisOutput);
    assert!(!panel.contains("<script>"));
    assert!(panel.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_repeated_renders_do_not_leak_charts() {
    let replies = (0..5).map(|_| ScriptedTransport::ok(FINDINGS_BODY)).collect();
    let mut c = controller_with(replies, test_config());
    fill_form(&mut c, "find errors", "ERROR: disk full");

    for _ in 0..5 {
        c.dispatch(UiEvent::SubmitIntent);
        c.run_until_idle().await;
        assert_eq!(c.charts().live_count(), 2);
    }

    assert_eq!(c.charts().destroyed_count(), 8);
    c.release_charts();
    assert_eq!(c.charts().live_count(), 0);
}

#[tokio::test]
async fn test_response_without_stats_leaves_stats_hidden() {
    let mut c = controller_with(
        vec![
            ScriptedTransport::ok(FINDINGS_BODY),
            ScriptedTransport::ok(r#"{"result":"fine","stats":"n/a"}"#),
        ],
        test_config(),
    );
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;
    assert!(c.page().is_visible(Region::StatsSection));

    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;
    assert_eq!(c.state(), UiState::Success);
    assert!(!c.page().is_visible(Region::StatsSection));
    assert!(!c.page().is_visible(Region::VisualizationSection));
}

#[tokio::test]
async fn test_validation_failure_after_success_hides_results() {
    let mut c = controller_with(vec![ScriptedTransport::ok(FINDINGS_BODY)], test_config());
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;
    assert_eq!(c.state(), UiState::Success);

    c.dispatch(UiEvent::PromptChanged(String::new()));
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::Idle);
    assert!(!c.page().is_visible(Region::Results));
    assert!(!c.page().is_visible(Region::Loading));
    assert_eq!(c.dispatched_requests(), 1);
}

#[tokio::test]
async fn test_concurrent_submissions_are_permitted_by_default() {
    let replies = vec![
        ScriptedTransport::ok(r#"{"result":"first"}"#),
        ScriptedTransport::ok(r#"{"result":"second"}"#),
    ];
    let mut c = controller_with(replies, test_config());
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.dispatched_requests(), 2);
    assert_eq!(c.in_flight(), 0);
    assert_eq!(c.state(), UiState::Success);
    assert!(c.page().submit_enabled());
}

#[tokio::test]
async fn test_serialized_submissions_ignore_second_submit() {
    let config = ControllerConfig {
        serialize_submissions: true,
        ..test_config()
    };
    let mut c = controller_with(vec![ScriptedTransport::ok(r#"{"result":"only"}"#)], config);
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.dispatched_requests(), 1);
    assert_eq!(c.state(), UiState::Success);
    assert!(c.page().submit_enabled());
    assert!(c.page().content(Region::AnalysisOutput).contains("only"));
}

#[tokio::test]
async fn test_metrics_can_be_disabled() {
    let config = ControllerConfig {
        metrics_enabled: false,
        ..test_config()
    };
    let mut c = controller_with(vec![ScriptedTransport::ok("{}")], config);
    fill_form(&mut c, "find errors", "x");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert!(c.metrics().is_none());
    assert_eq!(c.state(), UiState::Success);
}

#[tokio::test]
async fn test_chart_render_waits_for_delay() {
    let config = ControllerConfig {
        chart_render_delay_ms: 30,
        ..test_config()
    };
    let mut c = controller_with(vec![ScriptedTransport::ok(FINDINGS_BODY)], config);
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);

    let started = std::time::Instant::now();
    c.run_until_idle().await;
    assert!(started.elapsed() >= std::time::Duration::from_millis(30));
    assert_eq!(c.charts().live_count(), 2);
}

#[tokio::test]
async fn test_chart_render_skipped_when_section_hidden_again() {
    let replies = vec![
        ScriptedTransport::ok(FINDINGS_BODY),
        ScriptedTransport::ok(FINDINGS_BODY),
        Err(TransportError::Network("connection reset".to_string())),
    ];
    let mut c = controller_with(replies, test_config());
    fill_form(&mut c, "find errors", "ERROR: disk full");
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;
    assert_eq!(c.charts().live_count(), 2);
    let first_distribution = c.chart_slots().handle(ChartTarget::Distribution).unwrap().id();

    // Second response arrives and schedules a render that has not fired yet.
    c.dispatch(UiEvent::SubmitIntent);
    c.settle_requests().await;
    assert!(c.chart_render_pending());
    assert!(c.page().is_visible(Region::VisualizationSection));

    // A third submit hides the section before the deferred render fires.
    c.dispatch(UiEvent::SubmitIntent);
    c.run_until_idle().await;

    assert_eq!(c.state(), UiState::ErrorState);
    assert!(!c.chart_render_pending());
    assert!(!c.page().is_visible(Region::VisualizationSection));
    assert_eq!(c.charts().live_count(), 2);
    assert_eq!(c.charts().destroyed_count(), 0);
    assert_eq!(
        c.chart_slots().handle(ChartTarget::Distribution).unwrap().id(),
        first_distribution
    );
}
