//! UI state, events, and the in-memory page the controller renders into.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::analysis::LogFile;

/// Where the submission state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UiState {
    Idle,
    /// Transient; only observable while a submit intent is being checked
    Validating,
    Loading,
    Success,
    ErrorState,
}

/// Input events, processed in order by the controller.
#[derive(Debug, Clone)]
pub enum UiEvent {
    PromptChanged(String),
    LogTextChanged(String),
    FilesSelected(Vec<LogFile>),
    DragEntered,
    DragLeft,
    FilesDropped(Vec<LogFile>),
    ExampleChosen(u8),
    SubmitIntent,
    CopyRequested,
    SaveRequested,
}

/// Named page regions. `id()` gives the DOM id the region is exported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Region {
    UploadForm,
    FileHelp,
    LogTextHelp,
    Loading,
    Results,
    AnalysisOutput,
    StatsSection,
    VisualizationSection,
    TotalLines,
    ErrorCount,
    WarningCount,
    CriticalCount,
}

impl Region {
    pub fn id(&self) -> &'static str {
        match self {
            Region::UploadForm => "upload-form",
            Region::FileHelp => "file-help",
            Region::LogTextHelp => "log-text-help",
            Region::Loading => "loading",
            Region::Results => "results",
            Region::AnalysisOutput => "analysis-output",
            Region::StatsSection => "stats-section",
            Region::VisualizationSection => "visualization-section",
            Region::TotalLines => "total-lines",
            Region::ErrorCount => "error-count",
            Region::WarningCount => "warning-count",
            Region::CriticalCount => "critical-count",
        }
    }

    const ALL: [Region; 12] = [
        Region::UploadForm,
        Region::FileHelp,
        Region::LogTextHelp,
        Region::Loading,
        Region::Results,
        Region::AnalysisOutput,
        Region::StatsSection,
        Region::VisualizationSection,
        Region::TotalLines,
        Region::ErrorCount,
        Region::WarningCount,
        Region::CriticalCount,
    ];

    /// Regions hidden until a submission reveals them.
    fn hidden_initially(&self) -> bool {
        matches!(
            self,
            Region::Loading | Region::Results | Region::StatsSection | Region::VisualizationSection
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionNode {
    pub visible: bool,
    /// Markup for container regions, plain text for count displays
    pub content: String,
}

/// The rendering surface: region visibility and content, plus the side
/// channels a browser would provide (scrolling, alerts, clipboard).
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    regions: BTreeMap<Region, RegionNode>,
    scrolls: Vec<Region>,
    notices: Vec<String>,
    error_message: Option<String>,
    clipboard: Option<String>,
    submit_enabled: bool,
    drop_highlighted: bool,
    log_text_rows: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        let regions = Region::ALL
            .iter()
            .map(|region| {
                let node = RegionNode {
                    visible: !region.hidden_initially(),
                    content: String::new(),
                };
                (*region, node)
            })
            .collect();

        Self {
            regions,
            scrolls: Vec::new(),
            notices: Vec::new(),
            error_message: None,
            clipboard: None,
            submit_enabled: true,
            drop_highlighted: false,
            log_text_rows: 1,
        }
    }

    pub fn show(&mut self, region: Region) {
        self.node_mut(region).visible = true;
    }

    pub fn hide(&mut self, region: Region) {
        self.node_mut(region).visible = false;
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.regions.get(&region).is_some_and(|n| n.visible)
    }

    pub fn set_content(&mut self, region: Region, content: impl Into<String>) {
        self.node_mut(region).content = content.into();
    }

    pub fn content(&self, region: Region) -> &str {
        self.regions
            .get(&region)
            .map(|n| n.content.as_str())
            .unwrap_or("")
    }

    pub fn scroll_into_view(&mut self, region: Region) {
        self.scrolls.push(region);
    }

    /// Most recent scroll target.
    pub fn last_scroll(&self) -> Option<Region> {
        self.scrolls.last().copied()
    }

    pub fn scroll_history(&self) -> &[Region] {
        &self.scrolls
    }

    /// Blocking message for the user (an `alert` in the browser).
    pub fn push_notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn set_error_message(&mut self, message: Option<String>) {
        self.error_message = message;
    }

    /// Message shown in the error panel of the last failed submission.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_clipboard(&mut self, text: String) {
        self.clipboard = Some(text);
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn set_drop_highlighted(&mut self, highlighted: bool) {
        self.drop_highlighted = highlighted;
    }

    pub fn drop_highlighted(&self) -> bool {
        self.drop_highlighted
    }

    pub fn set_log_text_rows(&mut self, rows: usize) {
        self.log_text_rows = rows;
    }

    pub fn log_text_rows(&self) -> usize {
        self.log_text_rows
    }

    fn node_mut(&mut self, region: Region) -> &mut RegionNode {
        self.regions.entry(region).or_default()
    }
}
