//! Standalone HTML export of the page model.

use std::collections::BTreeMap;

use askama::Template;
use serde_json::Value;

use crate::models::{ChartTarget, Page, Region};

/// One region as the template sees it. Text regions are escaped by the
/// template; the analysis output is already markup.
struct RegionView<'a> {
    id: &'static str,
    hidden: bool,
    content: &'a str,
}

impl<'a> RegionView<'a> {
    fn of(page: &'a Page, region: Region) -> Self {
        Self {
            id: region.id(),
            hidden: !page.is_visible(region),
            content: page.content(region),
        }
    }
}

struct StatView<'a> {
    label: &'static str,
    region: RegionView<'a>,
}

struct ChartView {
    canvas_id: &'static str,
    config: String,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    upload_form: RegionView<'a>,
    file_help: RegionView<'a>,
    log_text_help: RegionView<'a>,
    loading: RegionView<'a>,
    results: RegionView<'a>,
    analysis_output: RegionView<'a>,
    stats_section: RegionView<'a>,
    stats: Vec<StatView<'a>>,
    visualization: RegionView<'a>,
    canvas_ids: [&'static str; 2],
    charts: Vec<ChartView>,
}

const STAT_LABELS: [(Region, &str); 4] = [
    (Region::TotalLines, "Total Lines"),
    (Region::ErrorCount, "Errors"),
    (Region::WarningCount, "Warnings"),
    (Region::CriticalCount, "Critical"),
];

/// Render the page and the live chart configurations as one HTML document.
pub fn render_page_html(
    page: &Page,
    charts: &BTreeMap<ChartTarget, Value>,
) -> Result<String, askama::Error> {
    let template = PageTemplate {
        upload_form: RegionView::of(page, Region::UploadForm),
        file_help: RegionView::of(page, Region::FileHelp),
        log_text_help: RegionView::of(page, Region::LogTextHelp),
        loading: RegionView::of(page, Region::Loading),
        results: RegionView::of(page, Region::Results),
        analysis_output: RegionView::of(page, Region::AnalysisOutput),
        stats_section: RegionView::of(page, Region::StatsSection),
        stats: STAT_LABELS
            .iter()
            .map(|&(region, label)| StatView {
                label,
                region: RegionView::of(page, region),
            })
            .collect(),
        visualization: RegionView::of(page, Region::VisualizationSection),
        canvas_ids: [
            ChartTarget::Distribution.canvas_id(),
            ChartTarget::Timeline.canvas_id(),
        ],
        charts: charts
            .iter()
            .map(|(target, config)| ChartView {
                canvas_id: target.canvas_id(),
                // `<` only occurs inside JSON strings, where the escape is equivalent
                config: config.to_string().replace('<', "\\u003c"),
            })
            .collect(),
    };

    template.render()
}
