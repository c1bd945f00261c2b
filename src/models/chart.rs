//! Chart datasets and the specs handed to the charting backend.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Canvas a chart is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChartTarget {
    Distribution,
    Timeline,
}

impl ChartTarget {
    /// DOM id of the canvas element.
    pub fn canvas_id(&self) -> &'static str {
        match self {
            ChartTarget::Distribution => "logDistributionChart",
            ChartTarget::Timeline => "timelineChart",
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            ChartTarget::Distribution => "distribution",
            ChartTarget::Timeline => "timeline",
        }
    }
}

/// Labels and values for a single-series chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
}

/// Everything the backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub dataset: ChartDataset,
    /// Series label shown in the legend, if any
    pub series_label: Option<String>,
    pub background_colors: Vec<String>,
    pub border_color: String,
    pub border_width: u32,
    pub animated: bool,
}

impl ChartSpec {
    /// Chart.js configuration object for this chart.
    pub fn to_chartjs_config(&self) -> Value {
        let mut dataset = json!({
            "data": self.dataset.values,
            "backgroundColor": self.background_colors,
            "borderColor": self.border_color,
            "borderWidth": self.border_width,
        });
        if let Some(label) = &self.series_label {
            dataset["label"] = json!(label);
        }

        let mut options = json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "animation": self.animated,
            "plugins": { "legend": { "labels": { "color": "#e0e0e0" } } },
        });
        match self.kind {
            ChartKind::Doughnut => {
                options["plugins"]["legend"]["position"] = json!("bottom");
                options["plugins"]["legend"]["labels"]["padding"] = json!(15);
                options["plugins"]["legend"]["labels"]["usePointStyle"] = json!(true);
            }
            ChartKind::Bar => {
                let axis = json!({
                    "ticks": { "color": "#e0e0e0" },
                    "grid": { "color": "rgba(255, 255, 255, 0.1)" },
                });
                let mut y = axis.clone();
                y["beginAtZero"] = json!(true);
                options["scales"] = json!({ "x": axis, "y": y });
            }
        }

        json!({
            "type": self.kind,
            "data": {
                "labels": self.dataset.labels,
                "datasets": [dataset],
            },
            "options": options,
        })
    }
}
