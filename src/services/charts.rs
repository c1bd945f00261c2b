//! Chart data derivation and chart lifecycle.
//!
//! The distribution chart is a direct projection of the stats. The timeline
//! chart is synthetic: six segments of roughly `total_lines / 6` with random
//! spread, redrawn differently on every render. It visualizes volume, it does
//! not measure anything.

use std::collections::BTreeMap;

use rand::Rng;
use serde_json::Value;
use tracing::debug;

use crate::models::{ChartDataset, ChartKind, ChartSpec, ChartTarget, Stats};

pub const DISTRIBUTION_LABELS: [&str; 4] = ["Errors", "Warnings", "Critical", "Info"];
pub const TIMELINE_SEGMENTS: usize = 6;

const DISTRIBUTION_COLORS: [&str; 4] = ["#ff3366", "#ff9500", "#e74c3c", "#00d4ff"];

/// One value per severity category, in fixed order.
pub fn distribution_dataset(stats: &Stats) -> ChartDataset {
    ChartDataset {
        labels: DISTRIBUTION_LABELS.iter().map(|l| l.to_string()).collect(),
        values: vec![
            stats.error_count,
            stats.warning_count,
            stats.critical_count,
            stats.info_count,
        ],
    }
}

/// Six segments `T1..T6`, each `base ± floor(u * base * 0.5)` with a coin
/// flip for the sign, never below zero.
pub fn timeline_dataset<R: Rng>(stats: &Stats, rng: &mut R) -> ChartDataset {
    let base = stats.total_lines / TIMELINE_SEGMENTS as u64;
    let spread = base as f64 * 0.5;

    let mut labels = Vec::with_capacity(TIMELINE_SEGMENTS);
    let mut values = Vec::with_capacity(TIMELINE_SEGMENTS);
    for segment in 1..=TIMELINE_SEGMENTS {
        labels.push(format!("T{segment}"));
        let variation = (rng.random::<f64>() * spread).floor() as u64;
        let value = if rng.random_bool(0.5) {
            base + variation
        } else {
            base.saturating_sub(variation)
        };
        values.push(value);
    }

    ChartDataset { labels, values }
}

pub fn distribution_spec(stats: &Stats) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        dataset: distribution_dataset(stats),
        series_label: None,
        background_colors: DISTRIBUTION_COLORS.iter().map(|c| c.to_string()).collect(),
        border_color: "#1a1a1a".to_string(),
        border_width: 2,
        animated: false,
    }
}

pub fn timeline_spec<R: Rng>(stats: &Stats, rng: &mut R) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        dataset: timeline_dataset(stats, rng),
        series_label: Some("Log Events".to_string()),
        background_colors: vec!["rgba(0, 212, 255, 0.3)".to_string()],
        border_color: "#00d4ff".to_string(),
        border_width: 1,
        animated: false,
    }
}

/// Ownership token for a live chart. Not `Clone`: exactly one owner may
/// release it.
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    id: u64,
    target: ChartTarget,
}

impl ChartHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target(&self) -> ChartTarget {
        self.target
    }
}

/// The external charting capability.
pub trait ChartBackend {
    /// Draw a chart on `target` and hand back its handle.
    fn create(&mut self, target: ChartTarget, spec: ChartSpec) -> ChartHandle;

    /// Release a chart and everything it holds.
    fn destroy(&mut self, handle: ChartHandle);
}

/// Backend that keeps live charts as Chart.js configurations, ready to be
/// embedded in an exported page.
#[derive(Debug, Default)]
pub struct ChartJsBackend {
    next_id: u64,
    live: BTreeMap<u64, (ChartTarget, ChartSpec)>,
    destroyed: u64,
}

impl ChartJsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }

    /// Spec of the live chart bound to `target`, if any.
    pub fn spec_for(&self, target: ChartTarget) -> Option<&ChartSpec> {
        self.live
            .values()
            .find(|(t, _)| *t == target)
            .map(|(_, spec)| spec)
    }

    /// Chart.js configs of every live chart keyed by target.
    pub fn configs(&self) -> BTreeMap<ChartTarget, Value> {
        self.live
            .values()
            .map(|(target, spec)| (*target, spec.to_chartjs_config()))
            .collect()
    }
}

impl ChartBackend for ChartJsBackend {
    fn create(&mut self, target: ChartTarget, spec: ChartSpec) -> ChartHandle {
        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(id, (target, spec));
        debug!(chart_id = id, target = target.as_label(), "Chart created");
        ChartHandle { id, target }
    }

    fn destroy(&mut self, handle: ChartHandle) {
        if self.live.remove(&handle.id).is_some() {
            self.destroyed += 1;
            debug!(chart_id = handle.id, target = handle.target.as_label(), "Chart destroyed");
        }
    }
}

/// The controller's chart handles, one slot per target.
#[derive(Debug, Default)]
pub struct ChartSlots {
    slots: BTreeMap<ChartTarget, ChartHandle>,
}

impl ChartSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy whatever is bound to `target`, then create the new chart.
    pub fn replace<B: ChartBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        target: ChartTarget,
        spec: ChartSpec,
    ) {
        if let Some(previous) = self.slots.remove(&target) {
            backend.destroy(previous);
        }
        let handle = backend.create(target, spec);
        self.slots.insert(target, handle);
    }

    pub fn handle(&self, target: ChartTarget) -> Option<&ChartHandle> {
        self.slots.get(&target)
    }

    /// Destroy every chart this slot set owns.
    pub fn release_all<B: ChartBackend + ?Sized>(&mut self, backend: &mut B) {
        for (_, handle) in std::mem::take(&mut self.slots) {
            backend.destroy(handle);
        }
    }
}
