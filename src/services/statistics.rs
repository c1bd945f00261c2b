//! Projects stats onto the count displays.

use crate::models::{Page, Region, Stats};

/// Regions that display a count.
pub const COUNT_DISPLAYS: [Region; 4] = [
    Region::TotalLines,
    Region::ErrorCount,
    Region::WarningCount,
    Region::CriticalCount,
];

/// The stats field shown by a count display.
fn displayed_count(region: Region, stats: &Stats) -> Option<u64> {
    match region {
        Region::TotalLines => Some(stats.total_lines),
        Region::ErrorCount => Some(stats.error_count),
        Region::WarningCount => Some(stats.warning_count),
        Region::CriticalCount => Some(stats.critical_count),
        _ => None,
    }
}

/// Write the four counts and reveal the stats and visualization sections.
///
/// Chart drawing is not done here: the caller schedules it once the
/// visualization section is on screen.
pub fn render_statistics(page: &mut Page, stats: &Stats) {
    for region in COUNT_DISPLAYS {
        if let Some(count) = displayed_count(region, stats) {
            page.set_content(region, count.to_string());
        }
    }
    page.show(Region::StatsSection);
    page.show(Region::VisualizationSection);
}
