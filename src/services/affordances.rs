//! Input helpers around the upload form: help texts, textarea sizing,
//! example prompts.

use crate::models::LogFile;

pub const LOG_TEXT_PLACEHOLDER_HELP: &str = "Paste log content directly for quick analysis";

const EXAMPLE_PROMPTS: [&str; 3] = [
    "What database connection problems occurred and how can I fix them?",
    "Analyze security threats, failed logins, and suspicious activities.",
    "Find performance bottlenecks, slow queries, and resource issues.",
];

/// Help text after a file selection, e.g. `2 files selected: a.log, b.log`.
/// `None` leaves the existing help text alone.
pub fn file_selection_summary(files: &[LogFile]) -> Option<String> {
    if files.is_empty() {
        return None;
    }
    let noun = if files.len() == 1 { "file" } else { "files" };
    let names = files
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("{} {} selected: {}", files.len(), noun, names))
}

/// Character and line counter shown under the log textarea.
pub fn log_text_summary(text: &str) -> String {
    if text.is_empty() {
        return LOG_TEXT_PLACEHOLDER_HELP.to_string();
    }
    format!(
        "Characters: {}, Lines: {}",
        text.chars().count(),
        line_count(text)
    )
}

/// Rows the textarea grows to so that all content is visible.
pub fn auto_resize_rows(text: &str, min_rows: usize) -> usize {
    line_count(text).max(min_rows)
}

/// Example prompt `n` (1-based).
pub fn example_prompt(n: u8) -> Option<&'static str> {
    (n as usize)
        .checked_sub(1)
        .and_then(|i| EXAMPLE_PROMPTS.get(i))
        .copied()
}

/// Lines as a textarea counts them: a trailing newline starts a new line.
fn line_count(text: &str) -> usize {
    text.split('\n').count()
}
