//! Analysis text to markup, via an ordered table of textual rewrite rules.
//!
//! This is not a markdown parser. Each rule is a global regex substitution
//! over the whole text and the rules run strictly in table order; later rules
//! rely on the markup earlier rules produce (rules 6-8 only see `<li>` and
//! `<p>` because rules 3 and 5 emitted them). Nested or overlapping
//! constructs are best effort.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::utils::escape_html;

/// One substitution in the pipeline.
#[derive(Debug)]
pub struct RewriteRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl RewriteRule {
    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

// `R` makes `^`, `$` and `.` treat `\r\n` as a line break, and digits are
// ASCII only.
const RULE_TABLE: [(&str, &str, &str); 8] = [
    ("bold", r"(?R)\*\*(.*?)\*\*", "<strong>${1}</strong>"),
    (
        "numbered_heading",
        r"(?mR)^[0-9]+\.\s+(.+)",
        r#"<h6 class="text-aqua mt-3 mb-2">${1}</h6>"#,
    ),
    ("bullet", r"(?mR)^-\s+(.+)", "<li>${1}</li>"),
    ("paragraph_break", r"\n\n", "</p><p>"),
    ("paragraph_wrap", r"(?mR)^(.+)$", "<p>${1}</p>"),
    ("list_open", r"<p><li>", "<ul><li>"),
    ("list_close", r"</li></p>", "</li></ul>"),
    ("list_before_paragraph", r"(?R)(<ul><li>.*?</li>)<p>", "${1}</ul><p>"),
];

static RULES: LazyLock<Vec<RewriteRule>> = LazyLock::new(|| {
    RULE_TABLE
        .iter()
        .map(|&(name, pattern, replacement)| RewriteRule {
            name,
            pattern: Regex::new(pattern).expect("rewrite rule patterns are valid"),
            replacement,
        })
        .collect()
});

/// Formats analysis text returned by the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultFormatter;

impl ResultFormatter {
    pub fn new() -> Self {
        Self
    }

    /// The rules in the order they are applied.
    pub fn rules(&self) -> &'static [RewriteRule] {
        &RULES
    }

    /// Escape the text, then run every rule in order.
    pub fn format(&self, text: &str) -> String {
        let escaped = escape_html(text);
        self.rules().iter().fold(escaped, |acc, rule| {
            let next = rule.apply(&acc);
            trace!(rule = rule.name, changed = next != acc, "Applied rewrite rule");
            next
        })
    }

    #[cfg(test)]
    fn apply_rule(&self, name: &str, text: &str) -> Option<String> {
        self.rules()
            .iter()
            .find(|rule| rule.name == name)
            .map(|rule| rule.apply(text))
    }

    /// Formatted result wrapped in the analysis panel.
    pub fn render_panel(&self, text: &str) -> String {
        format!(
            concat!(
                r#"<div class="analysis-result">"#,
                r#"<h4 class="text-aqua mb-3"><i class="fas fa-robot me-2"></i>AI Analysis Results</h4>"#,
                r#"<div class="result-content">{}</div>"#,
                "</div>"
            ),
            self.format(text)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADING_OPEN: &str = r#"<h6 class="text-aqua mt-3 mb-2">"#;

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<_> = ResultFormatter::new().rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "bold",
                "numbered_heading",
                "bullet",
                "paragraph_break",
                "paragraph_wrap",
                "list_open",
                "list_close",
                "list_before_paragraph",
            ]
        );
    }

    #[test]
    fn test_bold_wraps_once() {
        let formatter = ResultFormatter::new();
        let once = formatter.apply_rule("bold", "**x**").unwrap();
        let twice = formatter.apply_rule("bold", &once).unwrap();
        assert_eq!(once, "<strong>x</strong>");
        assert_eq!(twice, once);

        let full = formatter.format("**x**");
        assert_eq!(full, "<p><strong>x</strong></p>");
        assert_eq!(full.matches("<strong>").count(), 1);
    }

    #[test]
    fn test_bold_is_global() {
        let out = ResultFormatter::new().format("**a** and **b**");
        assert_eq!(out, "<p><strong>a</strong> and <strong>b</strong></p>");
    }

    #[test]
    fn test_heading_and_bullet() {
        let out = ResultFormatter::new().format("1. Findings\n- disk full issue");
        assert_eq!(
            out,
            format!("<p>{HEADING_OPEN}Findings</h6></p>\n<ul><li>disk full issue</li></ul>")
        );
    }

    #[test]
    fn test_multi_digit_heading_drops_number() {
        let out = ResultFormatter::new().format("12.   Root cause");
        assert_eq!(out, format!("<p>{HEADING_OPEN}Root cause</h6></p>"));
    }

    #[test]
    fn test_blank_line_becomes_paragraph_boundary() {
        let out = ResultFormatter::new().format("first\n\nsecond");
        assert_eq!(out, "<p>first</p><p>second</p>");
    }

    #[test]
    fn test_each_bullet_line_is_its_own_list() {
        // Rules 6 and 7 work per wrapped line, so consecutive bullets each
        // open and close a list.
        let out = ResultFormatter::new().format("- a\n- b");
        assert_eq!(out, "<ul><li>a</li></ul>\n<ul><li>b</li></ul>");
    }

    #[test]
    fn test_list_closed_before_following_paragraph() {
        let formatter = ResultFormatter::new();
        let out = formatter
            .apply_rule("list_before_paragraph", "<ul><li>a</li><p>next</p>")
            .unwrap();
        assert_eq!(out, "<ul><li>a</li></ul><p>next</p>");
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        let out = ResultFormatter::new().format("<script>alert(1)</script>");
        assert!(out.starts_with("<p>&lt;script&gt;alert(1)&lt;"));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let out = ResultFormatter::new().format("1. Findings\r\n- item");
        assert!(out.contains(&format!("{HEADING_OPEN}Findings</h6>")));
        assert!(out.contains("<ul><li>item</li></ul>"));
        assert!(!out.contains("\r</h6>"));
        assert!(!out.contains("\r</li>"));
    }

    #[test]
    fn test_only_ascii_digits_start_a_heading() {
        let out = ResultFormatter::new().format("\u{661}. Arabic digit");
        assert!(!out.contains("<h6"));
        assert_eq!(out, "<p>\u{661}. Arabic digit</p>");
    }

    #[test]
    fn test_render_panel_wraps_result() {
        let panel = ResultFormatter::new().render_panel("ok");
        assert!(panel.starts_with(r#"<div class="analysis-result">"#));
        assert!(panel.contains("AI Analysis Results"));
        assert!(panel.contains(r#"<div class="result-content"><p>ok</p></div>"#));
    }
}
