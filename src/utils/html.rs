//! Small HTML text helpers.

use std::sync::LazyLock;

use askama_escape::{Html, escape};
use regex::{Captures, Regex};

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]+)|#([0-9]+)|(amp|lt|gt|quot|apos));")
        .expect("entity pattern is valid")
});

/// Escape text for inclusion in element content or attribute values.
pub fn escape_html(text: &str) -> String {
    escape(text, Html).to_string()
}

/// Text content of a markup fragment, the way `textContent` reads it.
pub fn text_content(markup: &str) -> String {
    let stripped = TAG.replace_all(markup, "");
    ENTITY
        .replace_all(&stripped, |caps: &Captures| decode_entity(caps))
        .into_owned()
}

fn decode_entity(caps: &Captures) -> String {
    let code = if let Some(hex) = caps.get(1) {
        u32::from_str_radix(hex.as_str(), 16).ok()
    } else if let Some(dec) = caps.get(2) {
        dec.as_str().parse().ok()
    } else {
        match caps.get(3).map(|m| m.as_str()) {
            Some("amp") => Some('&' as u32),
            Some("lt") => Some('<' as u32),
            Some("gt") => Some('>' as u32),
            Some("quot") => Some('"' as u32),
            Some("apos") => Some('\'' as u32),
            _ => None,
        }
    };

    code.and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_else(|| caps[0].to_string())
}
