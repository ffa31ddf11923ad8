//! Identifier extraction from query lines.
//!
//! Two strategies coexist and are exposed independently:
//!
//! - the trailing-list strategy, used by the full structured parse:
//!   queries usually end in one or more slash-separated manufacturer
//!   codes (`"... RM1-1740-040CN/RM1-1740-000CN"`);
//! - the single-token strategy, used by simple lookups: the first run
//!   of six or more alphanumerics anywhere in the text.

use std::sync::LazyLock;

use regex::Regex;

use super::normalize::normalize_text;
use crate::types::ParsedQuery;

static TRAILING_IDENTIFIERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:[A-Za-z0-9-]+)(?:/[A-Za-z0-9-]+)*)\s*$").expect("valid regex")
});

static SINGLE_IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]{6,}").expect("valid regex"));

/// Trailing-list strategy.
///
/// Returns the identifier tokens in left-to-right order together with
/// the remaining text (the matched suffix removed, trimmed). A suffix
/// with no ASCII letter or digit is pure punctuation, not an
/// identifier list; the text comes back untouched.
pub fn extract_trailing_identifiers(text: &str) -> (Vec<String>, String) {
    let text = text.trim();
    if let Some(m) = TRAILING_IDENTIFIERS_RE.find(text) {
        let suffix = m.as_str();
        if suffix.chars().any(|c| c.is_ascii_alphanumeric()) {
            let identifiers: Vec<String> = suffix
                .trim()
                .split('/')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            let rest = text[..m.start()].trim().to_string();
            return (identifiers, rest);
        }
    }
    (Vec::new(), text.to_string())
}

/// Single-token strategy: first run of 6+ alphanumeric characters.
pub fn extract_single_identifier(text: &str) -> Option<String> {
    SINGLE_IDENTIFIER_RE
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// Full structured parse of one query line.
///
/// Strips the trailing identifier list, then splits the remainder into
/// a quantity/attribute word and a description, both normalized. Lines
/// that yield nothing parse to an empty [`ParsedQuery`]; the ranker
/// treats that as a normal no-match input, never a fault.
pub fn parse_query(line: &str) -> ParsedQuery {
    let (identifiers, rest) = extract_trailing_identifiers(line);

    let mut words = rest.splitn(2, char::is_whitespace);
    let quantity = words.next().unwrap_or("").trim();
    let description = words.next().unwrap_or("").trim();

    ParsedQuery {
        quantity: normalize_text(quantity),
        description: normalize_text(description),
        identifiers,
    }
}
