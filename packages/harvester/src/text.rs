//! Text normalization utilities for transcript content.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::config::DEFAULT_TIME;

/// Runs of whitespace, including non-breaking spaces.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\u{00a0}]+").expect("valid regex"));

/// Square-bracket annotation such as `[Interruption.]`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("valid regex"));

/// Normalize paragraph text: NFC composition, collapsed whitespace, trimmed.
///
/// # Examples
/// ```
/// use hansard_harvester::text::normalize_text;
///
/// assert_eq!(normalize_text("  I beg\n   to move\u{a0}that "), "I beg to move that");
/// ```
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    WHITESPACE_RUN.replace_all(&composed, " ").trim().to_string()
}

/// Square-bracket delimited annotations, brackets stripped, in order.
///
/// # Examples
/// ```
/// use hansard_harvester::text::extract_bracketed;
///
/// assert_eq!(
///     extract_bracketed("Thank you. [Interruption.] As I said [Official Report, col. 4]"),
///     vec!["Interruption.", "Official Report, col. 4"]
/// );
/// ```
pub fn extract_bracketed(text: &str) -> Vec<String> {
    BRACKETED
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Truncate a transcript time to `HH:MM`.
///
/// Absent or unparseable times become [`DEFAULT_TIME`].
///
/// # Examples
/// ```
/// use hansard_harvester::text::normalize_time;
///
/// assert_eq!(normalize_time(Some("14:35:27")), "14:35");
/// assert_eq!(normalize_time(Some("9:05")), "09:05");
/// assert_eq!(normalize_time(None), "00:00");
/// ```
pub fn normalize_time(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_TIME.to_string();
    };

    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|_| {
            tracing::debug!(time = %raw, "Unparseable time, using default");
            DEFAULT_TIME.to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("a\n\n  b\tc"), "a b c");
    }

    #[test]
    fn test_normalize_text_composes_unicode() {
        // "e" followed by a combining acute accent
        assert_eq!(normalize_text("Ope\u{0301}ra"), "Op\u{00e9}ra");
    }

    #[test]
    fn test_extract_bracketed_ignores_empty() {
        assert!(extract_bracketed("nothing [ ] here").is_empty());
    }

    #[test]
    fn test_extract_bracketed_chair() {
        assert_eq!(
            extract_bracketed("[Sir Edward Leigh in the Chair]"),
            vec!["Sir Edward Leigh in the Chair"]
        );
    }

    #[test]
    fn test_normalize_time_garbage() {
        assert_eq!(normalize_time(Some("half past two")), DEFAULT_TIME);
        assert_eq!(normalize_time(Some("  ")), DEFAULT_TIME);
    }
}
