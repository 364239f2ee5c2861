//! Configuration constants and validation functions for the harvester.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{HarvesterError, Result};
use crate::types::Chamber;

/// Base URL for the scraped transcript XML repository.
pub const TRANSCRIPT_BASE_URL: &str = "https://www.theyworkforyou.com/pwdata/scrapedxml";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Time recorded for speeches and divisions that carry no usable time.
///
/// Chamber heuristics compare against this exact value, so it must stay
/// `"00:00"` rather than becoming an empty string or `None`.
pub const DEFAULT_TIME: &str = "00:00";

/// Item type used before any major heading has been seen.
pub const NO_TYPE: &str = "No Type";

/// Speaker name recorded for speeches without a `speakername` attribute.
pub const UNKNOWN_SPEAKER: &str = "Unknown Speaker";

/// Title given to the placeholder item that collects held speeches.
pub const HELD_ITEM_TITLE: &str = "Preliminary Proceedings";

/// Westminster Hall debate length when the transcript states none.
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 90;

/// Default upper bound on the number of nodes visited per document.
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Number of document suffixes (`a`, `b`, ...) probed when looking for the
/// latest revision of a day's transcript.
pub const MAX_SUFFIXES: u8 = 26;

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Validate date format (YYYY-MM-DD).
///
/// Rejects dates in the future since no transcript can exist for them yet.
///
/// # Examples
/// ```
/// use hansard_harvester::config::validate_date;
///
/// assert!(validate_date("2024-01-15").is_ok());
/// assert!(validate_date("invalid").is_err());
/// assert!(validate_date("2024-13-01").is_err()); // Invalid month
/// ```
pub fn validate_date(date_str: &str) -> Result<()> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(HarvesterError::InvalidDate(date_str.to_string()));
    }

    let parsed_date = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| HarvesterError::InvalidDate(date_str.to_string()))?;

    let today = chrono::Local::now().date_naive();
    if parsed_date > today {
        return Err(HarvesterError::InvalidDate(format!(
            "{date_str} is in the future (today is {today})"
        )));
    }

    Ok(())
}

/// Validate a document suffix: a single lowercase ASCII letter.
///
/// # Examples
/// ```
/// use hansard_harvester::config::validate_suffix;
///
/// assert!(validate_suffix("a").is_ok());
/// assert!(validate_suffix("ab").is_err());
/// assert!(validate_suffix("A").is_err());
/// ```
pub fn validate_suffix(suffix: &str) -> Result<()> {
    let mut chars = suffix.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Ok(()),
        _ => Err(HarvesterError::InvalidSuffix(suffix.to_string())),
    }
}

/// Suffix for the n-th revision of a day's transcript (0 => `a`).
#[must_use]
pub fn nth_suffix(n: u8) -> Option<String> {
    (n < MAX_SUFFIXES).then(|| char::from(b'a' + n).to_string())
}

/// Build the URL of a transcript document.
///
/// # Examples
/// ```
/// use hansard_harvester::config::{document_url, TRANSCRIPT_BASE_URL};
/// use hansard_harvester::types::Chamber;
///
/// assert_eq!(
///     document_url(TRANSCRIPT_BASE_URL, Chamber::Commons, "2024-01-15", "a"),
///     "https://www.theyworkforyou.com/pwdata/scrapedxml/debates/debates2024-01-15a.xml"
/// );
/// ```
#[must_use]
pub fn document_url(base_url: &str, chamber: Chamber, date: &str, suffix: &str) -> String {
    let (dir, prefix) = match chamber {
        Chamber::Commons => ("debates", "debates"),
        Chamber::Lords => ("lordspages", "daylord"),
        Chamber::WestminsterHall => ("westminhall", "westminster"),
        Chamber::StandingCommittee => ("standing", "standing"),
    };
    format!(
        "{}/{dir}/{prefix}{date}{suffix}.xml",
        base_url.trim_end_matches('/')
    )
}
