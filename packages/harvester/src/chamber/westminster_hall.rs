//! Westminster Hall.
//!
//! Sittings are chaired by a named member announced as "[Name in the
//! Chair]", and each debate runs for a fixed allocation that the chair
//! usually states near its start.

use std::sync::LazyLock;

use regex::Regex;
use roxmltree::Node;

use super::ChamberStrategy;
use crate::config::DEFAULT_TIME_LIMIT_MINUTES;
use crate::taxonomy::Taxonomy;
use crate::types::{BusinessItem, BusinessType, Chamber, Speech};
use crate::xml::{collect_text, following_elements, get_tag_name};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static IN_THE_CHAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?) in the Chair\]").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMERIC_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,3})\s*(minutes?|hours?)\b").expect("valid regex")
});

/// Durations written out in words, longest phrases first.
const WORDED_DURATIONS: &[(&str, u32)] = &[
    ("one and a half hours", 90),
    ("an hour and a half", 90),
    ("half an hour", 30),
    ("one hour", 60),
    ("an hour", 60),
    ("two hours", 120),
    ("three hours", 180),
];

/// First time allocation stated in `text`, in minutes.
///
/// # Examples
/// ```
/// use hansard_harvester::chamber::time_limit_minutes;
///
/// assert_eq!(time_limit_minutes("This debate can last for up to 30 minutes."), Some(30));
/// assert_eq!(time_limit_minutes("The debate may last for an hour and a half."), Some(90));
/// assert_eq!(time_limit_minutes("I beg to move."), None);
/// ```
#[must_use]
pub fn time_limit_minutes(text: &str) -> Option<u32> {
    if let Some(caps) = NUMERIC_DURATION.captures(text) {
        let amount: u32 = caps[1].parse().ok()?;
        let minutes = if caps[2].to_lowercase().starts_with("hour") {
            amount.saturating_mul(60)
        } else {
            amount
        };
        return Some(minutes);
    }

    let lowered = text.to_lowercase();
    WORDED_DURATIONS
        .iter()
        .find(|(phrase, _)| lowered.contains(phrase))
        .map(|(_, minutes)| *minutes)
}

#[derive(Debug, Clone)]
pub struct WestminsterHall {
    taxonomy: Taxonomy,
    chair: Option<String>,
}

impl WestminsterHall {
    #[must_use]
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            chair: None,
        }
    }

    /// Scan forward from a heading to the next heading for a time allocation.
    fn scan_time_limit(heading: Node<'_, '_>) -> Option<u32> {
        following_elements(heading)
            .take_while(|n| !get_tag_name(*n).ends_with("heading"))
            .find_map(|n| time_limit_minutes(&collect_text(n)))
    }
}

impl ChamberStrategy for WestminsterHall {
    fn chamber(&self) -> Chamber {
        Chamber::WestminsterHall
    }

    fn classify(&self, heading_text: &str) -> BusinessType {
        self.taxonomy.classify(heading_text)
    }

    fn on_open(&mut self, item: &mut BusinessItem, heading: Option<Node<'_, '_>>) {
        item.chair.clone_from(&self.chair);
        let limit = heading.and_then(Self::scan_time_limit);
        item.time_limit_minutes = Some(limit.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES));
    }

    fn on_speech(&mut self, item: &mut BusinessItem, speech: &mut Speech) {
        if let Some(caps) = IN_THE_CHAIR.captures(&speech.content) {
            let chair = caps[1].trim().to_string();
            tracing::debug!(chair = %chair, "Chair changed");
            item.chair = Some(chair.clone());
            self.chair = Some(chair);
        }
    }
}
