//! Public bill (standing) committees.
//!
//! Committee proceedings go clause by clause. Amendments are moved against
//! the current clause and settled by a withdrawal, a decision on the
//! question, or a division. Clauses themselves stand part or are
//! disagreed to.

use std::sync::LazyLock;

use regex::Regex;
use roxmltree::Node;

use super::ChamberStrategy;
use crate::taxonomy::Taxonomy;
use crate::types::{
    Amendment, AmendmentStatus, BusinessItem, BusinessType, Chamber, ClauseOutcome, ClauseRecord,
    Division, DivisionResult, Speech,
};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CLAUSE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(new clause|clause)\s+(\d+[a-z]?)\b").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static STAND_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bclause\s+(\d+[a-z]?)\s+(?:accordingly\s+)?ordered to stand part\b")
        .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DISAGREED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bclause\s+(\d+[a-z]?)\s+disagreed to\b").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PROPOSAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:amendment proposed:?|i beg to move amendment)\s*(?:no\.?\s*)?(\d+)")
        .expect("valid regex")
});

/// Terminal amendment phrases.
#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static OUTCOMES: LazyLock<Vec<(AmendmentStatus, Regex)>> = LazyLock::new(|| {
    [
        (AmendmentStatus::Withdrawn, r"(?i)\bby leave,? withdrawn\b"),
        (
            AmendmentStatus::Agreed,
            r"(?i)\bamendment (?:agreed to|made)\b|\bquestion accordingly agreed to\b",
        ),
        (
            AmendmentStatus::Negatived,
            r"(?i)\bquestion accordingly negatived\b|\bamendment negatived\b",
        ),
    ]
    .into_iter()
    .map(|(status, pattern)| (status, Regex::new(pattern).expect("valid regex")))
    .collect()
});

/// Clause label ("Clause 4", "New Clause 2") at the start of a heading.
///
/// # Examples
/// ```
/// use hansard_harvester::chamber::clause_label;
///
/// assert_eq!(clause_label("Clause 12 - Power to make regulations"), Some("Clause 12".to_string()));
/// assert_eq!(clause_label("new clause 3a"), Some("New Clause 3a".to_string()));
/// assert_eq!(clause_label("Schedule 1"), None);
/// ```
#[must_use]
pub fn clause_label(text: &str) -> Option<String> {
    CLAUSE_HEADING.captures(text).map(|caps| {
        let prefix = if caps[1].to_lowercase().starts_with("new") {
            "New Clause"
        } else {
            "Clause"
        };
        format!("{prefix} {}", &caps[2])
    })
}

fn amendment_outcome(text: &str) -> Option<AmendmentStatus> {
    OUTCOMES
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(status, _)| *status)
}

#[derive(Debug, Clone)]
pub struct StandingCommittee {
    taxonomy: Taxonomy,
    clause: Option<String>,
}

impl StandingCommittee {
    #[must_use]
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            clause: None,
        }
    }

    fn set_clause(&mut self, item: &mut BusinessItem, clause: String) {
        if !item.clauses.iter().any(|c| c.clause == clause) {
            item.clauses.push(ClauseRecord {
                clause: clause.clone(),
                outcome: None,
            });
        }
        self.clause = Some(clause);
    }

    fn record_clause_outcome(item: &mut BusinessItem, clause: String, outcome: ClauseOutcome) {
        match item.clauses.iter_mut().find(|c| c.clause == clause) {
            Some(record) => record.outcome = Some(outcome),
            None => item.clauses.push(ClauseRecord {
                clause,
                outcome: Some(outcome),
            }),
        }
    }

    fn pending_amendment(item: &mut BusinessItem) -> Option<&mut Amendment> {
        item.amendments
            .iter_mut()
            .rev()
            .find(|a| a.status == AmendmentStatus::Proposed)
    }
}

impl ChamberStrategy for StandingCommittee {
    fn chamber(&self) -> Chamber {
        Chamber::StandingCommittee
    }

    fn classify(&self, heading_text: &str) -> BusinessType {
        self.taxonomy.classify(heading_text)
    }

    fn on_open(&mut self, item: &mut BusinessItem, _heading: Option<Node<'_, '_>>) {
        if let Some(clause) = clause_label(&item.title) {
            self.set_clause(item, clause);
        }
    }

    fn on_speech(&mut self, item: &mut BusinessItem, speech: &mut Speech) {
        let content = speech.content.as_str();

        if let Some(clause) = clause_label(content) {
            self.set_clause(item, clause);
        }

        if let Some(caps) = PROPOSAL.captures(content) {
            let number = caps[1].to_string();
            let known = item.amendments.iter().any(|a| a.number == number);
            if !known {
                item.amendments.push(Amendment {
                    number,
                    clause: self.clause.clone(),
                    status: AmendmentStatus::Proposed,
                    division: None,
                });
            }
        }

        if let Some(status) = amendment_outcome(content) {
            if let Some(amendment) = Self::pending_amendment(item) {
                if amendment.status.can_become(status) {
                    amendment.status = status;
                }
            }
        }

        if let Some(caps) = STAND_PART.captures(content) {
            let clause = format!("Clause {}", &caps[1]);
            Self::record_clause_outcome(item, clause, ClauseOutcome::StoodPart);
        }
        if let Some(caps) = DISAGREED.captures(content) {
            let clause = format!("Clause {}", &caps[1]);
            Self::record_clause_outcome(item, clause, ClauseOutcome::Disagreed);
        }
    }

    fn on_division(&mut self, item: &mut BusinessItem, division: &Division) {
        let Some(amendment) = Self::pending_amendment(item) else {
            return;
        };
        let status = match division.result() {
            DivisionResult::Agreed => AmendmentStatus::Agreed,
            DivisionResult::Negatived => AmendmentStatus::Negatived,
        };
        amendment.division = division.number;
        if amendment.status.can_become(status) {
            amendment.status = status;
        }
    }
}
