//! Core data types for the harvester.
//!
//! These types represent one sitting's transcript after classification:
//! business items with their speeches, divisions and references.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::config::{DEFAULT_TIME, UNKNOWN_SPEAKER};
use crate::error::HarvesterError;

/// The chamber (or committee family) a transcript belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chamber {
    /// House of Commons main chamber.
    Commons,

    /// House of Lords.
    Lords,

    /// Westminster Hall sittings of the Commons.
    WestminsterHall,

    /// Public bill (standing) committees.
    StandingCommittee,
}

impl Chamber {
    /// All chambers, in a stable order.
    pub const ALL: [Chamber; 4] = [
        Self::Commons,
        Self::Lords,
        Self::WestminsterHall,
        Self::StandingCommittee,
    ];

    /// Get the canonical name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commons => "commons",
            Self::Lords => "lords",
            Self::WestminsterHall => "westminster-hall",
            Self::StandingCommittee => "standing-committee",
        }
    }

    /// Get the directory name for file output.
    #[must_use]
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Commons => "debates",
            Self::Lords => "lords",
            Self::WestminsterHall => "westminhall",
            Self::StandingCommittee => "standing",
        }
    }

    /// Prefix shared by every heading and speech id in this chamber's transcripts.
    #[must_use]
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Commons => "uk.org.publicwhip/debate/",
            Self::Lords => "uk.org.publicwhip/lords/",
            Self::WestminsterHall => "uk.org.publicwhip/westminhall/",
            Self::StandingCommittee => "uk.org.publicwhip/standing/",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chamber {
    type Err = HarvesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "commons" | "debates" => Ok(Self::Commons),
            "lords" => Ok(Self::Lords),
            "westminster-hall" | "westminhall" => Ok(Self::WestminsterHall),
            "standing-committee" | "standing" => Ok(Self::StandingCommittee),
            _ => Err(HarvesterError::InvalidChamber(s.to_string())),
        }
    }
}

/// Normalize a person id to its trailing numeric segment.
///
/// # Examples
/// ```
/// use hansard_harvester::types::normalize_person_id;
///
/// assert_eq!(normalize_person_id("uk.org.publicwhip/person/10295"), Some("10295".to_string()));
/// assert_eq!(normalize_person_id("  "), None);
/// ```
#[must_use]
pub fn normalize_person_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let id = raw.rsplit('/').next().unwrap_or(raw).trim();
    (!id.is_empty()).then(|| id.to_string())
}

/// Split an item id into its base and trailing numeric counter.
///
/// # Examples
/// ```
/// use hansard_harvester::types::split_numeric_suffix;
///
/// assert_eq!(
///     split_numeric_suffix("uk.org.publicwhip/debate/2024-01-15a.5"),
///     Some(("uk.org.publicwhip/debate/2024-01-15a", 5))
/// );
/// assert_eq!(split_numeric_suffix("no-suffix"), None);
/// ```
#[must_use]
pub fn split_numeric_suffix(id: &str) -> Option<(&str, u32)> {
    let (base, counter) = id.rsplit_once('.')?;
    let counter = counter.parse().ok()?;
    Some((base, counter))
}

/// Result of matching heading text against the business taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessType {
    /// Top-level category, `OTHER` when nothing matched.
    pub category: String,

    /// Type within the category.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Subtype within the type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl BusinessType {
    /// Category used when no taxonomy entry matches.
    pub const OTHER: &'static str = "OTHER";

    /// The fallback classification.
    #[must_use]
    pub fn other() -> Self {
        Self {
            category: Self::OTHER.to_string(),
            kind: None,
            subtype: None,
        }
    }

    /// Whether this is the fallback classification.
    #[must_use]
    pub fn is_other(&self) -> bool {
        self.category == Self::OTHER
    }
}

impl Default for BusinessType {
    fn default() -> Self {
        Self::other()
    }
}

/// Human-facing category assigned when an item is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    #[serde(rename = "Petitions")]
    Petitions,
    #[serde(rename = "Bill-Presented")]
    BillPresented,
    #[serde(rename = "Bills & Legislation")]
    BillsAndLegislation,
    #[serde(rename = "Delegated Legislation")]
    DelegatedLegislation,
    #[serde(rename = "Procedural")]
    Procedural,
    #[serde(rename = "Oral-Answers")]
    OralAnswers,
    #[serde(rename = "Points-of-Order")]
    PointsOfOrder,
    #[serde(rename = "Royal-Assent")]
    RoyalAssent,
    #[serde(rename = "Motions")]
    Motions,
    #[serde(rename = "Questions")]
    Questions,
    #[serde(rename = "Statements")]
    Statements,
    #[serde(rename = "Reports")]
    Reports,
    #[serde(rename = "Main")]
    Main,
}

impl Category {
    /// Get the display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petitions => "Petitions",
            Self::BillPresented => "Bill-Presented",
            Self::BillsAndLegislation => "Bills & Legislation",
            Self::DelegatedLegislation => "Delegated Legislation",
            Self::Procedural => "Procedural",
            Self::OralAnswers => "Oral-Answers",
            Self::PointsOfOrder => "Points-of-Order",
            Self::RoyalAssent => "Royal-Assent",
            Self::Motions => "Motions",
            Self::Questions => "Questions",
            Self::Statements => "Statements",
            Self::Reports => "Reports",
            Self::Main => "Main",
        }
    }
}

/// Role of a speech within a Lords oral question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Exchange {
    Question,
    Answer,
    Supplementary,
}

/// Classification of a quoted or motion paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteKind {
    ProceduralMotion,
    Amendment,
    DivisionResult,
    StandingOrder,
    DirectQuote,
    FormalMotion,
    Other,
}

/// A quoted, motion or indented paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotedText {
    pub text: String,
    pub kind: QuoteKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_id: Option<String>,
}

/// A member seen in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Cross-cutting facts gathered while walking a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceSet {
    /// Members keyed by normalized person id.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub members: BTreeMap<String, MemberRef>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub dates: BTreeSet<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub bills: BTreeSet<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub standing_orders: BTreeSet<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quoted_text: Vec<QuotedText>,
}

impl ReferenceSet {
    /// Check whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
            && self.dates.is_empty()
            && self.bills.is_empty()
            && self.standing_orders.is_empty()
            && self.quoted_text.is_empty()
    }

    /// Merge another set into this one. Member entries from `other` win.
    pub fn merge(&mut self, other: ReferenceSet) {
        self.members.extend(other.members);
        self.dates.extend(other.dates);
        self.bills.extend(other.bills);
        self.standing_orders.extend(other.standing_orders);
        self.quoted_text.extend(other.quoted_text);
    }
}

/// One contribution to the proceedings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Speech {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,

    /// Display name, [`UNKNOWN_SPEAKER`] when the transcript gives none.
    pub speaker_name: String,

    /// Inferred office of the speaker (best effort).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// `HH:MM`, [`DEFAULT_TIME`] when absent.
    pub time: String,

    /// Transcript-declared type, e.g. "Start Question".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub speech_type: Option<String>,

    pub content: String,

    pub procedural: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quoted_text: Vec<QuotedText>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub oral_question_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<Exchange>,

    #[serde(skip_serializing_if = "ReferenceSet::is_empty")]
    pub references: ReferenceSet,
}

impl Speech {
    /// Create an unattributed speech with default time.
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            speaker_id: None,
            speaker_name: UNKNOWN_SPEAKER.to_string(),
            role: None,
            time: DEFAULT_TIME.to_string(),
            speech_type: None,
            content: content.into(),
            procedural: false,
            quoted_text: Vec::new(),
            column_number: None,
            oral_question_number: None,
            exchange: None,
            references: ReferenceSet::default(),
        }
    }

    /// Attribute the speech to a speaker.
    #[must_use]
    pub fn with_speaker(mut self, id: Option<&str>, name: &str) -> Self {
        self.speaker_id = id.map(String::from);
        self.speaker_name = name.to_string();
        self
    }

    /// Whether the speaker name is a real name rather than the sentinel.
    #[must_use]
    pub fn has_named_speaker(&self) -> bool {
        self.speaker_name != UNKNOWN_SPEAKER
    }

    /// Case-insensitive phrase test on the content.
    #[must_use]
    pub fn mentions(&self, phrase: &str) -> bool {
        self.content.to_lowercase().contains(&phrase.to_lowercase())
    }
}

/// Which side of a division a vote was cast on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSide {
    /// "aye" in the Commons, "content" in the Lords.
    Aye,
    /// "no" in the Commons, "not-content" in the Lords.
    No,
}

/// One member's recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub is_teller: bool,
}

/// A teller for one side of a division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Teller {
    pub side: VoteSide,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

/// Outcome of a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DivisionResult {
    Agreed,
    Negatived,
}

/// Disagreement between a count attribute and the enumerated voter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountDiscrepancy {
    pub side: VoteSide,
    pub counted: u32,
    pub listed: usize,
}

/// One recorded vote.
///
/// `ayes_count`/`noes_count` come from the count element and are
/// authoritative; `ayes`/`noes` are the voters as enumerated.
#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    pub id: String,
    pub number: Option<u32>,
    pub time: String,
    pub ayes: Vec<Voter>,
    pub noes: Vec<Voter>,
    pub ayes_count: u32,
    pub noes_count: u32,
    pub tellers: Vec<Teller>,
}

impl Division {
    /// Ties are negatived.
    #[must_use]
    pub fn result(&self) -> DivisionResult {
        if self.ayes_count > self.noes_count {
            DivisionResult::Agreed
        } else {
            DivisionResult::Negatived
        }
    }

    /// Sum of both counts, in `u64` since each side may be `u32::MAX`.
    #[must_use]
    pub fn participation(&self) -> u64 {
        u64::from(self.ayes_count) + u64::from(self.noes_count)
    }

    #[must_use]
    pub fn margin(&self) -> u32 {
        self.ayes_count.abs_diff(self.noes_count)
    }

    /// Sides whose enumerated voter list disagrees with the count attribute.
    #[must_use]
    pub fn count_discrepancies(&self) -> Vec<CountDiscrepancy> {
        [
            (VoteSide::Aye, self.ayes_count, self.ayes.len()),
            (VoteSide::No, self.noes_count, self.noes.len()),
        ]
        .into_iter()
        .filter(|(_, counted, listed)| usize::try_from(*counted).ok() != Some(*listed))
        .map(|(side, counted, listed)| CountDiscrepancy {
            side,
            counted,
            listed,
        })
        .collect()
    }
}

impl Serialize for Division {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Division", 11)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("time", &self.time)?;
        state.serialize_field("ayes_count", &self.ayes_count)?;
        state.serialize_field("noes_count", &self.noes_count)?;
        state.serialize_field("result", &self.result())?;
        state.serialize_field("participation", &self.participation())?;
        state.serialize_field("margin", &self.margin())?;
        state.serialize_field("ayes", &self.ayes)?;
        state.serialize_field("noes", &self.noes)?;
        state.serialize_field("tellers", &self.tellers)?;
        state.end()
    }
}

/// Minister inferred to lead an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadMinister {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub role: String,
}

/// A member listed in a committee attendance block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendee {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub attending: bool,
}

/// Membership and attendance of a committee sitting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitteeRecord {
    pub chairs: Vec<Attendee>,
    pub members: Vec<Attendee>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clerks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub witnesses: Vec<String>,
}

/// Lifecycle state of a committee amendment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AmendmentStatus {
    Proposed,
    Withdrawn,
    Agreed,
    Negatived,
}

impl AmendmentStatus {
    /// Only a proposed amendment can move, and only to a terminal state.
    #[must_use]
    pub fn can_become(self, next: AmendmentStatus) -> bool {
        self == Self::Proposed && next != Self::Proposed
    }
}

/// An amendment moved in committee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amendment {
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause: Option<String>,
    pub status: AmendmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<u32>,
}

/// Decision on a clause standing part of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClauseOutcome {
    StoodPart,
    Disagreed,
}

/// A clause considered in committee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClauseRecord {
    pub clause: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ClauseOutcome>,
}

/// One classified segment of proceedings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessItem {
    pub id: String,
    pub title: String,

    /// Type label taken from heading text.
    pub subtitle: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    pub business_type: BusinessType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supermajor_heading: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    pub speaker_ids: BTreeSet<String>,
    pub speaker_names: BTreeSet<String>,
    pub speeches: Vec<Speech>,
    pub divisions: Vec<Division>,
    pub extracts: Vec<String>,
    pub proposing_minister: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_minister: Option<LeadMinister>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chair: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub committee: Vec<CommitteeRecord>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub amendments: Vec<Amendment>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clauses: Vec<ClauseRecord>,

    #[serde(skip_serializing_if = "ReferenceSet::is_empty")]
    pub references: ReferenceSet,
}

impl BusinessItem {
    /// Create an empty item.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        business_type: BusinessType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            category: None,
            business_type,
            supermajor_heading: None,
            department: None,
            speaker_ids: BTreeSet::new(),
            speaker_names: BTreeSet::new(),
            speeches: Vec::new(),
            divisions: Vec::new(),
            extracts: Vec::new(),
            proposing_minister: None,
            lead_minister: None,
            chair: None,
            time_limit_minutes: None,
            bill: None,
            committee: Vec::new(),
            amendments: Vec::new(),
            clauses: Vec::new(),
            references: ReferenceSet::default(),
        }
    }

    /// Append a speech and record its speaker.
    pub fn add_speech(&mut self, speech: Speech) {
        if let Some(id) = &speech.speaker_id {
            self.speaker_ids.insert(id.clone());
        }
        if speech.has_named_speaker() {
            self.speaker_names.insert(speech.speaker_name.clone());
        }
        self.speeches.push(speech);
    }

    /// No speeches and no divisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.speeches.is_empty() && self.divisions.is_empty()
    }

    /// Empty items are dropped unless they carry committee records.
    #[must_use]
    pub fn is_emittable(&self) -> bool {
        !self.is_empty() || !self.committee.is_empty()
    }

    /// Case-insensitive keyword test on title and subtitle.
    #[must_use]
    pub fn heading_contains(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.title.to_lowercase().contains(&keyword)
            || self.subtitle.to_lowercase().contains(&keyword)
    }
}

/// Counters gathered during one document walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub nodes_visited: usize,
    pub headings: usize,
    pub speeches: usize,
    pub divisions: usize,
    pub failed_nodes: usize,
    pub truncated: bool,
}

/// Everything extracted from one transcript document.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub chamber: Chamber,
    pub items: Vec<BusinessItem>,
    pub warnings: Vec<String>,
    pub stats: ParseStats,
}

impl ParsedDocument {
    /// Total speeches across all items.
    #[must_use]
    pub fn speech_count(&self) -> usize {
        self.items.iter().map(|item| item.speeches.len()).sum()
    }
}
