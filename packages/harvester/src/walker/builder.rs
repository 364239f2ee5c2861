//! Business item builder.
//!
//! The builder is the state machine behind the walker. It receives node
//! events in document order, decides when items open and close, and owns
//! every piece of per-document mutable state: the reference tracker, the
//! held placeholder, the emitted-id set and the sequence counter.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use roxmltree::Node;

use crate::chamber::ChamberStrategy;
use crate::config::{DEFAULT_TIME, HELD_ITEM_TITLE, NO_TYPE};
use crate::error::{HarvesterError, Result};
use crate::references::ReferenceTracker;
use crate::registry::{Heading, HeadingKind, NodeEvent};
use crate::roles::called_role;
use crate::text::extract_bracketed;
use crate::types::{
    split_numeric_suffix, BusinessItem, CommitteeRecord, Division, ParseStats, ParsedDocument,
    Speech,
};
use crate::xml::{get_tag_name, optional_attribute};

/// Sitting date (with revision letter) inside an item or speech id.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SITTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}[a-z]?").expect("valid regex"));

/// Phrase that makes the next speaker the proposing minister.
const MINISTER_CALL: &str = "I call the Minister";

enum BuilderState {
    NoCurrentItem,
    Open(Box<BusinessItem>),
    /// Placeholder for speeches seen before any heading; its id is assigned later.
    Held(Box<BusinessItem>),
    /// Oral heading seen; waiting for the department heading.
    PendingDepartment(Heading),
}

/// A closed held item waiting for its id.
struct HeldItem {
    item: BusinessItem,
    position: usize,
}

fn current(state: &mut BuilderState) -> Option<&mut BusinessItem> {
    match state {
        BuilderState::Open(item) | BuilderState::Held(item) => Some(item),
        BuilderState::NoCurrentItem | BuilderState::PendingDepartment(_) => None,
    }
}

/// Finalize-time enrichment shared by all chambers.
fn enrich(item: &mut BusinessItem) {
    item.extracts = item
        .speeches
        .iter()
        .flat_map(|speech| extract_bracketed(&speech.content))
        .collect();

    item.proposing_minister = item
        .speeches
        .windows(2)
        .find(|pair| pair[0].mentions(MINISTER_CALL))
        .map(|pair| pair[1].speaker_name.clone());
}

/// State machine turning node events into business items.
pub struct ItemBuilder<S> {
    strategy: S,
    state: BuilderState,
    current_type: String,
    supermajor: Option<String>,
    department: Option<String>,
    previous_major: Option<Heading>,
    last_heading_id: Option<String>,
    bill: Option<String>,
    held: Option<HeldItem>,
    called_role: Option<String>,
    pending_committee: Vec<CommitteeRecord>,
    pending_divisions: Vec<Division>,
    tracker: ReferenceTracker,
    items: Vec<BusinessItem>,
    emitted_ids: HashSet<String>,
    sequence: u32,
    sitting: Option<String>,
    warnings: Vec<String>,
    stats: ParseStats,
}

impl<S: ChamberStrategy> ItemBuilder<S> {
    /// Create a builder with fresh per-document state.
    #[must_use]
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            state: BuilderState::NoCurrentItem,
            current_type: NO_TYPE.to_string(),
            supermajor: None,
            department: None,
            previous_major: None,
            last_heading_id: None,
            bill: None,
            held: None,
            called_role: None,
            pending_committee: Vec::new(),
            pending_divisions: Vec::new(),
            tracker: ReferenceTracker::new(),
            items: Vec::new(),
            emitted_ids: HashSet::new(),
            sequence: 0,
            sitting: None,
            warnings: Vec::new(),
            stats: ParseStats::default(),
        }
    }

    /// Let the reference tracker see a node.
    pub fn observe(&mut self, node: Node<'_, '_>) {
        self.tracker.observe(node);
    }

    /// Counters for the current walk.
    pub fn stats_mut(&mut self) -> &mut ParseStats {
        &mut self.stats
    }

    /// Record a node that failed to process. Traversal continues.
    pub fn record_failure(&mut self, node: Node<'_, '_>, error: &HarvesterError) {
        let tag = get_tag_name(node);
        let id = optional_attribute(node, "id").unwrap_or("-");
        tracing::warn!(tag = %tag, id = %id, error = %error, "Failed to process node, skipping");

        let failure = HarvesterError::NodeProcessing {
            tag: tag.to_string(),
            message: error.to_string(),
        };
        self.warnings.push(format!("{id}: {failure}"));
        self.stats.failed_nodes += 1;
    }

    /// Apply one node event.
    ///
    /// # Errors
    /// Returns `IdCollision` if closing an item assigns an id already in use.
    pub fn apply(&mut self, event: NodeEvent, node: Node<'_, '_>) -> Result<()> {
        match event {
            NodeEvent::Heading(heading) => self.on_heading(heading, node)?,
            NodeEvent::Speech(speech) => self.on_speech(speech),
            NodeEvent::Division(division) => self.on_division(division),
            NodeEvent::Committee(record) => self.pending_committee.push(record),
            NodeEvent::Witness(witness) => match self.pending_committee.last_mut() {
                Some(record) => record.witnesses.push(witness),
                None => self.pending_committee.push(CommitteeRecord {
                    witnesses: vec![witness],
                    ..CommitteeRecord::default()
                }),
            },
            NodeEvent::Bill(title) => {
                self.tracker.record_bill(&title);
                if let Some(item) = current(&mut self.state) {
                    item.bill = Some(title.clone());
                }
                self.bill = Some(title);
            }
        }
        Ok(())
    }

    /// Close the last item and assemble the parsed document.
    ///
    /// # Errors
    /// Returns `IdCollision` if a held item's fallback id is already in use.
    pub fn finish(mut self) -> Result<ParsedDocument> {
        self.close_current()?;

        if let Some(held) = self.held.take() {
            let id = format!(
                "{}{}.{}",
                self.strategy.chamber().id_prefix(),
                self.sitting.as_deref().unwrap_or("unknown"),
                self.sequence
            );
            self.place_held(held, id)?;
        }

        let orphaned = self.pending_committee.len() + self.pending_divisions.len();
        if orphaned > 0 {
            tracing::warn!(records = orphaned, "Records seen outside any business item were dropped");
            self.warnings.push(format!(
                "{orphaned} committee or division record(s) outside any business item were dropped"
            ));
        }

        Ok(ParsedDocument {
            chamber: self.strategy.chamber(),
            items: self.items,
            warnings: self.warnings,
            stats: self.stats,
        })
    }

    fn on_heading(&mut self, heading: Heading, node: Node<'_, '_>) -> Result<()> {
        self.stats.headings += 1;
        self.note_sitting(&heading.id);
        self.last_heading_id = Some(heading.id.clone());

        match heading.kind {
            HeadingKind::Oral => {
                self.close_current()?;
                self.supermajor = Some(heading.text.clone());
                self.department = None;
                self.previous_major = None;
                self.state = BuilderState::PendingDepartment(heading);
            }
            HeadingKind::Major => {
                let completes_department = matches!(self.state, BuilderState::PendingDepartment(_));
                self.close_current()?;

                if completes_department
                    || (self.supermajor.is_some() && self.strategy.continues_group(node))
                {
                    self.department = Some(heading.text.clone());
                } else if let Some(previous) = self
                    .previous_major
                    .take()
                    .filter(|p| p.time == heading.time && p.time != DEFAULT_TIME)
                {
                    self.supermajor = Some(previous.text);
                    self.department = None;
                } else {
                    self.supermajor = None;
                    self.department = None;
                }

                self.current_type = heading.text.clone();
                self.open(heading.id.clone(), heading.text.clone(), Some(node));
                self.previous_major = Some(heading);
            }
            HeadingKind::Minor => {
                self.close_current()?;
                self.previous_major = None;
                self.open(heading.id, heading.text, Some(node));
            }
        }
        Ok(())
    }

    fn on_speech(&mut self, mut speech: Speech) {
        self.stats.speeches += 1;
        self.note_sitting(&speech.id);
        self.previous_major = None;

        // Best effort: "I call the <role>" names the role of the next named speaker.
        if let Some(role) = self.called_role.take() {
            if !speech.has_named_speaker() {
                self.called_role = Some(role);
            } else if speech.role.is_none() {
                speech.role = Some(role);
            }
        }
        if let Some(role) = called_role(&speech.content) {
            self.called_role = Some(role);
        }

        self.ensure_open();
        if let Some(item) = current(&mut self.state) {
            self.strategy.on_speech(item, &mut speech);
            item.add_speech(speech);
        }
    }

    fn on_division(&mut self, division: Division) {
        self.stats.divisions += 1;
        self.previous_major = None;

        for discrepancy in division.count_discrepancies() {
            tracing::warn!(
                id = %division.id,
                side = ?discrepancy.side,
                counted = discrepancy.counted,
                listed = discrepancy.listed,
                "Division count disagrees with voter list"
            );
            self.warnings.push(format!(
                "division {}: {:?} count {} but {} listed",
                division.id, discrepancy.side, discrepancy.counted, discrepancy.listed
            ));
        }

        self.ensure_open();
        if let Some(item) = current(&mut self.state) {
            self.strategy.on_division(item, &division);
        }
        self.pending_divisions.push(division);
    }

    /// Make sure an item (real or held) is open.
    fn ensure_open(&mut self) {
        match std::mem::replace(&mut self.state, BuilderState::NoCurrentItem) {
            BuilderState::PendingDepartment(heading) => {
                self.open(heading.id, heading.text, None);
            }
            BuilderState::NoCurrentItem => match self.last_heading_id.clone() {
                Some(id) => {
                    let title = self.current_type.clone();
                    self.open(id, title, None);
                }
                None => {
                    let business_type = self.strategy.classify(HELD_ITEM_TITLE);
                    let item = BusinessItem::new(
                        String::new(),
                        HELD_ITEM_TITLE,
                        self.current_type.clone(),
                        business_type,
                    );
                    self.state = BuilderState::Held(Box::new(item));
                }
            },
            state => self.state = state,
        }
    }

    fn open(&mut self, id: String, title: String, heading: Option<Node<'_, '_>>) {
        let business_type = self.strategy.classify(&self.classification_text(&title));
        let mut item = BusinessItem::new(id, title, self.current_type.clone(), business_type);
        item.supermajor_heading = self.supermajor.clone();
        item.department = self.department.clone();
        item.bill = self.bill.clone();

        self.strategy.on_open(&mut item, heading);
        self.state = BuilderState::Open(Box::new(item));
    }

    /// Supermajor heading, current type and title, without repeats.
    fn classification_text(&self, title: &str) -> String {
        let current_type = (self.current_type != NO_TYPE).then_some(self.current_type.as_str());
        let mut parts: Vec<&str> = Vec::new();
        for part in [self.supermajor.as_deref(), current_type, Some(title)]
            .into_iter()
            .flatten()
        {
            if !part.is_empty() && parts.last() != Some(&part) {
                parts.push(part);
            }
        }
        parts.join(" ")
    }

    fn close_current(&mut self) -> Result<()> {
        let (mut item, held) = match std::mem::replace(&mut self.state, BuilderState::NoCurrentItem) {
            BuilderState::Open(item) => (item, false),
            BuilderState::Held(item) => (item, true),
            BuilderState::NoCurrentItem | BuilderState::PendingDepartment(_) => return Ok(()),
        };

        item.committee.append(&mut self.pending_committee);
        item.divisions.append(&mut self.pending_divisions);
        item.references.merge(self.tracker.take_scope());
        enrich(&mut item);
        self.strategy.on_finalize(&mut item);

        if !item.is_emittable() {
            tracing::debug!(id = %item.id, title = %item.title, "Dropping empty item");
            return Ok(());
        }

        if held {
            self.held = Some(HeldItem {
                item: *item,
                position: self.items.len(),
            });
            return Ok(());
        }

        self.emit(*item)
    }

    fn emit(&mut self, item: BusinessItem) -> Result<()> {
        if let Some((base, counter)) = split_numeric_suffix(&item.id) {
            if let Some(held) = self.held.take() {
                // A held item with only divisions still occupies one slot.
                let count = u32::try_from(held.item.speeches.len().max(1)).unwrap_or(u32::MAX);
                let id = format!("{base}.{}", counter.saturating_sub(count));
                self.place_held(held, id)?;
            }
        }

        if !self.emitted_ids.insert(item.id.clone()) {
            return Err(HarvesterError::IdCollision { id: item.id });
        }
        self.sequence += 1;
        self.items.push(item);
        Ok(())
    }

    fn place_held(&mut self, held: HeldItem, id: String) -> Result<()> {
        if !self.emitted_ids.insert(id.clone()) {
            return Err(HarvesterError::IdCollision { id });
        }

        let mut item = held.item;
        item.id = id;
        tracing::debug!(id = %item.id, speeches = item.speeches.len(), "Assigned id to held item");

        self.sequence += 1;
        let position = held.position.min(self.items.len());
        self.items.insert(position, item);
        Ok(())
    }

    fn note_sitting(&mut self, id: &str) {
        if self.sitting.is_none() {
            self.sitting = SITTING.find(id).map(|m| m.as_str().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UNKNOWN_SPEAKER;
    use crate::types::{BusinessType, Chamber};

    /// Strategy with no chamber behaviour.
    struct Plain;

    impl ChamberStrategy for Plain {
        fn chamber(&self) -> Chamber {
            Chamber::Commons
        }

        fn classify(&self, _heading_text: &str) -> BusinessType {
            BusinessType::other()
        }
    }

    fn heading(kind: HeadingKind, id: &str, text: &str) -> NodeEvent {
        heading_at(kind, id, text, DEFAULT_TIME)
    }

    fn heading_at(kind: HeadingKind, id: &str, text: &str, time: &str) -> NodeEvent {
        NodeEvent::Heading(Heading {
            kind,
            id: id.to_string(),
            text: text.to_string(),
            time: time.to_string(),
        })
    }

    fn speech(id: &str, speaker: &str) -> NodeEvent {
        NodeEvent::Speech(Speech::new(id, "Text.").with_speaker(None, speaker))
    }

    fn run(events: Vec<NodeEvent>) -> Result<ParsedDocument> {
        let doc = roxmltree::Document::parse("<publicwhip/>").unwrap();
        let node = doc.root_element();
        let mut builder = ItemBuilder::new(Plain);
        for event in events {
            builder.apply(event, node)?;
        }
        builder.finish()
    }

    const BASE: &str = "uk.org.publicwhip/debate/2024-01-15a";

    #[test]
    fn test_held_item_numbering() {
        let parsed = run(vec![
            speech(&format!("{BASE}.1.1"), "Mr Speaker"),
            speech(&format!("{BASE}.1.2"), "Jane Doe"),
            heading(HeadingKind::Minor, &format!("{BASE}.5"), "Tributes"),
            speech(&format!("{BASE}.5.1"), "John Roe"),
        ])
        .unwrap();

        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].id, format!("{BASE}.3"));
        assert_eq!(parsed.items[0].title, HELD_ITEM_TITLE);
        assert_eq!(parsed.items[0].speeches.len(), 2);
        assert_eq!(parsed.items[1].id, format!("{BASE}.5"));
    }

    #[test]
    fn test_held_id_clamped_at_zero() {
        let parsed = run(vec![
            speech("s1", "A"),
            speech("s2", "B"),
            speech("s3", "C"),
            heading(HeadingKind::Minor, &format!("{BASE}.1"), "Tributes"),
            speech("s4", "D"),
        ])
        .unwrap();
        assert_eq!(parsed.items[0].id, format!("{BASE}.0"));
    }

    #[test]
    fn test_held_id_collision_is_fatal() {
        // Clamping gives the held item the same id as the item that follows it.
        let err = run(vec![
            speech("s1", "A"),
            heading(HeadingKind::Minor, &format!("{BASE}.0"), "Tributes"),
            speech("s2", "B"),
        ])
        .unwrap_err();
        assert!(matches!(err, HarvesterError::IdCollision { id } if id == format!("{BASE}.0")));
    }

    #[test]
    fn test_duplicate_item_id_is_fatal() {
        let err = run(vec![
            heading(HeadingKind::Minor, &format!("{BASE}.4"), "First"),
            speech("s1", "A"),
            heading(HeadingKind::Minor, &format!("{BASE}.4"), "Duplicate"),
            speech("s2", "B"),
        ])
        .unwrap_err();
        assert!(matches!(err, HarvesterError::IdCollision { .. }));
    }

    #[test]
    fn test_held_fallback_id_at_end() {
        let parsed = run(vec![speech(&format!("{BASE}.1.1"), "A")]).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].id, format!("{BASE}.0"));
    }

    #[test]
    fn test_empty_items_dropped() {
        let parsed = run(vec![
            heading(HeadingKind::Major, &format!("{BASE}.1"), "Business before Questions"),
            heading(HeadingKind::Minor, &format!("{BASE}.2"), "Committee of Selection"),
            speech(&format!("{BASE}.2.1"), "A"),
        ])
        .unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].title, "Committee of Selection");
        assert_eq!(parsed.items[0].subtitle, "Business before Questions");
    }

    #[test]
    fn test_committee_only_item_emitted() {
        let parsed = run(vec![
            NodeEvent::Committee(CommitteeRecord::default()),
            heading(HeadingKind::Major, &format!("{BASE}.1"), "Finance Bill"),
            NodeEvent::Witness("Dr A Witness".to_string()),
        ])
        .unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert!(parsed.items[0].speeches.is_empty());
        assert_eq!(parsed.items[0].committee.len(), 1);
        assert_eq!(parsed.items[0].committee[0].witnesses, vec!["Dr A Witness".to_string()]);
    }

    #[test]
    fn test_oral_heading_department() {
        let parsed = run(vec![
            heading(HeadingKind::Oral, &format!("{BASE}.1"), "Oral Answers to Questions"),
            heading(HeadingKind::Major, &format!("{BASE}.2"), "Treasury"),
            speech(&format!("{BASE}.2.1"), "A"),
        ])
        .unwrap();
        let item = &parsed.items[0];
        assert_eq!(item.department.as_deref(), Some("Treasury"));
        assert_eq!(item.supermajor_heading.as_deref(), Some("Oral Answers to Questions"));
    }

    #[test]
    fn test_same_time_major_headings_open_supermajor() {
        let parsed = run(vec![
            heading_at(HeadingKind::Major, &format!("{BASE}.1"), "Opposition Day", "15:30"),
            heading_at(HeadingKind::Major, &format!("{BASE}.2"), "Schools", "15:30"),
            speech(&format!("{BASE}.2.1"), "A"),
            heading(HeadingKind::Minor, &format!("{BASE}.3"), "Funding"),
            speech(&format!("{BASE}.3.1"), "B"),
            heading_at(HeadingKind::Major, &format!("{BASE}.4"), "Housing", "17:00"),
            speech(&format!("{BASE}.4.1"), "C"),
        ])
        .unwrap();

        let summary: Vec<_> = parsed
            .items
            .iter()
            .map(|i| (i.title.as_str(), i.supermajor_heading.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Schools", Some("Opposition Day")),
                ("Funding", Some("Opposition Day")),
                ("Housing", None),
            ]
        );
    }

    #[test]
    fn test_default_time_headings_do_not_pair() {
        let parsed = run(vec![
            heading(HeadingKind::Major, &format!("{BASE}.1"), "Opposition Day"),
            heading(HeadingKind::Major, &format!("{BASE}.2"), "Schools"),
            speech(&format!("{BASE}.2.1"), "A"),
        ])
        .unwrap();
        assert_eq!(parsed.items[0].supermajor_heading, None);
    }

    #[test]
    fn test_proposing_minister_is_immediate_follower() {
        let parsed = run(vec![
            heading(HeadingKind::Minor, &format!("{BASE}.1"), "Schools"),
            NodeEvent::Speech(
                Speech::new("s1", "I call the Minister.").with_speaker(None, "Mr Speaker"),
            ),
            NodeEvent::Speech(Speech::new("s2", "Hear, hear.")),
            speech("s3", "Jane Doe"),
        ])
        .unwrap();
        assert_eq!(
            parsed.items[0].proposing_minister.as_deref(),
            Some(UNKNOWN_SPEAKER)
        );
    }

    #[test]
    fn test_enrichment() {
        let parsed = run(vec![
            heading(HeadingKind::Minor, &format!("{BASE}.1"), "Schools"),
            NodeEvent::Speech(
                Speech::new("s1", "Order. I call the Minister. [Interruption.]")
                    .with_speaker(None, "Mr Speaker"),
            ),
            speech("s2", "Jane Doe"),
        ])
        .unwrap();
        let item = &parsed.items[0];
        assert_eq!(item.extracts, vec!["Interruption.".to_string()]);
        assert_eq!(item.proposing_minister.as_deref(), Some("Jane Doe"));
        assert_eq!(item.speeches[1].role.as_deref(), Some("Minister"));
    }
}
