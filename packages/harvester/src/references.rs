//! Reference tracking across a transcript.
//!
//! The tracker sees every element the walker visits and gathers members,
//! dated phrases, bill names, standing-order citations and quoted motion
//! text. It keeps a document-wide set and a scoped set that the item
//! builder drains each time a business item closes.

use roxmltree::Node;

use crate::roles::split_role_name;
use crate::text::normalize_text;
use crate::types::{normalize_person_id, MemberRef, QuoteKind, QuotedText, ReferenceSet};
use crate::xml::{collect_text, flag_attribute, get_tag_name, optional_attribute};

/// Keyword rules for quoted text, checked in order; first match wins.
///
/// Markers are compared case-insensitively as substrings.
pub const QUOTE_RULES: &[(QuoteKind, &[&str])] = &[
    (
        QuoteKind::ProceduralMotion,
        &[
            "do now adjourn",
            "be now put",
            "be now read",
            "sittings of the house",
            "programme order",
            "leave to sit",
        ],
    ),
    (
        QuoteKind::Amendment,
        &["amendment", "leave out", "insert the following"],
    ),
    (
        QuoteKind::DivisionResult,
        &["ayes", "noes", "not-contents", "division no"],
    ),
    (QuoteKind::StandingOrder, &["standing order"]),
    (QuoteKind::DirectQuote, &["\u{201c}", "\""]),
    (
        QuoteKind::FormalMotion,
        &["that this house", "i beg to move", "motion"],
    ),
];

/// Classify quoted text by the first matching rule in [`QUOTE_RULES`].
///
/// # Examples
/// ```
/// use hansard_harvester::references::classify_quote;
/// use hansard_harvester::types::QuoteKind;
///
/// assert_eq!(classify_quote("That the House do now adjourn."), QuoteKind::ProceduralMotion);
/// assert_eq!(classify_quote("That this House notes the motion."), QuoteKind::FormalMotion);
/// assert_eq!(classify_quote("Page 3, line 4"), QuoteKind::Other);
/// ```
#[must_use]
pub fn classify_quote(text: &str) -> QuoteKind {
    let lowered = text.to_lowercase();
    QUOTE_RULES
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| lowered.contains(m)))
        .map_or(QuoteKind::Other, |(kind, _)| *kind)
}

/// Whether a `<p>` holds motion text or an indented quotation.
pub fn is_quoted_paragraph(node: Node<'_, '_>) -> bool {
    if get_tag_name(node) != "p" {
        return false;
    }
    flag_attribute(node, "pwmotiontext")
        || node
            .attribute("class")
            .is_some_and(|class| class.split_whitespace().any(|c| c.starts_with("indent")))
}

/// Build a quoted-text record from a quoted paragraph.
pub fn quoted_text(node: Node<'_, '_>) -> Option<QuotedText> {
    let text = normalize_text(&collect_text(node));
    if text.is_empty() {
        return None;
    }
    Some(QuotedText {
        kind: classify_quote(&text),
        paragraph_id: optional_attribute(node, "pid").map(String::from),
        text,
    })
}

/// Accumulates cross-cutting facts independent of business-item boundaries.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTracker {
    document: ReferenceSet,
    scope: ReferenceSet,
}

impl ReferenceTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one node. Nodes that match nothing are ignored.
    pub fn observe(&mut self, node: Node<'_, '_>) {
        if !node.is_element() {
            return;
        }

        if let Some((id, member)) = member_of(node) {
            self.document.members.insert(id.clone(), member.clone());
            self.scope.members.insert(id, member);
        }

        match get_tag_name(node) {
            "phrase" => self.observe_phrase(node),
            "p" if is_quoted_paragraph(node) => {
                if let Some(quote) = quoted_text(node) {
                    self.document.quoted_text.push(quote.clone());
                    self.scope.quoted_text.push(quote);
                }
            }
            _ => {}
        }
    }

    /// Observe a sequence of nodes in order.
    pub fn observe_all<'a, 'input: 'a>(&mut self, nodes: impl IntoIterator<Item = Node<'a, 'input>>) {
        for node in nodes {
            self.observe(node);
        }
    }

    /// Record a bill title found outside a phrase element.
    pub fn record_bill(&mut self, title: &str) {
        let title = normalize_text(title);
        if !title.is_empty() {
            self.document.bills.insert(title.clone());
            self.scope.bills.insert(title);
        }
    }

    /// Everything seen so far in the document.
    #[must_use]
    pub fn snapshot(&self) -> ReferenceSet {
        self.document.clone()
    }

    /// Take what was seen since the last call, leaving the document set intact.
    pub fn take_scope(&mut self) -> ReferenceSet {
        std::mem::take(&mut self.scope)
    }

    /// Consume the tracker, returning the document-wide set.
    #[must_use]
    pub fn into_references(self) -> ReferenceSet {
        self.document
    }

    fn observe_phrase(&mut self, node: Node<'_, '_>) {
        let Some(class) = optional_attribute(node, "class") else {
            return;
        };
        let value = optional_attribute(node, "code")
            .map(String::from)
            .unwrap_or_else(|| normalize_text(&collect_text(node)));
        if value.is_empty() {
            return;
        }

        let (document, scope) = match class {
            "date" => (&mut self.document.dates, &mut self.scope.dates),
            "bill" => (&mut self.document.bills, &mut self.scope.bills),
            "standing-order" => (
                &mut self.document.standing_orders,
                &mut self.scope.standing_orders,
            ),
            _ => return,
        };
        document.insert(value.clone());
        scope.insert(value);
    }
}

/// Member identity carried by a speaker-tagged element.
fn member_of(node: Node<'_, '_>) -> Option<(String, MemberRef)> {
    let id = normalize_person_id(optional_attribute(node, "person_id")?)?;
    let display = optional_attribute(node, "speakername")
        .or_else(|| optional_attribute(node, "membername"))
        .map(String::from)
        .or_else(|| {
            // Voter and attendee elements carry the name as text.
            (get_tag_name(node) != "speech")
                .then(|| normalize_text(&collect_text(node)))
                .filter(|s| !s.is_empty())
        })?;

    let member = match split_role_name(&display) {
        Some((name, role)) => MemberRef {
            name,
            role: Some(role),
        },
        None => MemberRef {
            name: display,
            role: None,
        },
    };
    Some((id, member))
}
