//! Speech extraction.
//!
//! Turns one `<speech>` element into a [`Speech`]. Text belonging to nested
//! `<speech>` elements is never included: those are visited separately by
//! the walker.

use std::sync::LazyLock;

use regex::RegexSet;
use roxmltree::Node;

use crate::config::UNKNOWN_SPEAKER;
use crate::error::Result;
use crate::references::{is_quoted_paragraph, quoted_text, ReferenceTracker};
use crate::roles::split_role_name;
use crate::text::{normalize_text, normalize_time};
use crate::types::{normalize_person_id, Speech};
use crate::xml::{collect_text, flag_attribute, get_tag_name, optional_attribute, required_attribute};

/// Procedural phrase families and their patterns.
pub const PROCEDURAL_PHRASES: &[(&str, &str)] = &[
    ("motion-made", r"(?i)\bmotion made\b|\bquestion proposed\b"),
    (
        "question-put",
        r"(?i)\bquestion put\b|\bquestion (?:accordingly )?(?:agreed to|negatived)\b",
    ),
    (
        "division-called",
        r"(?i)\bthe (?:house|committee) (?:divided|proceeded to a division)\b|\bdivision no\b|\bclear the lobby\b",
    ),
    (
        "amendment-lifecycle",
        r"(?i)\bamendment (?:proposed|made|agreed to|negatived)\b|\bamendment,? by leave,? withdrawn\b",
    ),
    (
        "standing-order",
        r"(?i)\b(?:pursuant to )?standing order no\b",
    ),
    ("speaker-call", r"^(?:Order[.!,]\s*)+|^(?:Order[.!,]\s*)*I call\b"),
];

#[allow(clippy::expect_used)] // Static patterns that are guaranteed to be valid
static PROCEDURAL_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(PROCEDURAL_PHRASES.iter().map(|(_, pattern)| *pattern)).expect("valid regex set")
});

/// Name of the first procedural phrase family matched by `text`.
///
/// # Examples
/// ```
/// use hansard_harvester::speech::procedural_family;
///
/// assert_eq!(procedural_family("Question put and agreed to."), Some("question-put"));
/// assert_eq!(procedural_family("Order. I call Jane Doe."), Some("speaker-call"));
/// assert_eq!(procedural_family("We must invest in schools."), None);
/// ```
#[must_use]
pub fn procedural_family(text: &str) -> Option<&'static str> {
    PROCEDURAL_SET
        .matches(text)
        .iter()
        .next()
        .map(|index| PROCEDURAL_PHRASES[index].0)
}

/// Elements under `node` that belong to it rather than to a nested speech,
/// in document order.
pub fn own_elements<'a, 'input>(node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    let mut owned = Vec::new();
    let mut stack: Vec<Node<'a, 'input>> = node.children().filter(|c| c.is_element()).collect();
    stack.reverse();

    while let Some(current) = stack.pop() {
        if get_tag_name(current) == "speech" {
            continue;
        }
        owned.push(current);
        let mut children: Vec<_> = current.children().filter(|c| c.is_element()).collect();
        children.reverse();
        stack.extend(children);
    }

    owned
}

/// Extract a speech from a `<speech>` element.
///
/// # Errors
/// Returns `MissingAttribute` when the element has no `id`.
pub fn extract_speech(node: Node<'_, '_>) -> Result<Speech> {
    let id = required_attribute(node, "id")?;
    let owned = own_elements(node);

    let paragraphs: Vec<Node<'_, '_>> = owned
        .iter()
        .copied()
        .filter(|n| get_tag_name(*n) == "p")
        .collect();

    let content = paragraphs
        .iter()
        .map(|p| normalize_text(&collect_text(*p)))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let quoted = paragraphs
        .iter()
        .filter(|p| is_quoted_paragraph(**p))
        .filter_map(|p| quoted_text(*p))
        .collect();

    let mut tracker = ReferenceTracker::new();
    tracker.observe_all(owned.iter().copied());

    let (speaker_name, role) = match optional_attribute(node, "speakername") {
        Some(display) => match split_role_name(display) {
            Some((name, role)) => (name, Some(role)),
            None => (display.to_string(), None),
        },
        None => (UNKNOWN_SPEAKER.to_string(), None),
    };

    let column_number = optional_attribute(node, "colnum").and_then(|raw| {
        raw.parse().ok().or_else(|| {
            tracing::debug!(id = %id, colnum = %raw, "Ignoring non-numeric column number");
            None
        })
    });

    let procedural =
        flag_attribute(node, "nospeaker") || procedural_family(&content).is_some();

    Ok(Speech {
        id: id.to_string(),
        speaker_id: optional_attribute(node, "person_id").and_then(normalize_person_id),
        speaker_name,
        role,
        time: normalize_time(optional_attribute(node, "time")),
        speech_type: optional_attribute(node, "type").map(String::from),
        content,
        procedural,
        quoted_text: quoted,
        column_number,
        oral_question_number: optional_attribute(node, "oral-qnum").map(String::from),
        exchange: None,
        references: tracker.into_references(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TIME;
    use crate::types::QuoteKind;
    use roxmltree::Document;

    fn extract(xml: &str) -> Result<Speech> {
        let doc = Document::parse(xml).unwrap();
        extract_speech(doc.root_element())
    }

    #[test]
    fn test_extract_basic_speech() {
        let speech = extract(
            r#"<speech id="uk.org.publicwhip/debate/2024-01-15a.1.1"
                       person_id="uk.org.publicwhip/person/10295"
                       speakername="Jane Doe" time="14:35:27" colnum="12"
                       type="Start Question" oral-qnum="3">
                <p pid="a.1/1">First paragraph.</p>
                <p pid="a.1/2">Second   paragraph.</p>
            </speech>"#,
        )
        .unwrap();

        assert_eq!(speech.id, "uk.org.publicwhip/debate/2024-01-15a.1.1");
        assert_eq!(speech.speaker_id.as_deref(), Some("10295"));
        assert_eq!(speech.speaker_name, "Jane Doe");
        assert_eq!(speech.time, "14:35");
        assert_eq!(speech.content, "First paragraph.\nSecond paragraph.");
        assert_eq!(speech.column_number, Some(12));
        assert_eq!(speech.speech_type.as_deref(), Some("Start Question"));
        assert_eq!(speech.oral_question_number.as_deref(), Some("3"));
        assert!(!speech.procedural);
    }

    #[test]
    fn test_defaults_for_unattributed_speech() {
        let speech = extract(r#"<speech id="s1"><p>Some text.</p></speech>"#).unwrap();
        assert_eq!(speech.speaker_id, None);
        assert_eq!(speech.speaker_name, UNKNOWN_SPEAKER);
        assert_eq!(speech.time, DEFAULT_TIME);
    }

    #[test]
    fn test_nested_speech_excluded() {
        let speech = extract(
            r#"<speech id="s1" speakername="Jane Doe">
                <p>Outer text.</p>
                <speech id="s2" speakername="John Roe"><p>Intervention text.</p></speech>
                <p>More outer text.</p>
            </speech>"#,
        )
        .unwrap();
        assert_eq!(speech.content, "Outer text.\nMore outer text.");
        assert!(!speech.content.contains("Intervention"));
    }

    #[test]
    fn test_nospeaker_is_procedural() {
        let speech = extract(
            r#"<speech id="s1" nospeaker="true"><p>Bill read a Second time.</p></speech>"#,
        )
        .unwrap();
        assert!(speech.procedural);
    }

    #[test]
    fn test_procedural_phrases() {
        let speech = extract(
            r#"<speech id="s1" speakername="Mr Speaker"><p>Order. Order.</p></speech>"#,
        )
        .unwrap();
        assert!(speech.procedural);

        assert_eq!(
            procedural_family("Amendment, by leave, withdrawn."),
            Some("amendment-lifecycle")
        );
        assert_eq!(
            procedural_family("The House divided: Ayes 300, Noes 200."),
            Some("division-called")
        );
        assert_eq!(
            procedural_family("Motion made, and Question proposed,"),
            Some("motion-made")
        );
        assert_eq!(
            procedural_family("pursuant to Standing Order No. 24"),
            Some("standing-order")
        );
    }

    #[test]
    fn test_role_split_from_speakername() {
        let speech = extract(
            r#"<speech id="s1" speakername="The Minister of State, Home Office (Lord Hanson of Flint)">
                <p>My Lords, the Government are clear.</p></speech>"#,
        )
        .unwrap();
        assert_eq!(speech.speaker_name, "Lord Hanson of Flint");
        assert_eq!(
            speech.role.as_deref(),
            Some("The Minister of State, Home Office")
        );
    }

    #[test]
    fn test_quoted_text_and_references() {
        let speech = extract(
            r#"<speech id="s1" speakername="Jane Doe">
                <p>I beg to move,</p>
                <p pid="p2" pwmotiontext="yes">That this House approves the
                   <phrase class="bill">Finance Bill</phrase>.</p>
            </speech>"#,
        )
        .unwrap();
        assert_eq!(speech.quoted_text.len(), 1);
        assert_eq!(speech.quoted_text[0].kind, QuoteKind::FormalMotion);
        assert!(speech.references.bills.contains("Finance Bill"));
    }

    #[test]
    fn test_missing_id_is_error() {
        assert!(extract(r#"<speech speakername="Jane Doe"><p>Hi.</p></speech>"#).is_err());
    }

    #[test]
    fn test_bad_colnum_ignored() {
        let speech = extract(r#"<speech id="s1" colnum="12W"><p>Text.</p></speech>"#).unwrap();
        assert_eq!(speech.column_number, None);
    }
}
