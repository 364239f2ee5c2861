//! Division processing.
//!
//! Reads one `<division>` element into tallies, voter lists and tellers.
//! The count element is authoritative; voter lists are reported as listed
//! and any disagreement is left to the caller via
//! [`Division::count_discrepancies`].

use roxmltree::Node;

use crate::error::{HarvesterError, Result};
use crate::text::{normalize_text, normalize_time};
use crate::types::{normalize_person_id, Division, Teller, VoteSide, Voter};
use crate::xml::{collect_text, element_children, find_child, flag_attribute, get_tag_name, optional_attribute, required_attribute};

/// Count attribute names for each side, Commons first then Lords.
const AYE_COUNT_ATTRIBUTES: &[&str] = &["ayes", "content"];
const NO_COUNT_ATTRIBUTES: &[&str] = &["noes", "not-content"];

/// Vote list container elements.
const LIST_TAGS: &[&str] = &["mplist", "lordlist"];

/// Map a list's `vote` attribute to a side.
fn vote_side(vote: &str) -> Option<VoteSide> {
    match vote.trim().to_lowercase().as_str() {
        "aye" | "ayes" | "content" | "contents" => Some(VoteSide::Aye),
        "no" | "noes" | "not-content" | "notcontent" | "not-contents" => Some(VoteSide::No),
        _ => None,
    }
}

/// Read a division element.
///
/// Returns `Ok(None)` when the element has no `divisioncount` child; such
/// elements are announcements rather than recorded votes.
///
/// # Errors
/// Returns an error when the division has no `id` or a count attribute is
/// not a number.
pub fn extract_division(node: Node<'_, '_>) -> Result<Option<Division>> {
    let Some(count) = find_child(node, "divisioncount") else {
        return Ok(None);
    };
    let id = required_attribute(node, "id")?;

    let mut ayes = Vec::new();
    let mut noes = Vec::new();
    let mut tellers = Vec::new();

    for list in element_children(node).filter(|n| LIST_TAGS.contains(&get_tag_name(*n))) {
        let Some(side) = optional_attribute(list, "vote").and_then(vote_side) else {
            tracing::debug!(id = %id, "Skipping vote list without a recognised side");
            continue;
        };

        for entry in element_children(list) {
            let voter = read_voter(entry);
            if voter.name.is_empty() && voter.member_id.is_none() {
                continue;
            }
            if voter.is_teller {
                tellers.push(Teller {
                    side,
                    name: voter.name.clone(),
                    member_id: voter.member_id.clone(),
                });
            }
            match side {
                VoteSide::Aye => ayes.push(voter),
                VoteSide::No => noes.push(voter),
            }
        }
    }

    let ayes_count = read_count(count, AYE_COUNT_ATTRIBUTES, ayes.len(), id)?;
    let noes_count = read_count(count, NO_COUNT_ATTRIBUTES, noes.len(), id)?;

    Ok(Some(Division {
        id: id.to_string(),
        number: optional_attribute(node, "divnumber").and_then(|n| n.parse().ok()),
        time: normalize_time(optional_attribute(node, "time")),
        ayes,
        noes,
        ayes_count,
        noes_count,
        tellers,
    }))
}

fn read_voter(entry: Node<'_, '_>) -> Voter {
    let name = optional_attribute(entry, "membername")
        .map(normalize_text)
        .unwrap_or_else(|| normalize_text(&collect_text(entry)));
    Voter {
        name,
        member_id: optional_attribute(entry, "person_id").and_then(normalize_person_id),
        is_teller: flag_attribute(entry, "teller"),
    }
}

/// Read the first present count attribute, falling back to the list length.
fn read_count(count: Node<'_, '_>, names: &[&str], listed: usize, id: &str) -> Result<u32> {
    let Some((name, raw)) = names
        .iter()
        .find_map(|name| optional_attribute(count, name).map(|raw| (*name, raw)))
    else {
        tracing::warn!(id = %id, listed, "Division count missing, using voter list length");
        return u32::try_from(listed)
            .map_err(|_| HarvesterError::invalid_attribute(names[0], "divisioncount", ""));
    };

    raw.parse()
        .map_err(|_| HarvesterError::invalid_attribute(name, "divisioncount", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DivisionResult;
    use roxmltree::Document;

    fn extract(xml: &str) -> Result<Option<Division>> {
        let doc = Document::parse(xml).unwrap();
        extract_division(doc.root_element())
    }

    #[test]
    fn test_commons_division() {
        let division = extract(
            r#"<division id="uk.org.publicwhip/debate/2024-01-15a.80.0" divnumber="42" time="19:16:00">
                <divisioncount ayes="3" noes="2"/>
                <mplist vote="aye">
                    <mpname person_id="uk.org.publicwhip/person/1" vote="aye">Alice Adams</mpname>
                    <mpname person_id="uk.org.publicwhip/person/2" vote="aye">Bob Brown</mpname>
                    <mpname person_id="uk.org.publicwhip/person/3" vote="aye" teller="yes">Carol Clark</mpname>
                </mplist>
                <mplist vote="no">
                    <mpname person_id="uk.org.publicwhip/person/4" vote="no">Dan Dee</mpname>
                    <mpname person_id="uk.org.publicwhip/person/5" vote="no" teller="yes">Eve East</mpname>
                </mplist>
            </division>"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(division.number, Some(42));
        assert_eq!(division.time, "19:16");
        assert_eq!(division.ayes_count, 3);
        assert_eq!(division.noes_count, 2);
        assert_eq!(division.ayes.len(), 3);
        assert_eq!(division.noes.len(), 2);
        assert_eq!(division.tellers.len(), 2);
        assert_eq!(division.tellers[0].side, VoteSide::Aye);
        assert_eq!(division.ayes[0].member_id.as_deref(), Some("1"));
        assert_eq!(division.result(), DivisionResult::Agreed);
        assert!(division.count_discrepancies().is_empty());
    }

    #[test]
    fn test_lords_division() {
        let division = extract(
            r#"<division id="uk.org.publicwhip/lords/2024-01-15a.20.0" divnumber="1">
                <divisioncount content="1" not-content="2"/>
                <lordlist vote="content"><lord person_id="uk.org.publicwhip/person/100">Lord A</lord></lordlist>
                <lordlist vote="not-content">
                    <lord person_id="uk.org.publicwhip/person/101">Baroness B</lord>
                    <lord person_id="uk.org.publicwhip/person/102" teller="yes">Lord C</lord>
                </lordlist>
            </division>"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(division.ayes_count, 1);
        assert_eq!(division.noes_count, 2);
        assert_eq!(division.result(), DivisionResult::Negatived);
        assert_eq!(division.tellers[0].side, VoteSide::No);
    }

    #[test]
    fn test_count_attribute_is_authoritative() {
        let division = extract(
            r#"<division id="d1">
                <divisioncount ayes="300" noes="200"/>
                <mplist vote="aye"><mpname person_id="uk.org.publicwhip/person/1">A</mpname></mplist>
            </division>"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(division.ayes_count, 300);
        assert_eq!(division.noes_count, 200);
        assert_eq!(division.count_discrepancies().len(), 2);
    }

    #[test]
    fn test_no_count_element_is_none() {
        let result = extract(r#"<division id="d1"><p>The House divided.</p></division>"#).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_count_attribute_uses_list() {
        let division = extract(
            r#"<division id="d1">
                <divisioncount noes="0"/>
                <mplist vote="aye"><mpname>A</mpname><mpname>B</mpname></mplist>
            </division>"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(division.ayes_count, 2);
    }

    #[test]
    fn test_non_numeric_count_is_error() {
        let err = extract(r#"<division id="d1"><divisioncount ayes="many" noes="1"/></division>"#)
            .unwrap_err();
        assert!(err.to_string().contains("many"));
    }

    #[test]
    fn test_tie_negatived() {
        let division = extract(r#"<division id="d1"><divisioncount ayes="10" noes="10"/></division>"#)
            .unwrap()
            .unwrap();
        assert_eq!(division.result(), DivisionResult::Negatived);
        assert_eq!(division.margin(), 0);
        assert_eq!(division.participation(), 20);
    }
}
