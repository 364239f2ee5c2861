//! Committee record handlers.
//!
//! Public bill committee transcripts open with an attendance block, and
//! evidence sessions name their witnesses.

use roxmltree::Node;

use crate::error::Result;
use crate::registry::handler::NodeHandler;
use crate::registry::types::{HandlerContext, NodeEvent};
use crate::text::normalize_text;
use crate::types::{normalize_person_id, Attendee, CommitteeRecord};
use crate::xml::{collect_text, element_children, find_children, flag_attribute, get_tag_name, has_tag, optional_attribute};

fn attendee(node: Node<'_, '_>) -> Option<Attendee> {
    let name = optional_attribute(node, "membername")
        .map(normalize_text)
        .unwrap_or_else(|| normalize_text(&collect_text(node)));
    if name.is_empty() {
        return None;
    }
    Some(Attendee {
        name,
        member_id: optional_attribute(node, "person_id").and_then(normalize_person_id),
        attending: flag_attribute(node, "attending"),
    })
}

fn element_text(node: Node<'_, '_>) -> Option<String> {
    Some(normalize_text(&collect_text(node))).filter(|text| !text.is_empty())
}

/// Handler for `<committee>` attendance blocks.
pub struct CommitteeHandler;

impl NodeHandler for CommitteeHandler {
    fn handle(&self, node: Node<'_, '_>, _context: &HandlerContext) -> Result<Option<NodeEvent>> {
        let mut record = CommitteeRecord::default();

        for child in element_children(node) {
            match get_tag_name(child) {
                "chairmen" => record
                    .chairs
                    .extend(find_children(child, "mpname").filter_map(attendee)),
                "mpname" => record.members.extend(attendee(child)),
                "clerk" | "clerks" => record.clerks.extend(element_text(child)),
                "witness" => record.witnesses.extend(element_text(child)),
                other => tracing::debug!(tag = %other, "Ignoring committee child"),
            }
        }

        if record.chairs.is_empty() && record.members.is_empty() && record.clerks.is_empty() {
            return Ok(None);
        }
        Ok(Some(NodeEvent::Committee(record)))
    }
}

/// Handler for `<witness>` elements outside an attendance block.
pub struct WitnessHandler;

impl NodeHandler for WitnessHandler {
    fn can_handle(&self, node: Node<'_, '_>, _context: &HandlerContext) -> bool {
        !node.parent_element().is_some_and(|p| has_tag(p, "committee"))
    }

    fn handle(&self, node: Node<'_, '_>, _context: &HandlerContext) -> Result<Option<NodeEvent>> {
        Ok(element_text(node).map(NodeEvent::Witness))
    }
}

/// Handler for `<bill>` elements naming the bill under consideration.
pub struct BillHandler;

impl NodeHandler for BillHandler {
    fn handle(&self, node: Node<'_, '_>, _context: &HandlerContext) -> Result<Option<NodeEvent>> {
        let title = optional_attribute(node, "title")
            .map(normalize_text)
            .or_else(|| element_text(node));
        Ok(title.map(NodeEvent::Bill))
    }
}
