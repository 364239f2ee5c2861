//! Division handler.

use roxmltree::Node;

use crate::division::extract_division;
use crate::error::Result;
use crate::registry::handler::NodeHandler;
use crate::registry::types::{HandlerContext, NodeEvent};

/// Handler for `<division>` elements.
///
/// Divisions without a count element are announcements and report nothing.
pub struct DivisionHandler;

impl NodeHandler for DivisionHandler {
    fn handle(&self, node: Node<'_, '_>, _context: &HandlerContext) -> Result<Option<NodeEvent>> {
        Ok(extract_division(node)?.map(NodeEvent::Division))
    }
}
