//! Speech handler.

use roxmltree::Node;

use crate::error::Result;
use crate::registry::handler::NodeHandler;
use crate::registry::types::{HandlerContext, NodeEvent};
use crate::speech::extract_speech;

/// Handler for `<speech>` elements.
///
/// Nested speeches are reported separately when the walker reaches them.
pub struct SpeechHandler;

impl NodeHandler for SpeechHandler {
    fn handle(&self, node: Node<'_, '_>, _context: &HandlerContext) -> Result<Option<NodeEvent>> {
        extract_speech(node).map(|speech| Some(NodeEvent::Speech(speech)))
    }
}
