//! Node handler trait definition.

use roxmltree::Node;

use super::types::{HandlerContext, NodeEvent};
use crate::error::Result;

/// Trait for node handlers.
///
/// A handler reads one element and reports what it found. It never
/// recurses: the walker visits every child itself.
pub trait NodeHandler: Send + Sync {
    /// Check if this handler can process the given element.
    ///
    /// Default implementation always returns true.
    fn can_handle(&self, _node: Node<'_, '_>, _context: &HandlerContext) -> bool {
        true
    }

    /// Process the element.
    ///
    /// `Ok(None)` means the element carried nothing worth reporting.
    ///
    /// # Errors
    /// Returns an error if the element is malformed. The walker records it
    /// and moves on unless the error is fatal.
    fn handle(&self, node: Node<'_, '_>, context: &HandlerContext) -> Result<Option<NodeEvent>>;
}
