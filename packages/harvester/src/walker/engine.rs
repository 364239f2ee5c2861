//! Walker that drives a document through the registry and item builder.

use roxmltree::{Document, Node};

use super::builder::ItemBuilder;
use crate::chamber::ChamberStrategy;
use crate::config::DEFAULT_MAX_NODES;
use crate::error::{HarvesterError, Result};
use crate::registry::{create_transcript_registry, Dispatch, ElementRegistry, HandlerContext};
use crate::types::ParsedDocument;
use crate::xml::{element_children, get_tag_name};

/// Root element of every transcript document.
pub const ROOT_TAG: &str = "publicwhip";

/// Elements still walked when an enclosing node fails.
const RECOVERABLE_TAGS: &[&str] = &["speech", "division"];

/// Outermost recoverable elements below a failed node, in document order.
fn recoverable_descendants<'a, 'input>(node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    let mut found = Vec::new();
    let mut stack: Vec<Node<'a, 'input>> = element_children(node).collect();
    stack.reverse();

    while let Some(current) = stack.pop() {
        if RECOVERABLE_TAGS.contains(&get_tag_name(current)) {
            found.push(current);
            continue;
        }
        let mut children: Vec<_> = element_children(current).collect();
        children.reverse();
        stack.extend(children);
    }

    found
}

/// Bounds on a single traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Nodes visited before traversal stops and the result is marked truncated.
    pub max_nodes: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// Depth-first, pre-order walker generic over the chamber strategy.
///
/// Traversal uses an explicit stack, so deeply nested documents cannot
/// exhaust the call stack. A walker is consumed by [`walk`](Self::walk):
/// every document gets a fresh strategy and builder.
pub struct DocumentWalker<S> {
    registry: ElementRegistry,
    strategy: S,
    options: WalkOptions,
}

impl<S: ChamberStrategy> DocumentWalker<S> {
    /// Create a walker with the standard transcript registry.
    #[must_use]
    pub fn new(strategy: S) -> Self {
        Self {
            registry: create_transcript_registry(),
            strategy,
            options: WalkOptions::default(),
        }
    }

    /// Replace the element registry.
    #[must_use]
    pub fn with_registry(mut self, registry: ElementRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set traversal bounds.
    #[must_use]
    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    /// Walk a parsed document.
    ///
    /// Node-level failures are recorded as warnings on the result. Only
    /// fatal errors abort the walk.
    ///
    /// # Errors
    /// Returns `Structural` if the root element is not `<publicwhip>`, or
    /// `IdCollision` if a held item cannot be numbered.
    pub fn walk(self, document: &Document<'_>) -> Result<ParsedDocument> {
        let root = document.root_element();
        if get_tag_name(root) != ROOT_TAG {
            return Err(HarvesterError::Structural(format!(
                "expected <{ROOT_TAG}> root element, found <{}>",
                get_tag_name(root)
            )));
        }

        let context = HandlerContext::new(self.strategy.chamber());
        let mut builder = ItemBuilder::new(self.strategy);

        let mut stack: Vec<Node<'_, '_>> = element_children(root).collect();
        stack.reverse();
        let mut visited = 0usize;

        while let Some(node) = stack.pop() {
            if visited >= self.options.max_nodes {
                tracing::warn!(
                    max_nodes = self.options.max_nodes,
                    remaining = stack.len() + 1,
                    "Node limit reached, stopping traversal"
                );
                builder.stats_mut().truncated = true;
                break;
            }
            visited += 1;

            let mut children: Vec<Node<'_, '_>> = match self.registry.dispatch(node, &context) {
                Dispatch::Skipped => continue,
                Dispatch::Passive | Dispatch::Handled(Ok(None)) => {
                    builder.observe(node);
                    element_children(node).collect()
                }
                Dispatch::Handled(Ok(Some(event))) => {
                    builder.observe(node);
                    builder.apply(event, node)?;
                    element_children(node).collect()
                }
                Dispatch::Handled(Err(err)) if err.is_fatal() => return Err(err),
                Dispatch::Handled(Err(err)) => {
                    builder.record_failure(node, &err);
                    recoverable_descendants(node)
                }
            };
            children.reverse();
            stack.extend(children);
        }

        builder.stats_mut().nodes_visited = visited;
        builder.finish()
    }
}
