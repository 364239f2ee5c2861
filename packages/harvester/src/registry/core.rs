//! Element registry for routing transcript elements to handlers.

use std::collections::{HashMap, HashSet};

use roxmltree::Node;

use super::handler::NodeHandler;
use super::types::{HandlerContext, NodeEvent};
use crate::error::Result;
use crate::xml::get_tag_name;

/// How the registry routed one element.
#[derive(Debug)]
pub enum Dispatch {
    /// Pruned together with its subtree.
    Skipped,
    /// No handler claimed the element. The walker still observes it and
    /// visits its children.
    Passive,
    /// A handler processed the element.
    Handled(Result<Option<NodeEvent>>),
}

/// Registry mapping element names to handlers.
pub struct ElementRegistry {
    handlers: HashMap<String, Box<dyn NodeHandler>>,
    skip_tags: HashSet<String>,
}

impl ElementRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            skip_tags: HashSet::new(),
        }
    }

    /// Register a handler for a tag name, replacing any earlier one.
    pub fn register(&mut self, tag_name: impl Into<String>, handler: impl NodeHandler + 'static) {
        self.handlers.insert(tag_name.into(), Box::new(handler));
    }

    /// Prune these tags and their subtrees. Skipping wins over a handler.
    pub fn skip(&mut self, tag_names: impl IntoIterator<Item = impl Into<String>>) {
        for tag in tag_names {
            self.skip_tags.insert(tag.into());
        }
    }

    /// Route one element.
    pub fn dispatch(&self, node: Node<'_, '_>, context: &HandlerContext) -> Dispatch {
        let tag_name = get_tag_name(node);

        if self.skip_tags.contains(tag_name) {
            return Dispatch::Skipped;
        }

        match self.handlers.get(tag_name) {
            Some(handler) if handler.can_handle(node, context) => {
                Dispatch::Handled(handler.handle(node, context))
            }
            Some(_) => {
                tracing::trace!(tag = %tag_name, chamber = %context.chamber, "Handler declined element");
                Dispatch::Passive
            }
            None => Dispatch::Passive,
        }
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chamber;
    use roxmltree::Document;

    struct BillTitle;

    impl NodeHandler for BillTitle {
        fn handle(&self, node: Node<'_, '_>, _context: &HandlerContext) -> Result<Option<NodeEvent>> {
            Ok(node.text().map(|t| NodeEvent::Bill(t.to_string())))
        }
    }

    /// Only claims elements in Standing Committee transcripts.
    struct CommitteeOnly;

    impl NodeHandler for CommitteeOnly {
        fn can_handle(&self, _node: Node<'_, '_>, context: &HandlerContext) -> bool {
            context.chamber == Chamber::StandingCommittee
        }

        fn handle(&self, _node: Node<'_, '_>, _context: &HandlerContext) -> Result<Option<NodeEvent>> {
            Ok(Some(NodeEvent::Witness("Dr A Witness".to_string())))
        }
    }

    #[test]
    fn test_dispatch_to_registered_handler() {
        let mut registry = ElementRegistry::new();
        registry.register("bill", BillTitle);

        let doc = Document::parse("<bill>Finance Bill</bill>").unwrap();
        let context = HandlerContext::new(Chamber::Commons);

        let dispatch = registry.dispatch(doc.root_element(), &context);
        assert!(
            matches!(dispatch, Dispatch::Handled(Ok(Some(NodeEvent::Bill(ref title)))) if title == "Finance Bill")
        );
    }

    #[test]
    fn test_declined_and_unknown_are_passive() {
        let mut registry = ElementRegistry::new();
        registry.register("witness", CommitteeOnly);

        let doc = Document::parse("<witness>Dr A Witness</witness>").unwrap();
        let node = doc.root_element();

        let commons = HandlerContext::new(Chamber::Commons);
        assert!(matches!(registry.dispatch(node, &commons), Dispatch::Passive));

        let committee = HandlerContext::new(Chamber::StandingCommittee);
        assert!(matches!(registry.dispatch(node, &committee), Dispatch::Handled(Ok(Some(_)))));

        let doc = Document::parse("<p>Text.</p>").unwrap();
        assert!(matches!(registry.dispatch(doc.root_element(), &commons), Dispatch::Passive));
    }

    #[test]
    fn test_skip_wins_over_handler() {
        let mut registry = ElementRegistry::new();
        registry.register("gidredirect", BillTitle);
        registry.skip(["gidredirect"]);

        let doc = Document::parse("<gidredirect/>").unwrap();
        let context = HandlerContext::new(Chamber::Commons);

        assert!(matches!(registry.dispatch(doc.root_element(), &context), Dispatch::Skipped));
    }
}
