//! Heading handlers.

use roxmltree::Node;

use crate::error::Result;
use crate::registry::handler::NodeHandler;
use crate::registry::types::{HandlerContext, Heading, HeadingKind, NodeEvent};
use crate::text::{normalize_text, normalize_time};
use crate::xml::{collect_text, optional_attribute, required_attribute};

/// Handler for `<major-heading>`, `<minor-heading>` and `<oral-heading>`.
pub struct HeadingHandler {
    kind: HeadingKind,
}

impl HeadingHandler {
    #[must_use]
    pub fn new(kind: HeadingKind) -> Self {
        Self { kind }
    }
}

impl NodeHandler for HeadingHandler {
    fn handle(&self, node: Node<'_, '_>, context: &HandlerContext) -> Result<Option<NodeEvent>> {
        let id = required_attribute(node, "id")?;
        if !id.starts_with(context.chamber.id_prefix()) {
            tracing::debug!(id = %id, chamber = %context.chamber, "Heading id outside chamber prefix");
        }

        Ok(Some(NodeEvent::Heading(Heading {
            kind: self.kind,
            id: id.to_string(),
            text: normalize_text(&collect_text(node)),
            time: normalize_time(optional_attribute(node, "time")),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chamber;
    use roxmltree::Document;

    #[test]
    fn test_heading_handler() {
        let doc = Document::parse(
            r#"<major-heading id="uk.org.publicwhip/debate/2024-01-15a.1.0" time="14:30:00">
                Speaker&apos;s   Statement
            </major-heading>"#,
        )
        .unwrap();
        let context = HandlerContext::new(Chamber::Commons);
        let event = HeadingHandler::new(HeadingKind::Major)
            .handle(doc.root_element(), &context)
            .unwrap();

        let Some(NodeEvent::Heading(heading)) = event else {
            unreachable!("heading handler always reports a heading");
        };
        assert_eq!(heading.kind, HeadingKind::Major);
        assert_eq!(heading.text, "Speaker's Statement");
        assert_eq!(heading.time, "14:30");
    }

    #[test]
    fn test_heading_without_id_fails() {
        let doc = Document::parse("<minor-heading>Untitled</minor-heading>").unwrap();
        let context = HandlerContext::new(Chamber::Commons);
        assert!(HeadingHandler::new(HeadingKind::Minor)
            .handle(doc.root_element(), &context)
            .is_err());
    }
}
