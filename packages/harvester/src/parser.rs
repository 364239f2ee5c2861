//! Document parsing entry points.

use roxmltree::{Document, ParsingOptions};

use crate::chamber::{ChamberStrategy, Commons, Lords, StandingCommittee, WestminsterHall};
use crate::config::DEFAULT_MAX_NODES;
use crate::error::{HarvesterError, Result};
use crate::taxonomy::Taxonomy;
use crate::types::{Chamber, ParsedDocument};
use crate::walker::{DocumentWalker, WalkOptions};

/// Options for [`parse_document_with`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Traversal bound, see [`WalkOptions`].
    pub max_nodes: usize,

    /// Replacement taxonomy; the built-in one is used when `None`.
    pub taxonomy: Option<Taxonomy>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            taxonomy: None,
        }
    }
}

/// Parse a transcript document with default options.
///
/// # Errors
/// See [`parse_document_with`].
pub fn parse_document(xml: &str, chamber: Chamber) -> Result<ParsedDocument> {
    parse_document_with(xml, chamber, ParseOptions::default())
}

/// Parse a transcript document into business items.
///
/// # Errors
/// Returns `Structural` for empty input or a foreign root element,
/// `XmlParse` for malformed XML, `Taxonomy` if the built-in taxonomy
/// fails to load, and `IdCollision` if item ids clash.
pub fn parse_document_with(
    xml: &str,
    chamber: Chamber,
    options: ParseOptions,
) -> Result<ParsedDocument> {
    if xml.trim().is_empty() {
        return Err(HarvesterError::Structural("empty document".to_string()));
    }

    let document = Document::parse_with_options(
        xml,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )?;

    let taxonomy = match options.taxonomy {
        Some(taxonomy) => taxonomy,
        None => Taxonomy::for_chamber(chamber)?,
    };
    let walk = WalkOptions {
        max_nodes: options.max_nodes,
    };

    let parsed = match chamber {
        Chamber::Commons => run(Commons::new(taxonomy), walk, &document),
        Chamber::Lords => run(Lords::new(taxonomy), walk, &document),
        Chamber::WestminsterHall => run(WestminsterHall::new(taxonomy), walk, &document),
        Chamber::StandingCommittee => run(StandingCommittee::new(taxonomy), walk, &document),
    }?;

    tracing::debug!(
        chamber = %chamber.as_str(),
        items = parsed.items.len(),
        speeches = parsed.stats.speeches,
        warnings = parsed.warnings.len(),
        "Parsed document"
    );
    Ok(parsed)
}

fn run<S: ChamberStrategy>(
    strategy: S,
    options: WalkOptions,
    document: &Document<'_>,
) -> Result<ParsedDocument> {
    DocumentWalker::new(strategy).with_options(options).walk(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_structural() {
        let err = parse_document("   ", Chamber::Commons).unwrap_err();
        assert!(matches!(err, HarvesterError::Structural(_)));
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let err = parse_document("<publicwhip><speech></publicwhip>", Chamber::Commons).unwrap_err();
        assert!(matches!(err, HarvesterError::XmlParse(_)));
    }

    #[test]
    fn test_doctype_accepted() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE publicwhip [<!ENTITY pound "&#163;">]>
<publicwhip>
  <minor-heading id="uk.org.publicwhip/debate/2024-01-15a.1.0">Budget</minor-heading>
  <speech id="uk.org.publicwhip/debate/2024-01-15a.1.1" speakername="A"><p>Ten &pound;.</p></speech>
</publicwhip>"#;
        let parsed = parse_document(xml, Chamber::Commons).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].speeches[0].content, "Ten £.");
    }
}
