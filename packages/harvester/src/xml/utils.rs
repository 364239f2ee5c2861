//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::Node;

use crate::error::{HarvesterError, Result};

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use hansard_harvester::xml::get_tag_name;
///
/// let xml = r#"<publicwhip><speech id="s1"/></publicwhip>"#;
/// let doc = Document::parse(xml).unwrap();
/// let speech = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(speech), "speech");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use hansard_harvester::xml::find_children;
///
/// let xml = r#"<mplist><mpname/><mpname/><other/></mplist>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(find_children(doc.root_element(), "mpname").count(), 2);
/// ```
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Check if a node is an element with a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Element siblings that follow `node`, in document order.
pub fn following_elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    std::iter::successors(node.next_sibling(), |n| n.next_sibling()).filter(|n| n.is_element())
}

/// Get a trimmed, non-empty attribute value.
pub fn optional_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Get an attribute that must be present and non-empty.
///
/// # Errors
/// Returns `MissingAttribute` naming the attribute and element.
pub fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    optional_attribute(node, name)
        .ok_or_else(|| HarvesterError::missing_attribute(name, get_tag_name(node)))
}

/// Interpret a yes/no style attribute (`true`, `yes`, `1`).
pub fn flag_attribute(node: Node<'_, '_>, name: &str) -> bool {
    matches!(
        node.attribute(name).map(|v| v.trim().to_lowercase()).as_deref(),
        Some("true" | "yes" | "1")
    )
}

/// Concatenate all descendant text of a node.
///
/// The result is raw: whitespace is not collapsed.
pub fn collect_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
