//! DOM Operations Adapter
//!
//! Thin helpers over `dom_query` node handles used while reading an annotated
//! layout dump. They keep attribute and child access in one place so the
//! provider only deals with owned strings and plain vectors.

pub use dom_query::{Document, NodeRef};
pub use tendril::StrTendril;

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

/// Get an attribute value, trimmed, treating blank values as absent
#[must_use]
pub fn attribute_value(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Text of a text node
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

// === Tree Navigation ===

/// Every child node (elements, text, comments) in document order
#[inline]
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children()
}

/// True when `node` has a text child with non-whitespace content
#[must_use]
pub fn has_direct_text(node: &NodeRef) -> bool {
    node.children()
        .iter()
        .any(|child| child.is_text() && !child.text().trim().is_empty())
}

// === Querying ===

/// First element matching `selector`
#[must_use]
pub fn query_selector<'a>(doc: &'a Document, selector: &str) -> Option<NodeRef<'a>> {
    doc.select(selector).nodes().first().cloned()
}
