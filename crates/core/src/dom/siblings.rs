// ABOUTME: Sibling-content scanner for boundary detection.
// ABOUTME: Finds the nearest element sibling with non-blank text content.

use dom_query::{NodeRef, Selection};

/// Find the nearest prior element sibling with non-blank text content.
///
/// Word-processor exports pad real content with blank paragraphs, so
/// "first element" has to mean "no richer sibling before it", not raw tree
/// position. Siblings whose text is empty or all-whitespace are skipped.
pub fn prior_with_content<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if has_content(&s) {
            return Some(s);
        }
        sibling = s.prev_sibling();
    }
    None
}

/// Find the nearest following element sibling with non-blank text content.
pub fn next_with_content<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if has_content(&s) {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

fn has_content(node: &NodeRef) -> bool {
    node.is_element() && !Selection::from(*node).text().trim().is_empty()
}
