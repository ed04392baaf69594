//! DOM nesting repair.
//!
//! GFM autolinking turns URLs inside JSX anchors into links of their own,
//! which renders as an `<a>` inside an `<a>`. Such links are replaced by
//! their children.

use crate::tree::{Document, Kind, NodeId};

/// Unwrap links that are direct children of JSX elements named in
/// `anchor_elements`.
///
/// Returns the number of links removed.
pub fn unwrap_nested_links(doc: &mut Document, anchor_elements: &[String]) -> usize {
    if anchor_elements.is_empty() {
        return 0;
    }

    let anchors: Vec<NodeId> = doc
        .iter_dfs()
        .filter(|&id| doc.kind(id).is_some_and(Kind::is_element))
        .filter(|&id| {
            doc.attrs
                .name(id)
                .is_some_and(|name| anchor_elements.iter().any(|a| a == name))
        })
        .collect();

    let mut unwrapped = 0;
    for anchor in anchors {
        // Unwrapping can expose links nested in the removed link.
        loop {
            let Some(link) = doc
                .children(anchor)
                .find(|&child| doc.kind(child) == Some(&Kind::Link))
            else {
                break;
            };
            for child in doc.take_children(link) {
                doc.insert_before(link, child);
            }
            doc.detach(link);
            unwrapped += 1;
        }
    }
    unwrapped
}
