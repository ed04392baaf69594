//! Explicit ids through target directives.
//!
//! Authors give a heading (or any other node) a fixed id by writing a text
//! directive right before it:
//!
//! ```markdown
//! :target{#install-guide}
//! ## Installing
//! ```
//!
//! The directive is removed and its id is given to the next node in
//! document order.

use tracing::debug;

use crate::tree::{Document, ElementAttribute, Kind, NodeId};

/// Apply and remove every target directive named `name`.
///
/// The next node is the directive's next sibling, or else the next sibling
/// of its nearest ancestor that has one. JSX elements receive an `id`
/// attribute unless they already carry one; other nodes receive an anchor
/// id. Directives without a non-empty `id` attribute are left in place.
///
/// Returns the number of directives applied.
pub fn apply_targets(doc: &mut Document, name: &str) -> usize {
    let directives: Vec<(NodeId, String)> = doc
        .iter_dfs()
        .filter(|&id| doc.kind(id) == Some(&Kind::TextDirective))
        .filter(|&id| doc.attrs.name(id) == Some(name))
        .filter_map(|id| {
            let target = doc.attrs.directive_attrs(id)?.get("id")?;
            (!target.is_empty()).then(|| (id, target.clone()))
        })
        .collect();

    let applied = directives.len();
    for (directive, target) in directives {
        let next = next_in_document(doc, directive);
        doc.detach(directive);

        let Some(next) = next else {
            debug!(id = %target, "target directive has no following node");
            continue;
        };
        if doc.kind(next).is_some_and(Kind::is_element) {
            if !doc.attrs.has_element_attr(next, "id") {
                doc.attrs
                    .push_element_attr(next, ElementAttribute::literal("id", &target));
            }
        } else {
            doc.attrs.set_anchor(next, &target);
        }
    }
    applied
}

fn next_in_document(doc: &Document, id: NodeId) -> Option<NodeId> {
    let mut branch = id;
    loop {
        if let Some(next) = doc.next_sibling(branch) {
            return Some(next);
        }
        branch = doc.parent(branch)?;
    }
}
