//! Tree traversal utilities for the normalization passes.

use crate::tree::{Document, NodeId};

/// Walk the tree top-down, calling `visitor` at each node before its
/// children.
///
/// The visitor returns whether to descend into the node. Children are read
/// after the visitor runs, so a visitor may rebuild the child list of the
/// node it is given (and absorb following siblings) and the walk continues
/// over the rebuilt structure.
pub fn walk_top_down<F>(doc: &mut Document, mut visitor: F)
where
    F: FnMut(&mut Document, NodeId) -> bool,
{
    walk_node(doc, NodeId::ROOT, &mut visitor);
}

fn walk_node<F>(doc: &mut Document, id: NodeId, visitor: &mut F)
where
    F: FnMut(&mut Document, NodeId) -> bool,
{
    if !visitor(doc, id) {
        return;
    }
    let mut child_opt = doc.node(id).and_then(|n| n.first_child);
    while let Some(child_id) = child_opt {
        walk_node(doc, child_id, visitor);
        child_opt = doc.next_sibling(child_id);
    }
}

/// Snapshot of the reachable nodes in pre-order.
///
/// Subtrees below nodes for which `descend` returns false are left out (the
/// nodes themselves are included).
pub fn collect_pre_order<F>(doc: &Document, descend: F) -> Vec<NodeId>
where
    F: Fn(&Document, NodeId) -> bool,
{
    let mut out = Vec::new();
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        out.push(id);
        if descend(doc, id) {
            let mut children: Vec<NodeId> = doc.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
    }
    out
}

/// Move `nodes` (in order) to sit immediately after `anchor`.
pub fn move_after(doc: &mut Document, anchor: NodeId, nodes: &[NodeId]) {
    let mut anchor = anchor;
    for &node in nodes {
        doc.detach(node);
        doc.insert_after(anchor, node);
        anchor = node;
    }
}
