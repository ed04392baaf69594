//! Block reflow: wrap stray phrasing runs in implicit paragraphs.

use crate::classify::{Category, Classifier};
use crate::tree::{Document, Kind, Node, NodeId};

/// Wrap runs of phrasing children of strict-block containers in paragraphs.
///
/// Markdown parsers happily leave inline content directly under block
/// containers, for example text next to a JSX flow element:
///
/// ```text
/// root
/// ├── text "Hello, "
/// ├── text "world!"
/// └── code
/// ```
///
/// Each maximal run of phrasing children becomes one paragraph, placed where
/// the run was. Block and opaque children stay where they are:
///
/// ```text
/// root
/// ├── paragraph
/// │   ├── text "Hello, "
/// │   └── text "world!"
/// └── code
/// ```
///
/// A single top-down traversal suffices: a synthesized paragraph is block
/// content and cannot violate any other container. Opaque subtrees are not
/// entered. An empty container stays empty.
///
/// Returns the number of paragraphs created.
pub fn wrap_phrasing_runs(doc: &mut Document, classifier: &Classifier) -> usize {
    let mut created = 0;
    super::pass::walk_top_down(doc, |doc, id| {
        let Some(kind) = doc.kind(id) else {
            return false;
        };
        if classifier.category(kind) == Category::Opaque {
            return false;
        }
        if classifier.is_block_container(kind) {
            created += wrap_children(doc, classifier, id);
        }
        true
    });
    created
}

fn wrap_children(doc: &mut Document, classifier: &Classifier, parent: NodeId) -> usize {
    let has_phrasing = doc
        .children(parent)
        .any(|child| doc.kind(child).is_some_and(|k| classifier.is_phrasing(k)));
    if !has_phrasing {
        return 0;
    }

    let mut created = 0;
    let mut run: Vec<NodeId> = Vec::new();
    for child in doc.take_children(parent) {
        let phrasing = doc.kind(child).is_some_and(|k| classifier.is_phrasing(k));
        if phrasing {
            run.push(child);
            continue;
        }
        if !run.is_empty() {
            flush_run(doc, parent, &mut run);
            created += 1;
        }
        doc.append_child(parent, child);
    }
    if !run.is_empty() {
        flush_run(doc, parent, &mut run);
        created += 1;
    }
    created
}

fn flush_run(doc: &mut Document, parent: NodeId, run: &mut Vec<NodeId>) {
    let para = doc.alloc_node(Node::new(Kind::Paragraph));
    doc.append_child(parent, para);
    for child in run.drain(..) {
        doc.append_child(para, child);
    }
}
