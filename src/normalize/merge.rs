//! Inline coalescing: merge adjacent inline nodes of the same kind.

use crate::classify::{Category, Classifier};
use crate::tree::{Document, NodeId};

/// Outcome of inline coalescing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Nodes absorbed into a preceding sibling.
    pub merged_nodes: usize,
    /// Of those, literal leaves whose value was concatenated.
    pub merged_leaves: usize,
}

/// Merge runs of adjacent same-kind mergeable siblings into one node.
///
/// Converters and parsers often split emphasis at markup boundaries, so a
/// single emphasized phrase arrives as two emphasis nodes:
///
/// ```text
/// paragraph
/// ├── emphasis
/// │   └── text "Hello, "
/// └── emphasis
///     └── text "world!"
/// ```
///
/// Rendering those separately produces `**` seams in serialized Markdown.
/// After this pass the run is one node:
///
/// ```text
/// paragraph
/// └── emphasis
///     ├── text "Hello, "
///     └── text "world!"
/// ```
///
/// Literal kinds (inline code) concatenate their values; container kinds
/// take over the absorbed node's children. The walk is top-down and visits
/// a node's children after merging it, so children that become adjacent
/// through a merge are coalesced as well.
pub fn merge_adjacent_inlines(doc: &mut Document, classifier: &Classifier) -> MergeReport {
    let mut report = MergeReport::default();
    super::pass::walk_top_down(doc, |doc, id| {
        let Some(kind) = doc.kind(id) else {
            return false;
        };
        if classifier.category(kind) == Category::Opaque {
            return false;
        }
        if classifier.is_mergeable(kind) {
            absorb_following(doc, id, &mut report);
        }
        true
    });
    report
}

fn absorb_following(doc: &mut Document, current: NodeId, report: &mut MergeReport) {
    let Some(kind) = doc.kind(current).cloned() else {
        return;
    };

    while let Some(next) = doc.next_sibling(current) {
        if doc.kind(next) != Some(&kind) {
            break;
        }
        doc.detach(next);

        if kind.has_value() {
            let joined = format!("{}{}", doc.value(current), doc.value(next));
            doc.set_value(current, &joined);
            report.merged_leaves += 1;
        } else {
            for child in doc.take_children(next) {
                doc.append_child(current, child);
            }
        }
        report.merged_nodes += 1;
    }
}
