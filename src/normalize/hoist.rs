//! Phrasing reflow: hoist block content out of strict-phrasing containers.

use tracing::trace;

use crate::classify::{Category, Classifier};
use crate::error::{Error, Result};
use crate::tree::Document;

use super::pass::{collect_pre_order, move_after};

/// Outcome of the phrasing reflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoistReport {
    /// Full traversals run, including the final one that changed nothing.
    pub traversals: usize,
    /// Number of containers that had block children split off.
    pub hoists: usize,
}

/// Hoist block children out of strict-phrasing containers until the tree
/// stops changing.
///
/// Each traversal visits every strict-phrasing container (in pre-order, as
/// of the start of the traversal). When a container has a block child, that
/// child and every later sibling move, in order, to just after the
/// container:
///
/// ```text
/// strong                      strong
/// ├── emphasis                └── emphasis
/// │   └── code       ==>          (empty)
/// ...                         code
/// ```
///
/// A moved block can land inside another phrasing container, which only a
/// later traversal sees, so traversals repeat until one changes nothing.
/// The number of traversals is capped at the number of reachable nodes
/// plus two; hitting the cap means the classifier is inconsistent and the
/// document is abandoned with [`Error::FixpointExceeded`].
pub fn hoist_blocks(doc: &mut Document, classifier: &Classifier) -> Result<HoistReport> {
    let cap = doc.reachable_count() + 2;
    hoist_with_cap(doc, classifier, cap)
}

fn hoist_with_cap(doc: &mut Document, classifier: &Classifier, cap: usize) -> Result<HoistReport> {
    let mut report = HoistReport::default();
    loop {
        if report.traversals >= cap {
            return Err(Error::FixpointExceeded {
                traversals: report.traversals,
            });
        }
        report.traversals += 1;

        let hoisted = hoist_traversal(doc, classifier);
        trace!(
            traversal = report.traversals,
            hoisted, "phrasing reflow traversal"
        );
        if hoisted == 0 {
            return Ok(report);
        }
        report.hoists += hoisted;
    }
}

fn hoist_traversal(doc: &mut Document, classifier: &Classifier) -> usize {
    let order = collect_pre_order(doc, |doc, id| {
        doc.kind(id)
            .is_some_and(|k| classifier.category(k) != Category::Opaque)
    });

    let mut hoisted = 0;
    for id in order {
        let is_container = doc
            .kind(id)
            .is_some_and(|k| classifier.is_phrasing_container(k));
        if !is_container || doc.parent(id).is_none() {
            continue;
        }

        let Some(first_block) = doc
            .children(id)
            .find(|&child| doc.kind(child).is_some_and(|k| classifier.is_block(k)))
        else {
            continue;
        };

        let mut moved = vec![first_block];
        let mut next = doc.next_sibling(first_block);
        while let Some(sibling) = next {
            moved.push(sibling);
            next = doc.next_sibling(sibling);
        }
        move_after(doc, id, &moved);
        hoisted += 1;
    }
    hoisted
}
