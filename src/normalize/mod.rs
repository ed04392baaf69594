//! Tree normalization passes.
//!
//! These passes run on a freshly imported [`Document`] before outline
//! extraction. All of them mutate the arena in place; moved nodes keep
//! their NodeIds.
//!
//! ## Pipeline Order
//!
//! 1. **Targets** - Give `:target{#id}` ids to the following node
//! 2. **Nesting** - Unwrap links inside JSX anchors
//! 3. **Wrap** - Wrap phrasing runs under block containers in paragraphs
//! 4. **Hoist** - Move blocks out of phrasing containers (fixpoint)
//! 5. **Re-wrap** - Wrap again if hoisting left phrasing next to blocks
//! 6. **Merge** - Coalesce adjacent emphasis, strong, delete, inline code
//! 7. **Prune** - Remove empty paragraphs (opt-in)
//!
//! Hoisting moves a block and its *trailing* phrasing siblings out of a
//! phrasing container. When that container sits directly in a block
//! container the trailing phrasing lands next to blocks, hence step 5.
//! Merging runs after reflow so that siblings made adjacent by hoisting are
//! coalesced too.

mod hoist;
mod merge;
mod nesting;
mod pass;
mod prune;
mod target;
mod wrap;

pub use hoist::{HoistReport, hoist_blocks};
pub use merge::{MergeReport, merge_adjacent_inlines};
pub use nesting::unwrap_nested_links;
pub use prune::prune_empty_paragraphs;
pub use target::apply_targets;
pub use wrap::wrap_phrasing_runs;

use serde::Serialize;
use tracing::debug;

use crate::classify::Classifier;
use crate::config::NormalizeConfig;
use crate::error::Result;
use crate::tree::Document;

/// Statistics of one [`normalize`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeReport {
    pub targets_applied: usize,
    pub links_unwrapped: usize,
    pub paragraphs_created: usize,
    pub traversals: usize,
    pub hoists: usize,
    pub merged_nodes: usize,
    pub merged_leaves: usize,
    pub paragraphs_pruned: usize,
}

/// Restore the block and phrasing invariants.
///
/// Wraps phrasing runs, hoists blocks to a fixpoint, and wraps again when
/// anything was hoisted. Running it a second time changes nothing.
///
/// Returns the paragraphs created and the hoist statistics.
pub fn reflow(doc: &mut Document, classifier: &Classifier) -> Result<(usize, HoistReport)> {
    let mut created = wrap_phrasing_runs(doc, classifier);
    let hoist = hoist_blocks(doc, classifier)?;
    if hoist.hoists > 0 {
        created += wrap_phrasing_runs(doc, classifier);
    }
    Ok((created, hoist))
}

/// Run every normalization pass on a document.
///
/// `classifier` must have been built from `config`.
pub fn normalize(
    doc: &mut Document,
    classifier: &Classifier,
    config: &NormalizeConfig,
) -> Result<NormalizeReport> {
    let mut report = NormalizeReport::default();

    if let Some(name) = &config.target_directive {
        report.targets_applied = apply_targets(doc, name);
    }
    report.links_unwrapped = unwrap_nested_links(doc, &config.anchor_elements);

    let (created, hoist) = reflow(doc, classifier)?;
    report.paragraphs_created = created;
    report.traversals = hoist.traversals;
    report.hoists = hoist.hoists;

    let merge = merge_adjacent_inlines(doc, classifier);
    report.merged_nodes = merge.merged_nodes;
    report.merged_leaves = merge.merged_leaves;

    if config.prune_empty_paragraphs {
        report.paragraphs_pruned = prune_empty_paragraphs(doc);
    }

    debug!(
        paragraphs = report.paragraphs_created,
        traversals = report.traversals,
        hoists = report.hoists,
        merged = report.merged_nodes,
        pruned = report.paragraphs_pruned,
        "normalized document"
    );
    Ok(report)
}
