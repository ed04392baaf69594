//! Empty paragraph removal.

use crate::tree::{Document, Kind, NodeId};

/// Remove paragraphs that render as nothing.
///
/// Removing target directives and converting from HTML both leave
/// paragraphs behind that hold only whitespace:
///
/// ```text
/// paragraph
/// ├── text "  "
/// ├── break
/// └── emphasis
///     └── text " "
/// ```
///
/// A paragraph is removed when every child is empty: whitespace-only text
/// or inline code, a break, or emphasis, strong, or delete whose own
/// children are all empty. JSX content is never empty, and a paragraph
/// carrying an anchor id is kept (it might be a link target).
///
/// Returns the number of paragraphs removed.
pub fn prune_empty_paragraphs(doc: &mut Document) -> usize {
    let doomed: Vec<NodeId> = doc
        .iter_dfs()
        .filter(|&id| doc.kind(id) == Some(&Kind::Paragraph))
        .filter(|&id| doc.attrs.anchor(id).is_none())
        .filter(|&id| doc.children(id).all(|child| is_empty(doc, child)))
        .collect();

    for &id in &doomed {
        doc.detach(id);
    }
    doomed.len()
}

fn is_empty(doc: &Document, id: NodeId) -> bool {
    match doc.kind(id) {
        Some(Kind::Text | Kind::InlineCode) => doc.value(id).trim().is_empty(),
        Some(Kind::Break) => true,
        Some(Kind::Emphasis | Kind::Strong | Kind::Delete) => {
            doc.children(id).all(|child| is_empty(doc, child))
        }
        _ => false,
    }
}
