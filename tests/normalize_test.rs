//! Normalization tests.
//!
//! Scenario tests for the reflow and coalescing passes, plus property tests
//! over randomly generated trees: structural invariants after reflow,
//! idempotence, and leaf preservation through the whole pipeline.

use doctree::classify::{Category, Classifier};
use doctree::normalize::{hoist_blocks, merge_adjacent_inlines, normalize, reflow};
use doctree::{Document, NodeId, NormalizeConfig, TreeNode};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn root(children: Vec<TreeNode>) -> TreeNode {
    TreeNode::parent("root", children)
}

fn node(kind: &str, children: Vec<TreeNode>) -> TreeNode {
    TreeNode::parent(kind, children)
}

fn kinds(nodes: &[TreeNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.kind.as_str()).collect()
}

fn children(tree: &TreeNode) -> &[TreeNode] {
    tree.children.as_deref().unwrap_or_default()
}

fn run_normalize(tree: &TreeNode) -> (TreeNode, doctree::NormalizeReport) {
    let config = NormalizeConfig::default();
    let classifier = Classifier::new(&config).unwrap();
    let mut doc = Document::from_tree(tree);
    let report = normalize(&mut doc, &classifier, &config).unwrap();
    (doc.to_tree(), report)
}

/// First structural violation in the document, skipping opaque subtrees.
///
/// Block containers may hold no phrasing children, and no block may sit
/// anywhere below a phrasing container.
fn violation(doc: &Document, classifier: &Classifier) -> Option<String> {
    let mut stack: Vec<(NodeId, Option<&doctree::Kind>)> = vec![(NodeId::ROOT, None)];
    while let Some((id, phrasing_ancestor)) = stack.pop() {
        let kind = doc.kind(id)?;
        let category = classifier.category(kind);
        if category == Category::Opaque {
            continue;
        }
        if let (Some(ancestor), Category::Block) = (phrasing_ancestor, category) {
            return Some(format!("{ancestor:?} has block descendant {kind:?}"));
        }
        let inherited = if classifier.is_phrasing_container(kind) {
            Some(kind)
        } else {
            phrasing_ancestor
        };
        for child in doc.children(id) {
            let child_kind = doc.kind(child)?;
            if classifier.is_block_container(kind)
                && classifier.category(child_kind) == Category::Phrasing
            {
                return Some(format!("{kind:?} holds phrasing {child_kind:?}"));
            }
            stack.push((child, inherited));
        }
    }
    None
}

/// First pair of adjacent mergeable siblings of the same kind.
fn adjacent_mergeable(doc: &Document, classifier: &Classifier) -> Option<String> {
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        let kind = doc.kind(id)?;
        if classifier.category(kind) == Category::Opaque {
            continue;
        }
        let siblings: Vec<NodeId> = doc.children(id).collect();
        for pair in siblings.windows(2) {
            let (a, b) = (doc.kind(pair[0])?, doc.kind(pair[1])?);
            if a == b && classifier.is_mergeable(a) {
                return Some(format!("adjacent {a:?} under {kind:?}"));
            }
        }
        stack.extend(siblings);
    }
    None
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_root_text_is_wrapped_in_one_paragraph() {
    let tree = root(vec![TreeNode::text("Hello, "), TreeNode::text("world!")]);

    let (out, report) = run_normalize(&tree);

    assert_eq!(
        out,
        root(vec![node(
            "paragraph",
            vec![TreeNode::text("Hello, "), TreeNode::text("world!")]
        )])
    );
    assert_eq!(report.paragraphs_created, 1);
    assert_eq!(report.hoists, 0);
}

#[test]
fn test_adjacent_emphasis_is_merged() {
    let tree = root(vec![node(
        "paragraph",
        vec![
            node("emphasis", vec![TreeNode::text("Hello, ")]),
            node("emphasis", vec![TreeNode::text("world!")]),
        ],
    )]);

    let (out, report) = run_normalize(&tree);

    assert_eq!(
        out,
        root(vec![node(
            "paragraph",
            vec![node(
                "emphasis",
                vec![TreeNode::text("Hello, "), TreeNode::text("world!")]
            )]
        )])
    );
    assert_eq!(report.merged_nodes, 1);
    assert_eq!(report.merged_leaves, 0);
}

#[test]
fn test_adjacent_inline_code_values_concatenate() {
    let tree = root(vec![node(
        "paragraph",
        vec![
            TreeNode::literal("inlineCode", "a"),
            TreeNode::literal("inlineCode", "b"),
            TreeNode::literal("inlineCode", "c"),
            TreeNode::text(" and "),
            TreeNode::literal("inlineCode", "d"),
        ],
    )]);

    let (out, report) = run_normalize(&tree);

    let para = &children(&out)[0];
    assert_eq!(
        children(para),
        &[
            TreeNode::literal("inlineCode", "abc"),
            TreeNode::text(" and "),
            TreeNode::literal("inlineCode", "d"),
        ]
    );
    assert_eq!(report.merged_leaves, 2);
}

#[test]
fn test_block_under_nested_phrasing_is_hoisted_to_root() {
    // strong > blockquote > emphasis > code, straight from a parser
    let tree = root(vec![node(
        "strong",
        vec![node(
            "blockquote",
            vec![node("emphasis", vec![TreeNode::literal("code", "x = 1")])],
        )],
    )]);
    let classifier = Classifier::default();
    let mut doc = Document::from_tree(&tree);

    let report = hoist_blocks(&mut doc, &classifier).unwrap();

    let out = doc.to_tree();
    assert_eq!(kinds(children(&out)), vec!["strong", "blockquote"]);
    assert!(children(&children(&out)[0]).is_empty());
    let quote = &children(&out)[1];
    assert_eq!(kinds(children(quote)), vec!["emphasis", "code"]);
    assert!(children(&children(quote)[0]).is_empty());
    assert_eq!(report.hoists, 2);
    assert_eq!(report.traversals, 2);
    assert_eq!(violation(&doc, &classifier), None);
}

#[test]
fn test_hoisted_block_revisits_outer_containers() {
    // paragraph > strong > emphasis > code needs one traversal per level
    let tree = root(vec![node(
        "strong",
        vec![node("emphasis", vec![TreeNode::literal("code", "x")])],
    )]);

    let (out, report) = run_normalize(&tree);

    assert_eq!(kinds(children(&out)), vec!["paragraph", "code"]);
    assert_eq!(report.hoists, 3);
    assert_eq!(report.traversals, 4);
    assert_eq!(report.paragraphs_created, 1);
}

#[test]
fn test_block_inside_inline_element_leaves_the_paragraph() {
    let tree = root(vec![node(
        "paragraph",
        vec![
            TreeNode::text("see "),
            node(
                "mdxJsxTextElement",
                vec![node("textDirective", vec![TreeNode::literal("code", "x")])],
            ),
        ],
    )]);
    let config = NormalizeConfig::default();
    let classifier = Classifier::new(&config).unwrap();
    let mut doc = Document::from_tree(&tree);

    normalize(&mut doc, &classifier, &config).unwrap();

    let out = doc.to_tree();
    assert_eq!(kinds(children(&out)), vec!["paragraph", "code"]);
    let para = &children(&out)[0];
    assert_eq!(kinds(children(para)), vec!["text", "mdxJsxTextElement"]);
    assert_eq!(violation(&doc, &classifier), None);
}

#[test]
fn test_trailing_phrasing_is_rewrapped_after_hoist() {
    let tree = root(vec![node(
        "paragraph",
        vec![
            TreeNode::text("before"),
            TreeNode::literal("code", "block"),
            TreeNode::text("after"),
        ],
    )]);

    let (out, report) = run_normalize(&tree);

    assert_eq!(
        out,
        root(vec![
            node("paragraph", vec![TreeNode::text("before")]),
            TreeNode::literal("code", "block"),
            node("paragraph", vec![TreeNode::text("after")]),
        ])
    );
    assert_eq!(report.hoists, 1);
    assert_eq!(report.paragraphs_created, 1);
}

#[test]
fn test_empty_block_container_stays_empty() {
    let tree = root(vec![node("blockquote", vec![])]);
    let (out, report) = run_normalize(&tree);
    assert_eq!(out, tree);
    assert_eq!(report.paragraphs_created, 0);
}

#[test]
fn test_unknown_kinds_pass_through_untouched() {
    let json = r#"{
        "type": "root",
        "children": [
            {"type": "mysteryNode", "flavor": "spicy", "children": [
                {"type": "text", "value": "loose"},
                {"type": "paragraph", "children": [{"type": "code", "value": "x"}]}
            ]},
            {"type": "text", "value": "tail"}
        ]
    }"#;
    let tree = TreeNode::from_json(json).unwrap();

    let (out, _) = run_normalize(&tree);

    assert_eq!(kinds(children(&out)), vec!["mysteryNode", "paragraph"]);
    assert_eq!(children(&out)[0], children(&tree)[0]);
    let json = serde_json::to_value(&children(&out)[0]).unwrap();
    assert_eq!(json["flavor"], "spicy");
}

#[test]
fn test_target_directive_sets_next_heading_anchor() {
    let json = r#"{
        "type": "root",
        "children": [
            {"type": "paragraph", "children": [
                {"type": "textDirective", "name": "target", "attributes": {"id": "setup"}, "children": []}
            ]},
            {"type": "heading", "depth": 2, "children": [{"type": "text", "value": "Installation"}]}
        ]
    }"#;
    let tree = TreeNode::from_json(json).unwrap();
    let config = NormalizeConfig::default();
    let classifier = Classifier::new(&config).unwrap();
    let mut doc = Document::from_tree(&tree);

    let report = normalize(&mut doc, &classifier, &config).unwrap();

    assert_eq!(report.targets_applied, 1);
    let heading = doc
        .iter_dfs()
        .find(|&id| doc.kind(id).and_then(|k| k.heading_level()).is_some())
        .unwrap();
    assert_eq!(doc.attrs.anchor(heading), Some("setup"));
}

// ============================================================================
// Property tests
// ============================================================================

const CONTAINERS: [&str; 15] = [
    "paragraph",
    "heading",
    "emphasis",
    "strong",
    "delete",
    "link",
    "mdxJsxTextElement",
    "textDirective",
    "blockquote",
    "list",
    "listItem",
    "mdxJsxFlowElement",
    "containerDirective",
    "tableCell",
    "mysteryNode",
];

fn leaf() -> impl Strategy<Value = TreeNode> {
    prop_oneof![
        "[a-z ]{0,4}".prop_map(|s| TreeNode::text(&s)),
        "[a-z]{1,3}".prop_map(|s| TreeNode::literal("inlineCode", &s)),
        Just(TreeNode::new("break")),
        "[a-z]{0,3}".prop_map(|s| TreeNode::literal("code", &s)),
        Just(TreeNode::new("thematicBreak")),
        Just(TreeNode::literal("mdxjsEsm", "export const a = 1")),
    ]
}

fn subtree() -> impl Strategy<Value = TreeNode> {
    leaf().prop_recursive(5, 64, 5, |inner| {
        (
            prop::sample::select(CONTAINERS.to_vec()),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(kind, children)| TreeNode::parent(kind, children))
    })
}

fn document() -> impl Strategy<Value = TreeNode> {
    prop::collection::vec(subtree(), 0..6).prop_map(root)
}

proptest! {
    #[test]
    fn prop_reflow_restores_container_invariants(tree in document()) {
        let classifier = Classifier::default();
        let mut doc = Document::from_tree(&tree);

        reflow(&mut doc, &classifier).unwrap();

        prop_assert_eq!(violation(&doc, &classifier), None);
    }

    #[test]
    fn prop_reflow_is_idempotent(tree in document()) {
        let classifier = Classifier::default();
        let mut doc = Document::from_tree(&tree);

        reflow(&mut doc, &classifier).unwrap();
        let once = doc.to_tree();
        let (created, hoist) = reflow(&mut doc, &classifier).unwrap();

        prop_assert_eq!(created, 0);
        prop_assert_eq!(hoist.hoists, 0);
        prop_assert_eq!(hoist.traversals, 1);
        prop_assert_eq!(doc.to_tree(), once);
    }

    #[test]
    fn prop_only_merging_drops_leaves(tree in document()) {
        let config = NormalizeConfig::default();
        let classifier = Classifier::new(&config).unwrap();
        let mut doc = Document::from_tree(&tree);
        let before = doc.leaf_count();

        let report = normalize(&mut doc, &classifier, &config).unwrap();

        prop_assert_eq!(before, doc.leaf_count() + report.merged_leaves);
    }

    #[test]
    fn prop_normalized_trees_keep_every_invariant(tree in document()) {
        let config = NormalizeConfig::default();
        let classifier = Classifier::new(&config).unwrap();
        let mut doc = Document::from_tree(&tree);

        normalize(&mut doc, &classifier, &config).unwrap();

        prop_assert_eq!(violation(&doc, &classifier), None);
        prop_assert_eq!(adjacent_mergeable(&doc, &classifier), None);
    }

    #[test]
    fn prop_merge_after_merge_changes_nothing(tree in document()) {
        let classifier = Classifier::default();
        let mut doc = Document::from_tree(&tree);

        merge_adjacent_inlines(&mut doc, &classifier);
        let once = doc.to_tree();
        let second = merge_adjacent_inlines(&mut doc, &classifier);

        prop_assert_eq!(second.merged_nodes, 0);
        prop_assert_eq!(doc.to_tree(), once);
    }
}
