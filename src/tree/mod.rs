//! Arena representation of a content tree.
//!
//! A [`Document`] owns every node of one page:
//! - Nodes with a closed set of kinds (paragraphs, headings, emphasis, ...)
//! - Sparse attributes (url, element name, JSX attributes) via [`AttributeMap`]
//! - A text buffer holding literal values, referenced by [`TextRange`]
//!
//! The tree uses a parent-pointer / first-child / next-sibling layout. Moving
//! a node is always a [`Document::detach`] followed by an insertion, so a node
//! is never reachable from two places. Detached nodes stay in the arena but
//! are no longer visited by any traversal.
//!
//! # Example
//!
//! ```
//! use doctree::tree::{Document, Kind, Node, NodeId};
//!
//! let mut doc = Document::new();
//! let para = doc.alloc_node(Node::new(Kind::Paragraph));
//! doc.append_child(NodeId::ROOT, para);
//! let text = doc.alloc_literal(Kind::Text, "Hello");
//! doc.append_child(para, text);
//!
//! assert_eq!(doc.to_plain_string(NodeId::ROOT), "Hello");
//! ```

mod attrs;
pub mod json;
mod node;

pub use attrs::{AttrValue, AttributeMap, ElementAttribute};
pub use json::TreeNode;
pub use node::{Kind, Node, NodeId, TextRange};

/// One document's content tree.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes ever allocated (index 0 is always the root).
    nodes: Vec<Node>,
    /// Sparse node attributes.
    pub attrs: AttributeMap,
    /// Text buffer for literal values.
    text: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document with a root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Kind::Root)],
            attrs: AttributeMap::new(),
            text: String::new(),
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Kind of a node.
    pub fn kind(&self, id: NodeId) -> Option<&Kind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Number of allocated nodes, including detached ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a new node and return its ID.
    pub fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate a literal node holding `value`.
    pub fn alloc_literal(&mut self, kind: Kind, value: &str) -> NodeId {
        let range = self.append_text(value);
        self.alloc_node(Node::literal(kind, range))
    }

    /// Append text to the buffer and return the range.
    pub fn append_text(&mut self, text: &str) -> TextRange {
        let start = self.text.len() as u32;
        self.text.push_str(text);
        TextRange::new(start, text.len() as u32)
    }

    /// Get text from a range.
    pub fn text(&self, range: TextRange) -> &str {
        let start = range.start as usize;
        let end = range.end() as usize;
        &self.text[start..end]
    }

    /// Literal value of a node (empty for non-literal kinds).
    pub fn value(&self, id: NodeId) -> &str {
        self.node(id).map(|n| self.text(n.text)).unwrap_or("")
    }

    /// Replace the literal value of a node.
    ///
    /// The old value stays in the buffer but becomes unreachable.
    pub fn set_value(&mut self, id: NodeId, value: &str) {
        let range = self.append_text(value);
        if let Some(node) = self.node_mut(id) {
            node.text = range;
        }
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Next sibling of a node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.next_sibling)
    }

    /// Previous sibling of a node (linear in the number of siblings).
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let mut prev = None;
        for child in self.children(parent) {
            if child == id {
                return prev;
            }
            prev = Some(child);
        }
        None
    }

    /// Last child of a node.
    pub fn last_child(&self, parent: NodeId) -> Option<NodeId> {
        self.children(parent).last()
    }

    /// Append a child node to a parent.
    ///
    /// The child must not be attached anywhere else.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
            child_node.next_sibling = None;
        }

        match self.last_child(parent) {
            Some(last) => {
                if let Some(last_node) = self.node_mut(last) {
                    last_node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(parent_node) = self.node_mut(parent) {
                    parent_node.first_child = Some(child);
                }
            }
        }
    }

    /// Insert a detached node immediately after `anchor`, under the same parent.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        let parent = self.parent(anchor);
        let after = self.next_sibling(anchor);
        if let Some(n) = self.node_mut(node) {
            n.parent = parent;
            n.next_sibling = after;
        }
        if let Some(a) = self.node_mut(anchor) {
            a.next_sibling = Some(node);
        }
    }

    /// Insert a detached node immediately before `anchor`, under the same parent.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) {
        let Some(parent) = self.parent(anchor) else {
            return;
        };
        match self.prev_sibling(anchor) {
            Some(prev) => self.insert_after(prev, node),
            None => {
                if let Some(n) = self.node_mut(node) {
                    n.parent = Some(parent);
                    n.next_sibling = Some(anchor);
                }
                if let Some(p) = self.node_mut(parent) {
                    p.first_child = Some(node);
                }
            }
        }
    }

    /// Unlink a node (with its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let next = self.next_sibling(id);
        match self.prev_sibling(id) {
            Some(prev) => {
                if let Some(p) = self.node_mut(prev) {
                    p.next_sibling = next;
                }
            }
            None => {
                if let Some(p) = self.node_mut(parent) {
                    p.first_child = next;
                }
            }
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
            n.next_sibling = None;
        }
    }

    /// Detach every child of `parent`, returning them in order.
    pub fn take_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let children: Vec<NodeId> = self.children(parent).collect();
        for &child in &children {
            if let Some(n) = self.node_mut(child) {
                n.parent = None;
                n.next_sibling = None;
            }
        }
        if let Some(p) = self.node_mut(parent) {
            p.first_child = None;
        }
        children
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            doc: self,
            current: self.node(parent).and_then(|n| n.first_child),
        }
    }

    /// Number of children of a node.
    pub fn child_count(&self, parent: NodeId) -> usize {
        self.children(parent).count()
    }

    /// Iterate over all reachable nodes in depth-first pre-order.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        self.iter_subtree(NodeId::ROOT)
    }

    /// Iterate over a subtree in depth-first pre-order, starting at `id`.
    pub fn iter_subtree(&self, id: NodeId) -> DfsIter<'_> {
        DfsIter {
            doc: self,
            stack: vec![id],
        }
    }

    /// Number of nodes reachable from the root (the root included).
    pub fn reachable_count(&self) -> usize {
        self.iter_dfs().count()
    }

    /// Number of reachable nodes whose kind is a leaf kind.
    pub fn leaf_count(&self) -> usize {
        self.iter_dfs()
            .filter(|&id| self.kind(id).is_some_and(Kind::is_leaf))
            .count()
    }

    /// Plain text of a subtree.
    ///
    /// Concatenates literal values and image alt text in document order,
    /// without separators.
    pub fn to_plain_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_plain(id, &mut out);
        out
    }

    fn collect_plain(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        if node.kind.has_value() {
            out.push_str(self.text(node.text));
        } else if node.kind == Kind::Image
            && let Some(alt) = self.attrs.alt(id)
        {
            out.push_str(alt);
        }
        for child in self.children(id) {
            self.collect_plain(child, out);
        }
    }

    /// Plain text of the children of `id` (the node's own value excluded).
    pub fn children_plain_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.collect_plain(child, &mut out);
        }
        out
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    doc: &'a Document,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Depth-first pre-order iterator over a subtree.
pub struct DfsIter<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<NodeId> = self.doc.children(current).collect();
        children.reverse();
        self.stack.extend(children);

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(doc: &mut Document, parent: NodeId, value: &str) -> NodeId {
        let id = doc.alloc_literal(Kind::Text, value);
        doc.append_child(parent, id);
        id
    }

    #[test]
    fn test_document_creation() {
        let doc = Document::new();
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.root(), NodeId::ROOT);

        let root = doc.node(NodeId::ROOT).unwrap();
        assert_eq!(root.kind, Kind::Root);
        assert!(root.parent.is_none());
    }

    #[test]
    fn test_text_buffer() {
        let mut doc = Document::new();
        let a = doc.append_text("Hello, ");
        let b = doc.append_text("world!");
        assert_eq!(doc.text(a), "Hello, ");
        assert_eq!(doc.text(b), "world!");
    }

    #[test]
    fn test_set_value_repoints_range() {
        let mut doc = Document::new();
        let code = doc.alloc_literal(Kind::InlineCode, "a");
        doc.set_value(code, "ab");
        assert_eq!(doc.value(code), "ab");
    }

    #[test]
    fn test_detach_and_insert() {
        let mut doc = Document::new();
        let a = text(&mut doc, NodeId::ROOT, "a");
        let b = text(&mut doc, NodeId::ROOT, "b");
        let c = text(&mut doc, NodeId::ROOT, "c");

        doc.detach(b);
        assert_eq!(doc.children(NodeId::ROOT).collect::<Vec<_>>(), vec![a, c]);
        assert!(doc.parent(b).is_none());

        doc.insert_after(c, b);
        assert_eq!(doc.children(NodeId::ROOT).collect::<Vec<_>>(), vec![a, c, b]);

        doc.detach(a);
        doc.insert_before(c, a);
        assert_eq!(doc.children(NodeId::ROOT).collect::<Vec<_>>(), vec![a, c, b]);

        doc.detach(b);
        doc.insert_before(a, b);
        assert_eq!(doc.children(NodeId::ROOT).collect::<Vec<_>>(), vec![b, a, c]);
        assert_eq!(doc.parent(b), Some(NodeId::ROOT));
    }

    #[test]
    fn test_take_children() {
        let mut doc = Document::new();
        let para = doc.alloc_node(Node::new(Kind::Paragraph));
        doc.append_child(NodeId::ROOT, para);
        let a = text(&mut doc, para, "a");
        let b = text(&mut doc, para, "b");

        assert_eq!(doc.take_children(para), vec![a, b]);
        assert_eq!(doc.child_count(para), 0);
        assert!(doc.parent(a).is_none());
        assert_eq!(doc.leaf_count(), 0);
    }

    #[test]
    fn test_dfs_iteration() {
        let mut doc = Document::new();
        let para = doc.alloc_node(Node::new(Kind::Paragraph));
        doc.append_child(NodeId::ROOT, para);
        let t1 = text(&mut doc, para, "x");
        let em = doc.alloc_node(Node::new(Kind::Emphasis));
        doc.append_child(para, em);
        let t2 = text(&mut doc, em, "y");

        let order: Vec<_> = doc.iter_dfs().collect();
        assert_eq!(order, vec![NodeId::ROOT, para, t1, em, t2]);
        assert_eq!(doc.leaf_count(), 2);
        assert_eq!(doc.reachable_count(), 5);
    }

    #[test]
    fn test_plain_string_includes_alt_text() {
        let mut doc = Document::new();
        let para = doc.alloc_node(Node::new(Kind::Paragraph));
        doc.append_child(NodeId::ROOT, para);
        text(&mut doc, para, "see ");
        let img = doc.alloc_node(Node::new(Kind::Image));
        doc.attrs.set_alt(img, "diagram");
        doc.append_child(para, img);
        let code = doc.alloc_literal(Kind::InlineCode, " x()");
        doc.append_child(para, code);

        assert_eq!(doc.to_plain_string(para), "see diagram x()");
    }
}
