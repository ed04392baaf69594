//! Outline (table of contents) extraction.
//!
//! The outline lists every point of interest of a normalized document:
//!
//! - headings, as native heading nodes or `h1`..`h6` JSX elements
//! - symbol markers (`<Outline target={"pkg.Widget"} ... />`), whose depth is
//!   inferred from their dotted names
//! - operations of embedded Swagger schemas (`<OpenAPIViewer schema="..." />`)
//!
//! Extraction runs in two phases. Discovery visits points of interest in
//! document order and fixes each item's depth, id and titles; the chosen id
//! is written back to the node as its anchor. Accumulation then walks the
//! content and appends the text following each point of interest to its
//! item, for search.

mod openapi;
mod slugger;
mod symbol;

pub use openapi::{Operation, operations};
pub use slugger::{FALLBACK_SLUG, Slugger, slugify};
pub use symbol::{Symbol, domain_label, segment_count};

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{Category, Classifier};
use crate::config::OutlineConfig;
use crate::tree::{Document, Kind, NodeId, TreeNode};

/// One entry of a document outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlineItem {
    /// Fragment id, unique within the document. Empty for depth 0.
    pub id: String,
    pub title: String,
    /// Title qualified with its context, for search results.
    pub long_title: String,
    /// 1-6 for headings, inferred for symbols, 0 for content that precedes
    /// every point of interest.
    pub depth: u32,
    /// Position in the outline.
    pub order: u32,
    /// Copy of the heading's inline content.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headline: Vec<TreeNode>,
    /// Text following the point of interest.
    pub content: String,
    pub tags: BTreeSet<String>,
    pub metadata: BTreeMap<String, String>,
}

/// An [`OutlineItem`] without its content, as published with the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOutlineItem<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub long_title: &'a str,
    pub depth: u32,
    pub order: u32,
    #[serde(skip_serializing_if = "is_empty_slice")]
    pub headline: &'a [TreeNode],
    pub tags: &'a BTreeSet<String>,
    pub metadata: &'a BTreeMap<String, String>,
}

fn is_empty_slice(nodes: &&[TreeNode]) -> bool {
    nodes.is_empty()
}

impl OutlineItem {
    /// View of this item without content.
    pub fn public(&self) -> PublicOutlineItem<'_> {
        PublicOutlineItem {
            id: &self.id,
            title: &self.title,
            long_title: &self.long_title,
            depth: self.depth,
            order: self.order,
            headline: &self.headline,
            tags: &self.tags,
            metadata: &self.metadata,
        }
    }
}

/// What a point of interest is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointKind {
    Heading(u8),
    Symbol,
    OpenApi,
}

/// Extract the outline of a normalized document.
///
/// Item ids are written back to their nodes as anchor ids. Items are
/// returned in document order, followed by the operations of embedded
/// schemas; `order` numbers the returned list.
pub fn extract_outline(
    doc: &mut Document,
    classifier: &Classifier,
    config: &OutlineConfig,
) -> Vec<OutlineItem> {
    let points = find_points(doc, classifier, config);

    let mut discovery = Discovery::new(doc);
    for &(id, kind) in &points {
        match kind {
            PointKind::Heading(level) => discovery.heading(id, level),
            PointKind::Symbol => discovery.symbol(id),
            PointKind::OpenApi => discovery.openapi(id),
        }
    }
    let Discovery {
        mut items,
        item_of,
        skipped,
        operations,
        ..
    } = discovery;

    for (&node, &index) in &item_of {
        doc.attrs.set_anchor(node, &items[index].id);
    }

    let doc: &Document = doc;
    let mut contents = Contents {
        doc,
        classifier,
        items: &mut items,
        item_of: &item_of,
        skipped: &skipped,
        ancestors: point_ancestors(doc, &points),
        current: None,
        stray: String::new(),
    };
    contents.visit(NodeId::ROOT);
    let stray = contents.stray;

    if !stray.is_empty() && items.is_empty() {
        items.push(OutlineItem {
            content: stray,
            ..Default::default()
        });
    }
    items.extend(operations);

    for (order, item) in items.iter_mut().enumerate() {
        item.order = order as u32;
        item.content.truncate(item.content.trim_end().len());
    }
    items
}

/// Points of interest in document order.
fn find_points(
    doc: &Document,
    classifier: &Classifier,
    config: &OutlineConfig,
) -> Vec<(NodeId, PointKind)> {
    let mut points = Vec::new();
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        let Some(kind) = doc.kind(id) else {
            continue;
        };
        if classifier.category(kind) == Category::Opaque {
            continue;
        }
        if let Some(point) = point_kind(doc, id, config) {
            points.push((id, point));
        }
        let mut children: Vec<NodeId> = doc.children(id).collect();
        children.reverse();
        stack.extend(children);
    }
    points
}

fn point_kind(doc: &Document, id: NodeId, config: &OutlineConfig) -> Option<PointKind> {
    let kind = doc.kind(id)?;
    let name = doc.attrs.name(id);

    if *kind == Kind::FlowElement {
        if name == Some(config.symbol_element.as_str()) {
            return Some(PointKind::Symbol);
        }
        if name == Some(config.openapi_element.as_str()) {
            return Some(PointKind::OpenApi);
        }
    }

    let level = match kind {
        Kind::Heading(level) => Some(*level),
        k if k.is_element() => name.and_then(heading_level_of_name),
        _ => None,
    }?;
    if !config.nested_headings && doc.parent(id) != Some(NodeId::ROOT) {
        return None;
    }
    Some(PointKind::Heading(level))
}

/// Level of an `h1`..`h6` element name.
fn heading_level_of_name(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h', digit @ b'1'..=b'6'] => Some(digit - b'0'),
        _ => None,
    }
}

fn point_ancestors(doc: &Document, points: &[(NodeId, PointKind)]) -> HashSet<NodeId> {
    let mut ancestors = HashSet::new();
    for &(id, _) in points {
        let mut cursor = doc.parent(id);
        while let Some(parent) = cursor {
            if !ancestors.insert(parent) {
                break;
            }
            cursor = doc.parent(parent);
        }
    }
    ancestors
}

/// Discovery state, threaded through the points of interest in order.
struct Discovery<'a> {
    doc: &'a Document,
    slugger: Slugger,
    /// Title of the last depth-1 item.
    top_level_title: Option<String>,
    /// Dotted name of the last symbol since the last heading.
    last_fqn: Option<String>,
    last_depth: i64,
    items: Vec<OutlineItem>,
    item_of: HashMap<NodeId, usize>,
    /// Points of interest that produced no item.
    skipped: HashSet<NodeId>,
    operations: Vec<OutlineItem>,
}

impl<'a> Discovery<'a> {
    fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            slugger: Slugger::new(),
            top_level_title: None,
            last_fqn: None,
            last_depth: 0,
            items: Vec::new(),
            item_of: HashMap::new(),
            skipped: HashSet::new(),
            operations: Vec::new(),
        }
    }

    fn heading(&mut self, id: NodeId, level: u8) {
        let doc = self.doc;
        self.last_fqn = None;
        self.last_depth = i64::from(level);

        let title = doc.to_plain_string(id).trim().to_string();
        if title.is_empty() {
            debug!(node = id.0, "skipping heading without text");
            self.skipped.insert(id);
            return;
        }

        let explicit = if doc.kind(id).is_some_and(Kind::is_element) {
            doc.attrs.element_string(id, "id")
        } else {
            doc.attrs.anchor(id)
        };

        let mut item = self.item(title, u32::from(level), explicit);
        item.headline = doc.snapshot_children(id);
        self.push(id, item);
    }

    fn symbol(&mut self, id: NodeId) {
        let doc = self.doc;
        let symbol = Symbol::from_node(doc, id);

        let depth = match (&self.last_fqn, &symbol.target) {
            (None, _) => self.last_depth + 1,
            (Some(last), Some(fqn)) => {
                let diff = segment_count(fqn) as i64 - segment_count(last) as i64;
                self.last_depth + diff
            }
            (Some(_), None) => {
                debug!(node = id.0, "skipping symbol marker without target");
                self.skipped.insert(id);
                return;
            }
        }
        .max(1);
        if let Some(fqn) = &symbol.target {
            self.last_fqn = Some(fqn.clone());
        }
        self.last_depth = depth;

        let Some(title) = symbol.title().map(String::from) else {
            debug!(node = id.0, "skipping symbol marker without fullname");
            self.skipped.insert(id);
            return;
        };

        let mut item = self.item(title, depth as u32, symbol.target.as_deref());
        if let Some(long_title) = symbol.long_title() {
            item.long_title = long_title;
        }
        let fields = [
            ("domain", &symbol.domain),
            ("module", &symbol.module),
            ("objectType", &symbol.object_type),
            ("fullname", &symbol.fullname),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                item.metadata.insert(key.to_string(), value.clone());
            }
        }
        if let Some(object_type) = &symbol.object_type {
            item.tags.insert(object_type.clone());
        }
        self.push(id, item);
    }

    fn openapi(&mut self, id: NodeId) {
        let doc = self.doc;
        let Some(schema) = doc.attrs.element_string(id, "schema") else {
            return;
        };
        let found = match operations(schema) {
            Ok(found) => found,
            Err(err) => {
                debug!(node = id.0, error = %err, "ignoring unparseable schema");
                return;
            }
        };
        for op in found {
            let id = self.slugger.reserve(&op.operation_id);
            self.operations.push(OutlineItem {
                id,
                title: op.title,
                long_title: op.long_title,
                depth: 1,
                content: op.content,
                ..Default::default()
            });
        }
    }

    /// Common item fields: id, depth and the context-qualified title.
    fn item(&mut self, title: String, depth: u32, explicit: Option<&str>) -> OutlineItem {
        if depth == 1 {
            self.top_level_title = Some(title.clone());
        }
        let anchor = match explicit.filter(|e| !e.is_empty()) {
            Some(explicit) => self.slugger.reserve(explicit),
            None => self.slugger.slug(&title),
        };
        let long_title = match &self.top_level_title {
            Some(top) if depth != 1 => format!("{top} - {title}"),
            _ => title.clone(),
        };
        OutlineItem {
            id: anchor,
            title,
            long_title,
            depth,
            ..Default::default()
        }
    }

    fn push(&mut self, id: NodeId, item: OutlineItem) {
        self.item_of.insert(id, self.items.len());
        self.items.push(item);
    }
}

/// Content accumulation state.
struct Contents<'a> {
    doc: &'a Document,
    classifier: &'a Classifier,
    items: &'a mut Vec<OutlineItem>,
    item_of: &'a HashMap<NodeId, usize>,
    skipped: &'a HashSet<NodeId>,
    /// Nodes with a point of interest below them.
    ancestors: HashSet<NodeId>,
    current: Option<usize>,
    /// Text seen before the first point of interest.
    stray: String,
}

impl Contents<'_> {
    fn visit(&mut self, id: NodeId) {
        let doc = self.doc;
        let Some(kind) = doc.kind(id) else {
            return;
        };
        if self.classifier.category(kind) == Category::Opaque {
            return;
        }

        if let Some(&index) = self.item_of.get(&id) {
            self.current = Some(index);
            if !self.stray.is_empty() {
                let stray = std::mem::take(&mut self.stray);
                let content = &mut self.items[index].content;
                content.push_str(&stray);
                content.push(' ');
            }
            if kind.heading_level().is_some() || heading_level_of_element(doc, id) {
                return;
            }
            let synopsis = Symbol::from_node(doc, id).synopsis();
            if !synopsis.is_empty() {
                self.push_text(&synopsis);
            }
            self.visit_children(id);
            return;
        }

        let transparent = matches!(kind, Kind::Root | Kind::List | Kind::Table | Kind::TableRow)
            || self.classifier.is_block_container(kind)
            || self.skipped.contains(&id)
            || self.ancestors.contains(&id);
        if transparent {
            self.visit_children(id);
            return;
        }

        let text = doc.to_plain_string(id);
        self.push_text(&text);
    }

    fn visit_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.doc.children(id).collect();
        for child in children {
            self.visit(child);
        }
    }

    fn push_text(&mut self, text: &str) {
        let target = match self.current {
            Some(index) => &mut self.items[index].content,
            None => &mut self.stray,
        };
        target.push_str(text);
        target.push(' ');
    }
}

fn heading_level_of_element(doc: &Document, id: NodeId) -> bool {
    doc.kind(id).is_some_and(Kind::is_element)
        && doc.attrs.name(id).and_then(heading_level_of_name).is_some()
}
