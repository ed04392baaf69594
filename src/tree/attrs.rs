//! Sparse attributes for tree nodes.
//!
//! Most nodes carry no attributes beyond their kind and value. Like the
//! literal values, scalar string attributes are stored in one contiguous
//! buffer with [`TextRange`] references, so a node without attributes costs
//! nothing here.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::node::{NodeId, TextRange};

/// Value of a JSX attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// `name="literal"`
    Literal(String),
    /// `name={expression}`; holds the expression source.
    Expression(String),
    /// `name` with no value.
    Flag,
}

/// A single attribute of a JSX element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementAttribute {
    Named { name: String, value: AttrValue },
    /// `{...spread}`; holds the expression source.
    Spread(String),
}

impl ElementAttribute {
    /// Create a named attribute with a literal string value.
    pub fn literal(name: &str, value: &str) -> Self {
        ElementAttribute::Named {
            name: name.to_string(),
            value: AttrValue::Literal(value.to_string()),
        }
    }

    /// Create a named attribute with an expression value.
    pub fn expression(name: &str, source: &str) -> Self {
        ElementAttribute::Named {
            name: name.to_string(),
            value: AttrValue::Expression(source.to_string()),
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            ElementAttribute::Named { name, .. } => Some(name),
            ElementAttribute::Spread(_) => None,
        }
    }
}

/// Sparse map for node attributes.
#[derive(Debug, Default, Clone)]
pub struct AttributeMap {
    /// Contiguous buffer for scalar string attribute values.
    buffer: String,
    /// Link/image/definition target.
    url: HashMap<NodeId, TextRange>,
    /// Link/image/definition title.
    title: HashMap<NodeId, TextRange>,
    /// Image alt text.
    alt: HashMap<NodeId, TextRange>,
    /// Reference/definition identifier.
    identifier: HashMap<NodeId, TextRange>,
    /// Reference/definition label as written.
    label: HashMap<NodeId, TextRange>,
    /// Code block language.
    lang: HashMap<NodeId, TextRange>,
    /// Code block meta string.
    meta: HashMap<NodeId, TextRange>,
    /// JSX element or directive name.
    name: HashMap<NodeId, TextRange>,
    /// Anchor id assigned to the node (`data.id`).
    anchor: HashMap<NodeId, TextRange>,
    ordered: HashMap<NodeId, bool>,
    start: HashMap<NodeId, u32>,
    spread: HashMap<NodeId, bool>,
    /// JSX element attributes, in source order.
    element_attrs: HashMap<NodeId, Vec<ElementAttribute>>,
    /// Directive attributes (`{#id .class key=value}`).
    directive_attrs: HashMap<NodeId, BTreeMap<String, String>>,
    /// Fields this crate does not model, kept for the round trip.
    extra: HashMap<NodeId, Map<String, Value>>,
}

macro_rules! string_attr {
    ($field:ident, $setter:ident, $doc:literal) => {
        #[doc = concat!("Set the ", $doc, " for a node.")]
        pub fn $setter(&mut self, node: NodeId, value: &str) {
            let range = self.append(value);
            self.$field.insert(node, range);
        }

        #[doc = concat!("Get the ", $doc, " for a node.")]
        pub fn $field(&self, node: NodeId) -> Option<&str> {
            self.$field.get(&node).map(|r| self.get_str(*r))
        }
    };
}

impl AttributeMap {
    /// Create a new empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&mut self, s: &str) -> TextRange {
        let start = self.buffer.len() as u32;
        self.buffer.push_str(s);
        TextRange::new(start, s.len() as u32)
    }

    fn get_str(&self, range: TextRange) -> &str {
        let start = range.start as usize;
        let end = range.end() as usize;
        &self.buffer[start..end]
    }

    string_attr!(url, set_url, "url");
    string_attr!(title, set_title, "title");
    string_attr!(alt, set_alt, "alt text");
    string_attr!(identifier, set_identifier, "identifier");
    string_attr!(label, set_label, "label");
    string_attr!(lang, set_lang, "code language");
    string_attr!(meta, set_meta, "code meta string");
    string_attr!(name, set_name, "element or directive name");
    string_attr!(anchor, set_anchor, "anchor id");

    // --- lists ---

    /// Set whether a list is ordered.
    pub fn set_ordered(&mut self, node: NodeId, ordered: bool) {
        self.ordered.insert(node, ordered);
    }

    /// Whether a list is ordered (None if never set).
    pub fn ordered(&self, node: NodeId) -> Option<bool> {
        self.ordered.get(&node).copied()
    }

    /// Set the start number of an ordered list.
    pub fn set_start(&mut self, node: NodeId, start: u32) {
        self.start.insert(node, start);
    }

    /// Start number of an ordered list.
    pub fn start(&self, node: NodeId) -> Option<u32> {
        self.start.get(&node).copied()
    }

    /// Set whether a list or list item is spread (loose).
    pub fn set_spread(&mut self, node: NodeId, spread: bool) {
        self.spread.insert(node, spread);
    }

    /// Whether a list or list item is spread.
    pub fn spread(&self, node: NodeId) -> Option<bool> {
        self.spread.get(&node).copied()
    }

    // --- JSX element attributes ---

    /// All attributes of a JSX element, in source order.
    pub fn element_attrs(&self, node: NodeId) -> &[ElementAttribute] {
        self.element_attrs
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append an attribute to a JSX element.
    pub fn push_element_attr(&mut self, node: NodeId, attr: ElementAttribute) {
        self.element_attrs.entry(node).or_default().push(attr);
    }

    /// Get the value of a named JSX attribute (first match).
    pub fn element_attr(&self, node: NodeId, name: &str) -> Option<&AttrValue> {
        self.element_attrs(node).iter().find_map(|attr| match attr {
            ElementAttribute::Named { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    /// Check if a JSX element has a named attribute.
    pub fn has_element_attr(&self, node: NodeId, name: &str) -> bool {
        self.element_attrs(node)
            .iter()
            .any(|attr| attr.name() == Some(name))
    }

    /// Get a JSX attribute written as a string literal (`name="value"`).
    pub fn element_string(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.element_attr(node, name)? {
            AttrValue::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Get a JSX attribute written as a literal expression (`name={"value"}`)
    /// and parse the expression as JSON.
    ///
    /// Returns None when the attribute is absent, is not an expression, or
    /// the expression is not a JSON literal of the requested type.
    pub fn element_literal<T: DeserializeOwned>(&self, node: NodeId, name: &str) -> Option<T> {
        match self.element_attr(node, name)? {
            AttrValue::Expression(source) => serde_json::from_str(source).ok(),
            _ => None,
        }
    }

    // --- directive attributes ---

    /// Attributes of a directive node.
    pub fn directive_attrs(&self, node: NodeId) -> Option<&BTreeMap<String, String>> {
        self.directive_attrs.get(&node)
    }

    /// Set a directive attribute.
    pub fn set_directive_attr(&mut self, node: NodeId, key: &str, value: &str) {
        self.directive_attrs
            .entry(node)
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    // --- passthrough ---

    /// Unmodelled fields of a node.
    pub fn extra(&self, node: NodeId) -> Option<&Map<String, Value>> {
        self.extra.get(&node)
    }

    /// Store unmodelled fields of a node.
    pub fn set_extra(&mut self, node: NodeId, fields: Map<String, Value>) {
        if !fields.is_empty() {
            self.extra.insert(node, fields);
        }
    }
}
