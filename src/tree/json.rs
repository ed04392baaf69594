//! mdast JSON interchange.
//!
//! The parser and serializer live outside this crate and speak mdast JSON.
//! [`TreeNode`] is the owned serde form of one mdast node; [`Document`]
//! converts to and from it. Fields this crate does not model are kept per
//! node and written back unchanged.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::attrs::{AttrValue, ElementAttribute};
use super::node::{Kind, Node, NodeId};
use super::Document;

/// Owned mdast node.
///
/// Deserialization is lenient: a modeled field whose JSON value has an
/// unexpected type stays in `extra` instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct TreeNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<bool>,
    /// JSX attribute list or directive attribute object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TreeNode {
    /// Create a node of the given mdast type.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    /// Create a parent node with children.
    pub fn parent(kind: &str, children: Vec<TreeNode>) -> Self {
        Self {
            children: Some(children),
            ..Self::new(kind)
        }
    }

    /// Create a literal node with a value.
    pub fn literal(kind: &str, value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(kind)
        }
    }

    /// Create a `text` node.
    pub fn text(value: &str) -> Self {
        Self::literal("text", value)
    }

    /// Parse a tree from mdast JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<Map<String, Value>> for TreeNode {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let kind = match map.remove("type") {
            Some(Value::String(kind)) => kind,
            Some(other) => return Err(format!("node `type` must be a string, found {other}")),
            None => return Err("missing field `type`".to_string()),
        };

        let children = if map
            .get("children")
            .and_then(Value::as_array)
            .is_some_and(|items| items.iter().all(is_node))
        {
            match map.remove("children") {
                Some(Value::Array(items)) => Some(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Object(child) => TreeNode::try_from(child).ok(),
                            _ => None,
                        })
                        .collect(),
                ),
                _ => None,
            }
        } else {
            None
        };

        Ok(TreeNode {
            kind,
            children,
            value: take(&mut map, "value", as_string),
            depth: take(&mut map, "depth", |v| {
                v.as_u64().and_then(|d| u8::try_from(d).ok())
            }),
            url: take(&mut map, "url", as_string),
            title: take(&mut map, "title", as_string),
            alt: take(&mut map, "alt", as_string),
            identifier: take(&mut map, "identifier", as_string),
            label: take(&mut map, "label", as_string),
            lang: take(&mut map, "lang", as_string),
            meta: take(&mut map, "meta", as_string),
            name: take(&mut map, "name", as_string),
            ordered: take(&mut map, "ordered", Value::as_bool),
            start: take(&mut map, "start", |v| {
                v.as_u64().and_then(|n| u32::try_from(n).ok())
            }),
            spread: take(&mut map, "spread", Value::as_bool),
            attributes: take(&mut map, "attributes", |v| {
                (!v.is_null()).then(|| v.clone())
            }),
            extra: map,
        })
    }
}

fn is_node(value: &Value) -> bool {
    value.get("type").is_some_and(Value::is_string)
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(String::from)
}

/// Remove `key` from `map` if `convert` accepts its value.
fn take<T>(
    map: &mut Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = convert(map.get(key)?)?;
    map.remove(key);
    Some(value)
}

impl Document {
    /// Build a document from an mdast tree.
    ///
    /// A `root` node becomes the document root; any other node is imported
    /// as the root's only child.
    pub fn from_tree(tree: &TreeNode) -> Self {
        let mut doc = Document::new();
        if tree.kind == "root" {
            doc.attrs.set_extra(NodeId::ROOT, tree.extra.clone());
            for child in tree.children.iter().flatten() {
                let id = doc.import_node(child);
                doc.append_child(NodeId::ROOT, id);
            }
        } else {
            let id = doc.import_node(tree);
            doc.append_child(NodeId::ROOT, id);
        }

        let unknown: BTreeSet<&str> = doc
            .iter_dfs()
            .filter_map(|id| match doc.kind(id) {
                Some(Kind::Unknown(name)) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        for name in unknown {
            debug!(kind = name, "passing through unknown node kind");
        }
        doc
    }

    /// Convert the document back to an mdast tree.
    pub fn to_tree(&self) -> TreeNode {
        self.export_node(NodeId::ROOT, false)
    }

    /// Owned copies of the children of `id`, without source positions.
    pub fn snapshot_children(&self, id: NodeId) -> Vec<TreeNode> {
        self.children(id)
            .map(|child| self.export_node(child, true))
            .collect()
    }

    fn import_node(&mut self, tree: &TreeNode) -> NodeId {
        let mut kind = Kind::from_type_name(&tree.kind);
        if let Kind::Heading(_) = kind {
            kind = Kind::Heading(tree.depth.unwrap_or(1).clamp(1, 6));
        }

        let mut extra = tree.extra.clone();
        if kind.heading_level().is_none() {
            if let Some(depth) = tree.depth {
                extra.insert("depth".to_string(), Value::from(depth));
            }
        }
        if matches!(kind, Kind::Unknown(_)) && tree.children.as_ref().is_some_and(Vec::is_empty) {
            extra.insert("children".to_string(), Value::Array(Vec::new()));
        }
        let id = if kind.has_value() {
            self.alloc_literal(kind.clone(), tree.value.as_deref().unwrap_or(""))
        } else {
            if let Some(value) = &tree.value {
                extra.insert("value".to_string(), Value::String(value.clone()));
            }
            self.alloc_node(Node::new(kind.clone()))
        };

        let attrs = &mut self.attrs;
        if let Some(v) = &tree.url {
            attrs.set_url(id, v);
        }
        if let Some(v) = &tree.title {
            attrs.set_title(id, v);
        }
        if let Some(v) = &tree.alt {
            attrs.set_alt(id, v);
        }
        if let Some(v) = &tree.identifier {
            attrs.set_identifier(id, v);
        }
        if let Some(v) = &tree.label {
            attrs.set_label(id, v);
        }
        if let Some(v) = &tree.lang {
            attrs.set_lang(id, v);
        }
        if let Some(v) = &tree.meta {
            attrs.set_meta(id, v);
        }
        if let Some(v) = &tree.name {
            attrs.set_name(id, v);
        }
        if let Some(v) = tree.ordered {
            attrs.set_ordered(id, v);
        }
        if let Some(v) = tree.start {
            attrs.set_start(id, v);
        }
        if let Some(v) = tree.spread {
            attrs.set_spread(id, v);
        }

        match (&kind, &tree.attributes) {
            (k, Some(Value::Array(items))) if k.is_element() => {
                for item in items {
                    if let Some(attr) = parse_element_attribute(item) {
                        attrs.push_element_attr(id, attr);
                    }
                }
            }
            (Kind::ContainerDirective | Kind::LeafDirective | Kind::TextDirective, Some(Value::Object(map))) => {
                for (key, value) in map {
                    match value {
                        Value::String(s) => attrs.set_directive_attr(id, key, s),
                        Value::Null => {}
                        other => attrs.set_directive_attr(id, key, &other.to_string()),
                    }
                }
            }
            (_, Some(other)) => {
                extra.insert("attributes".to_string(), other.clone());
            }
            (_, None) => {}
        }

        if let Some(anchor) = anchor_from_data(&extra) {
            attrs.set_anchor(id, &anchor);
        }
        attrs.set_extra(id, extra);

        for child in tree.children.iter().flatten() {
            let child_id = self.import_node(child);
            self.append_child(id, child_id);
        }

        id
    }

    fn export_node(&self, id: NodeId, strip_position: bool) -> TreeNode {
        let Some(node) = self.node(id) else {
            return TreeNode::default();
        };
        let kind = &node.kind;
        let attrs = &self.attrs;

        let mut extra = attrs.extra(id).cloned().unwrap_or_default();
        if strip_position {
            extra.remove("position");
        }

        let mut out = TreeNode {
            kind: kind.type_name().to_string(),
            depth: kind.heading_level(),
            url: attrs.url(id).map(String::from),
            title: attrs.title(id).map(String::from),
            alt: attrs.alt(id).map(String::from),
            identifier: attrs.identifier(id).map(String::from),
            label: attrs.label(id).map(String::from),
            lang: attrs.lang(id).map(String::from),
            meta: attrs.meta(id).map(String::from),
            name: attrs.name(id).map(String::from),
            ordered: attrs.ordered(id),
            start: attrs.start(id),
            spread: attrs.spread(id),
            ..Default::default()
        };

        if out.depth.is_some() {
            extra.remove("depth");
        } else if let Some(depth) = take(&mut extra, "depth", |v| {
            v.as_u64().and_then(|d| u8::try_from(d).ok())
        }) {
            out.depth = Some(depth);
        }

        if kind.has_value() {
            extra.remove("value");
            out.value = Some(self.text(node.text).to_string());
        } else {
            out.value = take(&mut extra, "value", as_string);
        }

        if kind.is_element() {
            extra.remove("attributes");
            let list: Vec<Value> = attrs
                .element_attrs(id)
                .iter()
                .map(element_attribute_to_json)
                .collect();
            out.attributes = Some(Value::Array(list));
        } else if let Some(map) = attrs.directive_attrs(id) {
            let object: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            out.attributes = Some(Value::Object(object));
        } else if let Some(other) = extra.remove("attributes") {
            out.attributes = Some(other);
        }

        if let Some(anchor) = attrs.anchor(id) {
            write_anchor(&mut extra, anchor, !kind.is_element());
        }

        let children: Vec<TreeNode> = self
            .children(id)
            .map(|child| self.export_node(child, strip_position))
            .collect();
        // An unknown parent with no children was imported with an empty
        // `children` array kept in `extra`.
        let is_parent = match kind {
            Kind::Unknown(_) => {
                !children.is_empty()
                    || extra
                        .get("children")
                        .and_then(Value::as_array)
                        .is_some_and(Vec::is_empty)
            }
            k => !k.is_leaf(),
        };
        if is_parent {
            extra.remove("children");
            out.children = Some(children);
        }
        out.extra = extra;

        out
    }
}

fn parse_element_attribute(item: &Value) -> Option<ElementAttribute> {
    let object = item.as_object()?;
    match object.get("type").and_then(Value::as_str) {
        Some("mdxJsxAttribute") => {
            let name = object.get("name")?.as_str()?.to_string();
            let value = match object.get("value") {
                None | Some(Value::Null) => AttrValue::Flag,
                Some(Value::String(s)) => AttrValue::Literal(s.clone()),
                Some(Value::Object(expr)) => AttrValue::Expression(
                    expr.get("value")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                ),
                Some(other) => AttrValue::Literal(other.to_string()),
            };
            Some(ElementAttribute::Named { name, value })
        }
        Some("mdxJsxExpressionAttribute") => Some(ElementAttribute::Spread(
            object
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        )),
        _ => None,
    }
}

fn element_attribute_to_json(attr: &ElementAttribute) -> Value {
    let mut object = Map::new();
    match attr {
        ElementAttribute::Named { name, value } => {
            object.insert("type".into(), "mdxJsxAttribute".into());
            object.insert("name".into(), Value::String(name.clone()));
            let value = match value {
                AttrValue::Literal(s) => Value::String(s.clone()),
                AttrValue::Expression(source) => serde_json::json!({
                    "type": "mdxJsxAttributeValueExpression",
                    "value": source,
                }),
                AttrValue::Flag => Value::Null,
            };
            object.insert("value".into(), value);
        }
        ElementAttribute::Spread(source) => {
            object.insert("type".into(), "mdxJsxExpressionAttribute".into());
            object.insert("value".into(), Value::String(source.clone()));
        }
    }
    Value::Object(object)
}

/// Read `data.id`, falling back to `data.hProperties.id`.
fn anchor_from_data(extra: &Map<String, Value>) -> Option<String> {
    let data = extra.get("data")?.as_object()?;
    let id = data
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty());
    id.or_else(|| data.get("hProperties")?.get("id")?.as_str())
        .filter(|id| !id.is_empty())
        .map(String::from)
}

fn write_anchor(extra: &mut Map<String, Value>, anchor: &str, with_hproperties: bool) {
    let data = extra
        .entry("data")
        .or_insert_with(|| Value::Object(Map::new()));
    if !data.is_object() {
        *data = Value::Object(Map::new());
    }
    let Some(data) = data.as_object_mut() else {
        return;
    };
    data.insert("id".into(), Value::String(anchor.to_string()));
    if with_hproperties {
        let props = data
            .entry("hProperties")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(props) = props.as_object_mut() {
            props.insert("id".into(), Value::String(anchor.to_string()));
        }
    }
}
