//! Tree node types and kinds.

/// Unique identifier for a node within a [`Document`](super::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node ID (always 0).
    pub const ROOT: NodeId = NodeId(0);
}

/// Kind of a node, mirroring the mdast/MDX node vocabulary.
///
/// The set is closed: anything the parser emits that is not listed here is
/// carried as [`Kind::Unknown`] with its original type name, so it survives a
/// round trip without being touched by the normalization passes.
///
/// Kinds fall into three families:
/// - block content (paragraphs, headings, lists, JSX flow elements, ...)
/// - phrasing content (text, emphasis, links, JSX text elements, ...)
/// - opaque statements (ESM imports/exports, frontmatter, unknown kinds)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    /// Document root.
    #[default]
    Root,

    // --- block content ---
    Paragraph,
    /// Heading with level 1-6.
    Heading(u8),
    ThematicBreak,
    Blockquote,
    /// Ordered/unordered is an attribute, see `AttributeMap::ordered`.
    List,
    ListItem,
    /// Fenced or indented code block (literal).
    Code,
    /// Display math block (literal).
    Math,
    Table,
    TableRow,
    TableCell,
    /// Link reference definition (`[id]: url`).
    Definition,
    FootnoteDefinition,
    /// `:::name` directive.
    ContainerDirective,
    /// `::name` directive.
    LeafDirective,
    /// `mdxJsxFlowElement`.
    FlowElement,
    /// `mdxFlowExpression`.
    FlowExpression,

    // --- phrasing content ---
    /// Leaf text content.
    Text,
    Emphasis,
    Strong,
    /// GFM strikethrough.
    Delete,
    /// Code span (literal).
    InlineCode,
    InlineMath,
    Break,
    Link,
    LinkReference,
    Image,
    ImageReference,
    FootnoteReference,
    /// Raw HTML (literal).
    Html,
    /// `mdxJsxTextElement`.
    TextElement,
    /// `mdxTextExpression`.
    TextExpression,
    /// `:name` directive.
    TextDirective,

    // --- opaque ---
    /// `mdxjsEsm` import/export statements.
    Esm,
    /// YAML frontmatter.
    Yaml,
    /// A node type this crate does not know about.
    Unknown(String),
}

impl Kind {
    /// Map an mdast `type` name to a kind.
    ///
    /// Headings start at level 1; the real level is read from the `depth`
    /// field by the importer.
    pub fn from_type_name(name: &str) -> Kind {
        match name {
            "root" => Kind::Root,
            "paragraph" => Kind::Paragraph,
            "heading" => Kind::Heading(1),
            "thematicBreak" => Kind::ThematicBreak,
            "blockquote" => Kind::Blockquote,
            "list" => Kind::List,
            "listItem" => Kind::ListItem,
            "code" => Kind::Code,
            "math" => Kind::Math,
            "table" => Kind::Table,
            "tableRow" => Kind::TableRow,
            "tableCell" => Kind::TableCell,
            "definition" => Kind::Definition,
            "footnoteDefinition" => Kind::FootnoteDefinition,
            "containerDirective" => Kind::ContainerDirective,
            "leafDirective" => Kind::LeafDirective,
            "mdxJsxFlowElement" => Kind::FlowElement,
            "mdxFlowExpression" => Kind::FlowExpression,
            "text" => Kind::Text,
            "emphasis" => Kind::Emphasis,
            "strong" => Kind::Strong,
            "delete" => Kind::Delete,
            "inlineCode" => Kind::InlineCode,
            "inlineMath" => Kind::InlineMath,
            "break" => Kind::Break,
            "link" => Kind::Link,
            "linkReference" => Kind::LinkReference,
            "image" => Kind::Image,
            "imageReference" => Kind::ImageReference,
            "footnoteReference" => Kind::FootnoteReference,
            "html" => Kind::Html,
            "mdxJsxTextElement" => Kind::TextElement,
            "mdxTextExpression" => Kind::TextExpression,
            "textDirective" => Kind::TextDirective,
            "mdxjsEsm" => Kind::Esm,
            "yaml" => Kind::Yaml,
            other => Kind::Unknown(other.to_string()),
        }
    }

    /// The mdast `type` name of this kind.
    pub fn type_name(&self) -> &str {
        match self {
            Kind::Root => "root",
            Kind::Paragraph => "paragraph",
            Kind::Heading(_) => "heading",
            Kind::ThematicBreak => "thematicBreak",
            Kind::Blockquote => "blockquote",
            Kind::List => "list",
            Kind::ListItem => "listItem",
            Kind::Code => "code",
            Kind::Math => "math",
            Kind::Table => "table",
            Kind::TableRow => "tableRow",
            Kind::TableCell => "tableCell",
            Kind::Definition => "definition",
            Kind::FootnoteDefinition => "footnoteDefinition",
            Kind::ContainerDirective => "containerDirective",
            Kind::LeafDirective => "leafDirective",
            Kind::FlowElement => "mdxJsxFlowElement",
            Kind::FlowExpression => "mdxFlowExpression",
            Kind::Text => "text",
            Kind::Emphasis => "emphasis",
            Kind::Strong => "strong",
            Kind::Delete => "delete",
            Kind::InlineCode => "inlineCode",
            Kind::InlineMath => "inlineMath",
            Kind::Break => "break",
            Kind::Link => "link",
            Kind::LinkReference => "linkReference",
            Kind::Image => "image",
            Kind::ImageReference => "imageReference",
            Kind::FootnoteReference => "footnoteReference",
            Kind::Html => "html",
            Kind::TextElement => "mdxJsxTextElement",
            Kind::TextExpression => "mdxTextExpression",
            Kind::TextDirective => "textDirective",
            Kind::Esm => "mdxjsEsm",
            Kind::Yaml => "yaml",
            Kind::Unknown(name) => name,
        }
    }

    /// Check if this kind can never have children.
    ///
    /// Unknown kinds are not leaves: whatever children they carry are kept.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Kind::Text
                | Kind::InlineCode
                | Kind::InlineMath
                | Kind::Break
                | Kind::Image
                | Kind::ImageReference
                | Kind::FootnoteReference
                | Kind::Html
                | Kind::TextExpression
                | Kind::Code
                | Kind::Math
                | Kind::ThematicBreak
                | Kind::Definition
                | Kind::FlowExpression
                | Kind::Esm
                | Kind::Yaml
        )
    }

    /// Check if this kind carries a literal `value`.
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            Kind::Text
                | Kind::InlineCode
                | Kind::InlineMath
                | Kind::Html
                | Kind::TextExpression
                | Kind::Code
                | Kind::Math
                | Kind::FlowExpression
                | Kind::Esm
                | Kind::Yaml
        )
    }

    /// Check if this is a JSX element (flow or text).
    pub fn is_element(&self) -> bool {
        matches!(self, Kind::FlowElement | Kind::TextElement)
    }

    /// Heading level for native headings.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Kind::Heading(level) => Some(*level),
            _ => None,
        }
    }
}

/// Range into the document's text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    /// Byte offset into `Document::text`.
    pub start: u32,
    /// Length in bytes.
    pub len: u32,
}

impl TextRange {
    /// Create a new text range.
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Check if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the end offset.
    pub fn end(&self) -> u32 {
        self.start + self.len
    }
}

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node kind.
    pub kind: Kind,
    /// Parent node (None for the root and for detached nodes).
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Next sibling node.
    pub next_sibling: Option<NodeId>,
    /// Literal value range (only for kinds with a value).
    pub text: TextRange,
}

impl Node {
    /// Create a new node with default values.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            next_sibling: None,
            text: TextRange::default(),
        }
    }

    /// Create a literal node with the given value range.
    pub fn literal(kind: Kind, range: TextRange) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            next_sibling: None,
            text: range,
        }
    }

    /// Create a text node with the given range.
    pub fn text(range: TextRange) -> Self {
        Self::literal(Kind::Text, range)
    }
}
