//! Page summaries: title, description and table of contents.
//!
//! Titles and descriptions set in YAML frontmatter win. Otherwise the title
//! comes from the first top-level outline item, then from the page path;
//! the description comes from the first paragraph.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::outline::{OutlineItem, slugify};
use crate::tree::{Document, Kind, NodeId};

/// Fields read from a page's YAML frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl FrontMatter {
    /// Parse frontmatter YAML. Empty content gives empty frontmatter.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(trimmed)
    }

    /// Frontmatter of a document: its first top-level `yaml` node.
    ///
    /// Malformed frontmatter is ignored.
    pub fn from_document(doc: &Document) -> Self {
        let Some(node) = doc
            .children(NodeId::ROOT)
            .find(|&id| doc.kind(id) == Some(&Kind::Yaml))
        else {
            return Self::default();
        };
        match Self::from_yaml(doc.value(node)) {
            Ok(front) => front,
            Err(err) => {
                debug!(error = %err, "ignoring malformed frontmatter");
                Self::default()
            }
        }
    }
}

/// One table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    pub depth: u32,
    pub order: u32,
}

/// Summary of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub toc: Vec<TocEntry>,
}

/// Summarize a normalized document and its outline.
///
/// `page` is the page's source path, used for the fallback title.
pub fn summarize(doc: &Document, outline: &[OutlineItem], page: &str) -> PageSummary {
    let front = FrontMatter::from_document(doc);

    let title = front
        .title
        .filter(|t| !t.is_empty())
        .or_else(|| {
            outline
                .iter()
                .find(|item| item.depth == 1 && !item.title.is_empty())
                .map(|item| item.title.clone())
        })
        .unwrap_or_else(|| title_from_path(page));

    let description = front
        .description
        .filter(|d| !d.is_empty())
        .or_else(|| first_paragraph_text(doc));

    let toc = outline
        .iter()
        .filter(|item| item.depth > 0)
        .map(|item| TocEntry {
            id: item.id.clone(),
            title: item.title.clone(),
            depth: item.depth,
            order: item.order,
        })
        .collect();

    PageSummary {
        title,
        description,
        toc,
    }
}

/// Trimmed text of the first paragraph (or `p` element), if not empty.
fn first_paragraph_text(doc: &Document) -> Option<String> {
    let para = doc.iter_dfs().find(|&id| match doc.kind(id) {
        Some(Kind::Paragraph) => true,
        Some(k) if k.is_element() => doc.attrs.name(id) == Some("p"),
        _ => false,
    })?;
    let text = doc.to_plain_string(para).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Title derived from a page path.
///
/// `guides/getting-started/index.mdx` becomes `Getting Started`.
///
/// ```
/// use doctree::summary::title_from_path;
///
/// assert_eq!(title_from_path("guides/getting-started/index.mdx"), "Getting Started");
/// assert_eq!(title_from_path("api/http_client.md"), "Http_client");
/// ```
pub fn title_from_path(page: &str) -> String {
    let mut stem = page.trim_end_matches('/');
    if let Some(dot) = stem.rfind('.').filter(|&dot| dot > stem.rfind('/').map_or(0, |s| s + 1)) {
        stem = &stem[..dot];
    }
    if let Some(parent) = stem.strip_suffix("/index") {
        stem = parent;
    }
    let base = stem.rsplit('/').next().unwrap_or(stem);

    slugify(base)
        .split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use pretty_assertions::assert_eq;

    fn item(id: &str, title: &str, depth: u32, order: u32) -> OutlineItem {
        OutlineItem {
            id: id.into(),
            title: title.into(),
            long_title: title.into(),
            depth,
            order,
            ..Default::default()
        }
    }

    fn paragraph(doc: &mut Document, text: &str) {
        let para = doc.alloc_node(Node::new(Kind::Paragraph));
        doc.append_child(NodeId::ROOT, para);
        let t = doc.alloc_literal(Kind::Text, text);
        doc.append_child(para, t);
    }

    #[test]
    fn test_title_and_description_from_content() {
        let mut doc = Document::new();
        paragraph(&mut doc, "  First words.  ");
        paragraph(&mut doc, "Second.");
        let outline = vec![
            item("", "", 0, 0),
            item("intro", "Intro", 2, 1),
            item("guide", "Guide", 1, 2),
        ];

        let summary = summarize(&doc, &outline, "docs/guide.md");

        assert_eq!(summary.title, "Guide");
        assert_eq!(summary.description.as_deref(), Some("First words."));
        assert_eq!(
            summary.toc,
            vec![
                TocEntry { id: "intro".into(), title: "Intro".into(), depth: 2, order: 1 },
                TocEntry { id: "guide".into(), title: "Guide".into(), depth: 1, order: 2 },
            ]
        );
    }

    #[test]
    fn test_frontmatter_wins() {
        let mut doc = Document::new();
        let yaml = doc.alloc_literal(Kind::Yaml, "title: Custom\ndescription: From frontmatter");
        doc.append_child(NodeId::ROOT, yaml);
        paragraph(&mut doc, "Body.");

        let summary = summarize(&doc, &[item("a", "A", 1, 0)], "a.md");

        assert_eq!(summary.title, "Custom");
        assert_eq!(summary.description.as_deref(), Some("From frontmatter"));
    }

    #[test]
    fn test_malformed_frontmatter_ignored() {
        let mut doc = Document::new();
        let yaml = doc.alloc_literal(Kind::Yaml, "title: [unclosed");
        doc.append_child(NodeId::ROOT, yaml);

        assert_eq!(FrontMatter::from_document(&doc), FrontMatter::default());
    }

    #[test]
    fn test_path_fallback() {
        let doc = Document::new();
        let summary = summarize(&doc, &[], "reference/index.mdx");
        assert_eq!(summary.title, "Reference");
        assert_eq!(summary.description, None);
        assert!(summary.toc.is_empty());
    }

    #[test]
    fn test_title_from_path_variants() {
        assert_eq!(title_from_path("quick-start.md"), "Quick Start");
        assert_eq!(title_from_path("docs/v1.2/release notes.mdx"), "Release Notes");
        assert_eq!(title_from_path("docs/index.md"), "Docs");
        assert_eq!(title_from_path("README"), "Readme");
    }
}
