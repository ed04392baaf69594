//! Content classification for the reflow passes.
//!
//! Every kind is exactly one of block, phrasing, or opaque. Opaque kinds
//! (ESM statements, frontmatter, anything unrecognized) are invisible to
//! both reflow passes: never wrapped, never hoisted.

use std::collections::HashSet;

use crate::config::NormalizeConfig;
use crate::tree::Kind;

/// Content category of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Block,
    Phrasing,
    Opaque,
}

/// Built-in classification of a kind.
pub fn classify(kind: &Kind) -> Category {
    match kind {
        Kind::Root
        | Kind::Paragraph
        | Kind::Heading(_)
        | Kind::ThematicBreak
        | Kind::Blockquote
        | Kind::List
        | Kind::ListItem
        | Kind::Code
        | Kind::Math
        | Kind::Table
        | Kind::TableRow
        | Kind::TableCell
        | Kind::Definition
        | Kind::FootnoteDefinition
        | Kind::ContainerDirective
        | Kind::LeafDirective
        | Kind::FlowElement
        | Kind::FlowExpression => Category::Block,

        Kind::Text
        | Kind::Emphasis
        | Kind::Strong
        | Kind::Delete
        | Kind::InlineCode
        | Kind::InlineMath
        | Kind::Break
        | Kind::Link
        | Kind::LinkReference
        | Kind::Image
        | Kind::ImageReference
        | Kind::FootnoteReference
        | Kind::Html
        | Kind::TextElement
        | Kind::TextExpression
        | Kind::TextDirective => Category::Phrasing,

        Kind::Esm | Kind::Yaml | Kind::Unknown(_) => Category::Opaque,
    }
}

/// Classification and container membership for one configuration.
///
/// Built once per configuration and shared (read-only) by every document
/// processed with it, so all passes of a run agree on every answer.
#[derive(Debug, Clone)]
pub struct Classifier {
    block_containers: HashSet<String>,
    phrasing_containers: HashSet<String>,
    mergeable: HashSet<String>,
    extra_block: HashSet<String>,
    extra_phrasing: HashSet<String>,
}

impl Classifier {
    /// Validate `config` and build a classifier from it.
    pub fn new(config: &NormalizeConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &NormalizeConfig) -> Self {
        let set = |names: &[String]| names.iter().cloned().collect::<HashSet<_>>();
        let mut block_containers = set(&config.block_containers);
        block_containers.insert(Kind::Root.type_name().to_string());

        Self {
            block_containers,
            phrasing_containers: set(&config.phrasing_containers),
            mergeable: set(&config.mergeable),
            extra_block: set(&config.block_kinds),
            extra_phrasing: set(&config.phrasing_kinds),
        }
    }

    /// Category of a kind, honoring configured classifications of
    /// otherwise-unknown kinds.
    pub fn category(&self, kind: &Kind) -> Category {
        if let Kind::Unknown(name) = kind {
            if self.extra_block.contains(name) {
                return Category::Block;
            }
            if self.extra_phrasing.contains(name) {
                return Category::Phrasing;
            }
        }
        classify(kind)
    }

    pub fn is_block(&self, kind: &Kind) -> bool {
        self.category(kind) == Category::Block
    }

    pub fn is_phrasing(&self, kind: &Kind) -> bool {
        self.category(kind) == Category::Phrasing
    }

    /// Check if children of this kind must all be block (or opaque).
    pub fn is_block_container(&self, kind: &Kind) -> bool {
        self.block_containers.contains(kind.type_name())
    }

    /// Check if children of this kind must all be phrasing (or opaque).
    pub fn is_phrasing_container(&self, kind: &Kind) -> bool {
        self.phrasing_containers.contains(kind.type_name())
    }

    /// Check if adjacent nodes of this kind are coalesced.
    pub fn is_mergeable(&self, kind: &Kind) -> bool {
        self.mergeable.contains(kind.type_name())
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::build(&NormalizeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kinds_are_opaque() {
        assert_eq!(classify(&Kind::Unknown("toml".into())), Category::Opaque);
        assert_eq!(classify(&Kind::Esm), Category::Opaque);
    }

    #[test]
    fn test_builtin_categories() {
        assert_eq!(classify(&Kind::Heading(3)), Category::Block);
        assert_eq!(classify(&Kind::FlowElement), Category::Block);
        assert_eq!(classify(&Kind::TextElement), Category::Phrasing);
        assert_eq!(classify(&Kind::InlineCode), Category::Phrasing);
    }

    #[test]
    fn test_default_containers() {
        let classifier = Classifier::default();
        assert!(classifier.is_block_container(&Kind::Root));
        assert!(classifier.is_block_container(&Kind::Blockquote));
        assert!(classifier.is_block_container(&Kind::FlowElement));
        assert!(classifier.is_phrasing_container(&Kind::Strong));
        assert!(classifier.is_phrasing_container(&Kind::Heading(2)));
        assert!(classifier.is_phrasing_container(&Kind::TextElement));
        assert!(classifier.is_phrasing_container(&Kind::TextDirective));
        assert!(!classifier.is_phrasing_container(&Kind::Blockquote));
        assert!(classifier.is_mergeable(&Kind::InlineCode));
        assert!(!classifier.is_mergeable(&Kind::Link));
    }

    #[test]
    fn test_configured_unknown_kind() {
        let config = NormalizeConfig {
            block_kinds: vec!["admonition".into()],
            ..Default::default()
        };
        let classifier = Classifier::new(&config).unwrap();
        assert_eq!(
            classifier.category(&Kind::Unknown("admonition".into())),
            Category::Block
        );
        assert_eq!(
            classifier.category(&Kind::Unknown("other".into())),
            Category::Opaque
        );
    }
}
