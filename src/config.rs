//! Configuration for normalization and outline extraction.
//!
//! Configuration is plain serde data, usually loaded from a TOML file:
//!
//! ```toml
//! [normalize]
//! mergeable = ["emphasis", "strong"]
//! prune_empty_paragraphs = true
//!
//! [outline]
//! nested_headings = true
//! ```
//!
//! Node kinds are written with their mdast type names. Every field is
//! optional; missing fields take the defaults below. A configuration is
//! validated once, before any document is processed.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{Category, classify};
use crate::error::{Error, Result};
use crate::tree::Kind;

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub normalize: NormalizeConfig,
    pub outline: OutlineConfig,
}

impl Config {
    /// Parse and validate a TOML configuration.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Check the configuration for inconsistencies.
    pub fn validate(&self) -> Result<()> {
        self.normalize.validate()?;
        self.outline.validate()
    }
}

/// Settings of the normalization passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Kinds whose children must all be block content. The root is always
    /// included.
    pub block_containers: Vec<String>,
    /// Kinds whose children must all be phrasing content. Every phrasing
    /// kind that can have children must be listed.
    pub phrasing_containers: Vec<String>,
    /// Kinds whose adjacent siblings are coalesced into one node.
    pub mergeable: Vec<String>,
    /// Otherwise-unknown kinds to classify as block content.
    pub block_kinds: Vec<String>,
    /// Otherwise-unknown kinds to classify as phrasing content.
    pub phrasing_kinds: Vec<String>,
    /// Remove paragraphs that hold nothing but whitespace and breaks.
    pub prune_empty_paragraphs: bool,
    /// Name of the text directive that assigns an id to the next node
    /// (`:target{id=...}`). None disables the pass.
    pub target_directive: Option<String>,
    /// JSX element names inside which links are unwrapped.
    pub anchor_elements: Vec<String>,
}

/// Built-in phrasing kinds that can have children.
const PHRASING_PARENTS: [&str; 7] = [
    "emphasis",
    "strong",
    "delete",
    "link",
    "linkReference",
    "mdxJsxTextElement",
    "textDirective",
];

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            block_containers: names(&[
                "blockquote",
                "containerDirective",
                "footnoteDefinition",
                "listItem",
                "mdxJsxFlowElement",
                "root",
            ]),
            phrasing_containers: names(&[
                "paragraph",
                "heading",
                "emphasis",
                "strong",
                "delete",
                "link",
                "linkReference",
                "mdxJsxTextElement",
                "textDirective",
                "tableCell",
            ]),
            mergeable: names(&["delete", "emphasis", "inlineCode", "strong"]),
            block_kinds: Vec::new(),
            phrasing_kinds: Vec::new(),
            prune_empty_paragraphs: false,
            target_directive: Some("target".to_string()),
            anchor_elements: names(&["a", "Link"]),
        }
    }
}

impl NormalizeConfig {
    /// Check the container declarations for inconsistencies.
    pub fn validate(&self) -> Result<()> {
        let extra_block: HashSet<&str> = self.block_kinds.iter().map(String::as_str).collect();
        let extra_phrasing: HashSet<&str> =
            self.phrasing_kinds.iter().map(String::as_str).collect();

        for name in extra_block.iter().chain(extra_phrasing.iter()) {
            if !matches!(Kind::from_type_name(name), Kind::Unknown(_)) {
                return Err(Error::Config(format!(
                    "`{name}` is a built-in kind and cannot be reclassified"
                )));
            }
        }
        if let Some(name) = extra_block.intersection(&extra_phrasing).next() {
            return Err(Error::Config(format!(
                "`{name}` is classified as both block and phrasing"
            )));
        }

        let category = |name: &str| -> Category {
            if extra_block.contains(name) {
                Category::Block
            } else if extra_phrasing.contains(name) {
                Category::Phrasing
            } else {
                classify(&Kind::from_type_name(name))
            }
        };

        let check_container = |name: &str, list: &str| -> Result<()> {
            let kind = Kind::from_type_name(name);
            if kind.is_leaf() {
                return Err(Error::Config(format!(
                    "`{name}` cannot have children and cannot be listed in {list}"
                )));
            }
            if category(name) == Category::Opaque {
                return Err(Error::Config(format!(
                    "`{name}` in {list} is not a known block or phrasing kind"
                )));
            }
            Ok(())
        };

        for name in &self.block_containers {
            check_container(name, "block_containers")?;
        }
        for name in &self.phrasing_containers {
            check_container(name, "phrasing_containers")?;
            if name == "root" {
                return Err(Error::Config(
                    "`root` is always a block container".to_string(),
                ));
            }
        }

        let block: HashSet<&str> = self.block_containers.iter().map(String::as_str).collect();
        if let Some(name) = self
            .phrasing_containers
            .iter()
            .find(|name| block.contains(name.as_str()))
        {
            return Err(Error::Config(format!(
                "`{name}` is declared both a block container and a phrasing container"
            )));
        }

        // A phrasing parent outside the list would shelter blocks from the
        // hoist pass.
        let phrasing: HashSet<&str> =
            self.phrasing_containers.iter().map(String::as_str).collect();
        if let Some(name) = PHRASING_PARENTS
            .iter()
            .copied()
            .chain(self.phrasing_kinds.iter().map(String::as_str))
            .find(|name| !phrasing.contains(name))
        {
            return Err(Error::Config(format!(
                "phrasing kind `{name}` can have children and must be listed in phrasing_containers"
            )));
        }

        for name in &self.mergeable {
            let kind = Kind::from_type_name(name);
            if category(name) != Category::Phrasing {
                return Err(Error::Config(format!(
                    "mergeable kind `{name}` is not phrasing content"
                )));
            }
            if kind.is_leaf() && !kind.has_value() {
                return Err(Error::Config(format!(
                    "mergeable kind `{name}` has neither children nor a value"
                )));
            }
        }

        if let Some(directive) = &self.target_directive
            && directive.is_empty()
        {
            return Err(Error::Config(
                "target_directive cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Settings of the outline extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Consider headings anywhere in the tree instead of only direct
    /// children of the root. Used for trees converted from HTML.
    pub nested_headings: bool,
    /// Name of the JSX element that marks a documented symbol.
    pub symbol_element: String,
    /// Name of the JSX element that embeds an OpenAPI schema.
    pub openapi_element: String,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            nested_headings: false,
            symbol_element: "Outline".to_string(),
            openapi_element: "OpenAPIViewer".to_string(),
        }
    }
}

impl OutlineConfig {
    /// Check the element names.
    pub fn validate(&self) -> Result<()> {
        if self.symbol_element.is_empty() {
            return Err(Error::Config("symbol_element cannot be empty".to_string()));
        }
        if self.openapi_element.is_empty() {
            return Err(Error::Config("openapi_element cannot be empty".to_string()));
        }
        if self.symbol_element == self.openapi_element {
            return Err(Error::Config(format!(
                "`{}` cannot be both the symbol and the OpenAPI element",
                self.symbol_element
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = Config::from_toml(
            r#"
            [normalize]
            prune_empty_paragraphs = true
            mergeable = ["emphasis"]

            [outline]
            nested_headings = true
            "#,
        )
        .unwrap();
        assert!(config.normalize.prune_empty_paragraphs);
        assert_eq!(config.normalize.mergeable, vec!["emphasis".to_string()]);
        assert_eq!(
            config.normalize.block_containers,
            NormalizeConfig::default().block_containers
        );
        assert!(config.outline.nested_headings);
        assert_eq!(config.outline.symbol_element, "Outline");
    }

    #[test]
    fn test_overlapping_containers_rejected() {
        let config = NormalizeConfig {
            phrasing_containers: vec!["blockquote".into()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("blockquote"));
    }

    #[test]
    fn test_leaf_container_rejected() {
        let config = NormalizeConfig {
            block_containers: vec!["code".into()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_root_phrasing_container_rejected() {
        let config = NormalizeConfig {
            block_containers: vec![],
            phrasing_containers: vec!["root".into()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_container_must_be_classified() {
        let config = NormalizeConfig {
            block_containers: vec!["admonition".into()],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = NormalizeConfig {
            block_containers: vec!["admonition".into()],
            block_kinds: vec!["admonition".into()],
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_undeclared_phrasing_parent_rejected() {
        let mut config = NormalizeConfig::default();
        config
            .phrasing_containers
            .retain(|name| name != "mdxJsxTextElement");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mdxJsxTextElement"));

        let config = NormalizeConfig {
            phrasing_kinds: vec!["kbd".into()],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = NormalizeConfig {
            phrasing_kinds: vec!["kbd".into()],
            ..Default::default()
        };
        config.phrasing_containers.push("kbd".into());
        config.validate().unwrap();
    }

    #[test]
    fn test_mergeable_break_rejected() {
        let config = NormalizeConfig {
            mergeable: vec!["break".into()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[outline]\nsymbol_element = \"Symbol\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.outline.symbol_element, "Symbol");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(matches!(
            Config::from_toml("[normalize\n"),
            Err(Error::Toml(_))
        ));
    }
}
