//! # doctree
//!
//! Normalization and outline extraction for Markdown/MDX document trees.
//!
//! A parser hands over an mdast tree; doctree repairs the structure the
//! parser does not guarantee, coalesces split inline runs, and derives an
//! outline with stable fragment ids, a page summary and search entries.
//!
//! ## Features
//!
//! - Implicit paragraphs for loose phrasing content under block containers
//! - Blocks hoisted out of phrasing containers, repeated to a fixpoint
//! - Adjacent emphasis, strong, delete and inline code merged
//! - Headings, API symbol markers and Swagger operations in one outline
//! - GitHub-compatible, collision-free heading slugs
//!
//! ## Quick Start
//!
//! ```
//! use doctree::{Pipeline, TreeNode};
//!
//! let tree = TreeNode::from_json(r#"{
//!     "type": "root",
//!     "children": [
//!         {"type": "heading", "depth": 1, "children": [{"type": "text", "value": "Guide"}]},
//!         {"type": "text", "value": "Loose text."}
//!     ]
//! }"#).unwrap();
//!
//! let page = Pipeline::default().process(&tree, "/guide").unwrap();
//!
//! assert_eq!(page.outline[0].id, "guide");
//! assert_eq!(page.summary.title, "Guide");
//! assert_eq!(page.tree.children.unwrap()[1].kind, "paragraph");
//! ```
//!
//! ## Working with Documents
//!
//! The passes operate on [`Document`], an arena of nodes with side tables
//! for attributes. Each pass can be run on its own:
//!
//! ```
//! use doctree::classify::Classifier;
//! use doctree::normalize::wrap_phrasing_runs;
//! use doctree::tree::{Document, Kind, NodeId};
//!
//! let mut doc = Document::new();
//! let text = doc.alloc_literal(Kind::Text, "hello");
//! doc.append_child(NodeId::ROOT, text);
//!
//! assert_eq!(wrap_phrasing_runs(&mut doc, &Classifier::default()), 1);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod normalize;
pub mod outline;
pub mod pipeline;
pub mod search;
pub mod summary;
pub mod tree;

pub use classify::{Category, Classifier};
pub use config::{Config, NormalizeConfig, OutlineConfig};
pub use error::{Error, Result};
pub use normalize::{NormalizeReport, normalize};
pub use outline::{OutlineItem, extract_outline};
pub use pipeline::{Pipeline, ProcessedPage};
pub use search::{EntryKind, SearchEntry};
pub use summary::PageSummary;
pub use tree::{Document, Kind, NodeId, TreeNode};
