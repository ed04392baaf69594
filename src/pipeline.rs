//! Whole-document processing.
//!
//! A [`Pipeline`] is built once per configuration and then runs any number
//! of documents: normalization, outline extraction, page summary and search
//! entries. Documents are independent, so [`Pipeline::process_batch`] runs
//! them on the rayon pool.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::config::Config;
use crate::error::Result;
use crate::normalize::{NormalizeReport, normalize};
use crate::outline::{OutlineItem, extract_outline};
use crate::search::{SearchEntry, search_entries};
use crate::summary::{PageSummary, summarize};
use crate::tree::{Document, TreeNode};

/// Everything derived from one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedPage {
    /// The normalized tree, with outline ids written back as anchors.
    pub tree: TreeNode,
    pub outline: Vec<OutlineItem>,
    pub summary: PageSummary,
    pub search: Vec<SearchEntry>,
    pub report: NormalizeReport,
}

/// A validated configuration ready to process documents.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    classifier: Classifier,
}

impl Pipeline {
    /// Validate `config` and prepare its classifier.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let classifier = Classifier::new(&config.normalize)?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Normalize a document in place.
    pub fn normalize(&self, doc: &mut Document) -> Result<NormalizeReport> {
        normalize(doc, &self.classifier, &self.config.normalize)
    }

    /// Process one document.
    ///
    /// `page` is the page's URL path; it is used for search URLs and for
    /// the fallback title.
    pub fn process(&self, tree: &TreeNode, page: &str) -> Result<ProcessedPage> {
        let mut doc = Document::from_tree(tree);
        let report = self.normalize(&mut doc)?;
        let outline = extract_outline(&mut doc, &self.classifier, &self.config.outline);
        let summary = summarize(&doc, &outline, page);
        let search = search_entries(page, &outline);
        debug!(page, items = outline.len(), "processed document");

        Ok(ProcessedPage {
            tree: doc.to_tree(),
            outline,
            summary,
            search,
            report,
        })
    }

    /// Process `(page, tree)` pairs in parallel.
    ///
    /// Results are in input order. A failing document does not affect the
    /// others.
    pub fn process_batch(&self, pages: &[(String, TreeNode)]) -> Vec<Result<ProcessedPage>> {
        pages
            .par_iter()
            .map(|(page, tree)| {
                let result = self.process(tree, page);
                if let Err(err) = &result {
                    warn!(page = page.as_str(), error = %err, "document aborted");
                }
                result
            })
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: Config::default(),
            classifier: Classifier::default(),
        }
    }
}
