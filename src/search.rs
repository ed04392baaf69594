//! Search entries derived from an outline.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::outline::OutlineItem;

/// Characters escaped in URL fragments (the WHATWG fragment set, plus `#`).
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Whether an entry points at a page or at a section of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Page,
    Fragment,
}

/// One searchable unit of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub url: String,
    pub kind: EntryKind,
    pub title: String,
    pub content: String,
}

/// Build search entries for the outline of the page at `page_url`.
///
/// Items with an id become fragment entries (`<page_url>#<id>`); the depth-0
/// item, which has none, becomes a page entry.
pub fn search_entries(page_url: &str, outline: &[OutlineItem]) -> Vec<SearchEntry> {
    outline
        .iter()
        .map(|item| {
            let (url, kind) = if item.id.is_empty() {
                (page_url.to_string(), EntryKind::Page)
            } else {
                let fragment = utf8_percent_encode(&item.id, FRAGMENT);
                (format!("{page_url}#{fragment}"), EntryKind::Fragment)
            };
            SearchEntry {
                url,
                kind,
                title: item.long_title.clone(),
                content: item.content.clone(),
            }
        })
        .collect()
}
