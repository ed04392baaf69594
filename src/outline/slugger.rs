//! GitHub-compatible heading slugs.

use std::collections::HashMap;

/// Generate a GitHub-style slug from text.
///
/// Lowercases, drops punctuation and symbols, and turns each whitespace
/// character into a hyphen. Unlike typical URL slugs, runs of separators
/// are not collapsed, matching the anchors GitHub renders.
///
/// # Examples
///
/// ```
/// use doctree::outline::slugify;
///
/// assert_eq!(slugify("Chapter One"), "chapter-one");
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("foo_bar()"), "foo_bar");
/// ```
pub fn slugify(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

/// Id given to a heading whose text has no sluggable characters.
pub const FALLBACK_SLUG: &str = "section";

/// Collision-safe slug generator for one document.
///
/// The first occurrence of a slug is returned as is; repeats get `-1`,
/// `-2`, ... appended, skipping any candidate already handed out or
/// reserved. Text with nothing to slug becomes [`FALLBACK_SLUG`].
#[derive(Debug, Default, Clone)]
pub struct Slugger {
    /// Every id handed out or reserved, with the last suffix tried for it.
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug `text` and make the result unique.
    pub fn slug(&mut self, text: &str) -> String {
        self.unique(slugify(text))
    }

    /// Claim an explicit id.
    ///
    /// Returns the id itself, or a suffixed variant when it is already
    /// taken. Either way later slugs cannot collide with it.
    pub fn reserve(&mut self, id: &str) -> String {
        self.unique(id.to_string())
    }

    fn unique(&mut self, mut base: String) -> String {
        if base.is_empty() {
            base = FALLBACK_SLUG.to_string();
        }
        if !self.occurrences.contains_key(&base) {
            self.occurrences.insert(base.clone(), 0);
            return base;
        }

        let mut candidate;
        loop {
            let counter = self.occurrences.entry(base.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{base}-{counter}");
            if !self.occurrences.contains_key(&candidate) {
                break;
            }
        }
        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Chapter 1"), "chapter-1");
    }

    #[test]
    fn test_slugify_keeps_separators() {
        assert_eq!(slugify("a  b"), "a--b");
        assert_eq!(slugify(" x "), "-x-");
        assert_eq!(slugify("snake_case-name"), "snake_case-name");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Über Größe"), "über-größe");
        assert_eq!(slugify("快速开始"), "快速开始");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_repeats_get_suffixes() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Usage"), "usage");
        assert_eq!(slugger.slug("Usage"), "usage-1");
        assert_eq!(slugger.slug("usage"), "usage-2");
    }

    #[test]
    fn test_reserved_ids_block_slugs() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.reserve("usage-1"), "usage-1");
        assert_eq!(slugger.slug("Usage"), "usage");
        assert_eq!(slugger.slug("Usage"), "usage-2");
        assert_eq!(slugger.reserve("usage"), "usage-3");
    }

    #[test]
    fn test_unsluggable_text_falls_back() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("🚀"), "section");
        assert_eq!(slugger.slug("!!!"), "section-1");
        assert_eq!(slugger.reserve(""), "section-2");
        assert_eq!(slugger.slug("Section"), "section-3");
    }
}
