//! Symbol markers: documented API entries embedded as JSX elements.
//!
//! ```mdx
//! <Outline
//!   domain="py"
//!   objectType="class"
//!   target={"pkg.Widget"}
//!   fullname={"pkg.Widget"}
//!   module={"pkg"}
//!   description={"A widget."}
//! />
//! ```

use crate::tree::{Document, NodeId};

/// Attributes of one symbol marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbol {
    /// Fully-qualified name; also the explicit id.
    pub target: Option<String>,
    pub fullname: Option<String>,
    pub module: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub object_type: Option<String>,
}

impl Symbol {
    /// Read the marker attributes of `id`.
    ///
    /// `target`, `fullname`, `module` and `description` are literal
    /// expressions; `domain` and `objectType` are plain strings. Attributes
    /// in the wrong form, and empty values, count as absent.
    pub fn from_node(doc: &Document, id: NodeId) -> Self {
        let expr = |name: &str| {
            doc.attrs
                .element_literal::<Option<String>>(id, name)
                .flatten()
                .filter(|s| !s.is_empty())
        };
        let string = |name: &str| {
            doc.attrs
                .element_string(id, name)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            target: expr("target"),
            fullname: expr("fullname"),
            module: expr("module"),
            description: expr("description"),
            domain: string("domain"),
            object_type: string("objectType"),
        }
    }

    /// Short title: the last dotted segment of the full name.
    pub fn title(&self) -> Option<&str> {
        let fullname = self.fullname.as_deref()?;
        fullname.rsplit('.').next()
    }

    /// Context-qualified title: `"<objectType> <target>"`, or the target.
    pub fn long_title(&self) -> Option<String> {
        let target = self.target.as_deref()?;
        Some(match &self.object_type {
            Some(object_type) => format!("{object_type} {target}"),
            None => target.to_string(),
        })
    }

    /// One-line description used as the symbol's search content.
    ///
    /// `"<fullname>, <Domain> <objectType>, in <module>, : <description>"`
    /// with absent parts left out. Empty when nothing is known.
    pub fn synopsis(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(fullname) = &self.fullname {
            parts.push(fullname.clone());
        }
        if let (Some(domain), Some(object_type)) = (&self.domain, &self.object_type) {
            parts.push(format!("{} {object_type}", domain_label(domain)));
        }
        if let Some(module) = &self.module {
            parts.push(format!("in {module}"));
        }
        if let Some(description) = &self.description {
            parts.push(format!(": {description}"));
        }
        parts.join(", ")
    }
}

/// Human-readable name of a Sphinx domain.
pub fn domain_label(domain: &str) -> &str {
    match domain {
        "py" => "Python",
        "cpp" => "C++",
        "c" => "C",
        "js" => "JavaScript",
        other => other,
    }
}

/// Number of dotted segments in a fully-qualified name.
pub fn segment_count(fqn: &str) -> usize {
    fqn.split('.').count()
}
