//! Error types for doctree operations.

use thiserror::Error;

/// Errors that can occur while configuring or processing documents.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration is inconsistent (detected before any document runs).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The phrasing reflow did not settle within its traversal budget.
    ///
    /// This only happens with a misconfigured classifier and aborts the
    /// current document.
    #[error("Phrasing reflow did not reach a fixpoint after {traversals} traversals")]
    FixpointExceeded { traversals: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
