//! Error types for recordminer.
//!
//! Only malformed input is an error. A page without a main region or without
//! a repeating chain yields an empty [`crate::ExtractionResult`] instead.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The layout dump could not be parsed.
    #[error("Layout dump parsing failed: {0}")]
    ParseError(String),

    /// Character encoding detection or conversion failed.
    #[error("Encoding detection failed: {0}")]
    EncodingError(String),

    /// A node is missing an attribute the algorithm reads, or carries an
    /// unparseable value.
    #[error("Malformed node {node}: {reason}")]
    MalformedNode {
        /// Tag name or xpath of the offending node.
        node: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Tree handles are inconsistent (dangling child, wrong parent, missing root).
    #[error("Malformed tree: {0}")]
    MalformedTree(String),

    /// Visibility filtering left no root element to build a tree from.
    #[error("No visible root element in layout dump")]
    NoVisibleRoot,
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
