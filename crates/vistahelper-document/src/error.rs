//! Error types for document loading and merging

use thiserror::Error;

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors that can occur while loading or transforming a document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input text is not a well-formed document
    #[error("Parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    /// A property that must already exist was not found
    #[error("No {name} found")]
    MissingProperty {
        /// Name of the missing property
        name: String,
    },

    /// No section matched the query
    #[error("Section not found: {0}")]
    SectionNotFound(String),
}
