//! Error types for template loading and rendering

use std::path::PathBuf;

use thiserror::Error;

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Errors that can occur while loading or rendering templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template is registered under the requested name
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template source failed to compile
    #[error("Invalid template {name}: {source}")]
    Syntax {
        /// Template name
        name: String,
        /// Underlying handlebars error
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// Rendering failed, e.g. a variable is missing from the context
    #[error("Failed to render template {name}: {source}")]
    Render {
        /// Template name
        name: String,
        /// Underlying handlebars error
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// A context value could not be serialized
    #[error("Invalid template context: {0}")]
    Context(#[from] serde_json::Error),

    /// An override template could not be read
    #[error("Failed to read template {path}: {source}")]
    Io {
        /// Path of the template file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}
