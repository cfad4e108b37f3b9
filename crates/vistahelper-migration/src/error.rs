//! Error types for the migration

use std::path::{Path, PathBuf};

use thiserror::Error;
use vistahelper_document::DocumentError;
use vistahelper_templates::TemplateError;

/// Result type for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Errors that can occur while migrating a repository
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A document is not well-formed
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Document path
        path: PathBuf,
        /// Underlying document error
        #[source]
        source: DocumentError,
    },

    /// A property that must pre-exist in the project file is absent
    #[error("No {name} found in {path}")]
    MissingProperty {
        /// Property name
        name: String,
        /// Project file path
        path: PathBuf,
    },

    /// The package manifest of a non-test project does not exist
    #[error("File {0} does not exist")]
    MissingManifest(PathBuf),

    /// The `Properties` directory of a project does not exist
    #[error("Properties {0} directory does not exist")]
    MissingDirectory(PathBuf),

    /// A template could not be loaded or rendered; aborts the batch
    #[error("Failed to load resource: {0}")]
    ResourceLoad(#[from] TemplateError),

    /// The project directory holds no project file
    #[error("No project file found in {0}")]
    MissingPrimaryDocument(PathBuf),

    /// The repository root does not exist
    #[error("Directory {0} does not exist")]
    RootNotFound(PathBuf),

    /// The source directory under the root does not exist
    #[error("Source directory {0} does not exist")]
    SourceDirectoryNotFound(PathBuf),

    /// A document was structurally unusable
    #[error("Invalid document {path}: {source}")]
    Document {
        /// Document path
        path: PathBuf,
        /// Underlying document error
        #[source]
        source: DocumentError,
    },

    /// Filesystem error
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl MigrationError {
    /// Attach a document path to a document error
    pub fn from_document(path: &Path, error: DocumentError) -> Self {
        match error {
            DocumentError::Parse(_) => MigrationError::Parse {
                path: path.to_path_buf(),
                source: error,
            },
            DocumentError::MissingProperty { name } => MigrationError::MissingProperty {
                name,
                path: path.to_path_buf(),
            },
            DocumentError::SectionNotFound(_) => MigrationError::Document {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// IO error at a path
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        MigrationError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error stops the whole batch rather than a single project
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            MigrationError::ResourceLoad(_)
                | MigrationError::RootNotFound(_)
                | MigrationError::SourceDirectoryNotFound(_)
                | MigrationError::Config(_)
        )
    }
}
