#![warn(missing_docs)]

//! Repository migration for vistahelper
//!
//! Discovers projects under a repository root and migrates the selected ones:
//! repository-level files from templates, then per project the assembly info,
//! the project file and the package manifest, in that order.

pub mod config;
pub mod discovery;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod orchestrator;
pub mod primary;
pub mod rules;

// Re-export public API
pub use config::MigrationConfig;
pub use discovery::ProjectDiscovery;
pub use error::{MigrationError, Result};
pub use fs::{FileProvider, LocalFileSystem};
pub use manifest::sync_manifest_document;
pub use orchestrator::{
    BatchReport, CollectingFailureSink, FailureSink, MigrationOrchestrator, ProjectOutcome,
    ProjectState, ProjectStatus,
};
pub use primary::migrate_primary_document;
