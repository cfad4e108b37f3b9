//! Discovery of migratable projects under a repository root

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    error::{MigrationError, Result},
    fs::FileProvider,
};

/// Extension of primary project documents
pub const PROJECT_EXTENSION: &str = "csproj";

/// Lists projects: subdirectories of the source directory with exactly one project file
pub struct ProjectDiscovery<'a> {
    files: &'a dyn FileProvider,
    source_dir: &'a str,
}

impl<'a> ProjectDiscovery<'a> {
    /// Create a discovery over `source_dir` (relative to the root)
    pub fn new(files: &'a dyn FileProvider, source_dir: &'a str) -> Self {
        Self { files, source_dir }
    }

    /// Source directory for a root
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join(self.source_dir)
    }

    /// Names of the discovered projects, sorted
    pub fn discover(&self, root: &Path) -> Result<Vec<String>> {
        if !self.files.dir_exists(root) {
            return Err(MigrationError::RootNotFound(root.to_path_buf()));
        }

        let source = self.source_path(root);
        if !self.files.dir_exists(&source) {
            return Err(MigrationError::SourceDirectoryNotFound(source));
        }

        let mut projects = Vec::new();
        for directory in self.files.subdirectories(&source)? {
            let project_files = self.files.files_with_extension(&directory, PROJECT_EXTENSION)?;
            if project_files.len() != 1 {
                debug!(
                    directory = %directory.display(),
                    project_files = project_files.len(),
                    "Skipping directory"
                );
                continue;
            }
            if let Some(name) = directory.file_name().and_then(|name| name.to_str()) {
                projects.push(name.to_string());
            }
        }

        debug!(count = projects.len(), "Discovered projects");
        Ok(projects)
    }
}
