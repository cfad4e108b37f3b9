//! Filesystem access used by the migration

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{MigrationError, Result};

/// Enumeration, existence checks, reads and writes
pub trait FileProvider {
    /// Whether `path` is an existing directory
    fn dir_exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing file
    fn file_exists(&self, path: &Path) -> bool;

    /// Immediate subdirectories of `path`, sorted by name
    fn subdirectories(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Files directly in `dir` with the given extension, sorted by name
    fn files_with_extension(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>>;

    /// Read a file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace a file's contents
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Local filesystem
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    dry_run: bool,
}

impl LocalFileSystem {
    /// Create a provider; in dry-run mode writes are logged and skipped
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl FileProvider for LocalFileSystem {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn subdirectories(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut directories = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|error| MigrationError::io(path, io::Error::from(error)))?;
            if entry.file_type().is_dir() {
                directories.push(entry.into_path());
            }
        }
        Ok(directories)
    }

    fn files_with_extension(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            extension
        );
        let paths = glob::glob(&pattern).map_err(|error| {
            MigrationError::io(dir, io::Error::new(io::ErrorKind::InvalidInput, error))
        })?;

        let mut files = Vec::new();
        for path in paths {
            let path = path.map_err(|error| MigrationError::io(dir, error.into_error()))?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| MigrationError::io(path, source))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if self.dry_run {
            info!(path = %path.display(), bytes = contents.len(), "Dry run: skipping write");
            return Ok(());
        }
        fs::write(path, contents).map_err(|source| MigrationError::io(path, source))?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
        Ok(())
    }
}
