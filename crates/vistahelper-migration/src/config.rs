//! Migration configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `vistahelper.toml` in the repository root (or an explicit file), then
//! `VISTAHELPER_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Name of the configuration file looked up in the repository root
pub const CONFIG_FILE_NAME: &str = "vistahelper.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "VISTAHELPER";

/// Migration settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Directory under the root holding one directory per project
    pub source_dir: String,
    /// Projects whose identifier contains this marker (case-insensitive) have no manifest
    pub test_project_marker: String,
    /// Directory with `*.hbs` files overriding the built-in templates
    pub templates_dir: Option<PathBuf>,
    /// Log writes instead of performing them
    pub dry_run: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            source_dir: "src".to_string(),
            test_project_marker: "UnitTests".to_string(),
            templates_dir: None,
            dry_run: false,
        }
    }
}

impl MigrationConfig {
    /// Load configuration for a repository root
    ///
    /// An explicit `path` must exist; the root-level file is optional.
    pub fn load(root: &Path, path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (root.join(CONFIG_FILE_NAME), false),
        };

        let config: MigrationConfig = Config::builder()
            .add_source(File::from(file.clone()).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        debug!(file = %file.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Whether a project identifier denotes a test project
    pub fn is_test_project(&self, project_id: &str) -> bool {
        !self.test_project_marker.is_empty()
            && project_id
                .to_lowercase()
                .contains(&self.test_project_marker.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let root = TempDir::new().unwrap();
        let config = MigrationConfig::load(root.path(), None).unwrap();

        assert_eq!(config.source_dir, "src");
        assert_eq!(config.test_project_marker, "UnitTests");
        assert_eq!(config.templates_dir, None);
    }

    #[test]
    fn test_root_file_overrides_defaults() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "source_dir = \"projects\"\ntest_project_marker = \"Tests\"\n",
        )
        .unwrap();

        let config = MigrationConfig::load(root.path(), None).unwrap();
        assert_eq!(config.source_dir, "projects");
        assert_eq!(config.test_project_marker, "Tests");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("missing.toml");
        assert!(MigrationConfig::load(root.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_test_project_marker_is_case_insensitive() {
        let config = MigrationConfig::default();
        assert!(config.is_test_project("Vista.Core.UnitTests"));
        assert!(config.is_test_project("Vista.Core.unittests"));
        assert!(!config.is_test_project("Vista.Core"));
    }
}
