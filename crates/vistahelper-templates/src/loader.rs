//! Loading override templates from a directory
//!
//! Overrides are `<key>.hbs` files, e.g. `gitignore.hbs` or
//! `AssemblyInfo.cs.hbs`. Files whose stem is not a known template are skipped.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    error::{Result, TemplateError},
    name::TemplateName,
};

const TEMPLATE_EXTENSION: &str = "hbs";

/// A template source read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    /// Template it overrides
    pub name: TemplateName,
    /// File it was read from
    pub path: PathBuf,
    /// Raw template source
    pub source: String,
}

/// Loads override templates from files and directories
#[derive(Debug, Default)]
pub struct TemplateLoader;

impl TemplateLoader {
    /// Create a new template loader
    pub fn new() -> Self {
        Self
    }

    /// Load a single template file
    ///
    /// Returns `Ok(None)` when the file name does not match a known template.
    pub fn load_from_file(&self, path: &Path) -> Result<Option<LoadedTemplate>> {
        let Some(name) = template_name_of(path) else {
            warn!(path = %path.display(), "Skipping unknown template");
            return Ok(None);
        };

        let source = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(template = %name, path = %path.display(), "Loaded template override");
        Ok(Some(LoadedTemplate {
            name,
            path: path.to_path_buf(),
            source,
        }))
    }

    /// Load every known template in a directory, sorted by path
    ///
    /// A missing directory yields no templates.
    pub fn load_from_directory(&self, dir: &Path) -> Result<Vec<LoadedTemplate>> {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "Template directory does not exist");
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir).map_err(|source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(TEMPLATE_EXTENSION)
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut templates = Vec::new();
        for path in paths {
            if let Some(template) = self.load_from_file(&path)? {
                templates.push(template);
            }
        }
        Ok(templates)
    }
}

fn template_name_of(path: &Path) -> Option<TemplateName> {
    let file_name = path.file_name()?.to_str()?;
    let key = file_name.strip_suffix(".hbs")?;
    TemplateName::from_key(key)
}
