//! Package manifest synchronization
//!
//! The manifest is derived from the primary document: its metadata and file
//! listing are regenerated from values already resolved by the caller, never by
//! re-reading the primary document here.

use tracing::debug;

use crate::{
    error::Result,
    locator::{SectionKind, SectionLocator},
    node::{Document, Element},
    properties::{PropertyMerger, PropertyUpdate},
};

/// Namespace of package manifests
pub const MANIFEST_NAMESPACE: &str = "http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd";

const PACKAGE: &str = "package";
const ID: &str = "id";
const VERSION: &str = "version";
const REQUIRE_LICENSE_ACCEPTANCE: &str = "requireLicenseAcceptance";
const FILE: &str = "file";
const SRC: &str = "src";
const TARGET: &str = "target";

/// Extensions of the per-platform build outputs: binary, debug symbols, documentation
const BUILD_OUTPUT_EXTENSIONS: [&str; 3] = ["dll", "pdb", "xml"];

/// Placeholders substituted later by the build pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTokens {
    /// Source root, e.g. `$DirSrc$`
    pub source_dir: String,
    /// Build configuration, e.g. `$configuration$`
    pub configuration: String,
    /// Package version, e.g. `$VersionNuGet$`
    pub version: String,
}

impl Default for PipelineTokens {
    fn default() -> Self {
        Self {
            source_dir: "$DirSrc$".to_string(),
            configuration: "$configuration$".to_string(),
            version: "$VersionNuGet$".to_string(),
        }
    }
}

/// One `file` entry of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Source path pattern
    pub src: String,
    /// Destination path inside the package
    pub target: String,
}

/// Regenerates manifest content from resolved primary values
#[derive(Debug, Clone, Default)]
pub struct ManifestSynchronizer {
    tokens: PipelineTokens,
}

impl ManifestSynchronizer {
    /// Create a synchronizer with the default pipeline tokens
    pub fn new() -> Self {
        Self::default()
    }

    /// File entries for the given platforms, in order
    ///
    /// Three build outputs per platform followed by one source-tree entry.
    pub fn file_entries(&self, platforms: &[String], project_id: &str) -> Vec<FileEntry> {
        let mut entries: Vec<FileEntry> = platforms
            .iter()
            .flat_map(|platform| {
                let stem = format!(
                    "{}\\{project_id}\\bin\\{}\\{platform}\\{project_id}",
                    self.tokens.source_dir, self.tokens.configuration
                );
                let target = format!("lib\\{platform}");
                BUILD_OUTPUT_EXTENSIONS.iter().map(move |extension| FileEntry {
                    src: format!("{stem}.{extension}"),
                    target: target.clone(),
                })
            })
            .collect();

        entries.push(FileEntry {
            src: format!("{}\\{project_id}\\**\\*.cs", self.tokens.source_dir),
            target: format!("src\\{project_id}"),
        });
        entries
    }

    /// Clear the files section and rebuild it from `platforms`
    pub fn regenerate_file_list(
        &self,
        manifest: &mut Document,
        platforms: &[String],
        project_id: &str,
    ) -> Result<usize> {
        let files = SectionLocator::ensure_section_of_kind(manifest, SectionKind::Files);
        let files = SectionLocator::section_mut(manifest, files)?;
        files.clear_children();

        let entries = self.file_entries(platforms, project_id);
        for entry in &entries {
            files.append(
                Element::new(FILE)
                    .with_attribute(SRC, entry.src.clone())
                    .with_attribute(TARGET, entry.target.clone()),
            );
        }

        debug!(project = project_id, files = entries.len(), "Regenerated manifest files");
        Ok(entries.len())
    }

    /// Upsert identifier, version placeholder and license flag into the metadata section
    pub fn regenerate_metadata(&self, manifest: &mut Document, project_id: &str) -> Result<()> {
        let metadata = SectionLocator::ensure_section_of_kind(manifest, SectionKind::Metadata);
        let metadata = SectionLocator::section_mut(manifest, metadata)?;

        PropertyMerger::apply_properties(
            metadata,
            &[
                PropertyUpdate::set(ID, project_id),
                PropertyUpdate::set(VERSION, self.tokens.version.clone()),
                PropertyUpdate::set(REQUIRE_LICENSE_ACCEPTANCE, "false"),
            ],
        );
        Ok(())
    }

    /// Drop namespace qualification from every element below the `package` root
    pub fn strip_namespaces(manifest: &mut Document) {
        let root = manifest.root_mut();
        if root.local_name() != PACKAGE {
            root.clear_namespace();
        }
        for child in root.elements_mut() {
            child.walk_mut(&mut |element: &mut Element| {
                if element.local_name() != PACKAGE {
                    element.clear_namespace();
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd">
  <metadata>
    <id>Old</id>
    <authors>Vista</authors>
  </metadata>
  <files>
    <file src="stale.dll" target="lib" />
  </files>
</package>"#;

    fn platforms(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_file_entries_three_per_platform_plus_sources() {
        let entries = ManifestSynchronizer::new().file_entries(&platforms(&["net461", "net472"]), "Lib");

        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].src, "$DirSrc$\\Lib\\bin\\$configuration$\\net461\\Lib.dll");
        assert_eq!(entries[1].src, "$DirSrc$\\Lib\\bin\\$configuration$\\net461\\Lib.pdb");
        assert_eq!(entries[2].src, "$DirSrc$\\Lib\\bin\\$configuration$\\net461\\Lib.xml");
        assert_eq!(entries[0].target, "lib\\net461");
        assert_eq!(entries[3].target, "lib\\net472");
        assert_eq!(entries[6].src, "$DirSrc$\\Lib\\**\\*.cs");
        assert_eq!(entries[6].target, "src\\Lib");
    }

    #[test]
    fn test_regenerate_file_list_replaces_existing_entries() {
        let synchronizer = ManifestSynchronizer::new();
        let mut manifest = DocumentStore::new().load(MANIFEST).unwrap();

        synchronizer
            .regenerate_file_list(&mut manifest, &platforms(&["net472"]), "Lib")
            .unwrap();

        let files = manifest.root().element("files").unwrap();
        assert_eq!(files.elements().count(), 4);
        assert!(files.elements().all(|file| file.attribute("src") != Some("stale.dll")));
    }

    #[test]
    fn test_regenerate_metadata_keeps_other_fields() {
        let synchronizer = ManifestSynchronizer::new();
        let mut manifest = DocumentStore::new().load(MANIFEST).unwrap();

        synchronizer.regenerate_metadata(&mut manifest, "Lib").unwrap();

        let metadata = manifest.root().element("metadata").unwrap();
        let fields: Vec<(String, String)> = metadata
            .elements()
            .map(|field| (field.local_name().to_string(), field.text()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("id".to_string(), "Lib".to_string()),
                ("authors".to_string(), "Vista".to_string()),
                ("version".to_string(), "$VersionNuGet$".to_string()),
                ("requireLicenseAcceptance".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_sections_are_created() {
        let synchronizer = ManifestSynchronizer::new();
        let mut manifest = DocumentStore::new()
            .load(r#"<package xmlns="http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd" />"#)
            .unwrap();

        synchronizer.regenerate_metadata(&mut manifest, "Lib").unwrap();
        synchronizer
            .regenerate_file_list(&mut manifest, &platforms(&["net472"]), "Lib")
            .unwrap();

        let names: Vec<&str> = manifest.root().elements().map(Element::local_name).collect();
        assert_eq!(names, vec!["metadata", "files"]);
    }

    #[test]
    fn test_attributed_sections_are_reused() {
        let synchronizer = ManifestSynchronizer::new();
        let mut manifest = DocumentStore::new()
            .load(
                r#"<package xmlns="http://schemas.microsoft.com/packaging/2010/07/nuspec.xsd"><metadata minClientVersion="2.12"><id>Old</id><version>1.0.0</version></metadata><files><file src="stale.dll" target="lib" /></files></package>"#,
            )
            .unwrap();

        synchronizer.regenerate_metadata(&mut manifest, "Lib").unwrap();
        synchronizer
            .regenerate_file_list(&mut manifest, &platforms(&["net472"]), "Lib")
            .unwrap();

        let names: Vec<&str> = manifest.root().elements().map(Element::local_name).collect();
        assert_eq!(names, vec!["metadata", "files"]);
        let metadata = manifest.root().element("metadata").unwrap();
        assert_eq!(metadata.attribute("minClientVersion"), Some("2.12"));
        assert_eq!(metadata.element("id").unwrap().text(), "Lib");
        assert_eq!(metadata.element("version").unwrap().text(), "$VersionNuGet$");
        assert_eq!(manifest.root().element("files").unwrap().elements().count(), 4);
    }

    #[test]
    fn test_strip_namespaces_serializes_without_empty_declarations() {
        let store = DocumentStore::new();
        let mut manifest = store.load(MANIFEST).unwrap();
        ManifestSynchronizer::strip_namespaces(&mut manifest);

        assert_eq!(manifest.root().namespace(), Some(MANIFEST_NAMESPACE));
        assert!(manifest.root().elements().all(|child| child.namespace().is_none()));

        let saved = store.save(&manifest);
        assert!(!saved.contains(r#"xmlns="""#));
        assert_eq!(saved.matches(MANIFEST_NAMESPACE).count(), 1);
    }
}
