//! Regenerating a project's package manifest

use tracing::debug;
use vistahelper_document::{Document, ManifestSynchronizer, Result, TargetList};

/// Extension of package manifests
pub const MANIFEST_EXTENSION: &str = "nuspec";

/// Rebuild metadata and file listing from the resolved target list, then strip namespaces
pub fn sync_manifest_document(
    manifest: &mut Document,
    project_id: &str,
    targets: &TargetList,
) -> Result<()> {
    let synchronizer = ManifestSynchronizer::new();
    synchronizer.regenerate_metadata(manifest, project_id)?;
    let files = synchronizer.regenerate_file_list(manifest, targets.items(), project_id)?;
    ManifestSynchronizer::strip_namespaces(manifest);

    debug!(project = project_id, files, "Synchronized manifest");
    Ok(())
}
