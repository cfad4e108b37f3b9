//! Batch orchestration
//!
//! Root-level files are written once before any project. Each project then runs
//! through a fixed sequence of steps; the first failing step stops that project
//! only, unless the error is batch-fatal.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{Datelike, Utc};
use serde_json::json;
use tracing::{debug, info, info_span, warn};
use vistahelper_document::{DocumentStore, SaveOptions};
use vistahelper_templates::{AssemblyInfoContext, TemplateName, TemplateRenderer};

use crate::{
    config::MigrationConfig,
    discovery::{ProjectDiscovery, PROJECT_EXTENSION},
    error::{MigrationError, Result},
    fs::FileProvider,
    manifest::{sync_manifest_document, MANIFEST_EXTENSION},
    primary::migrate_primary_document,
};

/// Directory holding a project's assembly info
pub const PROPERTIES_DIR: &str = "Properties";

/// Progress of a single project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectState {
    /// Nothing done yet
    Pending,
    /// `Properties/AssemblyInfo.cs` written
    AssemblyInfoWritten,
    /// Project file rewritten
    PrimaryDocumentUpdated,
    /// Manifest rewritten, or skipped for a test project
    ManifestSynced,
    /// All steps completed
    Done,
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectState::Pending => "pending",
            ProjectState::AssemblyInfoWritten => "assembly info written",
            ProjectState::PrimaryDocumentUpdated => "project file updated",
            ProjectState::ManifestSynced => "manifest synced",
            ProjectState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Final status of a project
#[derive(Debug)]
pub enum ProjectStatus {
    /// Every step succeeded
    Done,
    /// A step failed
    Failed {
        /// Last state reached before the failure
        reached: ProjectState,
        /// The failure
        error: MigrationError,
    },
}

/// Result of migrating one project
#[derive(Debug)]
pub struct ProjectOutcome {
    /// Project name as selected
    pub project: String,
    /// Final status
    pub status: ProjectStatus,
    /// The manifest step was skipped because this is a test project
    pub manifest_skipped: bool,
}

impl ProjectOutcome {
    /// Whether the project completed
    pub fn is_done(&self) -> bool {
        matches!(self.status, ProjectStatus::Done)
    }
}

/// Result of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Root-level files written, in order
    pub root_files: Vec<PathBuf>,
    /// Per-project outcomes, in selection order
    pub outcomes: Vec<ProjectOutcome>,
}

impl BatchReport {
    /// Projects that completed
    pub fn succeeded(&self) -> impl Iterator<Item = &ProjectOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_done())
    }

    /// Projects that failed
    pub fn failed(&self) -> impl Iterator<Item = &ProjectOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_done())
    }

    /// Whether every project completed
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Receives one report per failed project
pub trait FailureSink {
    /// Report a project failure
    fn report(&mut self, project: &str, error: &MigrationError);
}

/// Sink that keeps `(project, message)` pairs
#[derive(Debug, Default)]
pub struct CollectingFailureSink {
    failures: Vec<(String, String)>,
}

impl CollectingFailureSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported failures in order
    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }
}

impl FailureSink for CollectingFailureSink {
    fn report(&mut self, project: &str, error: &MigrationError) {
        self.failures.push((project.to_string(), error.to_string()));
    }
}

/// Runs the migration over a repository
pub struct MigrationOrchestrator<'a> {
    files: &'a dyn FileProvider,
    renderer: &'a dyn TemplateRenderer,
    config: MigrationConfig,
    year: i32,
}

impl<'a> MigrationOrchestrator<'a> {
    /// Create an orchestrator stamping the current UTC year
    pub fn new(
        files: &'a dyn FileProvider,
        renderer: &'a dyn TemplateRenderer,
        config: MigrationConfig,
    ) -> Self {
        Self {
            files,
            renderer,
            config,
            year: Utc::now().year(),
        }
    }

    /// Builder: use a fixed year in generated assembly info
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Projects available under `root`
    pub fn discover(&self, root: &Path) -> Result<Vec<String>> {
        ProjectDiscovery::new(self.files, &self.config.source_dir).discover(root)
    }

    /// Migrate the selected projects
    ///
    /// Per-project failures go to `sink` and into the report. Batch-fatal
    /// errors, including any failure while writing root-level files, are
    /// returned without being reported and stop the batch.
    pub fn run_batch(
        &self,
        root: &Path,
        selection: &[String],
        sink: &mut dyn FailureSink,
    ) -> Result<BatchReport> {
        if !self.files.dir_exists(root) {
            return Err(MigrationError::RootNotFound(root.to_path_buf()));
        }

        let mut report = BatchReport {
            root_files: self.write_root_files(root)?,
            outcomes: Vec::with_capacity(selection.len()),
        };

        for project in selection {
            let _span = info_span!("project", project = %project).entered();
            let mut state = ProjectState::Pending;
            let mut manifest_skipped = false;

            let status = match self.run_project(root, project, &mut state, &mut manifest_skipped) {
                Ok(()) => {
                    info!(manifest_skipped, "Project migrated");
                    ProjectStatus::Done
                }
                Err(error) if error.is_batch_fatal() => {
                    warn!(reached = %state, %error, "Batch aborted");
                    return Err(error);
                }
                Err(error) => {
                    warn!(reached = %state, %error, "Project failed");
                    sink.report(project, &error);
                    ProjectStatus::Failed {
                        reached: state,
                        error,
                    }
                }
            };

            report.outcomes.push(ProjectOutcome {
                project: project.clone(),
                status,
                manifest_skipped,
            });
        }

        info!(
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Render and write the repository-level files
    pub fn write_root_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let context = json!({});
        let mut written = Vec::with_capacity(TemplateName::ROOT_FILES.len());
        for name in TemplateName::ROOT_FILES {
            let contents = self.renderer.render(name, &context)?;
            let path = root.join(name.output_file_name());
            self.files.write(&path, &contents)?;
            debug!(path = %path.display(), "Wrote root file");
            written.push(path);
        }
        Ok(written)
    }

    /// Migrate a single project
    pub fn migrate_project(&self, root: &Path, project: &str) -> ProjectOutcome {
        let mut state = ProjectState::Pending;
        let mut manifest_skipped = false;
        let status = match self.run_project(root, project, &mut state, &mut manifest_skipped) {
            Ok(()) => ProjectStatus::Done,
            Err(error) => ProjectStatus::Failed {
                reached: state,
                error,
            },
        };
        ProjectOutcome {
            project: project.to_string(),
            status,
            manifest_skipped,
        }
    }

    fn run_project(
        &self,
        root: &Path,
        project: &str,
        state: &mut ProjectState,
        manifest_skipped: &mut bool,
    ) -> Result<()> {
        let project_dir = root.join(&self.config.source_dir).join(project);
        let primary_path = self
            .files
            .files_with_extension(&project_dir, PROJECT_EXTENSION)?
            .into_iter()
            .next()
            .ok_or_else(|| MigrationError::MissingPrimaryDocument(project_dir.clone()))?;
        let project_id = primary_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| MigrationError::MissingPrimaryDocument(project_dir.clone()))?
            .to_string();

        self.write_assembly_info(&project_dir, &project_id)?;
        *state = ProjectState::AssemblyInfoWritten;

        let primary_store = DocumentStore::with_options(SaveOptions::project());
        let text = self.files.read_to_string(&primary_path)?;
        let mut primary = primary_store
            .load(&text)
            .map_err(|error| MigrationError::from_document(&primary_path, error))?;
        let targets = migrate_primary_document(&mut primary, &project_id)
            .map_err(|error| MigrationError::from_document(&primary_path, error))?;
        self.files.write(&primary_path, &primary_store.save(&primary))?;
        *state = ProjectState::PrimaryDocumentUpdated;

        if self.config.is_test_project(&project_id) {
            debug!(project_id, "Test project, skipping manifest");
            *manifest_skipped = true;
        } else {
            let manifest_path = project_dir.join(format!("{project_id}.{MANIFEST_EXTENSION}"));
            if !self.files.file_exists(&manifest_path) {
                return Err(MigrationError::MissingManifest(manifest_path));
            }

            let manifest_store = DocumentStore::with_options(SaveOptions::manifest());
            let text = self.files.read_to_string(&manifest_path)?;
            let mut manifest = manifest_store
                .load(&text)
                .map_err(|error| MigrationError::from_document(&manifest_path, error))?;
            sync_manifest_document(&mut manifest, &project_id, &targets)
                .map_err(|error| MigrationError::from_document(&manifest_path, error))?;
            self.files.write(&manifest_path, &manifest_store.save(&manifest))?;
        }
        *state = ProjectState::ManifestSynced;

        *state = ProjectState::Done;
        Ok(())
    }

    fn write_assembly_info(&self, project_dir: &Path, project_id: &str) -> Result<()> {
        let properties = project_dir.join(PROPERTIES_DIR);
        if !self.files.dir_exists(&properties) {
            return Err(MigrationError::MissingDirectory(properties));
        }

        let context = AssemblyInfoContext::new(project_id, self.year).to_value()?;
        let contents = self.renderer.render(TemplateName::AssemblyInfo, &context)?;
        self.files
            .write(&properties.join(TemplateName::AssemblyInfo.output_file_name()), &contents)
    }
}
