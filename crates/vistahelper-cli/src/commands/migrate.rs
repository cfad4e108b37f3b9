// Migrate the selected projects of a repository

use std::path::{Path, PathBuf};

use tracing::debug;
use vistahelper_migration::{
    BatchReport, FailureSink, LocalFileSystem, MigrationConfig, MigrationError,
    MigrationOrchestrator,
};
use vistahelper_templates::HandlebarsRenderer;

use super::Command;
use crate::{
    error::{CliError, CliResult},
    logging::VerbosityLevel,
    output::{self, OutputStyle},
};

/// Which projects to migrate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every discovered project
    All,
    /// These projects, in this order
    Named(Vec<String>),
}

/// Prints each project failure as it happens
struct ConsoleFailureSink {
    style: OutputStyle,
}

impl FailureSink for ConsoleFailureSink {
    fn report(&mut self, project: &str, error: &MigrationError) {
        eprintln!("{}", self.style.project_failure(project, &error.to_string()));
    }
}

/// Migrate projects under a repository root
pub struct MigrateCommand {
    pub root: PathBuf,
    pub selection: Selection,
    pub config_path: Option<PathBuf>,
    pub dry_run: bool,
    year: Option<i32>,
}

impl MigrateCommand {
    pub fn new(root: PathBuf, selection: Selection) -> Self {
        Self {
            root,
            selection,
            config_path: None,
            dry_run: false,
            year: None,
        }
    }

    pub fn with_config(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stamp a fixed year into generated assembly info
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Configuration for this run; the dry-run flag adds to the file setting
    pub fn load_config(&self) -> CliResult<MigrationConfig> {
        let mut config = MigrationConfig::load(&self.root, self.config_path.as_deref())?;
        config.dry_run |= self.dry_run;
        Ok(config)
    }

    /// Run the batch and return its report
    pub fn run(&self, sink: &mut dyn FailureSink) -> CliResult<BatchReport> {
        self.run_with(self.load_config()?, sink)
    }

    fn run_with(&self, config: MigrationConfig, sink: &mut dyn FailureSink) -> CliResult<BatchReport> {
        let renderer = match &config.templates_dir {
            Some(dir) => HandlebarsRenderer::with_overrides(&resolve(&self.root, dir))?,
            None => HandlebarsRenderer::new()?,
        };
        let files = LocalFileSystem::new(config.dry_run);

        let mut orchestrator = MigrationOrchestrator::new(&files, &renderer, config);
        if let Some(year) = self.year {
            orchestrator = orchestrator.with_year(year);
        }

        let projects = match &self.selection {
            Selection::All => orchestrator.discover(&self.root)?,
            Selection::Named(projects) => projects.clone(),
        };
        if projects.is_empty() {
            return Err(CliError::InvalidArgument {
                message: "no projects selected; pass --project NAME or --all".to_string(),
            });
        }
        debug!(?projects, dry_run = orchestrator.config().dry_run, "Starting migration");

        Ok(orchestrator.run_batch(&self.root, &projects, sink)?)
    }

    fn print_report(&self, style: &OutputStyle, report: &BatchReport, dry_run: bool) {
        if !VerbosityLevel::Normal.should_output() {
            return;
        }
        for outcome in report.succeeded() {
            if outcome.manifest_skipped {
                println!(
                    "{}",
                    style.success(&format!("{} (test project, manifest skipped)", outcome.project))
                );
            } else {
                println!("{}", style.success(&outcome.project));
            }
        }

        let total = report.outcomes.len();
        let succeeded = report.succeeded().count();
        println!(
            "{}",
            style.info(&format!(
                "{} root files written, {} of {} projects migrated",
                report.root_files.len(),
                succeeded,
                total
            ))
        );
        if dry_run {
            output::print_warning("Dry run: no files were written");
        }
    }
}

impl Command for MigrateCommand {
    fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        let mut sink = ConsoleFailureSink {
            style: OutputStyle::default(),
        };

        let config = self.load_config()?;
        let dry_run = config.dry_run;
        let report = self.run_with(config, &mut sink)?;
        self.print_report(&style, &report, dry_run);

        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::BatchFailed {
                failed: report.failed().count(),
                total: report.outcomes.len(),
            })
        }
    }
}

fn resolve(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}
