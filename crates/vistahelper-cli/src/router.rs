// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::*;
use crate::error::CliResult;

/// vistahelper - migrate .NET project repositories to shared conventions
#[derive(Parser, Debug)]
#[command(name = "vistahelper")]
#[command(bin_name = "vistahelper")]
#[command(about = "Migrate .NET project files, package manifests and repository files")]
#[command(
    long_about = "vistahelper rewrites the project files and package manifests under <ROOT>/src to shared conventions:\nadded target platforms, normalized build properties, analyzer packages, regenerated manifests,\nand templated repository files (.gitignore, .editorconfig, stylecop.json, ...)."
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Preview changes without writing any file
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Configuration file (default: <ROOT>/vistahelper.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the projects that can be migrated
    #[command(about = "List projects under <ROOT>/src with exactly one project file")]
    List {
        /// Repository root
        #[arg(value_name = "ROOT")]
        root: PathBuf,
    },

    /// Migrate the selected projects
    #[command(about = "Write repository files and migrate the selected projects")]
    Migrate {
        /// Repository root
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Project to migrate (repeatable, processed in the given order)
        #[arg(short, long = "project", value_name = "NAME", conflicts_with = "all")]
        projects: Vec<String>,

        /// Migrate every discovered project
        #[arg(short, long)]
        all: bool,
    },
}

/// Routes parsed arguments to command handlers
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub fn route() -> CliResult<()> {
        let cli = Cli::parse();

        // Initialize logging based on CLI flags
        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(&cli)
    }

    /// Execute a command
    pub fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::List { root } => {
                let cmd = ListCommand::new(root.clone()).with_config(cli.config.clone());
                cmd.execute()
            }
            Commands::Migrate {
                root,
                projects,
                all,
            } => {
                let selection = if *all {
                    Selection::All
                } else {
                    Selection::Named(projects.clone())
                };
                let cmd = MigrateCommand::new(root.clone(), selection)
                    .with_config(cli.config.clone())
                    .with_dry_run(cli.dry_run);
                cmd.execute()
            }
        }
    }
}
