// CLI errors and their user-facing messages

use thiserror::Error;
use vistahelper_migration::MigrationError;
use vistahelper_templates::TemplateError;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{0}")]
    Migration(#[from] MigrationError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("{failed} of {total} projects failed")]
    BatchFailed { failed: usize, total: usize },
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'vistahelper migrate --help' for usage information.",
                    message
                )
            }
            CliError::Migration(MigrationError::Config(e)) => {
                format!("Configuration error: {}\n\nCheck vistahelper.toml and VISTAHELPER_* variables.", e)
            }
            CliError::Migration(MigrationError::SourceDirectoryNotFound(path)) => {
                format!(
                    "Source directory {} does not exist\n\nSet source_dir in vistahelper.toml if projects live elsewhere.",
                    path.display()
                )
            }
            CliError::Migration(e) => format!("Migration aborted: {}", e),
            CliError::Template(e) => {
                format!("Template error: {}\n\nCheck the files in your templates_dir.", e)
            }
            CliError::BatchFailed { failed, total } => {
                format!("{} of {} projects failed; see the errors above.", failed, total)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_invalid_argument_points_to_help() {
        let error = CliError::InvalidArgument {
            message: "no projects selected".to_string(),
        };
        assert!(error.user_message().contains("--help"));
    }

    #[test]
    fn test_migration_error_message_keeps_cause() {
        let error = CliError::from(MigrationError::RootNotFound(PathBuf::from("/repo")));
        assert_eq!(error.user_message(), "Migration aborted: Directory /repo does not exist");
    }

    #[test]
    fn test_batch_failed_counts() {
        let error = CliError::BatchFailed { failed: 1, total: 3 };
        assert_eq!(error.to_string(), "1 of 3 projects failed");
    }
}
