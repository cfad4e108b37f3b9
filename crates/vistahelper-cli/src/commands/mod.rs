// Command handlers for vistahelper CLI

pub mod list;
pub mod migrate;

pub use list::ListCommand;
pub use migrate::{MigrateCommand, Selection};

use crate::error::CliResult;

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self) -> CliResult<()>;
}
