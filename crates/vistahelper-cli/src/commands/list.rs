// List the projects available for migration

use std::path::PathBuf;

use vistahelper_migration::{LocalFileSystem, MigrationConfig, ProjectDiscovery};

use super::Command;
use crate::{
    error::CliResult,
    logging::VerbosityLevel,
    output::{self, OutputStyle},
};

/// List projects under the repository's source directory
pub struct ListCommand {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl ListCommand {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config_path: None,
        }
    }

    pub fn with_config(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    /// Project names in discovery order
    pub fn projects(&self) -> CliResult<Vec<String>> {
        let config = MigrationConfig::load(&self.root, self.config_path.as_deref())?;
        let files = LocalFileSystem::new(true);
        let projects = ProjectDiscovery::new(&files, &config.source_dir).discover(&self.root)?;
        Ok(projects)
    }
}

impl Command for ListCommand {
    fn execute(&self) -> CliResult<()> {
        let projects = self.projects()?;

        if projects.is_empty() {
            output::print_warning("No projects found");
            return Ok(());
        }

        let style = OutputStyle::default();
        if VerbosityLevel::Normal.should_output() {
            println!("{}", style.header(&format!("{} projects", projects.len())));
        }
        for project in &projects {
            println!("{}", style.list_item(project));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_projects_only_lists_directories_with_one_project_file() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("Beta")).unwrap();
        fs::create_dir_all(src.join("Alpha")).unwrap();
        fs::create_dir_all(src.join("Empty")).unwrap();
        fs::write(src.join("Beta").join("Beta.csproj"), "<Project />").unwrap();
        fs::write(src.join("Alpha").join("Alpha.csproj"), "<Project />").unwrap();

        let projects = ListCommand::new(temp.path().to_path_buf()).projects().unwrap();
        assert_eq!(projects, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_missing_source_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(ListCommand::new(temp.path().to_path_buf()).projects().is_err());
    }
}
