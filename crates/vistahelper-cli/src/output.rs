// Output formatting and styling

use colored::Colorize;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a list item
    pub fn list_item(&self, item: &str) -> String {
        format!("  • {}", item)
    }

    /// Format a project failure
    pub fn project_failure(&self, project: &str, message: &str) -> String {
        if self.use_colors {
            format!("{} {}: {}", "✗".red().bold(), project.bold(), message)
        } else {
            format!("✗ {}: {}", project, message)
        }
    }
}

/// Print formatted output
pub fn print_error(msg: &str) {
    let style = OutputStyle::default();
    eprintln!("{}", style.error(msg));
}

pub fn print_warning(msg: &str) {
    let style = OutputStyle::default();
    println!("{}", style.warning(msg));
}
