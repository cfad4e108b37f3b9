#![warn(missing_docs)]

//! Templates for vistahelper
//!
//! Renders the repository-level files (analyzer settings, ignore rules, editor
//! settings, attribute rules, package sources) and the per-project assembly info
//! from built-in handlebars templates, optionally overridden from a directory.

pub mod error;
pub mod loader;
pub mod name;
pub mod renderer;

// Re-export public API
pub use error::{Result, TemplateError};
pub use loader::{LoadedTemplate, TemplateLoader};
pub use name::TemplateName;
pub use renderer::{AssemblyInfoContext, HandlebarsRenderer, TemplateRenderer};
