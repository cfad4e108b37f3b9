//! Rendering named templates against a key/value context

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Result, TemplateError},
    loader::TemplateLoader,
    name::TemplateName,
};

/// Renders a named template with a context
pub trait TemplateRenderer {
    /// Render `name` with `context`; unknown names fail with [`TemplateError::NotFound`]
    fn render(&self, name: TemplateName, context: &Value) -> Result<String>;
}

/// Context of the per-project `AssemblyInfo.cs` template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyInfoContext {
    /// Assembly title, the project identifier
    pub assembly_title: String,
    /// Assembly product, the project identifier
    pub assembly_product: String,
    /// Copyright year
    pub year: String,
}

impl AssemblyInfoContext {
    /// Context for a project identifier and year
    pub fn new(project_id: &str, year: i32) -> Self {
        Self {
            assembly_title: project_id.to_string(),
            assembly_product: project_id.to_string(),
            year: year.to_string(),
        }
    }

    /// Context as a JSON value with camelCase keys
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Handlebars-backed renderer
///
/// Runs in strict mode so a variable missing from the context is an error
/// rather than an empty string. Output is never HTML-escaped.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer with no templates registered
    pub fn empty() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Renderer with every built-in template registered
    pub fn new() -> Result<Self> {
        let mut renderer = Self::empty();
        for name in TemplateName::ALL {
            renderer.register(name, name.embedded_source())?;
        }
        Ok(renderer)
    }

    /// Built-in templates, with `*.hbs` files from `dir` replacing them by name
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut renderer = Self::new()?;
        for template in TemplateLoader::new().load_from_directory(dir)? {
            renderer.register(template.name, &template.source)?;
        }
        Ok(renderer)
    }

    /// Register or replace a template
    pub fn register(&mut self, name: TemplateName, source: &str) -> Result<()> {
        self.registry
            .register_template_string(name.key(), source)
            .map_err(|source| TemplateError::Syntax {
                name: name.key().to_string(),
                source: Box::new(source),
            })?;
        debug!(template = %name, "Registered template");
        Ok(())
    }

    /// Whether a template is registered
    pub fn has_template(&self, name: TemplateName) -> bool {
        self.registry.has_template(name.key())
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, name: TemplateName, context: &Value) -> Result<String> {
        if !self.has_template(name) {
            return Err(TemplateError::NotFound(name.key().to_string()));
        }

        self.registry
            .render(name.key(), context)
            .map_err(|source| TemplateError::Render {
                name: name.key().to_string(),
                source: Box::new(source),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_root_templates_render_with_empty_context() {
        let renderer = HandlebarsRenderer::new().unwrap();
        for name in TemplateName::ROOT_FILES {
            let rendered = renderer.render(name, &json!({})).unwrap();
            assert!(!rendered.is_empty(), "{name} rendered empty");
        }
    }

    #[test]
    fn test_assembly_info_substitutes_context() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let context = AssemblyInfoContext::new("Vista.Core", 2026).to_value().unwrap();

        let rendered = renderer.render(TemplateName::AssemblyInfo, &context).unwrap();

        assert!(rendered.contains(r#"[assembly: AssemblyTitle("Vista.Core")]"#));
        assert!(rendered.contains(r#"[assembly: AssemblyProduct("Vista.Core")]"#));
        assert!(rendered.contains("2026"));
    }

    #[test]
    fn test_context_uses_camel_case_keys() {
        let context = AssemblyInfoContext::new("Vista.Core", 2026).to_value().unwrap();
        assert_eq!(
            context,
            json!({
                "assemblyTitle": "Vista.Core",
                "assemblyProduct": "Vista.Core",
                "year": "2026",
            })
        );
    }

    #[test]
    fn test_output_is_not_html_escaped() {
        let mut renderer = HandlebarsRenderer::empty();
        renderer.register(TemplateName::GitIgnore, "{{value}}").unwrap();

        let rendered = renderer
            .render(TemplateName::GitIgnore, &json!({ "value": "<a & \"b\">" }))
            .unwrap();
        assert_eq!(rendered, "<a & \"b\">");
    }

    #[test]
    fn test_missing_variable_fails_in_strict_mode() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let result = renderer.render(TemplateName::AssemblyInfo, &json!({}));
        assert!(matches!(result, Err(TemplateError::Render { .. })));
    }

    #[test]
    fn test_unregistered_template_is_not_found() {
        let renderer = HandlebarsRenderer::empty();
        let result = renderer.render(TemplateName::StyleCop, &json!({}));
        assert!(matches!(result, Err(TemplateError::NotFound(ref key)) if key == "stylecop.json"));
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let mut renderer = HandlebarsRenderer::empty();
        let result = renderer.register(TemplateName::GitIgnore, "{{#if x}}");
        assert!(matches!(result, Err(TemplateError::Syntax { .. })));
    }
}
