//! Names of the built-in templates and the files they produce

use std::fmt;

/// A template known to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateName {
    /// `stylecop.json` analyzer settings
    StyleCop,
    /// `.gitignore`
    GitIgnore,
    /// `.editorconfig`
    EditorConfig,
    /// `.gitattributes`
    GitAttributes,
    /// `nuget.config` package sources
    NugetConfig,
    /// Per-project `Properties/AssemblyInfo.cs`
    AssemblyInfo,
}

impl TemplateName {
    /// Templates written once at the repository root, in write order
    pub const ROOT_FILES: [TemplateName; 5] = [
        TemplateName::StyleCop,
        TemplateName::GitIgnore,
        TemplateName::EditorConfig,
        TemplateName::GitAttributes,
        TemplateName::NugetConfig,
    ];

    /// Every template
    pub const ALL: [TemplateName; 6] = [
        TemplateName::StyleCop,
        TemplateName::GitIgnore,
        TemplateName::EditorConfig,
        TemplateName::GitAttributes,
        TemplateName::NugetConfig,
        TemplateName::AssemblyInfo,
    ];

    /// Registry key, also the override file stem (`<key>.hbs`)
    pub fn key(self) -> &'static str {
        match self {
            TemplateName::StyleCop => "stylecop.json",
            TemplateName::GitIgnore => "gitignore",
            TemplateName::EditorConfig => "editorconfig",
            TemplateName::GitAttributes => "gitattributes",
            TemplateName::NugetConfig => "nuget.config",
            TemplateName::AssemblyInfo => "AssemblyInfo.cs",
        }
    }

    /// Name of the file the rendered template is written to
    pub fn output_file_name(self) -> &'static str {
        match self {
            TemplateName::StyleCop => "stylecop.json",
            TemplateName::GitIgnore => ".gitignore",
            TemplateName::EditorConfig => ".editorconfig",
            TemplateName::GitAttributes => ".gitattributes",
            TemplateName::NugetConfig => "nuget.config",
            TemplateName::AssemblyInfo => "AssemblyInfo.cs",
        }
    }

    /// Look up a template by registry key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.key() == key)
    }

    pub(crate) fn embedded_source(self) -> &'static str {
        match self {
            TemplateName::StyleCop => include_str!("../templates/stylecop.json.hbs"),
            TemplateName::GitIgnore => include_str!("../templates/gitignore.hbs"),
            TemplateName::EditorConfig => include_str!("../templates/editorconfig.hbs"),
            TemplateName::GitAttributes => include_str!("../templates/gitattributes.hbs"),
            TemplateName::NugetConfig => include_str!("../templates/nuget.config.hbs"),
            TemplateName::AssemblyInfo => include_str!("../templates/AssemblyInfo.cs.hbs"),
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
