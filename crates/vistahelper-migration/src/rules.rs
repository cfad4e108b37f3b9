//! The fixed migration rule set
//!
//! Everything the migration writes into project files lives here: platforms to
//! add, global and per-configuration properties, analyzer packages, the shared
//! style-rules link and item excludes.

use vistahelper_document::{
    EntrySpec, KeySource, PropertyUpdate, ReferenceSetMerger, SectionKind, SectionPredicate,
    SectionQuery,
};

/// List property holding the target platforms
pub const TARGET_LIST_PROPERTY: &str = "TargetFrameworks";

/// Platforms every project must target
pub const TARGET_ADDITIONS: [&str; 2] = ["net461", "netstandard2.0"];

/// Attribute qualifying configuration sections
pub const CONDITION_ATTRIBUTE: &str = "Condition";

/// Condition of the debug configuration section
pub const DEBUG_CONDITION: &str = "'$(Configuration)|$(Platform)'=='Debug|AnyCPU'";

/// Condition of the release configuration section
pub const RELEASE_CONDITION: &str = "'$(Configuration)|$(Platform)'=='Release|AnyCPU'";

/// Package whose presence enables the code-contracts define
pub const CODE_CONTRACTS_PACKAGE: &str = "Vista.CodeContracts";

/// Define symbol added when the code-contracts package is referenced
pub const CODE_CONTRACTS_DEFINE: &str = "VISTA_CODE_CONTRACTS";

/// Shared style-rules file name
pub const STYLE_RULES_FILE: &str = "stylecop.json";

/// Link to the shared style-rules file, relative to a project directory
pub const STYLE_RULES_INCLUDE: &str = "..\\..\\stylecop.json";

/// Item exclusion pattern appended to the defaults
pub const ITEM_EXCLUDES: &str = "$(DefaultItemExcludes);*.ncrunchproject";

const INCLUDE: &str = "Include";
const VERSION: &str = "Version";
const LINK: &str = "Link";
const PRIVATE_ASSETS: &str = "PrivateAssets";
const INCLUDE_ASSETS: &str = "IncludeAssets";
const DEFINE_CONSTANTS: &str = "DefineConstants";

const ANALYZER_ASSETS: &str = "runtime; build; native; contentfiles; analyzers";
const RULESET_ASSETS: &str = "runtime; build; native; contentfiles; analyzers; buildtransitive";

/// Analyzer packages as (name, version, included assets)
const ANALYZER_PACKAGES: [(&str, &str, &str); 5] = [
    ("Microsoft.CodeAnalysis.FxCopAnalyzers", "2.9.8", ANALYZER_ASSETS),
    ("StyleCop.Analyzers", "1.1.118", ANALYZER_ASSETS),
    ("Vista.CodeAnalysisRuleSet.FxCop", "2.1.0", RULESET_ASSETS),
    ("Vista.CodeAnalysisRuleSet.Global", "2.1.0", RULESET_ASSETS),
    ("Vista.CodeAnalysisRuleSet.StyleCop", "2.1.0", RULESET_ASSETS),
];

/// The global section: first attribute-free `PropertyGroup`
pub fn global_section() -> SectionQuery {
    SectionQuery::unconditioned(SectionKind::PropertyGroup)
}

/// The debug configuration section
pub fn debug_section() -> SectionQuery {
    SectionQuery::conditioned(
        SectionKind::PropertyGroup,
        SectionPredicate::new(CONDITION_ATTRIBUTE, DEBUG_CONDITION),
    )
}

/// The release configuration section
pub fn release_section() -> SectionQuery {
    SectionQuery::conditioned(
        SectionKind::PropertyGroup,
        SectionPredicate::new(CONDITION_ATTRIBUTE, RELEASE_CONDITION),
    )
}

/// Section receiving package references and additional files
pub fn item_section() -> SectionQuery {
    SectionQuery::unconditioned(SectionKind::ItemGroup)
}

/// Properties of the global section, in application order
pub fn global_properties(project_id: &str) -> Vec<PropertyUpdate> {
    vec![
        PropertyUpdate::set("AssemblyName", project_id),
        PropertyUpdate::set("RootNamespace", project_id),
        PropertyUpdate::set("GenerateAssemblyInfo", "false"),
        PropertyUpdate::set("GenerateDocumentationFile", "true"),
        PropertyUpdate::set("LangVersion", "10"),
        PropertyUpdate::set("TreatWarningsAsErrors", "true"),
        PropertyUpdate::clear("NoWarn"),
        PropertyUpdate::clear("WarningsAsErrors"),
    ]
}

/// Properties of the debug section
pub fn debug_properties(code_contracts: bool) -> Vec<PropertyUpdate> {
    vec![PropertyUpdate::set(
        DEFINE_CONSTANTS,
        defines(&["TRACE", "DEBUG"], code_contracts),
    )]
}

/// Properties of the release section
pub fn release_properties(code_contracts: bool) -> Vec<PropertyUpdate> {
    vec![
        PropertyUpdate::set(DEFINE_CONSTANTS, defines(&["TRACE"], code_contracts)),
        PropertyUpdate::set("DebugType", "pdbonly"),
        PropertyUpdate::set("DebugSymbols", "true"),
    ]
}

fn defines(base: &[&str], code_contracts: bool) -> String {
    let mut symbols = base.to_vec();
    if code_contracts {
        symbols.push(CODE_CONTRACTS_DEFINE);
    }
    symbols.join(";")
}

/// `PackageReference` entries keyed by `Include`
pub fn package_references() -> ReferenceSetMerger {
    ReferenceSetMerger::new(
        SectionKind::ItemGroup,
        "PackageReference",
        KeySource::Attribute(INCLUDE.to_string()),
    )
}

/// `AdditionalFiles` entries keyed by `Include`
pub fn additional_files() -> ReferenceSetMerger {
    ReferenceSetMerger::new(
        SectionKind::ItemGroup,
        "AdditionalFiles",
        KeySource::Attribute(INCLUDE.to_string()),
    )
}

/// `DefaultItemExcludes` entries keyed by their text
pub fn item_excludes() -> ReferenceSetMerger {
    ReferenceSetMerger::new(SectionKind::PropertyGroup, "DefaultItemExcludes", KeySource::Text)
}

/// Analyzer package entries, in order
pub fn analyzer_packages() -> Vec<EntrySpec> {
    ANALYZER_PACKAGES
        .iter()
        .map(|(name, version, assets)| {
            EntrySpec::new(*name)
                .attribute(VERSION, *version)
                .metadata(PRIVATE_ASSETS, "all")
                .metadata(INCLUDE_ASSETS, *assets)
        })
        .collect()
}

/// Link entry for the shared style-rules file
pub fn style_rules_link() -> EntrySpec {
    EntrySpec::new(STYLE_RULES_INCLUDE).attribute(LINK, STYLE_RULES_FILE)
}

/// Item exclusion entries
pub fn item_exclude_entries() -> Vec<EntrySpec> {
    vec![EntrySpec::new(ITEM_EXCLUDES)]
}
