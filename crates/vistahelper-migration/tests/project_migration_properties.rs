//! Property-based tests for project document migration

use proptest::prelude::*;
use vistahelper_document::{DocumentStore, SaveOptions};
use vistahelper_migration::migrate_primary_document;

/// Strategy for existing target lists
fn targets_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec!["net45", "net461", "net472", "net48", "netstandard2.0", "net6.0"]),
        1..4,
    )
    .prop_map(|targets| targets.into_iter().map(str::to_string).collect())
}

/// Strategy for pre-existing package references
fn packages_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(
        prop::sample::select(vec![
            "Newtonsoft.Json",
            "StyleCop.Analyzers",
            "Vista.CodeContracts",
            "Vista.CodeAnalysisRuleSet.Global",
        ]),
        0..4,
    )
    .prop_map(|packages| packages.into_iter().map(str::to_string).collect())
}

fn project(targets: &[String], packages: &[String], no_warn: bool) -> String {
    let mut text = String::from("<Project Sdk=\"Microsoft.NET.Sdk\"><PropertyGroup>");
    text.push_str(&format!("<TargetFrameworks>{}</TargetFrameworks>", targets.join(";")));
    if no_warn {
        text.push_str("<NoWarn>CS1591</NoWarn>");
    }
    text.push_str("</PropertyGroup><ItemGroup>");
    for package in packages {
        text.push_str(&format!("<PackageReference Include=\"{package}\" Version=\"0.1.0\" />"));
    }
    text.push_str("</ItemGroup></Project>");
    text
}

fn migrate(text: &str) -> String {
    let store = DocumentStore::with_options(SaveOptions::project());
    let mut document = store.load(text).unwrap();
    migrate_primary_document(&mut document, "Vista.Sample").unwrap();
    store.save(&document)
}

proptest! {
    /// Property: a second run produces exactly the first run's output
    #[test]
    fn prop_migration_is_idempotent(
        targets in targets_strategy(),
        packages in packages_strategy(),
        no_warn in any::<bool>(),
    ) {
        let first = migrate(&project(&targets, &packages, no_warn));
        let second = migrate(&first);
        prop_assert_eq!(first, second);
    }

    /// Property: the code-contracts define appears exactly when the package was referenced
    #[test]
    fn prop_code_contracts_define_follows_reference(
        targets in targets_strategy(),
        packages in packages_strategy(),
    ) {
        let output = migrate(&project(&targets, &packages, false));
        let referenced = packages.iter().any(|package| package == "Vista.CodeContracts");
        prop_assert_eq!(output.matches("VISTA_CODE_CONTRACTS").count(), if referenced { 2 } else { 0 });
    }

    /// Property: every analyzer package appears once regardless of what was there before
    #[test]
    fn prop_analyzer_packages_are_unique(
        targets in targets_strategy(),
        packages in packages_strategy(),
    ) {
        let output = migrate(&project(&targets, &packages, false));
        prop_assert_eq!(output.matches("Include=\"StyleCop.Analyzers\"").count(), 1);
        prop_assert_eq!(output.matches("Include=\"Vista.CodeAnalysisRuleSet.Global\"").count(), 1);
        prop_assert_eq!(output.matches("<AdditionalFiles ").count(), 1);
    }
}
