//! Rewriting a primary project document

use tracing::debug;
use vistahelper_document::{
    prune_empty_sections, Document, DocumentError, PropertyMerger, PropertyUpdate, Result,
    SectionLocator, SectionQuery, SectionRef, TargetList,
};

use crate::rules;

/// Apply the full rule set to a project document
///
/// Returns the resolved target list so the manifest can be derived from it
/// without re-reading the project. Section handles are re-resolved after every
/// step that can append sections, and pruning runs last.
pub fn migrate_primary_document(document: &mut Document, project_id: &str) -> Result<TargetList> {
    let code_contracts =
        rules::package_references().contains_key(document, rules::CODE_CONTRACTS_PACKAGE);

    let targets = merge_targets(document)?;

    let global = SectionLocator::find_section(document, &rules::global_section())?;
    apply_to_all(document, &rules::global_section(), &rules::global_properties(project_id))?;

    SectionLocator::ensure_section(document, &rules::debug_section());
    apply_to_all(document, &rules::debug_section(), &rules::debug_properties(code_contracts))?;

    SectionLocator::ensure_section(document, &rules::release_section());
    apply_to_all(document, &rules::release_section(), &rules::release_properties(code_contracts))?;

    rules::item_excludes().upsert_by_key(document, global, &rules::item_exclude_entries())?;

    let items = SectionLocator::ensure_section(document, &rules::item_section());
    rules::package_references().upsert_by_key(document, items, &rules::analyzer_packages())?;

    let additional_files = rules::additional_files();
    additional_files.remove_by_name_substring(document, rules::STYLE_RULES_FILE)?;
    let items = SectionLocator::ensure_section(document, &rules::item_section());
    additional_files.upsert_by_key(document, items, &[rules::style_rules_link()])?;

    prune_empty_sections(document);

    debug!(project = project_id, targets = %targets, code_contracts, "Migrated project document");
    Ok(targets)
}

/// Resolve each property across every section matching `query`, first match wins
fn apply_to_all(document: &mut Document, query: &SectionQuery, updates: &[PropertyUpdate]) -> Result<()> {
    let sections = SectionLocator::find_all(document, query);
    PropertyMerger::apply_properties_across(document, &sections, updates)
}

/// Merge the required platforms into the first global section declaring the target list
fn merge_targets(document: &mut Document) -> Result<TargetList> {
    let section = target_list_section(document).ok_or_else(|| DocumentError::MissingProperty {
        name: rules::TARGET_LIST_PROPERTY.to_string(),
    })?;

    PropertyMerger::merge_target_list(
        SectionLocator::section_mut(document, section)?,
        rules::TARGET_LIST_PROPERTY,
        rules::TARGET_ADDITIONS,
    )
}

fn target_list_section(document: &Document) -> Option<SectionRef> {
    SectionLocator::find_all(document, &rules::global_section())
        .into_iter()
        .find(|section| {
            SectionLocator::section(document, *section)
                .is_some_and(|element| element.element(rules::TARGET_LIST_PROPERTY).is_some())
        })
}
