//! Keyed sets of repeated entries (package references, additional files, ...)
//!
//! Entries are identified by a key, taken either from an attribute or from the
//! element text. Keys are unique across all sections of the configured kind
//! once a merge completes, even though the raw document does not enforce it.

use tracing::debug;

use crate::{
    error::Result,
    locator::{SectionKind, SectionLocator, SectionRef},
    node::{Document, Element},
};

/// Where an entry's identifying key lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Value of the named attribute, e.g. `Include`
    Attribute(String),
    /// Text content of the entry
    Text,
}

impl KeySource {
    fn key_of(&self, entry: &Element) -> Option<String> {
        match self {
            KeySource::Attribute(name) => entry.attribute(name).map(str::to_string),
            KeySource::Text => Some(entry.text()),
        }
    }
}

/// Desired state of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpec {
    /// Identifying key
    pub key: String,
    /// Auxiliary attributes, written after the key attribute
    pub attributes: Vec<(String, String)>,
    /// Metadata child elements as (name, text)
    pub metadata: Vec<(String, String)>,
}

impl EntrySpec {
    /// Entry with only a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            attributes: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Builder: add an auxiliary attribute
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: add a metadata child element
    pub fn metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((name.into(), value.into()));
        self
    }
}

/// Replace-by-key merger for one kind of repeated entry
#[derive(Debug, Clone)]
pub struct ReferenceSetMerger {
    kind: SectionKind,
    element_name: String,
    key: KeySource,
}

impl ReferenceSetMerger {
    /// Create a merger for `element_name` entries living in `kind` sections
    pub fn new(kind: SectionKind, element_name: impl Into<String>, key: KeySource) -> Self {
        Self {
            kind,
            element_name: element_name.into(),
            key,
        }
    }

    /// Entry element name
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Replace entries by key
    ///
    /// Every existing entry whose key matches one of `entries` is removed from
    /// every section of this merger's kind, then fresh entries are appended to
    /// `target` in the given order. Returns the number of removed entries.
    pub fn upsert_by_key(
        &self,
        document: &mut Document,
        target: SectionRef,
        entries: &[EntrySpec],
    ) -> Result<usize> {
        let keys: Vec<&str> = entries.iter().map(|entry| entry.key.as_str()).collect();
        let removed = self.remove_where(document, |key| keys.contains(&key))?;

        let section = SectionLocator::section_mut(document, target)?;
        for entry in entries {
            section.append(self.build_entry(entry));
        }

        debug!(
            entry = %self.element_name,
            removed,
            added = entries.len(),
            "Upserted entries by key"
        );
        Ok(removed)
    }

    /// Remove every entry whose key contains `substring`
    pub fn remove_by_name_substring(&self, document: &mut Document, substring: &str) -> Result<usize> {
        let removed = self.remove_where(document, |key| key.contains(substring))?;
        debug!(entry = %self.element_name, substring, removed, "Retracted entries");
        Ok(removed)
    }

    /// Whether an entry with exactly this key exists in any section of this kind
    pub fn contains_key(&self, document: &Document, key: &str) -> bool {
        SectionLocator::sections_of_kind(document, self.kind)
            .into_iter()
            .filter_map(|section| SectionLocator::section(document, section))
            .flat_map(Element::elements)
            .filter(|entry| entry.local_name() == self.element_name)
            .any(|entry| self.key.key_of(entry).as_deref() == Some(key))
    }

    /// Keys of all entries in document order
    pub fn keys(&self, document: &Document) -> Vec<String> {
        SectionLocator::sections_of_kind(document, self.kind)
            .into_iter()
            .filter_map(|section| SectionLocator::section(document, section))
            .flat_map(Element::elements)
            .filter(|entry| entry.local_name() == self.element_name)
            .filter_map(|entry| self.key.key_of(entry))
            .collect()
    }

    fn remove_where(
        &self,
        document: &mut Document,
        mut matches: impl FnMut(&str) -> bool,
    ) -> Result<usize> {
        let mut removed = 0;
        for section in SectionLocator::sections_of_kind(document, self.kind) {
            let section = SectionLocator::section_mut(document, section)?;
            removed += section.retain_elements(|entry| {
                if entry.local_name() != self.element_name {
                    return true;
                }
                !self
                    .key
                    .key_of(entry)
                    .is_some_and(|key| matches(key.as_str()))
            });
        }
        Ok(removed)
    }

    fn build_entry(&self, spec: &EntrySpec) -> Element {
        let mut entry = Element::new(self.element_name.clone());
        match &self.key {
            KeySource::Attribute(name) => entry.set_attribute(name.clone(), spec.key.clone()),
            KeySource::Text => entry.set_text(spec.key.clone()),
        }
        for (name, value) in &spec.attributes {
            entry.set_attribute(name.clone(), value.clone());
        }
        for (name, value) in &spec.metadata {
            entry.append(Element::new(name.clone()).with_text(value.clone()));
        }
        entry
    }
}

/// Remove every prunable section left with no child nodes
///
/// Runs once per document after all merges. Section handles taken before the
/// call are invalid afterwards.
pub fn prune_empty_sections(document: &mut Document) -> usize {
    let pruned = document
        .root_mut()
        .retain_elements(|element| !is_empty_section(element));
    if pruned > 0 {
        debug!(pruned, "Pruned empty sections");
    }
    pruned
}

fn is_empty_section(element: &Element) -> bool {
    SectionKind::of(element).is_some_and(SectionKind::is_prunable) && element.is_empty()
}
