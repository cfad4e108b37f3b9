//! Declarative upsert of flat properties inside a section

use std::{collections::BTreeSet, fmt};

use tracing::debug;

use crate::{
    error::{DocumentError, Result},
    locator::{SectionLocator, SectionRef},
    node::{Document, Element},
};

/// Separator used by multi-value list properties
pub const LIST_SEPARATOR: char = ';';

/// Desired value of a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Property present with this text
    Set(String),
    /// Property present but self-closed
    Clear,
}

/// One entry of an upsert list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyUpdate {
    /// Property element name
    pub name: String,
    /// Desired value
    pub value: PropertyValue,
}

impl PropertyUpdate {
    /// Set a property; empty or whitespace-only values mean [`PropertyValue::Clear`]
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = if value.trim().is_empty() {
            PropertyValue::Clear
        } else {
            PropertyValue::Set(value)
        };
        Self {
            name: name.into(),
            value,
        }
    }

    /// Keep a property present with no value
    pub fn clear(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PropertyValue::Clear,
        }
    }
}

/// Sorted, duplicate-free list held by a `;`-separated property
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetList(Vec<String>);

impl TargetList {
    /// Parse a `;`-separated value, dropping empty segments
    pub fn parse(value: &str) -> Self {
        let items: BTreeSet<String> = value
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        Self(items.into_iter().collect())
    }

    /// Items in ordinal order
    pub fn items(&self) -> &[String] {
        &self.0
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TargetList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(&LIST_SEPARATOR.to_string()))
    }
}

/// Applies set / update / clear semantics to the properties of one section
pub struct PropertyMerger;

impl PropertyMerger {
    /// Apply updates in order
    ///
    /// Properties not named in `updates` are left untouched. Existing properties
    /// with a value are updated in place; cleared properties are removed and
    /// re-appended self-closed so their presence is kept.
    pub fn apply_properties(section: &mut Element, updates: &[PropertyUpdate]) {
        for update in updates {
            let existing = section.position_of(&update.name);
            match (&update.value, existing) {
                (PropertyValue::Clear, Some(index)) => {
                    section.remove_child(index);
                    section.append(Element::new(update.name.clone()));
                }
                (PropertyValue::Clear, None) => {
                    section.append(Element::new(update.name.clone()));
                }
                (PropertyValue::Set(value), Some(index)) => {
                    if let Some(property) = section.element_at_mut(index) {
                        property.set_text(value.clone());
                    }
                }
                (PropertyValue::Set(value), None) => {
                    section.append(Element::new(update.name.clone()).with_text(value.clone()));
                }
            }
            debug!(property = %update.name, value = ?update.value, "Applied property");
        }
    }

    /// Apply updates across several sections of the same kind
    ///
    /// Each property is resolved in the first of `sections`, in the given
    /// order, that already holds it. Values are updated in place there; cleared
    /// properties are removed there and re-appended self-closed to the first
    /// section. Properties found nowhere are appended to the first section.
    pub fn apply_properties_across(
        document: &mut Document,
        sections: &[SectionRef],
        updates: &[PropertyUpdate],
    ) -> Result<()> {
        let Some(&home) = sections.first() else {
            return Err(DocumentError::SectionNotFound("no sections to update".to_string()));
        };

        for update in updates {
            let existing = sections.iter().find_map(|&section| {
                SectionLocator::section(document, section)
                    .and_then(|element| element.position_of(&update.name))
                    .map(|index| (section, index))
            });

            match (&update.value, existing) {
                (PropertyValue::Set(value), Some((section, index))) => {
                    let section = SectionLocator::section_mut(document, section)?;
                    if let Some(property) = section.element_at_mut(index) {
                        property.set_text(value.clone());
                    }
                }
                (PropertyValue::Set(value), None) => {
                    SectionLocator::section_mut(document, home)?
                        .append(Element::new(update.name.clone()).with_text(value.clone()));
                }
                (PropertyValue::Clear, found) => {
                    if let Some((section, index)) = found {
                        SectionLocator::section_mut(document, section)?.remove_child(index);
                    }
                    SectionLocator::section_mut(document, home)?
                        .append(Element::new(update.name.clone()));
                }
            }
            debug!(property = %update.name, value = ?update.value, "Applied property across sections");
        }
        Ok(())
    }

    /// Union a `;`-separated list property with `additions`, sort it and write it back
    ///
    /// The property must already exist in the section; it is never synthesized.
    pub fn merge_target_list<I, S>(section: &mut Element, name: &str, additions: I) -> Result<TargetList>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = section
            .position_of(name)
            .ok_or_else(|| DocumentError::MissingProperty {
                name: name.to_string(),
            })?;

        let property = section
            .element_at_mut(index)
            .ok_or_else(|| DocumentError::MissingProperty {
                name: name.to_string(),
            })?;

        let mut merged = property.text();
        for addition in additions {
            merged.push(LIST_SEPARATOR);
            merged.push_str(addition.as_ref());
        }
        let list = TargetList::parse(&merged);
        property.set_text(list.to_string());

        debug!(property = name, value = %list, "Merged list property");
        Ok(list)
    }
}
