//! Finding and creating sections
//!
//! A section is a direct child of the document root of a known kind. It is
//! either unconditioned (no attributes at all) or conditioned by a single
//! attribute predicate compared by exact value.

use std::fmt;

use tracing::debug;

use crate::{
    error::{DocumentError, Result},
    node::{Document, Element},
};

/// Kinds of grouping sections the tool understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// `PropertyGroup` in a project file
    PropertyGroup,
    /// `ItemGroup` in a project file
    ItemGroup,
    /// `metadata` in a package manifest
    Metadata,
    /// `files` in a package manifest
    Files,
}

impl SectionKind {
    /// Element name of the section
    pub fn element_name(self) -> &'static str {
        match self {
            SectionKind::PropertyGroup => "PropertyGroup",
            SectionKind::ItemGroup => "ItemGroup",
            SectionKind::Metadata => "metadata",
            SectionKind::Files => "files",
        }
    }

    /// Kinds that are dropped when they end up empty
    pub fn is_prunable(self) -> bool {
        matches!(self, SectionKind::PropertyGroup | SectionKind::ItemGroup)
    }

    fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "PropertyGroup" => Some(SectionKind::PropertyGroup),
            "ItemGroup" => Some(SectionKind::ItemGroup),
            "metadata" => Some(SectionKind::Metadata),
            "files" => Some(SectionKind::Files),
            _ => None,
        }
    }

    /// Kind of an element, if it is a section
    pub fn of(element: &Element) -> Option<Self> {
        Self::from_element_name(element.local_name())
    }
}

/// Attribute predicate qualifying a conditioned section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPredicate {
    /// Attribute name, e.g. `Condition`
    pub attribute: String,
    /// Exact attribute value
    pub value: String,
}

impl SectionPredicate {
    /// Create a predicate
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    fn matches(&self, element: &Element) -> bool {
        element.attribute(&self.attribute) == Some(self.value.as_str())
    }
}

/// Section lookup: a kind plus an optional predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionQuery {
    /// Section kind
    pub kind: SectionKind,
    /// Predicate; `None` selects attribute-free sections only
    pub predicate: Option<SectionPredicate>,
}

impl SectionQuery {
    /// Query for the unconditioned section of a kind
    pub fn unconditioned(kind: SectionKind) -> Self {
        Self {
            kind,
            predicate: None,
        }
    }

    /// Query for a section conditioned by an attribute value
    pub fn conditioned(kind: SectionKind, predicate: SectionPredicate) -> Self {
        Self {
            kind,
            predicate: Some(predicate),
        }
    }

    /// Whether an element satisfies this query
    pub fn matches(&self, element: &Element) -> bool {
        if element.local_name() != self.kind.element_name() {
            return false;
        }
        match &self.predicate {
            Some(predicate) => predicate.matches(element),
            None => !element.has_attributes(),
        }
    }
}

impl fmt::Display for SectionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.predicate {
            Some(predicate) => write!(
                f,
                "{}[{}=\"{}\"]",
                self.kind.element_name(),
                predicate.attribute,
                predicate.value
            ),
            None => write!(f, "{}", self.kind.element_name()),
        }
    }
}

/// Handle to a section: its position among the root's children
///
/// Handles stay valid while sections are only appended; pruning root children
/// invalidates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRef(usize);

impl SectionRef {
    /// Position among the root's child nodes
    pub fn index(self) -> usize {
        self.0
    }
}

/// Locates and creates sections in a document
pub struct SectionLocator;

impl SectionLocator {
    /// Find the first section matching the query
    pub fn find_section(document: &Document, query: &SectionQuery) -> Result<SectionRef> {
        document
            .root()
            .children()
            .iter()
            .position(|node| node.as_element().is_some_and(|element| query.matches(element)))
            .map(SectionRef)
            .ok_or_else(|| DocumentError::SectionNotFound(query.to_string()))
    }

    /// All sections matching the query, in document order
    pub fn find_all(document: &Document, query: &SectionQuery) -> Vec<SectionRef> {
        document
            .root()
            .children()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.as_element().is_some_and(|element| query.matches(element)))
            .map(|(index, _)| SectionRef(index))
            .collect()
    }

    /// Return the first matching section, appending a new one to the root if none exists
    pub fn ensure_section(document: &mut Document, query: &SectionQuery) -> SectionRef {
        if let Ok(existing) = Self::find_section(document, query) {
            return existing;
        }

        let mut section = Element::new(query.kind.element_name());
        if let Some(predicate) = &query.predicate {
            section.set_attribute(predicate.attribute.clone(), predicate.value.clone());
        }
        debug!(section = %query, "Creating section");
        SectionRef(document.root_mut().append(section))
    }

    /// Return the first section of a kind whatever its attributes, appending a bare one if none exists
    ///
    /// For documents that hold a single section per kind, such as package
    /// manifests, where attributes like `minClientVersion` do not condition it.
    pub fn ensure_section_of_kind(document: &mut Document, kind: SectionKind) -> SectionRef {
        match Self::sections_of_kind(document, kind).first() {
            Some(existing) => *existing,
            None => Self::ensure_section(document, &SectionQuery::unconditioned(kind)),
        }
    }

    /// Borrow a section
    pub fn section(document: &Document, section: SectionRef) -> Option<&Element> {
        document
            .root()
            .children()
            .get(section.0)
            .and_then(|node| node.as_element())
    }

    /// Mutably borrow a section
    pub fn section_mut(document: &mut Document, section: SectionRef) -> Result<&mut Element> {
        document
            .root_mut()
            .element_at_mut(section.0)
            .ok_or_else(|| DocumentError::SectionNotFound(format!("#{}", section.0)))
    }

    /// All sections of a kind regardless of predicate, in document order
    pub fn sections_of_kind(document: &Document, kind: SectionKind) -> Vec<SectionRef> {
        document
            .root()
            .children()
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                node.as_element()
                    .is_some_and(|element| SectionKind::of(element) == Some(kind))
            })
            .map(|(index, _)| SectionRef(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;

    const DEBUG_CONDITION: &str = "'$(Configuration)|$(Platform)'=='Debug|AnyCPU'";

    fn load(text: &str) -> Document {
        DocumentStore::new().load(text).unwrap()
    }

    #[test]
    fn test_unconditioned_query_skips_conditioned_sections() {
        let document = load(&format!(
            r#"<Project><PropertyGroup Condition="{DEBUG_CONDITION}" /><PropertyGroup><A>1</A></PropertyGroup></Project>"#
        ));

        let found = SectionLocator::find_section(
            &document,
            &SectionQuery::unconditioned(SectionKind::PropertyGroup),
        )
        .unwrap();
        assert_eq!(found.index(), 1);
    }

    #[test]
    fn test_conditioned_query_matches_exact_value() {
        let document = load(&format!(
            r#"<Project><PropertyGroup Condition="{DEBUG_CONDITION} " /><PropertyGroup Condition="{DEBUG_CONDITION}" /></Project>"#
        ));

        let query = SectionQuery::conditioned(
            SectionKind::PropertyGroup,
            SectionPredicate::new("Condition", DEBUG_CONDITION),
        );
        assert_eq!(SectionLocator::find_section(&document, &query).unwrap().index(), 1);
    }

    #[test]
    fn test_find_missing_section_is_typed_not_found() {
        let document = load("<Project />");
        let result = SectionLocator::find_section(
            &document,
            &SectionQuery::unconditioned(SectionKind::ItemGroup),
        );
        assert!(matches!(result, Err(DocumentError::SectionNotFound(_))));
    }

    #[test]
    fn test_ensure_section_creates_once() {
        let mut document = load("<Project><ItemGroup /></Project>");
        let query = SectionQuery::conditioned(
            SectionKind::PropertyGroup,
            SectionPredicate::new("Condition", DEBUG_CONDITION),
        );

        let first = SectionLocator::ensure_section(&mut document, &query);
        let second = SectionLocator::ensure_section(&mut document, &query);

        assert_eq!(first, second);
        assert_eq!(first.index(), 1);
        assert_eq!(document.root().children().len(), 2);
        let section = SectionLocator::section(&document, first).unwrap();
        assert_eq!(section.attribute("Condition"), Some(DEBUG_CONDITION));
    }

    #[test]
    fn test_ensure_section_of_kind_ignores_attributes() {
        let mut document = load(r#"<package><metadata minClientVersion="2.12" /><files /></package>"#);

        let metadata = SectionLocator::ensure_section_of_kind(&mut document, SectionKind::Metadata);
        let files = SectionLocator::ensure_section_of_kind(&mut document, SectionKind::Files);

        assert_eq!(metadata.index(), 0);
        assert_eq!(files.index(), 1);
        assert_eq!(document.root().children().len(), 2);
    }

    #[test]
    fn test_ensure_section_of_kind_creates_bare_section() {
        let mut document = load("<package />");
        let metadata = SectionLocator::ensure_section_of_kind(&mut document, SectionKind::Metadata);

        let section = SectionLocator::section(&document, metadata).unwrap();
        assert_eq!(section.local_name(), "metadata");
        assert!(!section.has_attributes());
    }

    #[test]
    fn test_duplicate_sections_first_match_wins() {
        let document = load("<Project><ItemGroup><A /></ItemGroup><ItemGroup><B /></ItemGroup></Project>");
        let query = SectionQuery::unconditioned(SectionKind::ItemGroup);

        assert_eq!(SectionLocator::find_section(&document, &query).unwrap().index(), 0);
        assert_eq!(SectionLocator::find_all(&document, &query).len(), 2);
    }
}
