#![warn(missing_docs)]

//! Structured document model for vistahelper
//!
//! Loads project and package manifest files into an owned, mutable tree and
//! provides the idempotent mergers the migration is built from: section lookup,
//! property upserts, keyed reference sets and manifest regeneration.

pub mod error;
pub mod locator;
pub mod manifest;
pub mod node;
pub mod properties;
pub mod references;
pub mod store;

// Re-export public API
pub use error::{DocumentError, Result};
pub use locator::{SectionKind, SectionLocator, SectionPredicate, SectionQuery, SectionRef};
pub use manifest::{FileEntry, ManifestSynchronizer, PipelineTokens, MANIFEST_NAMESPACE};
pub use node::{Attribute, Document, Element, NamespaceDeclaration, Node, QualifiedName};
pub use properties::{PropertyMerger, PropertyUpdate, PropertyValue, TargetList, LIST_SEPARATOR};
pub use references::{prune_empty_sections, EntrySpec, KeySource, ReferenceSetMerger};
pub use store::{strip_empty_default_namespace, DocumentStore, SaveOptions};
