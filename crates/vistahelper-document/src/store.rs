//! Loading documents from text and writing them back
//!
//! Loading goes through `roxmltree` and copies the read-only tree into the owned
//! [`Element`] model. Whitespace-only text is dropped, comments are kept.
//!
//! Saving is deterministic for a given in-memory state: children and attributes
//! are written in insertion order with two-space indentation. The writer is
//! namespace aware, so an unprefixed element whose namespace differs from the
//! default namespace in scope gets an `xmlns` declaration. When a default
//! namespace has been stripped from children (see
//! [`crate::ManifestSynchronizer::strip_namespaces`]) that produces `xmlns=""`;
//! [`strip_empty_default_namespace`] removes it as an explicit last pass.

use tracing::debug;

use crate::{
    error::Result,
    node::{Document, Element, NamespaceDeclaration, Node, QualifiedName},
};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const XML_PREFIX: &str = "xml";
const EMPTY_DEFAULT_NAMESPACE: &str = r#" xmlns="""#;

/// Options controlling how a document is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Emit the `<?xml ...?>` declaration
    pub declaration: bool,
    /// Run [`strip_empty_default_namespace`] on the output
    pub strip_empty_default_namespace: bool,
    /// Indentation unit
    pub indent: String,
}

impl SaveOptions {
    /// Options for project files: no declaration
    pub fn project() -> Self {
        Self {
            declaration: false,
            ..Self::default()
        }
    }

    /// Options for package manifests: declaration included
    pub fn manifest() -> Self {
        Self::default()
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            declaration: true,
            strip_empty_default_namespace: true,
            indent: "  ".to_string(),
        }
    }
}

/// Loads and saves documents
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    options: SaveOptions,
}

impl DocumentStore {
    /// Create a store with default save options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with custom save options
    pub fn with_options(options: SaveOptions) -> Self {
        Self { options }
    }

    /// Parse a document from text
    pub fn load(&self, text: &str) -> Result<Document> {
        let parsed = roxmltree::Document::parse(text)?;
        let root = convert_element(parsed.root_element());
        debug!(root = %root.local_name(), "Loaded document");
        Ok(Document::new(root))
    }

    /// Serialize a document to text
    pub fn save(&self, document: &Document) -> String {
        let mut out = String::new();
        if self.options.declaration {
            out.push_str(XML_DECLARATION);
            out.push('\n');
        }
        self.write_element(&mut out, document.root(), Some(0), None);
        out.push('\n');

        if self.options.strip_empty_default_namespace {
            strip_empty_default_namespace(&out)
        } else {
            out
        }
    }

    fn write_element<'a>(
        &self,
        out: &mut String,
        element: &'a Element,
        depth: Option<usize>,
        mut default_namespace: Option<&'a str>,
    ) {
        if let Some(depth) = depth {
            self.push_indent(out, depth);
        }

        let tag = tag_name(element.name());
        out.push('<');
        out.push_str(&tag);

        for declaration in element.namespace_declarations() {
            match &declaration.prefix {
                Some(prefix) => push_attribute(out, &format!("xmlns:{prefix}"), &declaration.uri),
                None => {
                    push_attribute(out, "xmlns", &declaration.uri);
                    default_namespace = Some(declaration.uri.as_str());
                }
            }
        }

        if element.name().prefix.is_none() && element.namespace() != default_namespace {
            push_attribute(out, "xmlns", element.namespace().unwrap_or_default());
            default_namespace = element.namespace();
        }

        for attribute in element.attributes() {
            push_attribute(out, &attribute.name, &attribute.value);
        }

        if element.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');

        let text_only = element.children().iter().all(|node| matches!(node, Node::Text(_)));
        let mixed = !text_only
            && element.children().iter().any(|node| matches!(node, Node::Text(_)));

        if text_only {
            out.push_str(&escape_text(&element.text()));
        } else if mixed || depth.is_none() {
            for child in element.children() {
                self.write_node(out, child, None, default_namespace);
            }
        } else {
            let child_depth = depth.map(|depth| depth + 1);
            for child in element.children() {
                out.push('\n');
                self.write_node(out, child, child_depth, default_namespace);
            }
            out.push('\n');
            if let Some(depth) = depth {
                self.push_indent(out, depth);
            }
        }

        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }

    fn write_node<'a>(
        &self,
        out: &mut String,
        node: &'a Node,
        depth: Option<usize>,
        default_namespace: Option<&'a str>,
    ) {
        match node {
            Node::Element(element) => self.write_element(out, element, depth, default_namespace),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Comment(comment) => {
                if let Some(depth) = depth {
                    self.push_indent(out, depth);
                }
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
        }
    }

    fn push_indent(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str(&self.options.indent);
        }
    }
}

/// Remove every empty default-namespace declaration (` xmlns=""`) from serialized text
///
/// General-purpose writers emit this when an element's namespace was cleared
/// while its parent still declares a default namespace. The manifest format
/// expects unqualified children to inherit the root namespace instead.
pub fn strip_empty_default_namespace(text: &str) -> String {
    text.replace(EMPTY_DEFAULT_NAMESPACE, "")
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let namespace = tag.namespace().map(str::to_string);
    let prefix = tag
        .namespace()
        .and_then(|uri| node.lookup_prefix(uri))
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string);

    let mut element = Element::with_name(QualifiedName {
        local: tag.name().to_string(),
        namespace,
        prefix,
    });

    for declaration in declared_namespaces(node) {
        element.push_namespace_declaration(declaration);
    }

    for attribute in node.attributes() {
        let name = match attribute
            .namespace()
            .and_then(|uri| node.lookup_prefix(uri))
            .filter(|prefix| !prefix.is_empty())
        {
            Some(prefix) => format!("{prefix}:{}", attribute.name()),
            None => attribute.name().to_string(),
        };
        element.set_attribute(name, attribute.value());
    }

    for child in node.children() {
        if child.is_element() {
            element.push_node(Node::Element(convert_element(child)));
        } else if child.is_comment() {
            if let Some(comment) = child.text() {
                element.push_node(Node::Comment(comment.to_string()));
            }
        } else if child.is_text() {
            if let Some(text) = child.text().filter(|text| !text.trim().is_empty()) {
                element.push_node(Node::Text(text.to_string()));
            }
        }
    }

    element
}

/// Namespaces that come into scope on this element rather than being inherited
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<NamespaceDeclaration> {
    let parent_scope: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.name() != Some(XML_PREFIX))
        .filter(|ns| !parent_scope.contains(&(ns.name(), ns.uri())))
        .map(|ns| NamespaceDeclaration {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        })
        .collect()
}

fn tag_name(name: &QualifiedName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.clone(),
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_rejects_malformed_input() {
        let store = DocumentStore::new();
        let result = store.load("<Project><PropertyGroup></Project>");
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_attribute_whitespace_references_survive_reload() {
        let store = DocumentStore::with_options(SaveOptions::project());
        let document = store
            .load(r#"<Project><PropertyGroup Condition="a&#10;b&#13;c&#9;d"><A>1</A></PropertyGroup></Project>"#)
            .unwrap();

        let saved = store.save(&document);
        assert!(saved.contains(r#"Condition="a&#10;b&#13;c&#9;d""#));

        let reloaded = store.load(&saved).unwrap();
        let section = reloaded.root().element("PropertyGroup").unwrap();
        assert_eq!(section.attribute("Condition"), Some("a\nb\rc\td"));
        assert_eq!(store.save(&reloaded), saved);
    }

    #[test]
    fn test_save_project_without_declaration() {
        let store = DocumentStore::with_options(SaveOptions::project());
        let document = store
            .load(r#"<Project Sdk="Microsoft.NET.Sdk"><PropertyGroup><TargetFrameworks>net472</TargetFrameworks><NoWarn /></PropertyGroup></Project>"#)
            .unwrap();

        let expected = "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFrameworks>net472</TargetFrameworks>\n    <NoWarn />\n  </PropertyGroup>\n</Project>\n";
        assert_eq!(store.save(&document), expected);
    }

    #[test]
    fn test_save_escapes_text_and_attributes() {
        let store = DocumentStore::with_options(SaveOptions::project());
        let document = store
            .load(r#"<Project><PropertyGroup Condition="'$(A)'=='B'"><X>a &amp; &lt;b&gt;</X></PropertyGroup></Project>"#)
            .unwrap();

        let saved = store.save(&document);
        assert!(saved.contains(r#"Condition="'$(A)'=='B'""#));
        assert!(saved.contains("<X>a &amp; &lt;b&gt;</X>"));
    }

    #[test]
    fn test_comments_survive_round_trip() {
        let store = DocumentStore::with_options(SaveOptions::project());
        let document = store
            .load("<Project><!-- keep me --><ItemGroup /></Project>")
            .unwrap();

        let saved = store.save(&document);
        assert!(saved.contains("  <!-- keep me -->\n"));
        assert!(saved.contains("  <ItemGroup />\n"));
    }

    #[test]
    fn test_default_namespace_written_once_on_root() {
        let store = DocumentStore::new();
        let document = store
            .load(r#"<package xmlns="urn:pkg"><metadata><id>A</id></metadata></package>"#)
            .unwrap();

        let saved = store.save(&document);
        assert_eq!(saved.matches("xmlns").count(), 1);
        assert!(saved.starts_with(XML_DECLARATION));
    }

    #[test]
    fn test_cleared_namespace_emits_no_empty_declaration() {
        let mut document = DocumentStore::new()
            .load(r#"<package xmlns="urn:pkg"><metadata><id>A</id></metadata></package>"#)
            .unwrap();
        for child in document.root_mut().elements_mut() {
            child.walk_mut(&mut |element: &mut Element| element.clear_namespace());
        }

        let raw = DocumentStore::with_options(SaveOptions {
            strip_empty_default_namespace: false,
            ..SaveOptions::manifest()
        })
        .save(&document);
        assert!(raw.contains(r#"<metadata xmlns="">"#));

        let cleaned = DocumentStore::new().save(&document);
        assert!(!cleaned.contains(r#"xmlns="""#));
        assert!(cleaned.contains("<metadata>"));
    }

    #[test]
    fn test_strip_empty_default_namespace_keeps_real_declarations() {
        let text = r#"<a xmlns="urn:x"><b xmlns=""><c xmlns:p="urn:p" /></b></a>"#;
        assert_eq!(
            strip_empty_default_namespace(text),
            r#"<a xmlns="urn:x"><b><c xmlns:p="urn:p" /></b></a>"#
        );
    }

    #[test]
    fn test_prefixed_names_round_trip() {
        let store = DocumentStore::with_options(SaveOptions::project());
        let source = "<r xmlns:x=\"urn:x\">\n  <x:item x:key=\"1\" />\n</r>\n";
        let document = store.load(source).unwrap();
        assert_eq!(store.save(&document), source);
    }
}
