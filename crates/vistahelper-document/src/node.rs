//! Owned, mutable document tree
//!
//! Documents are parsed into this tree once, mutated in place by the mergers and
//! written back by [`crate::DocumentStore`]. Children keep insertion order and
//! attributes keep insertion order, which makes serialization deterministic.

/// Element name with its resolved namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Local part of the name
    pub local: String,
    /// Namespace URI the element belongs to, if any
    pub namespace: Option<String>,
    /// Prefix used in the source text, if the element was prefixed
    pub prefix: Option<String>,
}

impl QualifiedName {
    /// Create an unqualified name
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            namespace: None,
            prefix: None,
        }
    }
}

/// A single attribute, rendered as `name="value"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written (prefixed names keep their prefix)
    pub name: String,
    /// Attribute value, unescaped
    pub value: String,
}

/// A namespace declaration written on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    /// Declared prefix, `None` for the default namespace
    pub prefix: Option<String>,
    /// Namespace URI
    pub uri: String,
}

/// A child node of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Text content
    Text(String),
    /// Comment, kept verbatim
    Comment(String),
}

impl Node {
    /// Borrow the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutably borrow the element if this node is one
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: QualifiedName,
    attributes: Vec<Attribute>,
    namespace_declarations: Vec<NamespaceDeclaration>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty, unqualified element
    pub fn new(local: impl Into<String>) -> Self {
        Self::with_name(QualifiedName::local(local))
    }

    /// Create an empty element with a fully specified name
    pub fn with_name(name: QualifiedName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            namespace_declarations: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Element name
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Local part of the element name
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    /// Namespace URI of the element
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace.as_deref()
    }

    /// Drop namespace qualification from this element only
    pub fn clear_namespace(&mut self) {
        self.name.namespace = None;
        self.name.prefix = None;
    }

    /// All attributes in insertion order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Whether the element carries any attribute
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Look up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attribute| attribute.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Namespace declarations written on this element
    pub fn namespace_declarations(&self) -> &[NamespaceDeclaration] {
        &self.namespace_declarations
    }

    pub(crate) fn push_namespace_declaration(&mut self, declaration: NamespaceDeclaration) {
        self.namespace_declarations.push(declaration);
    }

    /// All child nodes in order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Mutable child elements in order
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First child element with the given local name
    pub fn element(&self, local: &str) -> Option<&Element> {
        self.elements().find(|element| element.local_name() == local)
    }

    /// Position in [`Element::children`] of the first child element with the given local name
    pub fn position_of(&self, local: &str) -> Option<usize> {
        self.children.iter().position(|node| {
            node.as_element()
                .is_some_and(|element| element.local_name() == local)
        })
    }

    /// Mutable access to the child element at a position in [`Element::children`]
    pub fn element_at_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index).and_then(Node::as_element_mut)
    }

    /// Remove the child node at a position
    pub fn remove_child(&mut self, index: usize) -> Node {
        self.children.remove(index)
    }

    /// Keep only child elements matching the predicate; other node kinds are kept
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&Element) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|node| match node {
            Node::Element(element) => keep(element),
            _ => true,
        });
        before - self.children.len()
    }

    /// Remove every child node
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Append a child element
    ///
    /// Unqualified elements adopt this element's namespace, so children created
    /// in memory serialize the same way as the children parsed from the source.
    pub fn append(&mut self, mut child: Element) -> usize {
        if let Some(namespace) = self.name.namespace.clone() {
            child.adopt_namespace(&namespace);
        }
        self.children.push(Node::Element(child));
        self.children.len() - 1
    }

    /// Append a raw node without namespace adoption
    pub fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    fn adopt_namespace(&mut self, namespace: &str) {
        if self.name.namespace.is_none() && self.name.prefix.is_none() {
            self.name.namespace = Some(namespace.to_string());
        }
        for child in self.elements_mut() {
            child.adopt_namespace(namespace);
        }
    }

    /// Whether the element has no child nodes at all
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated text content of the direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children with the given text; empty text leaves the element self-closed
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    /// Visit this element and every descendant element, depth first
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for child in self.elements_mut() {
            child.walk_mut(visit);
        }
    }
}

/// A document with exactly one root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Wrap a root element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable root element
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut element = Element::new("PackageReference")
            .with_attribute("Include", "A")
            .with_attribute("Version", "1");
        element.set_attribute("Include", "B");

        assert_eq!(element.attributes().len(), 2);
        assert_eq!(element.attributes()[0].name, "Include");
        assert_eq!(element.attribute("Include"), Some("B"));
    }

    #[test]
    fn test_set_text_empty_leaves_no_children() {
        let mut element = Element::new("NoWarn").with_text("CS1591");
        element.set_text("");
        assert!(element.is_empty());
        assert_eq!(element.text(), "");
    }

    #[test]
    fn test_append_adopts_parent_namespace() {
        let mut parent = Element::with_name(QualifiedName {
            local: "Project".to_string(),
            namespace: Some("urn:build".to_string()),
            prefix: None,
        });
        let child = Element::new("ItemGroup").with_child(Element::new("Compile"));
        let index = parent.append(child);

        let child = parent.element_at_mut(index).unwrap();
        assert_eq!(child.namespace(), Some("urn:build"));
        assert_eq!(
            child.element("Compile").and_then(Element::namespace),
            Some("urn:build")
        );
    }

    #[test]
    fn test_retain_elements_keeps_comments() {
        let mut element = Element::new("ItemGroup");
        element.push_node(Node::Comment("keep".to_string()));
        element.append(Element::new("A"));
        element.append(Element::new("B"));

        let removed = element.retain_elements(|child| child.local_name() != "A");
        assert_eq!(removed, 1);
        assert_eq!(element.children().len(), 2);
        assert!(matches!(element.children()[0], Node::Comment(_)));
    }
}
