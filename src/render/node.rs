//! Renderable element tree.
//!
//! Components produce [`Node`] trees; the document serializer turns them into markup.

use std::collections::BTreeMap;

/// Attribute mapping of an element.
///
/// Sorted by name so serialized output is stable across builds.
pub type Attributes = BTreeMap<String, String>;

/// HTML elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Plain text, escaped when serialized.
    Text(String),
    /// Trusted markup written verbatim.
    Raw(String),
    /// A group of siblings without a wrapping element.
    Fragment(Vec<Node>),
}

/// An element node: `<tag attrs...>children</tag>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child node.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Builder: append several child nodes.
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Whether the tag is an HTML void element.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.to_ascii_lowercase().as_str())
    }

    /// Concatenated text content of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn raw(html: impl Into<String>) -> Self {
        Self::Raw(html.into())
    }

    /// An empty fragment, which serializes to nothing.
    pub const fn empty() -> Self {
        Self::Fragment(Vec::new())
    }

    /// Concatenated text content of this node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Raw(_) => {}
            Self::Element(elem) => elem.children.iter().for_each(|c| c.collect_text(out)),
            Self::Fragment(nodes) => nodes.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Self::Element(elem)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_builder() {
        let elem = Element::new("a").attr("href", "./intro").child("Intro");
        assert_eq!(elem.tag, "a");
        assert_eq!(elem.attrs.get("href").map(String::as_str), Some("./intro"));
        assert_eq!(elem.children, vec![Node::text("Intro")]);
    }

    #[test]
    fn test_void_elements() {
        assert!(Element::new("meta").is_void());
        assert!(Element::new("BR").is_void());
        assert!(!Element::new("div").is_void());
    }

    #[test]
    fn test_text_content_skips_raw() {
        let node: Node = Element::new("p")
            .child("Hello ")
            .child(Node::raw("<b>ignored</b>"))
            .child(Element::new("em").child("world"))
            .into();
        assert_eq!(node.text_content(), "Hello world");
    }
}
