//! Tag-name component overrides.
//!
//! An override replaces every element with a given tag after its children were
//! rendered. Output of an override is not fed back through the overrides.

use super::node::{Attributes, Element, Node};
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Renderer for one tag name.
pub trait ElementRenderer: Send + Sync {
    fn render(&self, element: Element) -> Result<Node>;
}

impl<F> ElementRenderer for F
where
    F: Fn(Element) -> Result<Node> + Send + Sync,
{
    fn render(&self, element: Element) -> Result<Node> {
        self(element)
    }
}

/// Override that merges fixed attributes into the element.
///
/// `class` is appended to the element's existing classes; every other
/// attribute is assigned.
#[derive(Debug, Clone, Default)]
pub struct AttrOverride {
    attrs: Attributes,
}

impl AttrOverride {
    pub fn new(attrs: Attributes) -> Self {
        Self { attrs }
    }
}

impl ElementRenderer for AttrOverride {
    fn render(&self, mut element: Element) -> Result<Node> {
        for (name, value) in &self.attrs {
            match element.attrs.get_mut(name) {
                Some(existing) if name == "class" && !existing.is_empty() => {
                    existing.push(' ');
                    existing.push_str(value);
                }
                _ => {
                    element.attrs.insert(name.clone(), value.clone());
                }
            }
        }
        Ok(Node::Element(element))
    }
}

/// Mapping from tag name to renderer.
#[derive(Clone, Default)]
pub struct Components {
    renderers: BTreeMap<String, Arc<dyn ElementRenderer>>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `renderer` for `tag`, replacing any previous one.
    pub fn insert(&mut self, tag: impl Into<String>, renderer: impl ElementRenderer + 'static) {
        self.renderers.insert(tag.into(), Arc::new(renderer));
    }

    /// Merge `other` into `self`; entries of `other` win.
    pub fn extend(&mut self, other: &Components) {
        for (tag, renderer) in &other.renderers {
            self.renderers.insert(tag.clone(), Arc::clone(renderer));
        }
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<dyn ElementRenderer>> {
        self.renderers.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Apply overrides to a tree, children first.
    pub fn apply(&self, node: Node) -> Result<Node> {
        match node {
            Node::Element(mut element) => {
                element.children = self.apply_all(element.children)?;
                match self.renderers.get(&element.tag) {
                    Some(renderer) => renderer.render(element),
                    None => Ok(Node::Element(element)),
                }
            }
            Node::Fragment(nodes) => Ok(Node::Fragment(self.apply_all(nodes)?)),
            other => Ok(other),
        }
    }

    fn apply_all(&self, nodes: Vec<Node>) -> Result<Vec<Node>> {
        if self.renderers.is_empty() {
            return Ok(nodes);
        }
        nodes.into_iter().map(|node| self.apply(node)).collect()
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.renderers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_override(class: &str) -> AttrOverride {
        let mut attrs = Attributes::new();
        attrs.insert("class".into(), class.into());
        AttrOverride::new(attrs)
    }

    #[test]
    fn test_attr_override_appends_class() {
        let elem = Element::new("h1").attr("class", "anchor").child("Title");
        let node = class_override("text-xl").render(elem).unwrap();
        let Node::Element(elem) = node else {
            panic!("expected element");
        };
        assert_eq!(elem.attrs["class"], "anchor text-xl");
    }

    #[test]
    fn test_apply_replaces_matching_tags_only() {
        let mut components = Components::new();
        components.insert("em", |elem: Element| -> Result<Node> {
            Ok(Node::Element(Element::new("i").children(elem.children)))
        });

        let tree: Node = Element::new("p")
            .child("a ")
            .child(Element::new("em").child("b"))
            .into();
        let out = components.apply(tree).unwrap();

        let expected: Node = Element::new("p")
            .child("a ")
            .child(Element::new("i").child("b"))
            .into();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_apply_renders_children_first() {
        let mut components = Components::new();
        components.insert("code", class_override("mono"));
        components.insert("pre", |elem: Element| -> Result<Node> {
            // The nested <code> must already carry its override here
            let inner = elem.children.first().cloned().unwrap_or(Node::empty());
            let Node::Element(code) = &inner else {
                anyhow::bail!("expected code element");
            };
            anyhow::ensure!(code.attrs.get("class").is_some(), "child not rendered");
            Ok(Node::Element(Element::new("div").child(inner)))
        });

        let tree: Node = Element::new("pre")
            .child(Element::new("code").child("x"))
            .into();
        assert!(components.apply(tree).is_ok());
    }

    #[test]
    fn test_override_output_not_reapplied() {
        let mut components = Components::new();
        components.insert("span", |elem: Element| -> Result<Node> {
            Ok(Node::Element(Element::new("span").child(Node::Element(elem))))
        });
        let out = components
            .apply(Element::new("span").child("x").into())
            .unwrap();
        // exactly one extra level, no recursion
        let expected: Node = Element::new("span")
            .child(Element::new("span").child("x"))
            .into();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_extend_later_wins() {
        let mut base = Components::new();
        base.insert("h1", class_override("a"));
        let mut other = Components::new();
        other.insert("h1", class_override("b"));
        other.insert("p", class_override("c"));

        base.extend(&other);
        assert_eq!(base.len(), 2);
        let out = base.apply(Element::new("h1").into()).unwrap();
        let Node::Element(elem) = out else {
            panic!("expected element");
        };
        assert_eq!(elem.attrs["class"], "b");
    }
}
