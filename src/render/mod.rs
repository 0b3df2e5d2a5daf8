//! Per-page render composition.
//!
//! - **node**: the element tree every component produces
//! - **components**: tag-name overrides applied to content trees
//! - **compose**: builds a page's [`RenderDescriptor`] from its component and the wrapper
//! - **document**: serializes a descriptor into the final HTML document
//!
//! # Composition
//!
//! ```text
//! page.component(ComponentProps) ──► inner node
//!                                        │
//! wrapper(WrapperProps { element: inner }) ──► outer node ──► descriptor.content
//! ```

mod components;
mod compose;
pub mod document;
mod node;

pub use components::{AttrOverride, Components, ElementRenderer};
pub use compose::{RenderActions, RenderDescriptor, compose};
pub use node::{Attributes, Element, Node};

use crate::config::SiteMetadata;
use crate::page::Page;
use anyhow::Result;
use std::sync::Arc;

/// Props passed to a page's own component.
#[derive(Clone, Copy)]
pub struct ComponentProps<'a> {
    /// Merged tag-name overrides
    pub components: &'a Components,
    pub site: &'a SiteMetadata,
    pub page: &'a Page,
    /// Every page that survived to the render stage
    pub pages: &'a [Arc<Page>],
}

/// Props passed to the page wrapper.
pub struct WrapperProps<'a> {
    pub site: &'a SiteMetadata,
    pub page: &'a Page,
    /// The rendered page component
    pub element: Node,
    pub components: &'a Components,
    pub pages: &'a [Arc<Page>],
}

/// A renderable page body.
pub trait Component: Send + Sync {
    fn render(&self, props: &ComponentProps<'_>) -> Result<Node>;
}

impl<F> Component for F
where
    F: for<'a> Fn(&ComponentProps<'a>) -> Result<Node> + Send + Sync,
{
    fn render(&self, props: &ComponentProps<'_>) -> Result<Node> {
        self(props)
    }
}

/// Wraps every rendered page (layout, navigation, footer...).
pub trait PageWrapper: Send + Sync {
    fn wrap(&self, props: WrapperProps<'_>) -> Result<Node>;
}

impl<F> PageWrapper for F
where
    F: for<'a> Fn(WrapperProps<'a>) -> Result<Node> + Send + Sync,
{
    fn wrap(&self, props: WrapperProps<'_>) -> Result<Node> {
        self(props)
    }
}

/// Default wrapper: returns the page element unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityWrapper;

impl PageWrapper for IdentityWrapper {
    fn wrap(&self, props: WrapperProps<'_>) -> Result<Node> {
        Ok(props.element)
    }
}

/// Component with a fixed tree; overrides still apply.
#[derive(Debug, Clone)]
pub struct StaticComponent {
    node: Node,
}

impl StaticComponent {
    pub fn new(node: impl Into<Node>) -> Self {
        Self { node: node.into() }
    }

    /// A paragraph holding `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Element::new("p").child(Node::Text(text.into())))
    }
}

impl Component for StaticComponent {
    fn render(&self, props: &ComponentProps<'_>) -> Result<Node> {
        props.components.apply(self.node.clone())
    }
}
