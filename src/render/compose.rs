//! Render descriptor composition.

use super::node::{Attributes, Node};
use super::{ComponentProps, WrapperProps};
use crate::context::Context;
use crate::page::Page;
use anyhow::{Context as _, Result};

/// Mutable per-page bag consumed by the document serializer.
///
/// Built fresh for every page and dropped after serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderDescriptor {
    pub html_attributes: Attributes,
    pub body_attributes: Attributes,
    pub head_components: Vec<Node>,
    /// Wrapped page body
    pub content: Node,
}

/// Compose `page` into a descriptor with empty attributes and head.
///
/// The page component renders first; its output is then handed to the
/// context's wrapper as `element`.
pub fn compose(ctx: &Context, page: &Page) -> Result<RenderDescriptor> {
    let pages = ctx.pages();

    let props = ComponentProps {
        components: &ctx.components,
        site: &ctx.site,
        page,
        pages,
    };
    let element = page
        .component
        .render(&props)
        .with_context(|| format!("rendering component of page `{}`", page.name))?;

    let content = ctx
        .wrapper
        .wrap(WrapperProps {
            site: &ctx.site,
            page,
            element,
            components: &ctx.components,
            pages,
        })
        .with_context(|| format!("wrapping page `{}`", page.name))?;

    Ok(RenderDescriptor {
        content,
        ..Default::default()
    })
}

/// Descriptor mutators handed to `on_render` hooks.
///
/// Both attribute setters shallow-merge: existing keys are overwritten, other
/// keys are kept. The head setter replaces the whole list; read it first with
/// [`RenderActions::head_components`] to extend instead.
pub struct RenderActions<'a> {
    descriptor: &'a mut RenderDescriptor,
}

impl<'a> RenderActions<'a> {
    pub fn new(descriptor: &'a mut RenderDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn set_html_attributes<I, K, V>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        merge(&mut self.descriptor.html_attributes, attrs);
    }

    pub fn set_body_attributes<I, K, V>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        merge(&mut self.descriptor.body_attributes, attrs);
    }

    pub fn set_head_components(&mut self, components: Vec<Node>) {
        self.descriptor.head_components = components;
    }

    pub fn html_attributes(&self) -> &Attributes {
        &self.descriptor.html_attributes
    }

    pub fn body_attributes(&self) -> &Attributes {
        &self.descriptor.body_attributes
    }

    pub fn head_components(&self) -> &[Node] {
        &self.descriptor.head_components
    }

    /// The composed page body.
    pub fn content(&self) -> &Node {
        &self.descriptor.content
    }
}

fn merge<I, K, V>(target: &mut Attributes, attrs: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    target.extend(attrs.into_iter().map(|(k, v)| (k.into(), v.into())));
}
