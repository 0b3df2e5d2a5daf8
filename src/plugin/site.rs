//! The config as plugin 0.

use super::{HookContext, Hooks, Plugin, RenderContext};
use crate::config::{HeadConfig, SiteConfig};
use crate::content::markdown;
use crate::page::Page;
use crate::render::{Element, Node, RenderActions};
use anyhow::Result;
use std::sync::Arc;

/// Declarative config behaviour plus the config's own [`Hooks`].
///
/// Site discovery runs before the config's `create_pages` hook, and the
/// `[site]`/`[head]` defaults are applied before its `on_render` hook.
pub(crate) struct SitePlugin {
    hooks: Hooks,
    head: HeadConfig,
    discover: bool,
}

impl SitePlugin {
    pub fn new(config: &mut SiteConfig, discover: bool) -> Self {
        Self {
            hooks: std::mem::take(&mut config.hooks),
            head: config.head.clone(),
            discover,
        }
    }

    fn head_nodes(&self, cx: &RenderContext<'_>) -> Vec<Node> {
        let site = &cx.context.site;
        let page = cx.page;
        let mut nodes = Vec::new();

        nodes.push(Element::new("title").child(document_title(site.title.as_str(), page)).into());
        if !site.title.is_empty() {
            nodes.push(meta("title", &site.title));
        }
        let description = page.data_str("description").unwrap_or(&site.description);
        if !description.is_empty() {
            nodes.push(meta("description", description));
        }

        if let Some(icon) = &self.head.icon {
            nodes.push(Element::new("link").attr("rel", "icon").attr("href", icon).into());
        }
        for href in &self.head.styles {
            nodes.push(
                Element::new("link")
                    .attr("rel", "stylesheet")
                    .attr("href", href)
                    .into(),
            );
        }
        for script in &self.head.scripts {
            let mut elem = Element::new("script").attr("src", script.src());
            if script.is_defer() {
                elem = elem.attr("defer", "");
            }
            if script.is_async() {
                elem = elem.attr("async", "");
            }
            nodes.push(elem.into());
        }
        nodes.extend(self.head.elements.iter().cloned().map(Node::Raw));

        nodes
    }
}

impl Plugin for SitePlugin {
    fn name(&self) -> &str {
        "config"
    }

    fn on_init(&self, cx: &mut HookContext<'_>) -> Result<()> {
        self.hooks.on_init(cx)
    }

    fn create_pages(&self, cx: &mut HookContext<'_>) -> Result<()> {
        if self.discover {
            let input = cx.context.input().to_path_buf();
            let extension = cx.context.extension().to_owned();
            if input.is_dir() {
                let files = markdown::discover(&input, &extension)?;
                cx.log.info(format!("reading {} files from {}", files.len(), input.display()));
                for path in files {
                    let page = markdown::load_page(&path)?;
                    cx.actions().create_page(page);
                }
            }
        }
        self.hooks.create_pages(cx)
    }

    fn on_page_create(&self, cx: &mut HookContext<'_>, page: &Arc<Page>) -> Result<()> {
        self.hooks.on_page_create(cx, page)
    }

    fn on_pre_build(&self, cx: &mut HookContext<'_>) -> Result<()> {
        self.hooks.on_pre_build(cx)
    }

    fn on_render(&self, cx: &RenderContext<'_>, actions: &mut RenderActions<'_>) -> Result<()> {
        let language = &cx.context.site.language;
        if !language.is_empty() {
            actions.set_html_attributes([("lang", language.as_str())]);
        }

        let mut head = actions.head_components().to_vec();
        head.extend(self.head_nodes(cx));
        actions.set_head_components(head);

        self.hooks.on_render(cx, actions)
    }

    fn on_post_build(&self, cx: &mut HookContext<'_>) -> Result<()> {
        self.hooks.on_post_build(cx)
    }
}

/// `<page> | <site>`, or whichever of the two is set.
fn document_title(site_title: &str, page: &Page) -> String {
    let page_title = page.title();
    match (page_title.is_empty(), site_title.is_empty()) {
        (false, false) if page_title != site_title => format!("{page_title} | {site_title}"),
        (false, _) => page_title.to_owned(),
        (true, _) => site_title.to_owned(),
    }
}

fn meta(name: &str, content: &str) -> Node {
    Element::new("meta")
        .attr("name", name)
        .attr("content", content)
        .into()
}
