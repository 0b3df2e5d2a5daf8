//! Built-in `theme` plugin: page layout, navigation and default styling hooks.
//!
//! ```toml
//! [[plugins]]
//! name = "theme"
//! nav = [{ text = "Guide", link = "./guide" }]
//! stylesheets = ["./theme.css"]
//!
//! [[plugins.sidebar]]
//! text = "Getting started"
//! items = [{ text = "Intro", link = "./intro" }]
//! ```
//!
//! Pages pick a layout with `layout` in their front matter: `page` (default) or
//! `doc`, which adds the sidebar, the page header and previous/next links
//! (`prevPage` / `nextPage`, matched against page URLs).

use crate::page::Page;
use crate::plugin::{HookContext, Plugin, RenderContext};
use crate::render::{AttrOverride, Attributes, Element, Node, PageWrapper, RenderActions, WrapperProps};
use anyhow::Result;
use serde::Deserialize;
use std::sync::Arc;

/// Default class per content tag; `[components]` entries take precedence.
const TAG_CLASSES: &[(&str, &str)] = &[
    ("a", "folio-link"),
    ("blockquote", "folio-quote"),
    ("code", "folio-code"),
    ("h1", "folio-h1"),
    ("h2", "folio-h2"),
    ("li", "folio-li"),
    ("ol", "folio-list"),
    ("p", "folio-p"),
    ("pre", "folio-pre"),
    ("ul", "folio-list"),
];

const BODY_CLASS: &str = "folio-body";

const VIEWPORT: &str = "width=device-width, initial-scale=1";

/// A `{ text, link }` navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub text: String,
    pub link: String,
}

/// A titled group of sidebar links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarSection {
    pub text: String,
    #[serde(default)]
    pub items: Vec<NavLink>,
}

/// Options of the built-in `theme` plugin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeOptions {
    /// Header title (default: `[site] title`)
    #[serde(default)]
    pub site_title: Option<String>,

    /// Header links
    #[serde(default)]
    pub nav: Vec<NavLink>,

    /// Sidebar of `doc` pages
    #[serde(default)]
    pub sidebar: Vec<SidebarSection>,

    /// Raw footer HTML (default: a repository link when `site.data.repository` is set)
    #[serde(default)]
    pub footer: Option<String>,

    /// Extra stylesheet hrefs
    #[serde(default)]
    pub stylesheets: Vec<String>,

    /// `<body>` class (default: `folio-body`)
    #[serde(default)]
    pub body_class: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ThemePlugin {
    options: Arc<ThemeOptions>,
}

impl ThemePlugin {
    pub fn new(options: ThemeOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }
}

impl Plugin for ThemePlugin {
    fn name(&self) -> &str {
        "theme"
    }

    fn on_init(&self, cx: &mut HookContext<'_>) -> Result<()> {
        cx.context.wrapper = Arc::new(ThemeWrapper {
            options: Arc::clone(&self.options),
        });

        let components = &mut cx.context.components;
        for (tag, class) in TAG_CLASSES {
            if !components.contains(tag) {
                let attrs = Attributes::from([("class".to_owned(), (*class).to_owned())]);
                components.insert(*tag, AttrOverride::new(attrs));
            }
        }
        Ok(())
    }

    fn on_render(&self, _cx: &RenderContext<'_>, actions: &mut RenderActions<'_>) -> Result<()> {
        if !actions.body_attributes().contains_key("class") {
            let body_class = self.options.body_class.as_deref().unwrap_or(BODY_CLASS);
            actions.set_body_attributes([("class", body_class)]);
        }
        if !actions.html_attributes().contains_key("lang") {
            actions.set_html_attributes([("lang", "en")]);
        }

        let mut head: Vec<Node> = vec![
            Element::new("meta").attr("charset", "utf-8").into(),
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", VIEWPORT)
                .into(),
        ];
        head.extend(actions.head_components().iter().cloned());
        head.extend(self.options.stylesheets.iter().map(|href| {
            Node::from(
                Element::new("link")
                    .attr("rel", "stylesheet")
                    .attr("href", href),
            )
        }));
        actions.set_head_components(head);
        Ok(())
    }
}

/// Page wrapper installed by [`ThemePlugin`].
pub struct ThemeWrapper {
    options: Arc<ThemeOptions>,
}

impl PageWrapper for ThemeWrapper {
    fn wrap(&self, props: WrapperProps<'_>) -> Result<Node> {
        let header = self.header(&props);
        let footer = self.footer(&props);

        let main = match props.page.data_str("layout") {
            Some("doc") => Element::new("div")
                .attr("class", "folio-main folio-main-doc")
                .child(self.sidebar(props.page))
                .child(
                    Element::new("article")
                        .attr("class", "folio-doc")
                        .children(page_header(props.page))
                        .child(props.element)
                        .child(page_navigation(props.page, props.pages)),
                ),
            _ => Element::new("div").attr("class", "folio-main").child(
                Element::new("div")
                    .attr("class", "folio-page")
                    .child(props.element),
            ),
        };

        Ok(Element::new("div")
            .attr("class", "folio")
            .child(header)
            .child(main)
            .child(footer)
            .into())
    }
}

impl ThemeWrapper {
    fn header(&self, props: &WrapperProps<'_>) -> Element {
        let title = self
            .options
            .site_title
            .as_deref()
            .unwrap_or(&props.site.title);

        let mut logo = Element::new("a")
            .attr("class", "folio-logo")
            .attr("href", "./")
            .child(Element::new("span").child(title));
        if let Some(version) = props.site.data_str("version") {
            logo = logo.child(
                Element::new("span")
                    .attr("class", "folio-version")
                    .child(version),
            );
        }

        let nav = Element::new("nav")
            .attr("class", "folio-nav")
            .children(self.options.nav.iter().map(|item| {
                Node::from(
                    Element::new("a")
                        .attr("class", "folio-nav-link")
                        .attr("href", &item.link)
                        .child(item.text.as_str()),
                )
            }));

        Element::new("header")
            .attr("class", "folio-header")
            .child(logo)
            .child(nav)
    }

    fn sidebar(&self, page: &Page) -> Element {
        let sections = self.options.sidebar.iter().map(|section| {
            let links = section.items.iter().map(|item| {
                let class = if item.link == page.url {
                    "folio-sidebar-link active"
                } else {
                    "folio-sidebar-link"
                };
                Node::from(
                    Element::new("a")
                        .attr("class", class)
                        .attr("href", &item.link)
                        .child(item.text.as_str()),
                )
            });
            Node::from(
                Element::new("div")
                    .attr("class", "folio-sidebar-section")
                    .child(
                        Element::new("div")
                            .attr("class", "folio-sidebar-title")
                            .child(section.text.as_str()),
                    )
                    .children(links),
            )
        });

        Element::new("aside")
            .attr("class", "folio-sidebar")
            .children(sections)
    }

    fn footer(&self, props: &WrapperProps<'_>) -> Element {
        let footer = Element::new("footer").attr("class", "folio-footer");
        match (&self.options.footer, props.site.data_str("repository")) {
            (Some(html), _) => footer.child(Node::raw(html.as_str())),
            (None, Some(repository)) => footer.child(
                Element::new("a")
                    .attr("href", repository)
                    .child("Source code"),
            ),
            (None, None) => footer,
        }
    }
}

/// Title and description block of a `doc` page.
fn page_header(page: &Page) -> Option<Node> {
    let title = page.data_str("title")?;
    let mut header = Element::new("div").attr("class", "folio-page-header").child(
        Element::new("h1")
            .attr("class", "folio-page-title")
            .child(title),
    );
    if let Some(description) = page.data_str("description") {
        header = header.child(
            Element::new("p")
                .attr("class", "folio-page-description")
                .child(description),
        );
    }
    Some(header.into())
}

/// Previous/next links resolved from `prevPage` / `nextPage`.
fn page_navigation(page: &Page, pages: &[Arc<Page>]) -> Node {
    let find = |key: &str| {
        page.data_str(key)
            .and_then(|url| pages.iter().find(|p| p.url == url))
    };

    let link = |target: Option<&Arc<Page>>, label: &str, class: &str| {
        let slot = Element::new("div").attr("class", class);
        match target {
            Some(target) => slot.child(
                Element::new("a")
                    .attr("href", &target.url)
                    .child(Element::new("span").attr("class", "folio-pager-label").child(label))
                    .child(
                        Element::new("span")
                            .attr("class", "folio-pager-title")
                            .child(target.title()),
                    ),
            ),
            None => slot,
        }
    };

    Element::new("nav")
        .attr("class", "folio-pager")
        .child(link(find("prevPage"), "Previous page", "folio-pager-prev"))
        .child(link(find("nextPage"), "Next page", "folio-pager-next"))
        .into()
}
