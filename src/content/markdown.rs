//! Markdown pages: YAML front matter plus a CommonMark body.
//!
//! ```text
//! ---
//! title: Intro
//! layout: doc
//! ---
//! Hello *world*
//! ```
//!
//! The front matter becomes `page.data`; the body is parsed once into a
//! [`Node`] tree and component overrides are applied on every render.

use crate::build::BuildError;
use crate::page::{NewPage, PageData};
use crate::plugin::{HookContext, Plugin};
use crate::render::{
    AttrOverride, Attributes, Component, ComponentProps, Components, Element, Node,
};
use anyhow::{Context as _, Result};
use gray_matter::{Matter, engine::YAML};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use walkdir::WalkDir;

// ============================================================================
// Loading
// ============================================================================

/// Read `path` and build a page named after its file stem.
pub fn load_page(path: &Path) -> Result<NewPage> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read content file: {}", path.display()))?;
    let (data, body) = split_front_matter(&source)
        .map_err(|reason| BuildError::Content {
            path: path.to_path_buf(),
            reason,
        })?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(NewPage::new(Arc::new(MarkdownComponent::parse(&body)))
        .data(data)
        .name(name)
        .source(path))
}

/// Split front matter from the body; front matter must be a mapping.
fn split_front_matter(source: &str) -> Result<(PageData, String), String> {
    let matter = Matter::<YAML>::new();
    let parsed = matter
        .parse::<serde_json::Value>(source)
        .map_err(|err| format!("invalid front matter: {err}"))?;

    let data = match parsed.data {
        None | Some(serde_json::Value::Null) => PageData::new(),
        Some(serde_json::Value::Object(map)) => map,
        Some(other) => return Err(format!("front matter must be a mapping, found `{other}`")),
    };
    Ok((data, parsed.content))
}

/// Content files in `dir` with `extension`, sorted by file name.
///
/// Only the top level of `dir` is read.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

// ============================================================================
// Component
// ============================================================================

/// Parsed markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownComponent {
    tree: Node,
}

impl MarkdownComponent {
    pub fn parse(markdown: &str) -> Self {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES;

        let mut builder = TreeBuilder::default();
        for event in Parser::new_ext(markdown, options) {
            builder.event(event);
        }
        Self {
            tree: builder.finish(),
        }
    }

    /// The tree before component overrides.
    pub fn tree(&self) -> &Node {
        &self.tree
    }
}

impl Component for MarkdownComponent {
    fn render(&self, props: &ComponentProps<'_>) -> Result<Node> {
        props.components.apply(self.tree.clone())
    }
}

/// Builds a [`Node`] tree from parser events.
#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    /// Open elements, innermost last
    stack: Vec<Element>,
    /// Elements opened per open tag
    opened: Vec<usize>,
    in_table_head: bool,
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => {
                let count = self.opened.pop().unwrap_or(0);
                for _ in 0..count {
                    self.close();
                }
            }
            Event::Text(text) => self.push(Node::Text(text.into_string())),
            Event::Code(code) => self.push(Element::new("code").child(code.into_string()).into()),
            Event::Html(html) | Event::InlineHtml(html) => self.push(Node::Raw(html.into_string())),
            Event::SoftBreak => self.push(Node::text("\n")),
            Event::HardBreak => self.push(Element::new("br").into()),
            Event::Rule => self.push(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .attr("type", "checkbox")
                    .attr("disabled", "");
                if checked {
                    input = input.attr("checked", "");
                }
                self.push(input.into());
            }
            Event::FootnoteReference(name) => {
                let link = Element::new("a")
                    .attr("href", format!("#{name}"))
                    .child(name.into_string());
                self.push(
                    Element::new("sup")
                        .attr("class", "footnote-reference")
                        .child(link)
                        .into(),
                );
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.push(Node::Text(math.into_string()))
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let elements: Vec<Element> = match tag {
            Tag::Paragraph => vec![Element::new("p")],
            Tag::Heading {
                level, id, classes, ..
            } => {
                let mut heading = Element::new(level.to_string());
                if let Some(id) = id {
                    heading = heading.attr("id", id.into_string());
                }
                if !classes.is_empty() {
                    let classes: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
                    heading = heading.attr("class", classes.join(" "));
                }
                vec![heading]
            }
            Tag::BlockQuote(_) => vec![Element::new("blockquote")],
            Tag::CodeBlock(kind) => {
                let mut code = Element::new("code");
                if let CodeBlockKind::Fenced(info) = kind {
                    let lang = info.split_whitespace().next().unwrap_or_default();
                    if !lang.is_empty() {
                        code = code.attr("class", format!("language-{lang}"));
                    }
                }
                vec![Element::new("pre"), code]
            }
            Tag::List(Some(start)) => {
                let mut list = Element::new("ol");
                if start != 1 {
                    list = list.attr("start", start.to_string());
                }
                vec![list]
            }
            Tag::List(None) => vec![Element::new("ul")],
            Tag::Item => vec![Element::new("li")],
            Tag::FootnoteDefinition(name) => vec![
                Element::new("div")
                    .attr("class", "footnote-definition")
                    .attr("id", name.into_string()),
            ],
            Tag::Table(_) => vec![Element::new("table")],
            Tag::TableHead => {
                self.in_table_head = true;
                vec![Element::new("thead"), Element::new("tr")]
            }
            Tag::TableRow => vec![Element::new("tr")],
            Tag::TableCell => vec![Element::new(if self.in_table_head { "th" } else { "td" })],
            Tag::Emphasis => vec![Element::new("em")],
            Tag::Strong => vec![Element::new("strong")],
            Tag::Strikethrough => vec![Element::new("del")],
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = Element::new("a").attr("href", dest_url.into_string());
                if !title.is_empty() {
                    link = link.attr("title", title.into_string());
                }
                vec![link]
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut image = Element::new("img").attr("src", dest_url.into_string());
                if !title.is_empty() {
                    image = image.attr("title", title.into_string());
                }
                vec![image]
            }
            // Html blocks arrive as `Event::Html`; metadata blocks are not enabled
            _ => Vec::new(),
        };

        self.opened.push(elements.len());
        self.stack.extend(elements);
    }

    fn close(&mut self) {
        let Some(mut element) = self.stack.pop() else {
            return;
        };
        match element.tag.as_str() {
            // Alt text arrives as children
            "img" => {
                let alt = element.text_content();
                element.children.clear();
                element = element.attr("alt", alt);
            }
            "thead" => self.in_table_head = false,
            _ => {}
        }
        self.push(element.into());
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn finish(mut self) -> Node {
        while !self.stack.is_empty() {
            self.close();
        }
        Node::Fragment(self.root)
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// Options of the built-in `markdown` plugin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkdownOptions {
    /// Folder to read, relative to the config file (default: the site input)
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Content file extension (default: `[build] extension`)
    #[serde(default)]
    pub extension: Option<String>,

    /// Attribute overrides registered on init
    #[serde(default)]
    pub components: BTreeMap<String, Attributes>,
}

/// Creates pages from a folder of markdown files.
#[derive(Debug, Clone, Default)]
pub struct MarkdownPlugin {
    options: MarkdownOptions,
}

impl MarkdownPlugin {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }
}

impl Plugin for MarkdownPlugin {
    fn name(&self) -> &str {
        "markdown"
    }

    fn on_init(&self, cx: &mut HookContext<'_>) -> Result<()> {
        let mut components = Components::new();
        for (tag, attrs) in &self.options.components {
            components.insert(tag.clone(), AttrOverride::new(attrs.clone()));
        }
        cx.context.components.extend(&components);
        Ok(())
    }

    fn create_pages(&self, cx: &mut HookContext<'_>) -> Result<()> {
        let folder = match &self.options.input {
            Some(input) => cx.context.root().join(input),
            None => cx.context.input().to_path_buf(),
        };
        let extension = self
            .options
            .extension
            .clone()
            .unwrap_or_else(|| cx.context.extension().to_owned());

        if !folder.is_dir() {
            cx.log.warn(format!("skipping missing folder {}", folder.display()));
            return Ok(());
        }

        let files = discover(&folder, &extension)?;
        cx.log.info(format!("reading {} files from {}", files.len(), folder.display()));
        for path in files {
            let page = load_page(&path)?;
            cx.actions().create_page(page);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::context::Context;
    use crate::page::PageRegistry;
    use tempfile::TempDir;

    fn first_element(node: &Node) -> &Element {
        match node {
            Node::Fragment(children) => match children.first() {
                Some(Node::Element(elem)) => elem,
                other => panic!("expected element, got {other:?}"),
            },
            other => panic!("expected fragment, got {other:?}"),
        }
    }

    #[test]
    fn test_load_page_front_matter_and_body() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intro.md");
        fs::write(&path, "---\ntitle: Intro\nlayout: doc\n---\nHello *world*\n").unwrap();

        let page = PageRegistry::new().create_page(load_page(&path).unwrap());

        assert_eq!(page.name, "intro");
        assert_eq!(page.path, PathBuf::from("intro.html"));
        assert_eq!(page.url, "./intro");
        assert_eq!(page.data_str("title"), Some("Intro"));
        assert_eq!(page.data_str("layout"), Some("doc"));
        assert_eq!(page.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_page_without_front_matter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.md");
        fs::write(&path, "# Plain\n").unwrap();

        let page = load_page(&path).unwrap();
        assert!(page.data.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_scalar_front_matter_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, "---\njust a string\n---\nbody\n").unwrap();

        let err = load_page(&path).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::Content { .. })
        ));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.md", "a.md", "notes.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.md"), "x").unwrap();

        let files = discover(dir.path(), ".md").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.md", "b.md"]);
    }

    #[test]
    fn test_parse_basic_blocks() {
        let component = MarkdownComponent::parse("# Title\n\nHello *there*");
        let Node::Fragment(children) = component.tree() else {
            panic!("expected fragment");
        };

        let Node::Element(heading) = &children[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.tag, "h1");
        assert_eq!(heading.text_content(), "Title");

        let Node::Element(para) = &children[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.tag, "p");
        assert!(matches!(&para.children[1], Node::Element(em) if em.tag == "em"));
    }

    #[test]
    fn test_parse_code_block_and_image() {
        let component = MarkdownComponent::parse("```rust\nfn main() {}\n```\n\n![logo](./logo.svg)");
        let pre = first_element(component.tree());
        assert_eq!(pre.tag, "pre");
        let Node::Element(code) = &pre.children[0] else {
            panic!("expected code");
        };
        assert_eq!(code.attrs["class"], "language-rust");
        assert_eq!(code.text_content(), "fn main() {}\n");

        let Node::Fragment(children) = component.tree() else {
            panic!("expected fragment");
        };
        let Node::Element(para) = &children[1] else {
            panic!("expected paragraph");
        };
        let Node::Element(img) = &para.children[0] else {
            panic!("expected image");
        };
        assert_eq!(img.attrs["alt"], "logo");
        assert_eq!(img.attrs["src"], "./logo.svg");
        assert!(img.children.is_empty());
    }

    #[test]
    fn test_parse_table_head_cells() {
        let component = MarkdownComponent::parse("| a | b |\n|---|---|\n| 1 | 2 |\n");
        let table = first_element(component.tree());
        assert_eq!(table.tag, "table");

        let Node::Element(thead) = &table.children[0] else {
            panic!("expected thead");
        };
        let Node::Element(head_row) = &thead.children[0] else {
            panic!("expected row");
        };
        assert!(matches!(&head_row.children[0], Node::Element(th) if th.tag == "th"));

        let Node::Element(row) = &table.children[1] else {
            panic!("expected body row");
        };
        assert!(matches!(&row.children[0], Node::Element(td) if td.tag == "td"));
    }

    #[test]
    fn test_render_applies_overrides() {
        let mut ctx = Context::new(SiteConfig::default()).unwrap();
        ctx.components
            .insert("p", AttrOverride::new([("class".to_owned(), "text".to_owned())].into()));
        let component = Arc::new(MarkdownComponent::parse("Hello"));
        let page = ctx
            .pages_mut()
            .create_page(NewPage::new(component.clone()).name("x"));

        let props = ComponentProps {
            components: &ctx.components,
            site: &ctx.site,
            page: &page,
            pages: ctx.pages(),
        };
        let node = component.render(&props).unwrap();
        assert_eq!(first_element(&node).attrs["class"], "text");
    }

    #[test]
    fn test_plugin_creates_pages_from_folder() {
        let dir = TempDir::new().unwrap();
        let guides = dir.path().join("guides");
        fs::create_dir(&guides).unwrap();
        fs::write(guides.join("setup.md"), "Setup").unwrap();
        fs::write(guides.join("usage.md"), "Usage").unwrap();

        let mut config = SiteConfig::default();
        config.root = dir.path().to_path_buf();
        config.build.discover = false;
        let mut ctx = Context::new(config).unwrap();

        let plugin = MarkdownPlugin::new(MarkdownOptions {
            input: Some(PathBuf::from("guides")),
            ..Default::default()
        });
        plugin
            .create_pages(&mut HookContext::new(&mut ctx, "markdown"))
            .unwrap();

        let names: Vec<_> = ctx.pages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["setup", "usage"]);
    }
}
