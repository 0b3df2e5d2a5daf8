//! Per-build mutable state shared by every hook.

use crate::config::{SiteConfig, SiteMetadata};
use crate::page::{Actions, Page, PageRegistry};
use crate::plugin::{Plugin, SitePlugin, builtin};
use crate::render::{AttrOverride, Components, IdentityWrapper, PageWrapper};
use anyhow::Result;
use educe::Educe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// State of one build, created at build start and dropped at the end.
///
/// Plugins may replace `site`, `components` and `wrapper` from any hook that
/// gets a mutable context; the page list changes only through [`Actions`].
#[derive(Educe)]
#[educe(Debug)]
pub struct Context {
    pub site: SiteMetadata,
    /// Tag-name overrides handed to every component
    pub components: Components,
    #[educe(Debug(ignore))]
    pub wrapper: Arc<dyn PageWrapper>,
    pages: PageRegistry,
    root: PathBuf,
    input: PathBuf,
    output: PathBuf,
    extension: String,
    #[educe(Debug(ignore))]
    plugins: Arc<[Arc<dyn Plugin>]>,
}

impl Context {
    /// Build the context and the ordered plugin list from `config`.
    ///
    /// Order: the config itself, then `[[plugins]]`, then `extra_plugins`.
    pub fn new(mut config: SiteConfig) -> Result<Self> {
        let mut components = Components::new();
        for (tag, attrs) in &config.components {
            components.insert(tag.clone(), AttrOverride::new(attrs.clone()));
        }
        components.extend(&config.page_components);

        // A markdown plugin without `input` takes over discovery of the site input
        let discover = config.build.discover
            && !config
                .plugins
                .iter()
                .any(|spec| spec.name == "markdown" && !spec.has_option("input"));

        let mut plugins: Vec<Arc<dyn Plugin>> = Vec::with_capacity(1 + config.plugins.len());
        plugins.push(Arc::new(SitePlugin::new(&mut config, discover)));
        for spec in &config.plugins {
            plugins.push(builtin::resolve(spec)?);
        }
        plugins.append(&mut config.extra_plugins);

        let wrapper = config
            .page_wrapper
            .take()
            .unwrap_or_else(|| Arc::new(IdentityWrapper));

        Ok(Self {
            input: config.input_dir(),
            output: config.output_dir(),
            root: config.root,
            extension: config.build.extension.trim_start_matches('.').to_owned(),
            site: config.site,
            components,
            wrapper,
            pages: PageRegistry::new(),
            plugins: plugins.into(),
        })
    }

    /// Pages in registry order.
    pub fn pages(&self) -> &[Arc<Page>] {
        self.pages.pages()
    }

    pub fn pages_mut(&mut self) -> &mut PageRegistry {
        &mut self.pages
    }

    pub fn actions(&mut self) -> Actions<'_> {
        Actions::new(&mut self.pages)
    }

    /// Directory relative plugin paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute content directory.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Absolute output directory.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Content file extension, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Shared handle to the plugin list, detached from the context borrow.
    pub(crate) fn shared_plugins(&self) -> Arc<[Arc<dyn Plugin>]> {
        Arc::clone(&self.plugins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Hooks;
    use crate::render::{Element, ElementRenderer, Node};

    #[test]
    fn test_plugin_order() {
        let config = SiteConfig::from_str("[[plugins]]\nname = \"theme\"")
            .unwrap()
            .with_plugin(Hooks::new().named("extra"));
        let ctx = Context::new(config).unwrap();

        let names: Vec<_> = ctx.plugins().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["config", "theme", "extra"]);
    }

    #[test]
    fn test_unknown_plugin_fails() {
        let config = SiteConfig::from_str("[[plugins]]\nname = \"nope\"").unwrap();
        assert!(Context::new(config).is_err());
    }

    #[test]
    fn test_component_overrides_merge() {
        let mut config = SiteConfig::from_str("[components.h1]\nclass = \"title\"\n[components.p]\nclass = \"text\"").unwrap();
        config.page_components.insert("p", |elem: Element| -> Result<Node> {
            Ok(Element::new("div").children(elem.children).into())
        });
        let ctx = Context::new(config).unwrap();

        assert_eq!(ctx.components.len(), 2);
        let h1 = ctx.components.get("h1").unwrap();
        let Node::Element(out) = h1.render(Element::new("h1")).unwrap() else {
            panic!("expected element");
        };
        assert_eq!(out.attrs["class"], "title");

        let p = ctx.components.get("p").unwrap();
        let Node::Element(out) = p.render(Element::new("p")).unwrap() else {
            panic!("expected element");
        };
        assert_eq!(out.tag, "div");
    }

    #[test]
    fn test_paths_and_defaults() {
        let ctx = Context::new(SiteConfig::default()).unwrap();
        assert!(ctx.input().is_absolute());
        assert!(ctx.input().ends_with("pages"));
        assert!(ctx.output().ends_with("www"));
        assert_eq!(ctx.extension(), "md");
        assert!(ctx.pages().is_empty());
    }
}
