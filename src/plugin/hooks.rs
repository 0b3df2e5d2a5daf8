//! Closure-based hook slots.

use super::{HookContext, Plugin, RenderContext};
use crate::page::Page;
use crate::render::RenderActions;
use anyhow::Result;
use std::sync::Arc;

type StageFn = Arc<dyn Fn(&mut HookContext<'_>) -> Result<()> + Send + Sync>;
type PageFn = Arc<dyn Fn(&mut HookContext<'_>, &Arc<Page>) -> Result<()> + Send + Sync>;
type RenderFn = Arc<dyn Fn(&RenderContext<'_>, &mut RenderActions<'_>) -> Result<()> + Send + Sync>;

/// Optional closure per lifecycle hook.
///
/// Used for the config's own hooks, and as a lightweight plugin:
///
/// ```ignore
/// let plugin = Hooks::new()
///     .named("drafts")
///     .pre_build(|cx| {
///         let drafts: Vec<_> = cx.context.pages().iter()
///             .filter(|p| p.data.get("draft").is_some())
///             .cloned()
///             .collect();
///         let mut actions = cx.actions();
///         for page in &drafts {
///             actions.delete_page(page);
///         }
///         Ok(())
///     });
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    name: Option<String>,
    on_init: Option<StageFn>,
    create_pages: Option<StageFn>,
    on_page_create: Option<PageFn>,
    on_pre_build: Option<StageFn>,
    on_render: Option<RenderFn>,
    on_post_build: Option<StageFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name reported in logs and errors (default: `hooks`).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn init(
        mut self,
        hook: impl Fn(&mut HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.on_init = Some(Arc::new(hook));
        self
    }

    pub fn pages(
        mut self,
        hook: impl Fn(&mut HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.create_pages = Some(Arc::new(hook));
        self
    }

    pub fn page_create(
        mut self,
        hook: impl Fn(&mut HookContext<'_>, &Arc<Page>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.on_page_create = Some(Arc::new(hook));
        self
    }

    pub fn pre_build(
        mut self,
        hook: impl Fn(&mut HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.on_pre_build = Some(Arc::new(hook));
        self
    }

    pub fn render(
        mut self,
        hook: impl Fn(&RenderContext<'_>, &mut RenderActions<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.on_render = Some(Arc::new(hook));
        self
    }

    pub fn post_build(
        mut self,
        hook: impl Fn(&mut HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.on_post_build = Some(Arc::new(hook));
        self
    }
}

fn run(slot: &Option<StageFn>, cx: &mut HookContext<'_>) -> Result<()> {
    match slot {
        Some(hook) => hook(cx),
        None => Ok(()),
    }
}

impl Plugin for Hooks {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("hooks")
    }

    fn on_init(&self, cx: &mut HookContext<'_>) -> Result<()> {
        run(&self.on_init, cx)
    }

    fn create_pages(&self, cx: &mut HookContext<'_>) -> Result<()> {
        run(&self.create_pages, cx)
    }

    fn on_page_create(&self, cx: &mut HookContext<'_>, page: &Arc<Page>) -> Result<()> {
        match &self.on_page_create {
            Some(hook) => hook(cx, page),
            None => Ok(()),
        }
    }

    fn on_pre_build(&self, cx: &mut HookContext<'_>) -> Result<()> {
        run(&self.on_pre_build, cx)
    }

    fn on_render(&self, cx: &RenderContext<'_>, actions: &mut RenderActions<'_>) -> Result<()> {
        match &self.on_render {
            Some(hook) => hook(cx, actions),
            None => Ok(()),
        }
    }

    fn on_post_build(&self, cx: &mut HookContext<'_>) -> Result<()> {
        run(&self.on_post_build, cx)
    }
}
