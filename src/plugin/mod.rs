//! Plugin API.
//!
//! A plugin implements any subset of the lifecycle hooks; every hook has a no-op
//! default. Plugins run in list order within each stage, the config first:
//!
//! ```text
//! on_init ─► create_pages ─► on_page_create (per page) ─► on_pre_build
//!         ─► on_render (per page) ─► on_post_build
//! ```
//!
//! Hooks communicate only by mutating the [`Context`] (through [`HookContext`])
//! or the render descriptor (through [`RenderActions`]).

pub mod builtin;
mod dispatch;
mod hooks;
mod site;

pub use builtin::PluginSpec;
pub use dispatch::{Hook, call_hook};
pub use hooks::Hooks;
pub(crate) use site::SitePlugin;

use crate::context::Context;
use crate::log;
use crate::page::{Actions, Page};
use crate::render::RenderActions;
use anyhow::Result;
use std::fmt::Display;
use std::sync::Arc;

/// A set of optional lifecycle hooks.
pub trait Plugin: Send + Sync {
    /// Name used in logs and errors (default: the type name).
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    fn on_init(&self, _cx: &mut HookContext<'_>) -> Result<()> {
        Ok(())
    }

    fn create_pages(&self, _cx: &mut HookContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called once for every page present after the `create_pages` stage.
    fn on_page_create(&self, _cx: &mut HookContext<'_>, _page: &Arc<Page>) -> Result<()> {
        Ok(())
    }

    fn on_pre_build(&self, _cx: &mut HookContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called once per page right before serialization.
    ///
    /// The registry is frozen here: the context is only readable.
    fn on_render(&self, _cx: &RenderContext<'_>, _actions: &mut RenderActions<'_>) -> Result<()> {
        Ok(())
    }

    fn on_post_build(&self, _cx: &mut HookContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Arguments of every hook except `on_render`.
pub struct HookContext<'a> {
    pub context: &'a mut Context,
    pub log: PluginLog<'a>,
}

impl<'a> HookContext<'a> {
    pub fn new(context: &'a mut Context, plugin: &'a str) -> Self {
        Self {
            context,
            log: PluginLog::new(plugin),
        }
    }

    /// Page registry mutators.
    pub fn actions(&mut self) -> Actions<'_> {
        self.context.actions()
    }
}

/// Arguments of `on_render`.
pub struct RenderContext<'a> {
    pub context: &'a Context,
    /// The page being rendered
    pub page: &'a Arc<Page>,
    pub log: PluginLog<'a>,
}

impl<'a> RenderContext<'a> {
    pub fn new(context: &'a Context, page: &'a Arc<Page>, plugin: &'a str) -> Self {
        Self {
            context,
            page,
            log: PluginLog::new(plugin),
        }
    }
}

/// Logger bound to one plugin's name.
#[derive(Debug, Clone, Copy)]
pub struct PluginLog<'a> {
    name: &'a str,
}

impl<'a> PluginLog<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self { name }
    }

    pub fn info(&self, message: impl Display) {
        log!(self.name; "{message}");
    }

    pub fn warn(&self, message: impl Display) {
        log!("warn"; "{}: {message}", self.name);
    }
}
