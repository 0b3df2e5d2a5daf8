//! Hook dispatch across the ordered plugin list.

use super::{HookContext, RenderContext};
use crate::build::BuildError;
use crate::context::Context;
use crate::page::Page;
use crate::render::{RenderActions, RenderDescriptor};
use anyhow::Result;
use std::sync::Arc;

/// One lifecycle stage with its stage-specific arguments.
pub enum Hook<'a> {
    Init,
    CreatePages,
    PageCreate {
        page: &'a Arc<Page>,
    },
    PreBuild,
    Render {
        page: &'a Arc<Page>,
        descriptor: &'a mut RenderDescriptor,
    },
    PostBuild,
}

impl Hook<'_> {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "on_init",
            Self::CreatePages => "create_pages",
            Self::PageCreate { .. } => "on_page_create",
            Self::PreBuild => "on_pre_build",
            Self::Render { .. } => "on_render",
            Self::PostBuild => "on_post_build",
        }
    }
}

/// Invoke `hook` on every plugin, in order.
///
/// Each plugin finishes before the next one starts. The first error stops the
/// dispatch and is returned as [`BuildError::Hook`].
pub fn call_hook(ctx: &mut Context, mut hook: Hook<'_>) -> Result<()> {
    // Hooks may replace context fields, never the plugin list itself
    let plugins = ctx.shared_plugins();
    let hook_name = hook.name();

    for plugin in plugins.iter() {
        let name = plugin.name();
        let result = match &mut hook {
            Hook::Init => plugin.on_init(&mut HookContext::new(ctx, name)),
            Hook::CreatePages => plugin.create_pages(&mut HookContext::new(ctx, name)),
            Hook::PageCreate { page } => {
                plugin.on_page_create(&mut HookContext::new(ctx, name), *page)
            }
            Hook::PreBuild => plugin.on_pre_build(&mut HookContext::new(ctx, name)),
            Hook::Render { page, descriptor } => {
                let cx = RenderContext::new(ctx, *page, name);
                plugin.on_render(&cx, &mut RenderActions::new(&mut **descriptor))
            }
            Hook::PostBuild => plugin.on_post_build(&mut HookContext::new(ctx, name)),
        };

        result.map_err(|source| BuildError::Hook {
            plugin: name.to_owned(),
            hook: hook_name,
            source,
        })?;
    }

    Ok(())
}
