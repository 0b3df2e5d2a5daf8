//! Folio - a small, scriptable static site builder.
//!
//! A build turns a folder of content files plus an ordered list of plugins into
//! one HTML file per page:
//!
//! ```text
//! SiteConfig ──► Context { pages, plugins: [config, ...] }
//!                   │
//!                   ├── on_init ─► create_pages ─► on_page_create ─► on_pre_build
//!                   └── per page: compose ─► on_render ─► serialize ─► write
//! ```
//!
//! # Example
//!
//! ```ignore
//! use folio::{build_site, Hooks, SiteConfig};
//!
//! let config = SiteConfig::load("folio.toml".as_ref())?
//!     .with_hooks(Hooks::new().render(|cx, actions| {
//!         actions.set_body_attributes([("data-page", cx.page.name.as_str())]);
//!         Ok(())
//!     }));
//! build_site(config)?;
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod content;
pub mod context;
pub mod init;
pub mod logger;
pub mod page;
pub mod plugin;
pub mod render;
pub mod theme;
pub mod utils;

pub use build::{Build, BuildError, BuildReport, BuildStage, RenderStep, build_site};
pub use config::SiteConfig;
pub use context::Context;
pub use page::{NewPage, Page};
pub use plugin::{HookContext, Hooks, Plugin, RenderContext};
