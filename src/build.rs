//! Site building orchestration.
//!
//! Runs the plugin lifecycle and writes one HTML file per page.
//!
//! # Stages
//!
//! ```text
//! Build::new() ── config validated, input checked, Context built
//!     │            (failures here are fatal config errors; no stage is entered)
//!     │
//!     ├── on_init
//!     ├── output directory ensured (cleaned first with `clean`)
//!     ├── create_pages ──► on_page_create (once per page)
//!     ├── on_pre_build ──► page paths validated
//!     ├── per page, in order: composed ─► rendered (on_render) ─► written
//!     └── on_post_build
//! ```
//!
//! Every stage completes across all plugins before the next one starts. The
//! first error aborts the build; files written before it stay on disk.

use crate::{
    config::{BuildConfig, SiteConfig},
    context::Context,
    log,
    logger::ProgressBar,
    page::Page,
    plugin::{Hook, call_hook},
    render::{RenderDescriptor, compose, document},
    utils::minify::minify_html,
};
use anyhow::Result;
use std::{
    collections::HashMap,
    fmt, fs, io,
    path::{Component, Path, PathBuf},
    sync::Arc,
    time::Instant,
};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Pipeline errors. Any of them aborts the build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("plugin `{plugin}` failed in {hook}")]
    Hook {
        plugin: String,
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error at `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input directory `{0}` not found")]
    MissingInput(PathBuf),

    #[error("pages `{first}` and `{second}` both write `{path}`")]
    PathCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("page `{name}` has an invalid output path: {reason}")]
    InvalidPage { name: String, reason: String },

    #[error("invalid content file `{path}`: {reason}")]
    Content { path: PathBuf, reason: String },
}

impl BuildError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ============================================================================
// Stages
// ============================================================================

/// Build progress; each stage is entered only after the previous one completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Uninitialized,
    /// Context built, `on_init` complete
    Initialized,
    /// Output directory exists
    OutputReady,
    /// `create_pages` and `on_page_create` complete
    PagesDiscovered,
    /// `on_pre_build` complete, page paths validated
    PreBuild,
    /// Page `index` (in registry order) is at `step`
    Rendering { index: usize, step: RenderStep },
    /// `on_post_build` complete
    PostBuild,
    Done,
    Aborted,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::OutputReady => "output ready",
            Self::PagesDiscovered => "pages discovered",
            Self::PreBuild => "pre-build",
            Self::Rendering { index, step } => {
                return write!(f, "rendering page {} ({step})", index + 1);
            }
            Self::PostBuild => "post-build",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Per-page progress inside [`BuildStage::Rendering`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStep {
    /// Element tree and descriptor built
    Composed,
    /// `on_render` complete
    Rendered,
    /// File written
    Written,
}

impl fmt::Display for RenderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Composed => "composed",
            Self::Rendered => "rendered",
            Self::Written => "written",
        })
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Files written, in render order
    pub written: Vec<PathBuf>,
}

impl BuildReport {
    pub fn page_count(&self) -> usize {
        self.written.len()
    }
}

// ============================================================================
// Build
// ============================================================================

/// Build the site described by `config`.
pub fn build_site(config: SiteConfig) -> Result<BuildReport> {
    Build::new(config)?.run()
}

/// One build run over a fresh [`Context`].
pub struct Build {
    ctx: Context,
    settings: BuildConfig,
    stage: BuildStage,
    /// Last stage reached before an abort
    failed_at: Option<BuildStage>,
}

impl Build {
    /// Validate `config` and build the context.
    ///
    /// Fails with [`BuildError::MissingInput`] before anything is written when the
    /// input directory is required but absent.
    pub fn new(config: SiteConfig) -> Result<Self> {
        config.validate()?;

        let input = config.input_dir();
        if config.build.require_input && config.reads_input() && !input.is_dir() {
            return Err(BuildError::MissingInput(input).into());
        }

        let settings = config.build.clone();
        Ok(Self {
            ctx: Context::new(config)?,
            settings,
            stage: BuildStage::Uninitialized,
            failed_at: None,
        })
    }

    pub const fn stage(&self) -> BuildStage {
        self.stage
    }

    /// Stage the build was in when it aborted.
    pub const fn failed_at(&self) -> Option<BuildStage> {
        self.failed_at
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Run every stage; on error the build ends in [`BuildStage::Aborted`].
    pub fn run(&mut self) -> Result<BuildReport> {
        let started = Instant::now();
        log!("build"; "building {}", self.ctx.input().display());

        match self.run_stages() {
            Ok(report) => {
                self.stage = BuildStage::Done;
                log!("done"; "{} pages in {:.2?}", report.page_count(), started.elapsed());
                Ok(report)
            }
            Err(err) => {
                log!("build"; "aborted after stage: {}", self.stage);
                self.failed_at = Some(self.stage);
                self.stage = BuildStage::Aborted;
                Err(err)
            }
        }
    }

    fn run_stages(&mut self) -> Result<BuildReport> {
        call_hook(&mut self.ctx, Hook::Init)?;
        self.stage = BuildStage::Initialized;

        self.prepare_output()?;
        self.stage = BuildStage::OutputReady;

        self.create_pages()?;
        self.stage = BuildStage::PagesDiscovered;
        log!("build"; "{} pages", self.ctx.pages().len());

        call_hook(&mut self.ctx, Hook::PreBuild)?;
        validate_pages(self.ctx.pages())?;
        self.stage = BuildStage::PreBuild;

        let written = self.render_pages()?;

        call_hook(&mut self.ctx, Hook::PostBuild)?;
        self.stage = BuildStage::PostBuild;

        Ok(BuildReport { written })
    }

    fn prepare_output(&self) -> Result<()> {
        let output = self.ctx.output();
        if self.settings.clean && output.exists() {
            log!("build"; "cleaning {}", output.display());
            fs::remove_dir_all(output).map_err(|err| BuildError::io(output, err))?;
        }
        fs::create_dir_all(output).map_err(|err| BuildError::io(output, err))?;
        Ok(())
    }

    /// `create_pages` stage, then `on_page_create` once per resulting page.
    fn create_pages(&mut self) -> Result<()> {
        call_hook(&mut self.ctx, Hook::CreatePages)?;

        // Pages created from here on do not get the hook
        let created = self.ctx.pages().to_vec();
        for page in &created {
            // Deleted by an earlier `on_page_create`
            if !self.ctx.pages_mut().contains(page.id()) {
                continue;
            }
            call_hook(&mut self.ctx, Hook::PageCreate { page })?;
        }
        Ok(())
    }

    /// Render and write pages one after another.
    fn render_pages(&mut self) -> Result<Vec<PathBuf>> {
        let pages = self.ctx.pages().to_vec();
        let progress = ProgressBar::new("render", pages.len());
        let mut written = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            written.push(self.render_page(index, page)?);
            progress.inc();
        }

        progress.finish();
        Ok(written)
    }

    fn render_page(&mut self, index: usize, page: &Arc<Page>) -> Result<PathBuf> {
        let mut descriptor: RenderDescriptor = compose(&self.ctx, page)?;
        self.stage = BuildStage::Rendering {
            index,
            step: RenderStep::Composed,
        };
        call_hook(
            &mut self.ctx,
            Hook::Render {
                page,
                descriptor: &mut descriptor,
            },
        )?;
        self.stage = BuildStage::Rendering {
            index,
            step: RenderStep::Rendered,
        };

        let html = document::serialize(&descriptor)?;
        let html = minify_html(html.as_bytes(), self.settings.minify);

        let target = self.ctx.output().join(&page.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
        }
        fs::write(&target, &*html).map_err(|err| BuildError::io(&target, err))?;
        self.stage = BuildStage::Rendering {
            index,
            step: RenderStep::Written,
        };

        log!("render"; "{}", page.path.display());
        Ok(target)
    }
}

/// Reject empty, escaping and duplicate output paths.
fn validate_pages(pages: &[Arc<Page>]) -> Result<(), BuildError> {
    let mut seen: HashMap<PathBuf, &str> = HashMap::with_capacity(pages.len());

    for page in pages {
        let invalid = |reason: &str| BuildError::InvalidPage {
            name: page.name.clone(),
            reason: reason.to_owned(),
        };

        let path: PathBuf = page
            .path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        if path.as_os_str().is_empty() {
            return Err(invalid("empty path"));
        }
        if !path.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(invalid("path must stay inside the output directory"));
        }

        if let Some(first) = seen.insert(path.clone(), &page.name) {
            return Err(BuildError::PathCollision {
                path,
                first: first.to_owned(),
                second: page.name.clone(),
            });
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
