//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section        | Purpose                                       |
//! |----------------|-----------------------------------------------|
//! | `[site]`       | Site metadata (title, description, data)      |
//! | `[build]`      | Input/output paths, extension, minify, clean  |
//! | `[head]`       | Styles, scripts and raw elements for `<head>` |
//! | `[components]` | Attributes merged into elements by tag name   |
//! | `[[plugins]]`  | Built-in plugins with their options           |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Folio"
//! description = "Docs for the folio site builder"
//!
//! [build]
//! input = "pages"
//! output = "www"
//!
//! [components.h1]
//! class = "title"
//!
//! [[plugins]]
//! name = "theme"
//! nav = [{ text = "Guide", link = "./guide" }]
//! ```
//!
//! Runtime-only fields (hooks, component renderers, the page wrapper and plugin
//! objects) are set from code; the config itself always runs as the first plugin.

mod build;
pub mod defaults;
mod error;
mod site;

pub use build::{BuildConfig, HeadConfig, ScriptEntry};
pub use error::ConfigError;
pub use site::SiteMetadata;

use crate::cli::Cli;
use crate::plugin::{Hooks, Plugin, PluginSpec, builtin};
use crate::render::{Attributes, Components, PageWrapper};
use anyhow::Result;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Clone, Educe, Serialize, Deserialize)]
#[educe(Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory relative paths are resolved against (empty: working directory)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub site: SiteMetadata,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Extra `<head>` elements
    #[serde(default)]
    pub head: HeadConfig,

    /// Attribute overrides keyed by tag name
    #[serde(default)]
    pub components: BTreeMap<String, Attributes>,

    /// Built-in plugins, in dispatch order after the config itself
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,

    /// Lifecycle hooks of the config itself
    #[serde(skip)]
    #[educe(Debug(ignore))]
    pub hooks: Hooks,

    /// Component renderers, merged over `components`
    #[serde(skip)]
    #[educe(Debug(ignore))]
    pub page_components: Components,

    /// Page wrapper (default: identity)
    #[serde(skip)]
    #[educe(Debug(ignore))]
    pub page_wrapper: Option<Arc<dyn PageWrapper>>,

    /// Plugin objects, dispatched after the built-in `plugins`
    #[serde(skip)]
    #[educe(Debug(ignore))]
    pub extra_plugins: Vec<Arc<dyn Plugin>>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path.
    ///
    /// Relative paths inside the file resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = normalize_path(path);
        if !config_path.is_file() {
            return Err(ConfigError::NotFound(config_path).into());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|err| ConfigError::Io(config_path.clone(), err))?;
        let mut config = Self::from_str(&content)?;

        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Builder: set the config's own hooks.
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Builder: append a plugin object.
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.extra_plugins.push(Arc::new(plugin));
        self
    }

    /// Absolute content directory
    pub fn input_dir(&self) -> PathBuf {
        normalize_path(&self.root.join(&self.build.input))
    }

    /// Absolute output directory
    pub fn output_dir(&self) -> PathBuf {
        normalize_path(&self.root.join(&self.build.output))
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let Some(args) = cli.build_args() else {
            return;
        };

        // CLI paths are relative to the working directory, not the config file
        if let Some(input) = &args.input {
            self.build.input = normalize_path(input);
        }
        if let Some(output) = &args.output {
            self.build.output = normalize_path(output);
        }
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        if args.clean {
            self.build.clean = true;
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Whether `build.input` is a content source `require_input` guards.
    ///
    /// A `markdown` plugin reading its own `input` folder makes the site input
    /// optional.
    pub fn reads_input(&self) -> bool {
        let markdown = |own_input: bool| {
            self.plugins
                .iter()
                .any(|spec| spec.name == "markdown" && spec.has_option("input") == own_input)
        };
        (self.build.discover || markdown(false)) && !markdown(true)
    }

    /// Validate the configuration before any build work starts
    pub fn validate(&self) -> Result<()> {
        if self.build.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation("`[build] extension` is empty".into()).into());
        }

        let (input, output) = (self.input_dir(), self.output_dir());
        if input.starts_with(&output) {
            return Err(ConfigError::Validation(format!(
                "input `{}` must not be inside output `{}`",
                input.display(),
                output.display()
            ))
            .into());
        }

        for spec in &self.plugins {
            if !builtin::is_known(&spec.name) {
                return Err(ConfigError::UnknownPlugin(spec.name.clone()).into());
            }
        }

        Ok(())
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_load_resolves_paths_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("folio.toml");
        fs::write(&config_path, "[build]\ninput = \"docs\"\n").unwrap();

        let config = SiteConfig::load(&config_path).unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.root, root);
        assert_eq!(config.input_dir(), root.join("docs"));
        assert_eq!(config.output_dir(), root.join("www"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SiteConfig::load(&dir.path().join("folio.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("folio.toml");
        fs::write(&config_path, "[build\n").unwrap();

        let err = SiteConfig::load(&config_path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_components_section() {
        let config = SiteConfig::from_str(
            r#"
            [components.h1]
            class = "title"
            id = "top"
            "#,
        )
        .unwrap();
        assert_eq!(config.components["h1"]["class"], "title");
        assert_eq!(config.components["h1"].len(), 2);
    }

    #[test]
    fn test_update_with_cli() {
        let mut config = SiteConfig::default();
        let cli = Cli::parse_from(["folio", "build", "--minify", "--clean", "-o", "/tmp/out"]);
        config.update_with_cli(&cli);

        assert!(config.build.minify);
        assert!(config.build.clean);
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_validate_unknown_plugin() {
        let config = SiteConfig::from_str("[[plugins]]\nname = \"sitemap\"").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownPlugin(name)) if name == "sitemap"
        ));
    }

    #[test]
    fn test_validate_same_input_output() {
        let config = SiteConfig::from_str("[build]\ninput = \"site\"\noutput = \"site\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reads_input() {
        assert!(SiteConfig::default().reads_input());

        let own = SiteConfig::from_str("[[plugins]]\nname = \"markdown\"\ninput = \"guides\"").unwrap();
        assert!(!own.reads_input());

        let mut takeover = SiteConfig::from_str("[[plugins]]\nname = \"markdown\"").unwrap();
        takeover.build.discover = false;
        assert!(takeover.reads_input());
    }

    #[test]
    fn test_default_validates() {
        assert!(SiteConfig::default().validate().is_ok());
    }
}
