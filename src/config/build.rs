//! `[build]` and `[head]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Main BuildConfig
// ============================================================================

/// `[build]` section in folio.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// input = "pages"      # Content directory
/// output = "www"       # Output directory
/// extension = "md"     # Content file extension
/// minify = true        # Minify HTML
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Content source directory.
    #[serde(default = "defaults::build::input", alias = "source")]
    #[educe(Default = defaults::build::input())]
    pub input: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Extension of content files picked up from `input` (without the dot).
    #[serde(default = "defaults::build::extension")]
    #[educe(Default = defaults::build::extension())]
    pub extension: String,

    /// Create pages from the files in `input` before `create_pages` hooks run.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub discover: bool,

    /// Abort before touching the output directory when `input` is missing.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub require_input: bool,

    /// Minify HTML output.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// Remove the output directory before building.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,
}

// ============================================================================
// HeadConfig
// ============================================================================

/// `[head]` section - elements added to every page's `<head>`.
///
/// # Example
/// ```toml
/// [head]
/// icon = "./favicon.svg"
/// styles = ["./low.css"]
/// scripts = ["./app.js", { src = "./stats.js", async = true }]
/// elements = ['<meta name="darkreader-lock">']
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadConfig {
    /// Favicon href
    #[serde(default)]
    pub icon: Option<String>,

    /// Stylesheet hrefs
    #[serde(default)]
    pub styles: Vec<String>,

    /// Script entries
    #[serde(default)]
    pub scripts: Vec<ScriptEntry>,

    /// Raw HTML elements (trusted input)
    #[serde(default)]
    pub elements: Vec<String>,
}

/// Script entry for `[head] scripts`.
///
/// # Formats
/// ```toml
/// # Simple src
/// scripts = ["./app.js"]
///
/// # With loading options
/// scripts = [
///     { src = "./app.js", defer = true },
///     { src = "./analytics.js", async = true },
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptEntry {
    /// Simple src string.
    Simple(String),
    /// Src with `defer`/`async` attributes.
    WithOptions {
        src: String,
        #[serde(default)]
        defer: bool,
        #[serde(default)]
        r#async: bool,
    },
}

impl ScriptEntry {
    pub fn src(&self) -> &str {
        match self {
            ScriptEntry::Simple(src) => src,
            ScriptEntry::WithOptions { src, .. } => src,
        }
    }

    pub fn is_defer(&self) -> bool {
        match self {
            ScriptEntry::Simple(_) => false,
            ScriptEntry::WithOptions { defer, .. } => *defer,
        }
    }

    pub fn is_async(&self) -> bool {
        match self {
            ScriptEntry::Simple(_) => false,
            ScriptEntry::WithOptions { r#async, .. } => *r#async,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.input, PathBuf::from("pages"));
        assert_eq!(config.build.output, PathBuf::from("www"));
        assert_eq!(config.build.extension, "md");
        assert!(config.build.discover);
        assert!(config.build.require_input);
        assert!(!config.build.minify);
        assert!(!config.build.clean);
    }

    #[test]
    fn test_build_config_source_alias() {
        let config: SiteConfig = toml::from_str("[build]\nsource = \"docs\"").unwrap();
        assert_eq!(config.build.input, PathBuf::from("docs"));
    }

    #[test]
    fn test_build_config_custom() {
        let config = r#"
            [build]
            input = "content"
            output = "public"
            extension = "markdown"
            minify = true
            clean = true
            require_input = false
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.input, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.extension, "markdown");
        assert!(config.build.minify);
        assert!(config.build.clean);
        assert!(!config.build.require_input);
    }

    #[test]
    fn test_build_config_unknown_field() {
        let result: Result<SiteConfig, _> = toml::from_str("[build]\nwatch = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_head_scripts_both_formats() {
        let config = r#"
            [head]
            styles = ["./low.css"]
            scripts = ["./app.js", { src = "./stats.js", async = true }]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.head.styles, ["./low.css"]);
        assert_eq!(config.head.scripts.len(), 2);
        assert_eq!(config.head.scripts[0].src(), "./app.js");
        assert!(!config.head.scripts[0].is_async());
        assert_eq!(config.head.scripts[1].src(), "./stats.js");
        assert!(config.head.scripts[1].is_async());
        assert!(!config.head.scripts[1].is_defer());
    }
}
