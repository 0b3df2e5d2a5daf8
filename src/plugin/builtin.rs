//! Built-in plugins selectable from `[[plugins]]`.
//!
//! ```toml
//! [[plugins]]
//! name = "markdown"
//! input = "guides"
//!
//! [[plugins]]
//! name = "theme"
//! nav = [{ text = "Guide", link = "./guide" }]
//! ```

use super::Plugin;
use crate::config::ConfigError;
use crate::content::MarkdownPlugin;
use crate::theme::ThemePlugin;
use anyhow::Result;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;

/// Names accepted in `[[plugins]] name`.
pub const BUILTIN: &[&str] = &["markdown", "theme"];

/// One `[[plugins]]` entry: the plugin name plus its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,
    #[serde(flatten)]
    pub options: toml::Table,
}

impl PluginSpec {
    /// Whether option `key` is present.
    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }
}

pub fn is_known(name: &str) -> bool {
    BUILTIN.contains(&name)
}

/// Instantiate the built-in plugin named by `spec`.
pub fn resolve(spec: &PluginSpec) -> Result<Arc<dyn Plugin>> {
    let plugin: Arc<dyn Plugin> = match spec.name.as_str() {
        "markdown" => Arc::new(MarkdownPlugin::new(options(spec)?)),
        "theme" => Arc::new(ThemePlugin::new(options(spec)?)),
        other => return Err(ConfigError::UnknownPlugin(other.to_owned()).into()),
    };
    Ok(plugin)
}

fn options<T: DeserializeOwned>(spec: &PluginSpec) -> Result<T, ConfigError> {
    toml::Value::Table(spec.options.clone())
        .try_into()
        .map_err(|source| ConfigError::PluginOptions {
            name: spec.name.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_specs_keep_options() {
        let config = SiteConfig::from_str(
            r#"
            [[plugins]]
            name = "markdown"
            input = "guides"

            [[plugins]]
            name = "theme"
            "#,
        )
        .unwrap();

        assert_eq!(config.plugins.len(), 2);
        assert!(config.plugins[0].has_option("input"));
        assert!(config.plugins[1].options.is_empty());
    }

    #[test]
    fn test_resolve_builtin() {
        let config = SiteConfig::from_str("[[plugins]]\nname = \"theme\"\n[[plugins]]\nname = \"markdown\"").unwrap();
        let names: Vec<_> = config
            .plugins
            .iter()
            .map(|spec| resolve(spec).unwrap().name().to_owned())
            .collect();
        assert_eq!(names, ["theme", "markdown"]);
    }

    #[test]
    fn test_invalid_options() {
        let config = SiteConfig::from_str("[[plugins]]\nname = \"theme\"\nnav = 3").unwrap();
        let err = resolve(&config.plugins[0]).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::PluginOptions { name, .. }) if name == "theme"
        ));
    }

    #[test]
    fn test_unknown_plugin() {
        let spec = PluginSpec {
            name: "rss".into(),
            options: toml::Table::new(),
        };
        assert!(!is_known("rss"));
        assert!(resolve(&spec).is_err());
    }
}
