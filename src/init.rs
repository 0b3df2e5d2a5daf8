//! Site initialization module.
//!
//! Creates a starter site: `folio.toml` plus one page.

use crate::config::{SiteConfig, defaults::CONFIG_FILE};
use crate::log;
use crate::plugin::PluginSpec;
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Starter page written to `<input>/index.md`
const INDEX_PAGE: &str = "\
---
title: Welcome
description: Your first folio page
---

Edit `pages/index.md` and run `folio build`.
";

/// Create a new site in `root`, refusing to overwrite existing files.
pub fn new_site(root: &Path) -> Result<()> {
    let config = starter_config(root);
    let config_path = root.join(CONFIG_FILE);
    let index_path = root.join(&config.build.input).join("index.md");

    for path in [&config_path, &index_path] {
        if path.exists() {
            bail!(
                "`{}` already exists. Try `folio init <SITE_NAME>` instead.",
                path.display()
            );
        }
    }

    let pages = root.join(&config.build.input);
    fs::create_dir_all(&pages)
        .with_context(|| format!("Failed to create {}", pages.display()))?;

    let content = toml::to_string_pretty(&config)?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    fs::write(&index_path, INDEX_PAGE)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;

    log!("init"; "created site in {}", root.display());
    Ok(())
}

/// Default config titled after the site directory, with the theme enabled.
fn starter_config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.site.title = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "folio".to_owned());
    config.plugins.push(PluginSpec {
        name: "theme".to_owned(),
        options: toml::Table::new(),
    });
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_site;
    use tempfile::TempDir;

    #[test]
    fn test_new_site_builds() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("blog");
        new_site(&root).unwrap();

        let config = SiteConfig::load(&root.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.site.title, "blog");
        assert_eq!(config.plugins[0].name, "theme");

        let report = build_site(config).unwrap();
        assert_eq!(report.page_count(), 1);
        let html = fs::read_to_string(root.join("www/index.html")).unwrap();
        assert!(html.contains("Welcome"));
    }

    #[test]
    fn test_new_site_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();

        assert!(new_site(dir.path()).is_err());
        assert!(!dir.path().join("pages").exists());
    }
}
