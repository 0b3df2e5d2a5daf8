//! `[site]` section configuration.
//!
//! Site metadata handed to every component and wrapper.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `[site]` section in folio.toml - site metadata.
///
/// # Example
/// ```toml
/// [site]
/// title = "Folio"
/// description = "Docs for the folio site builder"
/// language = "en"
///
/// [site.data]
/// version = "0.3.0"
/// repository = "https://example.com/folio"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteMetadata {
    /// Site title, used in `<head>` and by the theme header.
    #[serde(default)]
    pub title: String,

    /// Site description for the description meta tag.
    #[serde(default)]
    pub description: String,

    /// BCP 47 language code written to `<html lang>`.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,

    /// Free-form data for components and plugins.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl SiteMetadata {
    /// String value of a `data` entry.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
