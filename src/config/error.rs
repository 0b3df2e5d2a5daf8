//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file `{0}` not found")]
    NotFound(PathBuf),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    #[error("unknown plugin `{0}`")]
    UnknownPlugin(String),

    #[error("invalid options for plugin `{name}`")]
    PluginOptions {
        name: String,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("folio.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("folio.toml"));

        let missing = ConfigError::NotFound(PathBuf::from("/site/folio.toml"));
        assert!(format!("{missing}").contains("/site/folio.toml"));

        let unknown = ConfigError::UnknownPlugin("sitemap".into());
        assert_eq!(format!("{unknown}"), "unknown plugin `sitemap`");
    }
}
