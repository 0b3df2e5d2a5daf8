//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "folio.toml";

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn input() -> PathBuf {
        "pages".into()
    }

    pub fn output() -> PathBuf {
        "www".into()
    }

    pub fn extension() -> String {
        "md".into()
    }
}
