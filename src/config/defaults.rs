//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "_site".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    /// Typst-side site configuration, a common dependency of every page.
    pub fn site_config() -> PathBuf {
        "config.typ".into()
    }

    pub fn library_prefix() -> String {
        "_".into()
    }

    pub fn pdf_marker() -> String {
        "pdf".into()
    }

    pub mod typst {
        pub fn command() -> Vec<String> {
            vec!["typst".into()]
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn port() -> u16 {
        8000
    }
}
