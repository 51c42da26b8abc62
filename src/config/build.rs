//! `[build]` section configuration.
//!
//! Contains the directory layout, the library/pdf naming conventions and the
//! typst command.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[build]` section in tufted.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"        # Source directory
/// output = "_site"           # Output directory
/// site_config = "config.typ" # Global typst config, a dependency of every page
/// library_prefix = "_"       # `content/_templates/` holds importable files
/// pdf_marker = "pdf"         # `cv-PDF.typ` compiles to pdf
///
/// [build.typst]
/// command = ["typst"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Content source directory (Typst files and their resources).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Static assets directory, copied to `<output>/assets` and used as font path.
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Global typst configuration file (also holds `feed-dir`).
    #[serde(default = "defaults::build::site_config")]
    #[educe(Default = defaults::build::site_config())]
    pub site_config: PathBuf,

    /// Path segments starting with this prefix mark library files.
    #[serde(default = "defaults::build::library_prefix")]
    #[educe(Default = defaults::build::library_prefix())]
    pub library_prefix: String,

    /// Case-insensitive file stem marker selecting pdf output.
    #[serde(default = "defaults::build::pdf_marker")]
    #[educe(Default = defaults::build::pdf_marker())]
    pub pdf_marker: String,

    /// Typst compiler configuration.
    #[serde(default)]
    pub typst: TypstConfig,
}

impl BuildConfig {
    /// Whether any component of `rel` (relative to content) is library-marked.
    pub fn is_library_path(&self, rel: &Path) -> bool {
        rel.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|s| s.starts_with(&self.library_prefix))
        })
    }
}

/// `[build.typst]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct TypstConfig {
    /// Typst command and arguments
    #[serde(default = "defaults::build::typst::command")]
    #[educe(Default = defaults::build::typst::command())]
    pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("_site"));
        assert_eq!(config.build.assets, PathBuf::from("assets"));
        assert_eq!(config.build.site_config, PathBuf::from("config.typ"));
        assert_eq!(config.build.library_prefix, "_");
        assert_eq!(config.build.pdf_marker, "pdf");
        assert_eq!(config.build.typst.command, vec!["typst".to_string()]);
    }

    #[test]
    fn test_build_config_custom() {
        let config = r#"
            [build]
            content = "posts"
            output = "public"
            library_prefix = "."

            [build.typst]
            command = ["typst-nightly", "--color", "never"]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("posts"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.library_prefix, ".");
        assert_eq!(config.build.typst.command.len(), 3);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [build]
            minify = true
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_library_path() {
        let config = SiteConfig::default();
        assert!(config.build.is_library_path(Path::new("_templates/base.typ")));
        assert!(config.build.is_library_path(Path::new("Blog/_parts/head.typ")));
        assert!(config.build.is_library_path(Path::new("_draft.typ")));
        assert!(!config.build.is_library_path(Path::new("Blog/post/index.typ")));
        assert!(!config.build.is_library_path(Path::new("about.typ")));
    }
}
