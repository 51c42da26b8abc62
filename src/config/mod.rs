//! Site configuration management for `tufted.toml`.
//!
//! The file is optional: a project laid out with the default directories
//! (`content/`, `assets/`, `_site/`, `config.typ`) builds without one.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[build]`   | Directory layout, naming conventions, typst      |
//! | `[serve]`   | Preview server (port, browser launch)            |
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"
//! output = "_site"
//!
//! [build.typst]
//! command = ["typst"]
//!
//! [serve]
//! port = 8000
//! ```

pub mod build;
pub mod defaults;
mod error;
pub mod feed;
pub mod serve;

pub use build::BuildConfig;
pub use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing tufted.toml
///
/// Built once per invocation and passed explicitly to every component.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute project root (set after loading)
    #[serde(skip)]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load, resolve and validate configuration from CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = normalize_path(&config_path);
        config.update_with_cli(cli);

        let config = config.with_root(root);
        config.validate()?;
        Ok(config)
    }

    /// Resolve every directory against `root`, consuming `self`.
    pub fn with_root(mut self, root: &Path) -> Self {
        self.resolve_paths(root);
        self
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Update config options the CLI can override
    fn update_with_cli(&mut self, cli: &Cli) {
        if let Some(Commands::Preview { port, no_open }) = &cli.command {
            Self::update_option(&mut self.serve.port, port.as_ref());
            if *no_open {
                self.serve.open = false;
            }
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn resolve_paths(&mut self, root: &Path) {
        let root = normalize_path(root);

        self.build.content = normalize_path(&root.join(&self.build.content));
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.build.assets = normalize_path(&root.join(&self.build.assets));
        self.build.site_config = normalize_path(&root.join(&self.build.site_config));
        self.root = root;
    }

    /// Validate configuration before any build step runs
    pub fn validate(&self) -> Result<()> {
        if self.build.typst.command.is_empty() {
            bail!(ConfigError::Validation(
                "[build.typst.command] must have at least one element".into()
            ));
        }
        if self.build.library_prefix.is_empty() {
            bail!(ConfigError::Validation(
                "[build.library_prefix] must not be empty".into()
            ));
        }
        if self.build.pdf_marker.is_empty() {
            bail!(ConfigError::Validation(
                "[build.pdf_marker] must not be empty".into()
            ));
        }
        if self.build.output == self.root || self.build.output == self.build.content {
            bail!(ConfigError::Validation(
                "[build.output] must not be the project root or the content directory".into()
            ));
        }
        Ok(())
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, manually make them absolute
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
