//! Dependency tracking for incremental builds.
//!
//! A page is stale when its output is missing or older than the page itself,
//! the shared dependencies, anything it (transitively) imports, or a resource
//! file sitting next to it.
//!
//! | Module       | Operation                                   |
//! |--------------|---------------------------------------------|
//! | `resolve`    | direct `#import`/`#include` targets         |
//! | `closure`    | transitive closure over the import graph    |
//! | `freshness`  | common dependencies and the rebuild verdict |
//!
//! Only library files are tracked as edges: importing another content page
//! does not make it a dependency.

mod closure;
mod freshness;
mod resolve;

use crate::config::SiteConfig;
use std::path::PathBuf;

/// Import graph queries over one project layout.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    /// Base for absolute (`/`-prefixed) import paths.
    root: PathBuf,
    content: PathBuf,
    site_config: PathBuf,
    library_prefix: String,
}

impl DependencyResolver {
    pub fn new(config: &SiteConfig) -> Self {
        let canonical = |p: &PathBuf| p.canonicalize().unwrap_or_else(|_| p.clone());
        Self {
            root: canonical(&config.root),
            content: canonical(&config.build.content),
            site_config: canonical(&config.build.site_config),
            library_prefix: config.build.library_prefix.clone(),
        }
    }
}
