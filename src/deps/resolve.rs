//! Direct dependencies of one document.

use super::DependencyResolver;
use regex::Regex;
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// `#import "x.typ"`, `#include 'y.typ'`, with the path in group 1 or 2.
static RE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#(?:import|include)\s+(?:"([^"]+)"|'([^']+)')"#).unwrap()
});

impl DependencyResolver {
    /// Library files directly imported or included by `document`.
    ///
    /// Package imports (`@preview/...`), missing files, non-`.typ` targets
    /// and content pages are not reported. An unreadable document has no
    /// dependencies.
    pub fn resolve_imports(&self, document: &Path) -> BTreeSet<PathBuf> {
        let Ok(source) = fs::read_to_string(document) else {
            return BTreeSet::new();
        };

        RE_IMPORT
            .captures_iter(&source)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .filter_map(|arg| self.resolve_argument(document, arg.as_str()))
            .filter(|path| self.is_library_file(path))
            .collect()
    }

    /// Whether `path` (canonical) counts as a trackable library file.
    ///
    /// The site config always does. Inside the content root some path
    /// component must carry the library prefix; anything outside the
    /// content root (shared templates next to the config) qualifies.
    pub fn is_library_file(&self, path: &Path) -> bool {
        if path == self.site_config {
            return true;
        }
        match path.strip_prefix(&self.content) {
            Ok(rel) => rel.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .is_some_and(|s| s.starts_with(&self.library_prefix))
            }),
            Err(_) => true,
        }
    }

    /// Resolve one import argument to an existing canonical `.typ` path.
    fn resolve_argument(&self, document: &Path, arg: &str) -> Option<PathBuf> {
        if arg.starts_with('@') {
            return None;
        }

        let candidate = match arg.strip_prefix('/') {
            Some(rooted) => self.root.join(rooted),
            None => document.parent()?.join(arg),
        };

        let resolved = candidate.canonicalize().ok()?;
        let is_typ = resolved.extension().is_some_and(|ext| ext == "typ");
        (is_typ && resolved.is_file()).then_some(resolved)
    }
}
