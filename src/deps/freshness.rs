//! Timestamp-based rebuild decisions.

use super::DependencyResolver;
use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};
use walkdir::WalkDir;

/// Modification time, `None` when the file is missing or unreadable.
fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn is_typ(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "typ")
}

impl DependencyResolver {
    /// Files every page depends on: the site config (if present) and every
    /// `.typ` file under top-level library directories of the content root.
    ///
    /// Computed once per build run.
    pub fn common_deps(&self) -> Vec<PathBuf> {
        let mut deps = Vec::new();

        if self.site_config.is_file() {
            deps.push(self.site_config.clone());
        }

        let Ok(entries) = fs::read_dir(&self.content) else {
            return deps;
        };
        let mut library_dirs: Vec<_> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_dir()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&self.library_prefix))
            })
            .collect();
        library_dirs.sort();

        for dir in library_dirs {
            deps.extend(
                WalkDir::new(dir)
                    .sort_by_file_name()
                    .into_iter()
                    .flatten()
                    .filter(|e| e.file_type().is_file() && is_typ(e.path()))
                    .map(walkdir::DirEntry::into_path),
            );
        }

        deps
    }

    /// Whether `target` must be recompiled from `source`.
    ///
    /// Checks run cheapest first and stop at the first hit:
    /// missing target, newer source, newer common dependency, newer
    /// transitive import, newer non-`.typ` file in the source's own
    /// directory. Comparisons are strict and missing inputs are ignored.
    pub fn needs_rebuild(&self, source: &Path, target: &Path, common_deps: &[PathBuf]) -> bool {
        let Some(built) = mtime(target) else {
            return true;
        };
        let newer = |path: &Path| mtime(path).is_some_and(|t| t > built);

        if newer(source) {
            return true;
        }
        if common_deps.iter().any(|dep| newer(dep)) {
            return true;
        }
        if self.transitive_deps(source).iter().any(|dep| newer(dep)) {
            return true;
        }

        // Resources (images, data files) next to the page. Not recursive.
        let Some(dir) = source.parent() else {
            return false;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return false;
        };
        entries
            .flatten()
            .map(|entry| entry.path())
            .any(|path| path.is_file() && !is_typ(&path) && newer(&path))
    }
}

#[cfg(test)]
mod tests {
    use crate::deps::{
        DependencyResolver,
        testing::{project, set_mtime, write_at},
    };
    use std::path::PathBuf;

    /// Page at content/post/index.typ built at t=100.
    fn built_page() -> (tempfile::TempDir, crate::config::SiteConfig, PathBuf, PathBuf) {
        let (dir, config) = project();
        let source = config.build.content.join("post/index.typ");
        let target = config.build.output.join("post/index.html");
        write_at(&source, r#"#import "../_lib/base.typ": *"#, 50);
        write_at(&config.build.content.join("_lib/base.typ"), "", 50);
        write_at(&target, "<html></html>", 100);
        (dir, config, source, target)
    }

    #[test]
    fn test_missing_target() {
        let (_dir, config, source, _) = built_page();
        let resolver = DependencyResolver::new(&config);
        let missing = config.build.output.join("post/other.html");
        assert!(resolver.needs_rebuild(&source, &missing, &[]));
    }

    #[test]
    fn test_up_to_date() {
        let (_dir, config, source, target) = built_page();
        let resolver = DependencyResolver::new(&config);
        let common = resolver.common_deps();
        assert!(!resolver.needs_rebuild(&source, &target, &common));
    }

    #[test]
    fn test_newer_source() {
        let (_dir, config, source, target) = built_page();
        set_mtime(&source, 150);
        let resolver = DependencyResolver::new(&config);
        assert!(resolver.needs_rebuild(&source, &target, &[]));
    }

    #[test]
    fn test_equal_mtime_is_fresh() {
        let (_dir, config, source, target) = built_page();
        set_mtime(&source, 100);
        let resolver = DependencyResolver::new(&config);
        assert!(!resolver.needs_rebuild(&source, &target, &[]));
    }

    #[test]
    fn test_newer_common_dep() {
        let (_dir, config, source, target) = built_page();
        write_at(&config.get_root().join("config.typ"), "", 200);
        let resolver = DependencyResolver::new(&config);
        let common = resolver.common_deps();
        assert!(resolver.needs_rebuild(&source, &target, &common));
    }

    #[test]
    fn test_missing_common_dep_is_ignored() {
        let (_dir, config, source, target) = built_page();
        let resolver = DependencyResolver::new(&config);
        let gone = config.get_root().join("gone.typ");
        assert!(!resolver.needs_rebuild(&source, &target, &[gone]));
    }

    #[test]
    fn test_newer_transitive_dep() {
        let (_dir, config, source, target) = built_page();
        let content = config.build.content.clone();
        write_at(&content.join("_lib/base.typ"), r#"#import "deep.typ": *"#, 50);
        write_at(&content.join("_lib/deep.typ"), "", 300);

        let resolver = DependencyResolver::new(&config);
        // Passing no common deps isolates the import walk.
        assert!(resolver.needs_rebuild(&source, &target, &[]));
    }

    #[test]
    fn test_newer_sibling_resource() {
        let (_dir, config, source, target) = built_page();
        write_at(&config.build.content.join("post/photo.png"), "png", 120);
        let resolver = DependencyResolver::new(&config);
        assert!(resolver.needs_rebuild(&source, &target, &[]));
    }

    #[test]
    fn test_sibling_check_is_not_recursive() {
        let (_dir, config, source, target) = built_page();
        let content = config.build.content.clone();
        write_at(&content.join("post/images/photo.png"), "png", 120);
        write_at(&content.join("post/draft.typ"), "", 120);

        let resolver = DependencyResolver::new(&config);
        assert!(!resolver.needs_rebuild(&source, &target, &[]));
    }

    #[test]
    fn test_common_deps() {
        let (_dir, config) = project();
        let root = config.get_root().to_path_buf();
        let content = config.build.content.clone();
        write_at(&root.join("config.typ"), "", 1);
        write_at(&content.join("_templates/base.typ"), "", 1);
        write_at(&content.join("_templates/nested/part.typ"), "", 1);
        write_at(&content.join("_templates/logo.svg"), "", 1);
        write_at(&content.join("Blog/_parts/head.typ"), "", 1);
        write_at(&content.join("index.typ"), "", 1);

        let resolver = DependencyResolver::new(&config);
        assert_eq!(
            resolver.common_deps(),
            vec![
                root.join("config.typ"),
                content.join("_templates/base.typ"),
                content.join("_templates/nested/part.typ"),
            ]
        );
    }
}
