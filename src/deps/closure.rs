//! Transitive closure over the import graph.

use super::DependencyResolver;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

impl DependencyResolver {
    /// Every library file reachable from `document` through imports.
    ///
    /// Cycles terminate through the visited set; the starting document is
    /// never part of its own closure.
    pub fn transitive_deps(&self, document: &Path) -> BTreeSet<PathBuf> {
        let start = document
            .canonicalize()
            .unwrap_or_else(|_| document.to_path_buf());

        let mut visited = BTreeSet::from([start.clone()]);
        self.walk(&start, &mut visited);

        visited.remove(&start);
        visited
    }

    fn walk(&self, document: &Path, visited: &mut BTreeSet<PathBuf>) {
        for dep in self.resolve_imports(document) {
            if visited.insert(dep.clone()) {
                self.walk(&dep, visited);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::deps::{
        DependencyResolver,
        testing::{project, write_at},
    };
    use std::{collections::BTreeSet, path::PathBuf};

    fn set(paths: &[PathBuf]) -> BTreeSet<PathBuf> {
        paths.iter().cloned().collect()
    }

    #[test]
    fn test_chain() {
        let (_dir, config) = project();
        let content = config.build.content.clone();

        write_at(&content.join("_lib/c.typ"), "", 1);
        write_at(&content.join("_lib/b.typ"), r#"#import "c.typ": *"#, 1);
        write_at(&content.join("_lib/a.typ"), r#"#import "b.typ": *"#, 1);
        write_at(&content.join("page.typ"), r#"#import "_lib/a.typ": *"#, 1);

        let resolver = DependencyResolver::new(&config);
        assert_eq!(
            resolver.transitive_deps(&content.join("page.typ")),
            set(&[
                content.join("_lib/a.typ"),
                content.join("_lib/b.typ"),
                content.join("_lib/c.typ"),
            ])
        );
    }

    #[test]
    fn test_cycle_terminates_without_start() {
        let (_dir, config) = project();
        let content = config.build.content.clone();

        write_at(&content.join("_lib/a.typ"), r#"#import "b.typ": *"#, 1);
        write_at(&content.join("_lib/b.typ"), r#"#import "a.typ": *"#, 1);

        let resolver = DependencyResolver::new(&config);
        assert_eq!(
            resolver.transitive_deps(&content.join("_lib/a.typ")),
            set(&[content.join("_lib/b.typ")])
        );
    }

    #[test]
    fn test_self_import() {
        let (_dir, config) = project();
        let content = config.build.content.clone();

        write_at(&content.join("_lib/a.typ"), r#"#include "a.typ""#, 1);

        let resolver = DependencyResolver::new(&config);
        assert!(resolver.transitive_deps(&content.join("_lib/a.typ")).is_empty());
    }

    #[test]
    fn test_sibling_page_import_is_not_followed() {
        let (_dir, config) = project();
        let content = config.build.content.clone();

        write_at(&content.join("_lib/deep.typ"), "", 1);
        write_at(&content.join("b.typ"), r#"#import "_lib/deep.typ": *"#, 1);
        write_at(&content.join("a.typ"), r#"#import "b.typ": *"#, 1);

        let resolver = DependencyResolver::new(&config);
        assert!(resolver.transitive_deps(&content.join("a.typ")).is_empty());
    }

    #[test]
    fn test_diamond_visits_once() {
        let (_dir, config) = project();
        let content = config.build.content.clone();

        write_at(&content.join("_lib/base.typ"), "", 1);
        write_at(&content.join("_lib/left.typ"), r#"#import "base.typ": *"#, 1);
        write_at(&content.join("_lib/right.typ"), r#"#import "base.typ": *"#, 1);
        write_at(
            &content.join("page.typ"),
            "#import \"_lib/left.typ\": *\n#import \"_lib/right.typ\": *\n",
            1,
        );

        let resolver = DependencyResolver::new(&config);
        assert_eq!(resolver.transitive_deps(&content.join("page.typ")).len(), 3);
    }
}
