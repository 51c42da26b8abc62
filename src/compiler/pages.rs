//! Incremental compilation of every document of one output kind.

use super::{
    BuildStats, CompileError, CompileJob, Compiler, OutputKind, collect_documents,
    typst::page_path,
};
use crate::{config::SiteConfig, deps::DependencyResolver, log};
use std::{fs, path::Path};

/// Drives one compile run: enumerate, decide, compile, count.
pub struct PageCompiler<'a> {
    config: &'a SiteConfig,
    resolver: DependencyResolver,
    compiler: &'a dyn Compiler,
}

impl<'a> PageCompiler<'a> {
    pub fn new(config: &'a SiteConfig, compiler: &'a dyn Compiler) -> Self {
        Self {
            config,
            resolver: DependencyResolver::new(config),
            compiler,
        }
    }

    /// Compile every stale document of `kind` (all of them when `force`).
    ///
    /// A failing document never stops the batch.
    pub fn run(&self, kind: OutputKind, force: bool) -> BuildStats {
        let build = &self.config.build;
        let mut stats = BuildStats::default();

        let documents: Vec<_> = collect_documents(build)
            .into_iter()
            .filter(|path| OutputKind::of(path, &build.pdf_marker) == kind)
            .collect();

        if documents.is_empty() {
            if kind == OutputKind::Html {
                log!("warn"; "no html documents found in {}", build.content.display());
            }
            return stats;
        }

        log!(kind.extension(); "compiling {} documents", documents.len());

        let common_deps = self.resolver.common_deps();
        let mut tool_reported = false;

        for source in &documents {
            let rel = source.strip_prefix(&build.content).unwrap_or(source);
            let target = kind.target_path(&build.output, rel);

            if !force && !self.resolver.needs_rebuild(source, &target, &common_deps) {
                stats.skipped += 1;
                continue;
            }

            match self.compile_one(kind, source, &target, rel) {
                Ok(()) => {
                    log!(kind.extension(); "{}", rel.display());
                    stats.success += 1;
                }
                Err(err @ CompileError::ToolUnavailable { .. }) => {
                    if !tool_reported {
                        log!("error"; "{err}");
                        tool_reported = true;
                    }
                    stats.failed += 1;
                }
                Err(err) => {
                    log!("error"; "{err}");
                    stats.failed += 1;
                }
            }
        }

        log!(kind.extension(); "done. {}", stats.format_summary());
        stats
    }

    fn compile_one(
        &self,
        kind: OutputKind,
        source: &Path,
        target: &Path,
        rel: &Path,
    ) -> Result<(), CompileError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source_err| CompileError::Io {
                path: source.to_path_buf(),
                source: source_err,
            })?;
        }

        let job = CompileJob {
            kind,
            source,
            target,
            page_path: page_path(rel),
        };
        self.compiler.compile(&job)
    }
}
