//! Compilation of typst documents and content resources.
//!
//! - **pages**: incremental compile of every document of one output kind
//! - **typst**: the `Compiler` seam and the `typst` CLI behind it
//! - **assets**: static asset and content resource copies
//!
//! # Build Flow
//!
//! ```text
//! collect_documents() ──► needs_rebuild()? ──► Compiler::compile()
//!          │                    │                     │
//!          ▼                    ▼                     ▼
//!   sorted .typ paths      skip / rebuild      .html / .pdf files
//! ```

pub mod assets;
mod error;
pub mod pages;
pub mod typst;

pub use error::CompileError;
pub use pages::PageCompiler;
pub use typst::{CompileJob, Compiler, TypstCli};

use crate::config::BuildConfig;
use std::{
    fmt,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

// ============================================================================
// Output Kind
// ============================================================================

/// What a document compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Html,
    Pdf,
}

impl OutputKind {
    /// Pdf when the file stem contains `marker` (case-insensitive).
    pub fn of(path: &Path, marker: &str) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if stem.contains(&marker.to_lowercase()) {
            Self::Pdf
        } else {
            Self::Html
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }

    /// `<output>/<rel>` with the extension swapped.
    pub fn target_path(self, output: &Path, rel: &Path) -> PathBuf {
        output.join(rel).with_extension(self.extension())
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ============================================================================
// Build Stats
// ============================================================================

/// Outcome counters of one compile run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BuildStats {
    /// `compiled: 2, skipped: 5`, omitting zero counters.
    pub fn format_summary(&self) -> String {
        let parts: Vec<_> = [
            ("compiled", self.success),
            ("skipped", self.skipped),
            ("failed", self.failed),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(label, n)| format!("{label}: {n}"))
        .collect();

        if parts.is_empty() {
            "nothing to do".to_owned()
        } else {
            parts.join(", ")
        }
    }

    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub const fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

// ============================================================================
// Shared utilities
// ============================================================================

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// All compilable documents under the content root, sorted by path.
///
/// Library-marked paths are importable building blocks, not pages.
pub fn collect_documents(build: &BuildConfig) -> Vec<PathBuf> {
    collect_content_files(build)
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == "typ"))
        .collect()
}

/// Every non-library file under the content root, sorted by path.
pub fn collect_content_files(build: &BuildConfig) -> Vec<PathBuf> {
    let content = &build.content;
    WalkDir::new(content)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .filter(|e| {
            e.path()
                .strip_prefix(content)
                .is_ok_and(|rel| !build.is_library_path(rel))
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Check if destination exists and is not older than the source.
pub fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let Ok(src_time) = src.metadata().and_then(|m| m.modified()) else {
        return false;
    };
    let Ok(dst_time) = dst.metadata().and_then(|m| m.modified()) else {
        return false;
    };
    src_time <= dst_time
}
