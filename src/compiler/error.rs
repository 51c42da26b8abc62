//! Compilation error types.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors from compiling a single document.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler binary cannot be launched. Affects every document.
    #[error(
        "`{command}` not found. Please install typst first: https://github.com/typst/typst#installation"
    )]
    ToolUnavailable { command: String },

    /// The compiler ran and rejected the document.
    #[error("failed to compile {}\n{message}", path.display())]
    Failed { path: PathBuf, message: String },

    #[error("failed to prepare output for {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
