//! The compiler seam and its `typst` CLI implementation.

use super::{CompileError, OutputKind};
use crate::{
    config::SiteConfig,
    utils::exec::{self, ExecError, FilterRule},
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Typst filter: skip known html export warnings.
const TYPST_FILTER: FilterRule = FilterRule::new(&[
    "warning: html export is under active development",
    "and incomplete",
    "= hint: its behaviour may change at any time",
    "= hint: do not rely on this feature for production use cases",
    "= hint: see https://github.com/typst/typst/issues/5512",
    "for more information",
    "warning: elem",
]);

/// One document to compile.
#[derive(Debug, Clone)]
pub struct CompileJob<'a> {
    pub kind: OutputKind,
    pub source: &'a Path,
    pub target: &'a Path,
    /// Site-relative page path handed to templates (html only).
    pub page_path: String,
}

/// Something that turns a typst document into an output file.
pub trait Compiler {
    fn compile(&self, job: &CompileJob<'_>) -> Result<(), CompileError>;
}

/// `typst compile` as a subprocess.
#[derive(Debug, Clone)]
pub struct TypstCli {
    command: Vec<OsString>,
    root: PathBuf,
    font_path: PathBuf,
}

impl TypstCli {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            command: config.build.typst.command.iter().map(OsString::from).collect(),
            root: config.root.clone(),
            font_path: config.build.assets.clone(),
        }
    }

    /// Arguments after the configured command.
    fn args(&self, job: &CompileJob<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "compile".into(),
            "--root".into(),
            self.root.clone().into(),
            "--font-path".into(),
            self.font_path.clone().into(),
        ];
        if job.kind == OutputKind::Html {
            args.extend([
                "--features".into(),
                "html".into(),
                "--format".into(),
                "html".into(),
                "--input".into(),
                format!("page-path={}", job.page_path).into(),
            ]);
        }
        args.push(job.source.into());
        args.push(job.target.into());
        args
    }
}

impl Compiler for TypstCli {
    fn compile(&self, job: &CompileJob<'_>) -> Result<(), CompileError> {
        let args = self.args(job);
        match exec::exec(Some(&self.root), &self.command, &args, &TYPST_FILTER) {
            Ok(_) => Ok(()),
            Err(ExecError::NotFound(command)) => Err(CompileError::ToolUnavailable { command }),
            Err(ExecError::Empty) => Err(CompileError::ToolUnavailable {
                command: String::new(),
            }),
            Err(err) => Err(CompileError::Failed {
                path: job.source.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }
}

/// Page path passed to templates as `--input page-path=...`.
///
/// `Blog/index.typ` maps to `Blog`, the root `index.typ` to `""`, anything
/// else to its path without extension. Always `/`-separated.
pub fn page_path(rel: &Path) -> String {
    let path = if rel.file_name().is_some_and(|n| n == "index.typ") {
        rel.parent().unwrap_or(Path::new("")).to_path_buf()
    } else {
        rel.with_extension("")
    };

    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
