//! External command execution utilities.
//!
//! Runs a command to completion, captures its output, logs filtered stderr
//! warnings on success and formats failures with the captured streams.

use crate::log;
use regex::Regex;
use std::{
    env,
    ffi::OsString,
    io,
    path::Path,
    process::{Command, Output},
    sync::LazyLock,
};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("empty command")]
    Empty,

    /// The program could not be located or launched.
    #[error("`{0}` not found. Please install it first.")]
    NotFound(String),

    #[error("failed to execute `{name}`")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The program ran and exited with a non-zero status.
    #[error("{0}")]
    Failed(String),
}

// ============================================================================
// Command Execution
// ============================================================================

/// Execute a command and capture its output.
///
/// `cmd` is the program followed by its fixed arguments (as configured),
/// `args` are appended after it. Empty arguments are dropped.
pub fn exec(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    filter: &FilterRule,
) -> Result<Output, ExecError> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command.output().map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ExecError::NotFound(name.clone()),
        _ => ExecError::Spawn {
            name: name.clone(),
            source,
        },
    })?;

    log_output(&name, &output, filter)?;
    Ok(output)
}

/// Prepare a Command from components.
fn prepare(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
) -> Result<(String, Command), ExecError> {
    let program = cmd.first().ok_or(ExecError::Empty)?;
    let name = program.to_string_lossy().into_owned();

    // Relative program paths like `./bin/typst` resolve against `root`
    let resolved = match root {
        Some(dir) => which::which_in(program, env::var_os("PATH"), dir),
        None => which::which(program),
    }
    .map_err(|_| ExecError::NotFound(name.clone()))?;

    let mut command = Command::new(resolved);
    command
        .args(&cmd[1..])
        .args(args.iter().filter(|a| !a.is_empty()));

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

// ============================================================================
// Output Filtering
// ============================================================================

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    RE.replace_all(s, "")
}

/// Filter rule for skipping output lines by prefix.
///
/// Used to keep known compiler warnings out of the build log.
pub struct FilterRule {
    /// Prefixes to match at the start of output lines.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    /// Empty lines and lines starting with a skip prefix are dropped.
    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Lines of `output` that survive the filter.
    fn apply<'a>(&self, output: &'a str) -> Vec<&'a str> {
        output
            .lines()
            .filter(|line| !self.should_skip(strip_ansi(line).trim()))
            .collect()
    }

    fn log(&self, name: &str, output: &str) {
        let lines = self.apply(output);
        if !lines.is_empty() {
            log!(name; "{}", lines.join("\n"));
        }
    }
}

/// Stdout filter: skip HTML and JSON output.
const STDOUT_FILTER: FilterRule = FilterRule::new(&["<!DOCTYPE", "{"]);

/// Log command output, filtering known noise.
fn log_output(name: &str, output: &Output, filter: &FilterRule) -> Result<(), ExecError> {
    if !output.status.success() {
        return Err(ExecError::Failed(format_error(name, output, filter)));
    }

    // On success, only stderr (warnings) is worth showing
    let stderr = String::from_utf8_lossy(&output.stderr);
    filter.log(name, stderr.trim());

    Ok(())
}

/// Format command error message with filtering.
fn format_error(name: &str, output: &Output, filter: &FilterRule) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}", output.status);

    let error_lines = filter.apply(stderr.trim());
    if !error_lines.is_empty() {
        msg.push('\n');
        msg.push_str(&error_lines.join("\n"));
    }

    let stdout_trimmed = stdout.trim();
    if !stdout_trimmed.is_empty() && !STDOUT_FILTER.should_skip(stdout_trimmed) {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout_trimmed);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
