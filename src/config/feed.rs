//! Feed directory list from the typst site configuration.
//!
//! The list lives in `config.typ` rather than `tufted.toml`, because the
//! typst templates read it too:
//!
//! ```typst
//! #let config = (
//!   feed-dir: ("Blog", "Notes/"),  // trailing slashes are trimmed
//! )
//! ```

use crate::log;
use regex::Regex;
use std::{collections::BTreeSet, fs, path::Path, sync::LazyLock};

static RE_LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//.*").unwrap());
static RE_BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());
static RE_FEED_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)feed-dir\s*:\s*\((.*?)\)").unwrap());
static RE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap());

/// Read the feed directories declared in the typst config file.
///
/// A missing or unreadable file yields an empty set.
pub fn feed_dirs(site_config: &Path) -> BTreeSet<String> {
    if !site_config.exists() {
        return BTreeSet::new();
    }
    match fs::read_to_string(site_config) {
        Ok(source) => parse_feed_dirs(&source),
        Err(e) => {
            log!("warn"; "failed to read feed-dir from {}: {e}", site_config.display());
            BTreeSet::new()
        }
    }
}

/// Extract `feed-dir: ("A", "B")` entries after stripping comments.
pub fn parse_feed_dirs(source: &str) -> BTreeSet<String> {
    let source = RE_LINE_COMMENT.replace_all(source, "");
    let source = RE_BLOCK_COMMENT.replace_all(&source, "");

    let Some(caps) = RE_FEED_DIR.captures(&source) else {
        return BTreeSet::new();
    };

    RE_QUOTED
        .captures_iter(&caps[1])
        .map(|c| c[1].trim_matches('/').to_owned())
        .filter(|dir| !dir.is_empty())
        .collect()
}
