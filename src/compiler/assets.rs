//! Static asset and content resource copies.

use super::{collect_content_files, is_up_to_date};
use crate::{config::SiteConfig, log};
use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Replace `<output>/assets` with a fresh copy of the assets directory.
///
/// A missing assets directory is not an error.
pub fn copy_assets(config: &SiteConfig) -> Result<()> {
    let source = &config.build.assets;
    if !source.is_dir() {
        log!("warn"; "assets directory {} not found, skipped", source.display());
        return Ok(());
    }

    let target = config.build.output.join("assets");
    if target.exists() {
        fs::remove_dir_all(&target)
            .with_context(|| format!("Failed to remove {}", target.display()))?;
    }

    let count = copy_dir(source, &target)?;
    log!("assets"; "copied {count} files");
    Ok(())
}

/// Copy non-`.typ` files under the content root next to the compiled pages.
///
/// Library paths are skipped; unless `force`, so are files whose copy is
/// not older than the source.
pub fn copy_content_assets(config: &SiteConfig, force: bool) -> Result<()> {
    let content = &config.build.content;
    if !content.is_dir() {
        log!("warn"; "content directory {} not found, skipped", content.display());
        return Ok(());
    }

    let (mut copied, mut skipped) = (0usize, 0usize);
    for path in collect_content_files(&config.build) {
        if path.extension().is_some_and(|ext| ext == "typ") {
            continue;
        }
        let rel = path.strip_prefix(content)?;
        let target = config.build.output.join(rel);

        if !force && is_up_to_date(&path, &target) {
            skipped += 1;
            continue;
        }

        copy_file(&path, &target)?;
        log!("content"; "{}", rel.display());
        copied += 1;
    }

    if copied > 0 || skipped > 0 {
        log!("content"; "copied: {copied}, skipped: {skipped}");
    }
    Ok(())
}

fn copy_dir(source: &Path, target: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(source)?;
        let dest = target.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)
                .with_context(|| format!("Failed to create {}", dest.display()))?;
        } else if entry.file_type().is_file() {
            copy_file(entry.path(), &dest)?;
            count += 1;
        }
    }
    Ok(count)
}

fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target).with_context(|| {
        format!("Failed to copy {} to {}", source.display(), target.display())
    })?;
    Ok(())
}
