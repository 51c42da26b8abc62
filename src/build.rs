//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── clean()              (force only)
//!     ├── html  ──► PageCompiler::run(Html)
//!     ├── pdf   ──► PageCompiler::run(Pdf)
//!     ├── assets ─► copy_all_assets()
//!     │
//!     └── site_url()? ──► sitemap, robots, rss
//! ```
//!
//! Every step runs even when an earlier one failed; the build reports
//! success only if all of them did.

use crate::{
    compiler::{
        BuildStats, Compiler, OutputKind, PageCompiler,
        assets::{copy_assets, copy_content_assets},
    },
    config::SiteConfig,
    generator::{robots::build_robots, rss::build_rss, site_url, sitemap::build_sitemap},
    log,
};
use anyhow::{Context, Result, bail};
use std::fs;

/// Full build. Returns `true` when every step succeeded.
pub fn build_site(config: &SiteConfig, compiler: &dyn Compiler, force: bool) -> bool {
    let output = &config.build.output;

    if force {
        log!("build"; "full build of {}", config.get_root().display());
        if let Err(e) = clean(config) {
            log!("error"; "{e:#}");
        }
    } else {
        log!("build"; "incremental build of {}", config.get_root().display());
    }

    if let Err(e) = fs::create_dir_all(output) {
        log!("error"; "failed to create {}: {e}", output.display());
        return false;
    }

    let mut ok = true;
    let mut step = |result: Result<()>| {
        if let Err(e) = result {
            log!("error"; "{e:#}");
            ok = false;
        }
    };

    step(compile(config, compiler, OutputKind::Html, force));
    step(compile(config, compiler, OutputKind::Pdf, force));
    step(copy_all_assets(config, force));

    if let Some(url) = site_url(config) {
        step(build_sitemap(config, &url));
        step(build_robots(config, &url));
        step(build_rss(config, &url));
    }

    if ok {
        log!("build"; "done, output in {}", output.display());
    } else {
        log!("warn"; "build finished with failures");
    }
    ok
}

/// Compile one output kind, failing when any document failed.
pub fn compile(
    config: &SiteConfig,
    compiler: &dyn Compiler,
    kind: OutputKind,
    force: bool,
) -> Result<()> {
    fs::create_dir_all(&config.build.output)
        .with_context(|| format!("Failed to create {}", config.build.output.display()))?;

    let stats: BuildStats = PageCompiler::new(config, compiler).run(kind, force);
    if stats.has_failures() {
        bail!("{} of {} {kind} documents failed", stats.failed, stats.total());
    }
    Ok(())
}

/// Copy `assets/` and the content resources. Both copies are attempted;
/// the first error is returned and a second one is logged.
pub fn copy_all_assets(config: &SiteConfig, force: bool) -> Result<()> {
    let assets = copy_assets(config);
    let content = copy_content_assets(config, force);

    match (assets, content) {
        (Err(e), Err(other)) => {
            log!("error"; "{other:#}");
            Err(e)
        }
        (assets, content) => assets.and(content),
    }
}

/// Remove everything inside the output directory, keeping the directory.
pub fn clean(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    if !output.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(output)? {
        let path = entry?.path();
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.with_context(|| format!("Failed to remove {}", path.display()))?;
    }

    log!("clean"; "{}", output.display());
    Ok(())
}
