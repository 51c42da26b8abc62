//! Site artifacts derived from the compiled output.
//!
//! All of them need the public site url, taken from the canonical link of
//! the root `index.html`. Without it nothing here is generated.

pub mod meta;
pub mod robots;
pub mod rss;
pub mod sitemap;

use crate::{config::SiteConfig, log};
use meta::PageMetadata;

/// Site url without trailing slash, from `<output>/index.html`.
pub fn site_url(config: &SiteConfig) -> Option<String> {
    let index = config.build.output.join("index.html");
    if !index.is_file() {
        log!("warn"; "{} not found, skipping sitemap, robots and rss", index.display());
        return None;
    }

    let meta = match PageMetadata::from_file(&index) {
        Ok(meta) => meta,
        Err(e) => {
            log!("warn"; "{e:#}");
            return None;
        }
    };

    let url = meta.link.trim().trim_end_matches('/');
    if url.is_empty() {
        log!("warn"; "no canonical link in index.html, skipping sitemap, robots and rss");
        return None;
    }
    Some(url.to_owned())
}
