//! robots.txt generation.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result};
use std::fs;

/// Allow everything and point crawlers at the sitemap.
pub fn build_robots(config: &SiteConfig, site_url: &str) -> Result<()> {
    let path = config.build.output.join("robots.txt");
    fs::write(&path, robots_txt(site_url))
        .with_context(|| format!("Failed to write robots.txt to {}", path.display()))?;

    log!("robots"; "robots.txt");
    Ok(())
}

fn robots_txt(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {site_url}/sitemap.xml\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::testing::project;

    #[test]
    fn test_build_robots() {
        let (_dir, config) = project();
        fs::create_dir_all(&config.build.output).unwrap();

        build_robots(&config, "https://example.com").unwrap();

        let robots = fs::read_to_string(config.build.output.join("robots.txt")).unwrap();
        assert_eq!(
            robots,
            "User-agent: *\nAllow: /\n\nSitemap: https://example.com/sitemap.xml\n"
        );
    }
}
