//! Sitemap generation.
//!
//! Generates a sitemap.xml file listing every html page of the output for
//! search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    log,
    utils::{date::local_ymd, xml::escape_xml},
};
use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::WalkDir;

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// Public API
// ============================================================================

/// Write `<output>/sitemap.xml` for every html file under the output.
pub fn build_sitemap(config: &SiteConfig, site_url: &str) -> Result<()> {
    let sitemap = Sitemap::scan(&config.build.output, site_url);
    sitemap.write(&config.build.output.join("sitemap.xml"))
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (YYYY-MM-DD, local time)
    lastmod: Option<String>,
}

impl Sitemap {
    /// Collect html files under `output`, sorted by path.
    fn scan(output: &Path, site_url: &str) -> Self {
        let urls = WalkDir::new(output)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
            .filter_map(|e| {
                let rel = e.path().strip_prefix(output).ok()?;
                let lastmod = e.metadata().ok()?.modified().ok().map(local_ymd);
                Some(UrlEntry {
                    loc: format!("{site_url}/{}", url_path(rel)),
                    lastmod,
                })
            })
            .collect();

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to output file.
    fn write(self, path: &Path) -> Result<()> {
        let count = self.urls.len();
        fs::write(path, self.into_xml())
            .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;

        log!("sitemap"; "sitemap.xml with {count} pages");
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Output-relative html path to its url path.
///
/// `index.html` -> ``, `blog/index.html` -> `blog/`, `about.html` -> `about/`.
fn url_path(rel: &Path) -> String {
    let rel = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if rel == "index.html" {
        String::new()
    } else if let Some(dir) = rel.strip_suffix("/index.html") {
        format!("{dir}/")
    } else if let Some(page) = rel.strip_suffix(".html") {
        format!("{page}/")
    } else {
        rel
    }
}

// ============================================================================
// Tests
// ============================================================================
