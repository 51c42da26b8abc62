//! rss feed generation.
//!
//! Posts are the immediate subdirectories (with an `index.html`) of the feed
//! directories listed in `config.typ`. Channel metadata comes from the root
//! `index.html`.

use super::meta::PageMetadata;
use crate::{
    config::{SiteConfig, feed::feed_dirs},
    log,
    utils::date::{date_in_name, parse_date},
};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rss::{
    Channel, ChannelBuilder, CategoryBuilder, GuidBuilder, ItemBuilder,
    extension::atom::{AtomExtension, Link},
    validation::Validate,
};
use std::{
    collections::BTreeSet,
    fs,
    path::Path,
};

// ============================================================================
// Public API
// ============================================================================

/// Write `<output>/feed.xml`, or skip with a warning when there is nothing
/// to publish.
pub fn build_rss(config: &SiteConfig, site_url: &str) -> Result<()> {
    let output = &config.build.output;

    let dirs = feed_dirs(&config.build.site_config);
    if dirs.is_empty() {
        log!("warn"; "no feed-dir configured, rss skipped");
        return Ok(());
    }

    let (existing, missing): (BTreeSet<_>, BTreeSet<_>) =
        dirs.into_iter().partition(|d| output.join(d).is_dir());
    for dir in &missing {
        log!("warn"; "feed directory `{dir}` does not exist");
    }
    if existing.is_empty() {
        log!("warn"; "none of the feed directories exist, rss skipped");
        return Ok(());
    }

    let posts = collect_posts(output, &existing);
    if posts.is_empty() {
        log!("warn"; "no posts found, rss skipped");
        return Ok(());
    }

    let site = PageMetadata::from_file(&output.join("index.html"))?;
    RssFeed {
        site_url,
        site,
        posts,
    }
    .write(&output.join("feed.xml"))
}

// ============================================================================
// Posts
// ============================================================================

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub description: String,
    /// Feed directory the post lives in.
    pub category: String,
    pub link: String,
    pub date: DateTime<Utc>,
}

/// Dated posts of every feed directory, newest first.
pub fn collect_posts(output: &Path, dirs: &BTreeSet<String>) -> Vec<Post> {
    let mut posts = Vec::new();

    for dir in dirs {
        let Ok(entries) = fs::read_dir(output.join(dir)) else {
            continue;
        };
        let mut items: Vec<_> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.join("index.html").is_file())
            .collect();
        items.sort();

        for item in items {
            let name = item
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let meta = match PageMetadata::from_file(&item.join("index.html")) {
                Ok(meta) => meta,
                Err(e) => {
                    log!("warn"; "{e:#}");
                    continue;
                }
            };

            let Some(date) = parse_date(&meta.date).or_else(|| date_in_name(&name)) else {
                log!("warn"; "cannot determine the date of post `{name}`, skipped");
                continue;
            };

            posts.push(Post {
                title: meta.title,
                description: meta.description.trim().to_owned(),
                category: dir.clone(),
                link: meta.link,
                date,
            });
        }
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}

// ============================================================================
// RssFeed Implementation
// ============================================================================

/// rss feed builder
struct RssFeed<'a> {
    site_url: &'a str,
    /// Metadata of the site's root page.
    site: PageMetadata,
    posts: Vec<Post>,
}

impl RssFeed<'_> {
    fn into_channel(self) -> Channel {
        let items: Vec<_> = self.posts.iter().map(post_to_rss_item).collect();

        let mut self_link = Link::default();
        self_link.set_href(format!("{}/feed.xml", self.site_url));
        self_link.set_rel("self");
        self_link.set_mime_type(Some("application/rss+xml".to_owned()));
        let mut atom = AtomExtension::default();
        atom.set_links(vec![self_link]);

        let mut channel = ChannelBuilder::default()
            .title(self.site.title)
            .link(self.site_url.to_owned())
            .description(self.site.description.trim().to_owned())
            .language((!self.site.lang.is_empty()).then_some(self.site.lang))
            .last_build_date(Utc::now().to_rfc2822())
            .generator("tufted".to_owned())
            .items(items)
            .build();
        channel.set_atom_ext(atom);
        channel
    }

    /// Generate rss xml string
    fn into_xml(self) -> Result<String> {
        let channel = self.into_channel();
        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;
        Ok(channel.to_string())
    }

    /// Write rss feed to file
    fn write(self, path: &Path) -> Result<()> {
        let count = self.posts.len();
        let xml = self.into_xml()?;
        fs::write(path, xml)
            .with_context(|| format!("Failed to write rss feed to {}", path.display()))?;

        log!("rss"; "feed.xml with {count} posts");
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn post_to_rss_item(post: &Post) -> rss::Item {
    let link = (!post.link.is_empty()).then(|| post.link.clone());
    let description = (!post.description.is_empty()).then(|| post.description.clone());

    ItemBuilder::default()
        .title(post.title.clone())
        .link(link)
        .guid(
            GuidBuilder::default()
                .permalink(true)
                .value(post.link.clone())
                .build(),
        )
        .pub_date(post.date.to_rfc2822())
        .categories(vec![CategoryBuilder::default().name(post.category.clone()).build()])
        .description(description)
        .build()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::testing::{project, write_at};
    use chrono::TimeZone;

    fn page(title: &str, link: &str, date: &str, description: &str) -> String {
        let date = if date.is_empty() {
            String::new()
        } else {
            format!(r#"<meta name="date" content="{date}">"#)
        };
        let description = if description.is_empty() {
            String::new()
        } else {
            format!(r#"<meta name="description" content="{description}">"#)
        };
        format!(
            r#"<html lang="en"><head><title>{title}</title>{description}{date}<link rel="canonical" href="{link}"></head></html>"#
        )
    }

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_collect_posts_sorted_newest_first() {
        let (_dir, config) = project();
        let output = &config.build.output;
        write_at(
            &output.join("Blog/a/index.html"),
            &page("A", "https://x.io/Blog/a/", "2024-01-01", ""),
            1,
        );
        write_at(
            &output.join("Blog/b/index.html"),
            &page("B", "https://x.io/Blog/b/", "2023-12-25T08:00:00Z", ""),
            1,
        );
        write_at(
            &output.join("Notes/c/index.html"),
            &page("C", "https://x.io/Notes/c/", "2024-06-15", ""),
            1,
        );
        write_at(&output.join("Blog/not-a-post.html"), "", 1);
        write_at(&output.join("Blog/empty/photo.png"), "", 1);

        let dirs = BTreeSet::from(["Blog".to_owned(), "Notes".to_owned()]);
        let posts = collect_posts(output, &dirs);

        let dates: Vec<_> = posts.iter().map(|p| p.date).collect();
        assert_eq!(dates, [ymd(2024, 6, 15), ymd(2024, 1, 1), ymd(2023, 12, 25)]);
        assert_eq!(posts[0].category, "Notes");
        assert_eq!(posts[1].title, "A");
    }

    #[test]
    fn test_date_from_dir_name_and_undated_dropped() {
        let (_dir, config) = project();
        let output = &config.build.output;
        write_at(
            &output.join("Blog/2024-03-01-hello/index.html"),
            &page("Hello", "https://x.io/Blog/2024-03-01-hello/", "", ""),
            1,
        );
        write_at(
            &output.join("Blog/undated/index.html"),
            &page("Undated", "https://x.io/Blog/undated/", "", ""),
            1,
        );

        let posts = collect_posts(output, &BTreeSet::from(["Blog".to_owned()]));
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].date, ymd(2024, 3, 1));
    }

    #[test]
    fn test_build_rss_single_post() {
        let (_dir, config) = project();
        let output = &config.build.output;
        write_at(&config.build.site_config, r#"#let config = (feed-dir: ("Blog",))"#, 1);
        write_at(
            &output.join("index.html"),
            &page("My Site", "https://example.com/", "", "A site"),
            1,
        );
        write_at(
            &output.join("Blog/2024-03-01-hello/index.html"),
            &page("Hello", "https://example.com/Blog/2024-03-01-hello/", "", ""),
            1,
        );

        build_rss(&config, "https://example.com").unwrap();

        let xml = fs::read_to_string(output.join("feed.xml")).unwrap();
        let channel = Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.title(), "My Site");
        assert_eq!(channel.link(), "https://example.com");
        assert_eq!(channel.description(), "A site");
        assert_eq!(channel.language(), Some("en"));
        assert_eq!(channel.generator(), Some("tufted"));

        let atom = channel.atom_ext().unwrap();
        assert_eq!(atom.links()[0].href(), "https://example.com/feed.xml");
        assert_eq!(atom.links()[0].rel(), "self");

        assert_eq!(channel.items().len(), 1);
        let item = &channel.items()[0];
        assert_eq!(item.title(), Some("Hello"));
        assert_eq!(item.link(), Some("https://example.com/Blog/2024-03-01-hello/"));
        assert_eq!(item.categories()[0].name(), "Blog");
        assert_eq!(item.pub_date(), Some(ymd(2024, 3, 1).to_rfc2822().as_str()));
        assert!(item.guid().unwrap().is_permalink());
        assert_eq!(item.description(), None);
    }

    #[test]
    fn test_item_description_only_when_present() {
        let post = Post {
            title: "T".into(),
            description: "Some text".into(),
            category: "Blog".into(),
            link: "https://example.com/Blog/t/".into(),
            date: ymd(2024, 1, 1),
        };
        assert_eq!(post_to_rss_item(&post).description(), Some("Some text"));

        let post = Post {
            description: String::new(),
            ..post
        };
        assert_eq!(post_to_rss_item(&post).description(), None);
    }

    #[test]
    fn test_build_rss_skips() {
        let (_dir, config) = project();
        let output = &config.build.output;
        write_at(&output.join("index.html"), &page("S", "https://e.com/", "", ""), 1);

        // no config.typ
        build_rss(&config, "https://e.com").unwrap();
        assert!(!output.join("feed.xml").exists());

        // configured directory missing
        write_at(&config.build.site_config, r#"feed-dir: ("Blog",)"#, 1);
        build_rss(&config, "https://e.com").unwrap();
        assert!(!output.join("feed.xml").exists());

        // directory present but without posts
        fs::create_dir_all(output.join("Blog")).unwrap();
        build_rss(&config, "https://e.com").unwrap();
        assert!(!output.join("feed.xml").exists());
    }
}
