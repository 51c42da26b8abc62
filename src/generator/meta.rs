//! Page metadata recovered from compiled html.
//!
//! Typst writes the metadata of a page into its `<head>`:
//!
//! ```html
//! <html lang="en">
//!   <head>
//!     <title>Hello</title>
//!     <meta name="description" content="First post">
//!     <meta name="date" content="2024-03-01T00:00:00Z">
//!     <link rel="canonical" href="https://example.com/Blog/hello/">
//!   </head>
//! ```

use crate::utils::xml::create_xml_reader;
use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use std::{borrow::Cow, fs, path::Path};

/// Metadata of one page. Missing values are empty strings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub lang: String,
    pub title: String,
    pub description: String,
    /// Canonical url.
    pub link: String,
    pub date: String,
}

impl PageMetadata {
    pub fn from_file(path: &Path) -> Result<Self> {
        let html = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::from_html(&html))
    }

    /// Parse leniently; a malformed document yields whatever was found
    /// before the error.
    pub fn from_html(html: &str) -> Self {
        let mut reader = create_xml_reader(html.as_bytes());
        let mut meta = Self::default();
        let mut in_title = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if is_tag(&e, b"title") => in_title = true,
                Ok(Event::Start(e) | Event::Empty(e)) => meta.apply_tag(&e),
                Ok(Event::End(e)) if e.name().as_ref().eq_ignore_ascii_case(b"title") => {
                    in_title = false;
                }
                Ok(Event::Text(text)) if in_title => {
                    meta.title.push_str(&String::from_utf8_lossy(&text));
                }
                Ok(Event::GeneralRef(entity)) if in_title => {
                    meta.title.push_str(&decode_entity(&String::from_utf8_lossy(&entity)));
                }
                Ok(Event::Eof) | Err(_) => break,
                _ => {}
            }
        }

        meta.title = meta.title.trim().to_owned();
        meta
    }

    fn apply_tag(&mut self, e: &BytesStart<'_>) {
        let attr = |name: &str| attribute(e, name);

        if is_tag(e, b"html") {
            if let Some(lang) = attr("lang") {
                self.lang = lang;
            }
        } else if is_tag(e, b"meta") {
            let (Some(name), Some(content)) = (attr("name"), attr("content")) else {
                return;
            };
            match name.as_str() {
                "description" => self.description = content,
                "date" => self.date = content,
                _ => {}
            }
        } else if is_tag(e, b"link")
            && attr("rel").is_some_and(|rel| rel == "canonical")
            && let Some(href) = attr("href")
        {
            self.link = href;
        }
    }
}

fn is_tag(e: &BytesStart<'_>, name: &[u8]) -> bool {
    e.name().as_ref().eq_ignore_ascii_case(name)
}

/// Value of attribute `name`, entity references decoded.
///
/// An unquoted value directly before `/>` loses its trailing slash, since
/// the tag reads as self-closing. Typst always quotes attribute values.
fn attribute(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.html_attributes()
        .flatten()
        .find(|a| a.key.as_ref().eq_ignore_ascii_case(name.as_bytes()))
        .map(|a| {
            a.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&a.value).into_owned(),
                Cow::into_owned,
            )
        })
}

/// `amp` -> `&`, `#39` -> `'`; unknown entities are kept verbatim.
fn decode_entity(name: &str) -> String {
    let raw = format!("&{name};");
    quick_xml::escape::unescape(&raw).map_or(raw.clone(), Cow::into_owned)
}
