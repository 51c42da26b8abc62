//! Shared XML/HTML helpers on top of `quick-xml`.

use quick_xml::Reader;

/// Create a lenient reader for compiler-generated HTML.
///
/// Text is kept verbatim and end-tag checks are off, so void elements such
/// as `<meta>` and `<link>` without a closing slash do not abort parsing.
#[inline]
pub fn create_xml_reader(content: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a&b"), "a&amp;b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml(r#""q" 'a'"#), "&quot;q&quot; &apos;a&apos;");
        assert_eq!(escape_xml("plain/path/"), "plain/path/");
    }

    #[test]
    fn test_reader_tolerates_unclosed_void_elements() {
        let html = br#"<html><head><meta charset="utf-8"><title>x</title></head></html>"#;
        let mut reader = create_xml_reader(html);
        let mut names = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => names.push(String::from_utf8_lossy(e.name().as_ref()).into_owned()),
                Ok(Event::Eof) | Err(_) => break,
                _ => {}
            }
        }
        assert_eq!(names, vec!["html", "head", "meta", "title"]);
    }
}
