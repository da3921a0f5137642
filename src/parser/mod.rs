use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

/// Suffix that marks a top-level anchor as a page worth following.
pub const MEDIA_PAGE_SUFFIX: &str = ".mp4";

pub const MEDIA_EXTENSIONS: [&str; 8] = [
    ".jpg", ".png", ".gif", ".jpeg", ".mp4", ".avi", ".mkv", ".mov",
];

/// Every `href` of every `<a href>` element, in document order.
pub fn anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector_anchor = Selector::parse("a[href]").expect("anchor selector");

    document
        .select(&selector_anchor)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}

pub fn is_media_page_link(href: &str) -> bool {
    href.ends_with(MEDIA_PAGE_SUFFIX)
}

pub fn is_media_file_link(href: &str) -> bool {
    MEDIA_EXTENSIONS.iter().any(|ext| href.ends_with(ext))
}

pub fn resolve_link(base: &Url, href: &str) -> Result<Url, url::ParseError> {
    base.join(href)
}

/// Absolute URLs of the anchors on `html` that point at `.mp4` pages.
pub fn media_page_links(base: &Url, html: &str) -> Vec<Url> {
    filter_and_resolve(base, html, is_media_page_link)
}

/// Absolute URLs of the anchors on `html` that point at media files.
pub fn media_file_links(base: &Url, html: &str) -> Vec<Url> {
    filter_and_resolve(base, html, is_media_file_link)
}

fn filter_and_resolve(base: &Url, html: &str, keep: fn(&str) -> bool) -> Vec<Url> {
    anchor_hrefs(html)
        .into_iter()
        .filter(|href| keep(href))
        .filter_map(|href| match resolve_link(base, &href) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(%base, %href, "dropping unresolvable link: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/gallery/index.html").unwrap()
    }

    #[test]
    fn test_anchor_hrefs_in_document_order() {
        let html = r#"
            <a href="one.mp4">1</a>
            <a name="no-href">skip</a>
            <p><a href="/two.html">2</a></p>
            <a href="">empty</a>
        "#;
        assert_eq!(anchor_hrefs(html), vec!["one.mp4", "/two.html", ""]);
    }

    #[test]
    fn test_anchor_hrefs_decodes_entities() {
        let html = r#"<a href="watch?a=1&amp;b=2.mp4">x</a>"#;
        assert_eq!(anchor_hrefs(html), vec!["watch?a=1&b=2.mp4"]);
    }

    #[test]
    fn test_media_page_link_is_case_sensitive_suffix() {
        assert!(is_media_page_link("videos/clip.mp4"));
        assert!(!is_media_page_link("videos/clip.MP4"));
        assert!(!is_media_page_link("videos/clip.mp4/"));
        assert!(!is_media_page_link("videos/clip.html"));
    }

    #[test]
    fn test_media_file_link_extensions() {
        for href in [
            "a.jpg", "a.png", "a.gif", "a.jpeg", "a.mp4", "a.avi", "a.mkv", "a.mov",
        ] {
            assert!(is_media_file_link(href), "{href}");
        }
        assert!(!is_media_file_link("a.webm"));
        assert!(!is_media_file_link("a.jpg?size=large"));
        assert!(!is_media_file_link("a.PNG"));
    }

    #[test]
    fn test_media_page_links_resolve_against_base() {
        let html = r#"
            <a href="clip.mp4">relative</a>
            <a href="/root.mp4">rooted</a>
            <a href="https://cdn.example.org/far.mp4">absolute</a>
            <a href="about.html">ignored</a>
            <a href="poster.jpg">ignored</a>
        "#;
        let links: Vec<String> = media_page_links(&base(), html)
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(
            links,
            vec![
                "https://example.com/gallery/clip.mp4",
                "https://example.com/root.mp4",
                "https://cdn.example.org/far.mp4",
            ]
        );
    }

    #[test]
    fn test_media_file_links_drop_unresolvable() {
        let html = r#"
            <a href="http://[bad.jpg">broken</a>
            <a href="../img/cat.png">cat</a>
            <a href="notes.txt">ignored</a>
        "#;
        let links = media_file_links(&base(), html);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.com/img/cat.png");
    }
}
