//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Same-domain, crawlable links to follow (from `<a href>` tags)
//! - Page title
//!
//! Parsing is best-effort: broken markup yields fewer links or no title,
//! never an error.

use crate::url::{is_crawlable, is_same_origin, normalize};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// The page title (from the first non-empty `<title>` tag)
    pub title: Option<String>,

    /// Canonical same-domain links, deduplicated, in document order
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts links and title in one pass
///
/// # Link Extraction Rules
///
/// Every `<a href="...">` is normalized against `page_url`. A link is kept
/// only if it is a web URL on the same host as `page_url` and its path does
/// not end in a known non-HTML extension.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the content was fetched from
///
/// # Example
///
/// ```
/// use sumi_sitemap::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page/">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &page_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: title_of(&document),
        links: links_of(&document, page_url),
    }
}

/// Extracts the page title
pub fn extract_title(html: &str) -> Option<String> {
    title_of(&Html::parse_document(html))
}

/// Extracts canonical same-domain crawlable links
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    links_of(&Html::parse_document(html), page_url)
}

fn title_of(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .find(|s| !s.is_empty())
}

fn links_of(document: &Html, page_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = normalize(href, page_url) else {
            tracing::trace!("Dropping malformed link {:?} on {}", href, page_url);
            continue;
        };

        if !is_same_origin(&url, page_url) || !is_crawlable(&url) {
            continue;
        }

        if seen.insert(url.as_str().to_string()) {
            links.push(url);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        extract_links(html, &page_url())
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>Test Page</title></head><body></body></html>"#;
        assert_eq!(extract_title(html), Some("Test Page".to_string()));
    }

    #[test]
    fn test_extract_title_with_whitespace() {
        let html = "<html><head><title>\n  Test Page  \n</title></head></html>";
        assert_eq!(extract_title(html), Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        assert_eq!(extract_title("<html><head></head><body></body></html>"), None);
    }

    #[test]
    fn test_empty_title_skipped() {
        let html = "<html><head><title>   </title></head><body><svg><title>Icon</title></svg></body></html>";
        assert_eq!(extract_title(html), Some("Icon".to_string()));
    }

    #[test]
    fn test_relative_links_resolved() {
        let html = r#"<a href="/about">About</a><a href="next">Next</a><a href="../index">Index</a>"#;
        assert_eq!(
            links(html),
            vec![
                "https://example.com/about",
                "https://example.com/blog/next",
                "https://example.com/index",
            ]
        );
    }

    #[test]
    fn test_external_links_dropped() {
        let html = r#"<a href="https://other.com/page">Other</a><a href="https://sub.example.com/">Sub</a>"#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_http_link_on_same_host_kept() {
        let html = r#"<a href="http://example.com/legacy">Legacy</a>"#;
        assert_eq!(links(html), vec!["http://example.com/legacy"]);
    }

    #[test]
    fn test_fragment_and_slash_variants_deduplicated() {
        let html = r##"
            <a href="https://example.com/about#section">A</a>
            <a href="/about/">B</a>
            <a href="/about">C</a>
        "##;
        assert_eq!(links(html), vec!["https://example.com/about"]);
    }

    #[test]
    fn test_binary_resources_dropped() {
        let html = r#"
            <a href="/report.pdf">PDF</a>
            <a href="/report">Report</a>
            <a href="/logo.PNG">Logo</a>
        "#;
        assert_eq!(links(html), vec!["https://example.com/report"]);
    }

    #[test]
    fn test_special_schemes_dropped() {
        let html = r#"
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:test@example.com">Mail</a>
            <a href="tel:+1234567890">Call</a>
        "#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<a name="top">Top</a><a href="/x">X</a>"#;
        assert_eq!(links(html), vec!["https://example.com/x"]);
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let html = r#"<html><head><title>Broken</title><body><a href="/ok">ok<a href="http://[bad">bad</div></p>"#;
        let parsed = parse_html(html, &page_url());
        assert_eq!(parsed.title.as_deref(), Some("Broken"));
        assert_eq!(parsed.links.len(), 1);
        assert_eq!(parsed.links[0].as_str(), "https://example.com/ok");
    }

    #[test]
    fn test_unclosed_title_swallows_document() {
        // Title text runs to the end of input, so no anchors are ever parsed
        let html = r#"<html><head><title>Broken<body><a href="/ok">ok</a>"#;
        let parsed = parse_html(html, &page_url());
        assert!(parsed.links.is_empty());
        assert!(parsed.title.unwrap().starts_with("Broken"));
    }

    #[test]
    fn test_garbage_input() {
        let parsed = parse_html("\u{0}\u{1}<<<>>>not html at all", &page_url());
        assert!(parsed.links.is_empty());
        assert_eq!(parsed.title, None);
    }
}
