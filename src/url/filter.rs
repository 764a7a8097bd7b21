use url::Url;

/// Path extensions that are never fetched
///
/// Images, media, archives, stylesheets, scripts, data files, office
/// documents and fonts. A resource that slips past this list is still
/// rejected by content-type gating at fetch time.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".mp3", ".mp4", ".avi", ".mov",
    ".wmv", ".zip", ".rar", ".tar", ".gz", ".css", ".js", ".json", ".xml", ".doc", ".docx",
    ".xls", ".xlsx", ".ppt", ".pptx", ".ico", ".woff", ".woff2", ".ttf", ".eot",
];

/// Checks whether a URL is worth fetching as an HTML page
///
/// Returns false when the lowercased path ends with one of
/// [`EXCLUDED_EXTENSIONS`]. Query strings are ignored, so
/// `/download?file=a.pdf` is still crawlable.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_sitemap::url::is_crawlable;
///
/// assert!(!is_crawlable(&Url::parse("https://example.com/report.pdf").unwrap()));
/// assert!(is_crawlable(&Url::parse("https://example.com/report").unwrap()));
/// ```
pub fn is_crawlable(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    !EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
