use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_sitemap::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether `url` belongs to the same site as `base`
///
/// Only the host is compared: a link to `http://example.com/` from an
/// `https://example.com/` page counts as same-domain, and so does a different
/// port on the same host. URLs without a host never match.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_sitemap::url::is_same_origin;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert!(is_same_origin(&Url::parse("http://example.com/a").unwrap(), &base));
/// assert!(!is_same_origin(&Url::parse("https://blog.example.com/").unwrap(), &base));
/// ```
pub fn is_same_origin(url: &Url, base: &Url) -> bool {
    match (extract_domain(url), extract_domain(base)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Returns the ASCII origin of a URL (`scheme://host[:port]`)
///
/// This is the `baseUrl` reported in `start` and `complete` events.
pub fn base_origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}
