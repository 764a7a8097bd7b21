use crate::{UrlError, UrlResult};
use url::Url;

/// Scheme assumed for seed URLs typed without one
const DEFAULT_SCHEME: &str = "https";

/// Normalizes a possibly-relative link into a canonical URL
///
/// # Normalization Steps
///
/// 1. Resolve `href` against `base`; reject if unparsable
/// 2. Reject anything that is not `http` or `https` (`mailto:`, `javascript:`, ...)
/// 3. Remove the fragment (everything after #)
/// 4. Remove trailing slashes from the path, except for the root `/`
///
/// The canonical form is the frontier's dedup key. Normalizing an already
/// canonical URL returns it unchanged.
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `base` - The URL of the page the link was found on
///
/// # Returns
///
/// * `Some(Url)` - The canonical URL
/// * `None` - The link is malformed or not a web URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_sitemap::url::normalize;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let url = normalize("../about/#team", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize(href: &str, base: &Url) -> Option<Url> {
    let mut url = base.join(href.trim()).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.host_str()?;

    url.set_fragment(None);
    strip_trailing_slash(&mut url);

    Some(url)
}

/// Removes trailing slashes from the path unless the path is just `/`
fn strip_trailing_slash(url: &mut Url) {
    let path = url.path();
    if path.len() <= 1 || !path.ends_with('/') {
        return;
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        url.set_path("/");
    } else {
        let trimmed = trimmed.to_string();
        url.set_path(&trimmed);
    }
}

/// Resolves the user-supplied seed into a canonical absolute URL
///
/// A seed without a scheme is prefixed with `https://`. The result must be
/// an `http(s)` URL with a host.
///
/// # Returns
///
/// * `Ok(Url)` - The canonical seed URL
/// * `Err(UrlError)` - The seed is empty, unparsable, or not a web URL
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::resolve_seed_url;
///
/// let seed = resolve_seed_url("example.com/blog/").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/blog");
/// ```
pub fn resolve_seed_url(input: &str) -> UrlResult<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{}://{}", DEFAULT_SCHEME, trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    normalize(url.as_str(), &url).ok_or_else(|| UrlError::Parse(candidate))
}
