//! URL handling module for Unlinked
//!
//! This module decides, before any network I/O, whether a URL is in scope:
//! pattern-based ignore rules and the allowed-domains list.

mod ignore;
mod scope;

pub use ignore::IgnoreFilter;
pub use scope::{matches_wildcard, DomainScope};

use ::url::Url;

/// Extracts the lowercase host of a URL string
///
/// Returns None if the string is not an absolute URL or has no host.
///
/// # Examples
///
/// ```
/// use unlinked::url::extract_domain;
///
/// assert_eq!(extract_domain("https://EXAMPLE.com:8080/a"), Some("example.com".to_string()));
/// assert_eq!(extract_domain("/relative"), None);
/// ```
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| host.to_lowercase())
}

/// Puts a caller-supplied URL in the form discovered links take
///
/// Parsed URLs are serialized the way `Url::join` results are, so
/// `https://example.com` and a page's `href="/"` dedup as one URL.
/// Unparseable input is returned unchanged and fails at probe time.
///
/// # Examples
///
/// ```
/// use unlinked::url::normalize_seed;
///
/// assert_eq!(normalize_seed("https://Example.com"), "https://example.com/");
/// assert_eq!(normalize_seed("not a url"), "not a url");
/// ```
pub fn normalize_seed(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => url.into(),
        Err(_) => raw.to_string(),
    }
}

/// Returns true if the URL is absolute and uses http or https
pub fn is_http_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
