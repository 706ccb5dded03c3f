//! Link extraction from fetched pages
//!
//! Extraction is a strategy behind the `LinkExtractor` trait so the crawl
//! coordinator does not depend on how markup is parsed.

use scraper::{Html, Selector};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Errors raised while extracting links from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    #[error("failed to parse page: {0}")]
    Malformed(String),
}

/// Pulls outbound links out of a page body
pub trait LinkExtractor: Send + Sync {
    /// Returns absolute URLs found in `body`, resolved against `base_url`
    fn extract(&self, body: &str, base_url: &Url) -> Result<Vec<String>, ExtractError>;
}

/// Extracts `<a href>` links from HTML
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, resolved against the base URL
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links; fragments are stripped from everything else
/// - Non-HTTP(S) URLs after resolution
/// - Repeats of a link already found on the same page
#[derive(Debug, Clone, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, body: &str, base_url: &Url) -> Result<Vec<String>, ExtractError> {
        let selector = Selector::parse("a[href]").map_err(|e| ExtractError::Selector {
            selector: "a[href]".to_string(),
            message: format!("{:?}", e),
        })?;

        let document = Html::parse_document(body);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if let Some(absolute_url) = resolve_link(href, base_url) {
                if seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
        }

        Ok(links)
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if !crate::url::is_http_url(&absolute_url) {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url.to_string())
}
