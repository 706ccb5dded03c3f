//! HTTP prober
//!
//! This module performs the network side of a link check:
//! - Building the shared HTTP client with user agent, timeout and redirect policy
//! - HEAD probes for links that are only checked
//! - GET fetches for crawl pages whose links will be extracted
//! - Classifying responses and transport failures

use crate::config::Config;
use crate::types::{LinkResult, LinkStatus};
use chrono::Utc;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Response};
use std::time::{Duration, Instant};
use url::Url;

/// Redirect hops followed when redirects are enabled
const MAX_REDIRECTS: usize = 10;

/// Client settings derived from the configuration
#[derive(Debug, Clone)]
pub struct ProberSettings {
    pub user_agent: String,
    pub timeout: Duration,
    pub follow_redirects: bool,
}

impl From<&Config> for ProberSettings {
    fn from(config: &Config) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout_duration(),
            follow_redirects: config.follow_redirects,
        }
    }
}

/// Builds the HTTP client shared by every probe of a run
///
/// With `follow_redirects` off the client never follows a 3xx, so the
/// redirect response itself is classified.
pub fn build_http_client(settings: &ProberSettings) -> Result<Client, reqwest::Error> {
    let redirect = if settings.follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Classifies a terminal HTTP status code
///
/// | Code | Status |
/// |------|--------|
/// | 200–299 | ok |
/// | 300–399 | redirect |
/// | anything else | dead |
pub fn classify_status(code: u16) -> LinkStatus {
    match code {
        200..=299 => LinkStatus::Ok,
        300..=399 => LinkStatus::Redirect,
        _ => LinkStatus::Dead,
    }
}

/// Classifies a request that produced no response
pub fn classify_error(error: &reqwest::Error) -> LinkStatus {
    if error.is_timeout() {
        LinkStatus::Timeout
    } else {
        LinkStatus::Error
    }
}

/// Returns true if the Content-Type looks like a page worth parsing
///
/// A missing Content-Type is treated as HTML.
pub fn is_html(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(value) => {
            let value = value.to_ascii_lowercase();
            value.contains("text/html") || value.contains("application/xhtml+xml")
        }
    }
}

/// Result of a GET on a crawl page
#[derive(Debug)]
pub struct PageFetch {
    /// Classified outcome for the page URL
    pub result: LinkResult,

    /// URL of the terminal response, used as the base for relative links
    pub final_url: Option<Url>,

    /// HTML body, present only for successful HTML responses
    pub body: Option<String>,
}

/// Executes single bounded-timeout checks against one URL
///
/// The client is the only state and is safe to share between tasks.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    pub fn new(settings: &ProberSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(settings)?,
        })
    }

    /// Checks a URL with a HEAD request
    pub async fn probe(&self, url: &str, found_on: Option<&str>) -> LinkResult {
        let started = Instant::now();

        match self.client.head(url).send().await {
            Ok(response) => response_result(url, found_on, &response, started.elapsed()),
            Err(e) => transport_result(url, found_on, &e, started.elapsed()),
        }
    }

    /// Fetches a page with GET, classifying it like `probe` and keeping the
    /// body of a successful HTML response
    ///
    /// A body that cannot be read turns the page result into `error`.
    pub async fn fetch_page(&self, url: &str, found_on: Option<&str>) -> PageFetch {
        let started = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return PageFetch {
                    result: transport_result(url, found_on, &e, started.elapsed()),
                    final_url: None,
                    body: None,
                }
            }
        };

        let result = response_result(url, found_on, &response, started.elapsed());
        let final_url = Some(response.url().clone());

        if result.status != LinkStatus::Ok || !is_html(result.content_type.as_deref()) {
            return PageFetch {
                result,
                final_url,
                body: None,
            };
        }

        match response.text().await {
            Ok(body) => PageFetch {
                result,
                final_url,
                body: Some(body),
            },
            Err(e) => {
                tracing::warn!("Failed to read body of {}: {}", url, e);
                PageFetch {
                    result: result.into_page_failure(format!("failed to read page body: {}", e)),
                    final_url,
                    body: None,
                }
            }
        }
    }
}

fn header_value(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn response_result(
    url: &str,
    found_on: Option<&str>,
    response: &Response,
    response_time: Duration,
) -> LinkResult {
    let status_code = response.status().as_u16();
    let status = classify_status(status_code);

    let redirect_url = match status {
        LinkStatus::Redirect => header_value(response, LOCATION),
        _ => None,
    };

    LinkResult {
        url: url.to_string(),
        status,
        status_code,
        error: None,
        redirect_url,
        found_on: found_on.map(str::to_string),
        response_time,
        checked_at: Utc::now(),
        content_type: header_value(response, CONTENT_TYPE),
        content_length: header_value(response, CONTENT_LENGTH).and_then(|v| v.parse().ok()),
    }
}

fn transport_result(
    url: &str,
    found_on: Option<&str>,
    error: &reqwest::Error,
    response_time: Duration,
) -> LinkResult {
    let status = classify_error(error);
    tracing::debug!("{} failed ({}): {}", url, status, error);

    LinkResult {
        url: url.to_string(),
        status,
        status_code: 0,
        error: Some(error.to_string()),
        redirect_url: None,
        found_on: found_on.map(str::to_string),
        response_time,
        checked_at: Utc::now(),
        content_type: None,
        content_length: None,
    }
}
