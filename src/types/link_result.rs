use crate::types::LinkStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The outcome of checking a single link
///
/// A result is built once, when its probe finishes (or when the link is
/// skipped), and is not changed after it has been recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkResult {
    /// The probed URL
    pub url: String,

    /// Classified outcome
    pub status: LinkStatus,

    /// HTTP status code, 0 if no response was received
    pub status_code: u16,

    /// Transport failure message (only for `error` and `timeout`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// `Location` header of a captured redirect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    /// Page the link was discovered on (None for seed URLs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_on: Option<String>,

    /// Time from dispatch to terminal response or failure
    pub response_time: Duration,

    /// When the result was produced
    pub checked_at: DateTime<Utc>,

    /// Content-Type of the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Content-Length of the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
}

impl LinkResult {
    /// Creates a `skipped` result; no request was made so every response
    /// field stays empty
    pub fn skipped(url: impl Into<String>, found_on: Option<String>) -> Self {
        Self {
            url: url.into(),
            status: LinkStatus::Skipped,
            status_code: 0,
            error: None,
            redirect_url: None,
            found_on,
            response_time: Duration::ZERO,
            checked_at: Utc::now(),
            content_type: None,
            content_length: None,
        }
    }

    /// Replaces a page result with an `error` result when its body could not
    /// be read or its links could not be extracted
    ///
    /// The response metadata and timing of the original fetch are kept.
    pub fn into_page_failure(self, message: impl Into<String>) -> Self {
        Self {
            status: LinkStatus::Error,
            error: Some(message.into()),
            redirect_url: None,
            checked_at: Utc::now(),
            ..self
        }
    }

    /// Returns true if the link is considered broken
    pub fn is_broken(&self) -> bool {
        self.status.is_broken()
    }
}
