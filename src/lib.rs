//! Unlinked: a concurrent dead link checker
//!
//! This crate checks whether hyperlinks are reachable, either for an explicit
//! list of URLs or by crawling a site up to a bounded depth, classifying each
//! link and aggregating run statistics.

pub mod checker;
pub mod config;
pub mod crawler;
pub mod output;
pub mod types;
pub mod url;

use thiserror::Error;

/// Main error type for Unlinked operations
#[derive(Debug, Error)]
pub enum UnlinkedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to start crawling {url}: {reason}")]
    CrawlStart { url: String, reason: String },

    #[error("Check cancelled before any URL completed")]
    Cancelled,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid domain pattern: {0}")]
    InvalidDomain(String),
}

/// Result type alias for Unlinked operations
pub type Result<T> = std::result::Result<T, UnlinkedError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use checker::{Checker, CheckerBuilder, ProgressCallback};
pub use config::{CheckMode, Config};
pub use crawler::{HtmlLinkExtractor, LinkExtractor};
pub use tokio_util::sync::CancellationToken;
pub use types::{CheckResult, LinkResult, LinkStatus};
