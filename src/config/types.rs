use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Default user agent sent with every probe
pub const DEFAULT_USER_AGENT: &str = "Unlinked/1.0 (Dead Link Checker)";

/// How the seed URLs are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// Check only the provided URLs
    #[default]
    Single,

    /// Crawl from each URL and check every discovered link
    #[serde(alias = "crawl")]
    Crawler,
}

impl CheckMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Crawler => "crawler",
        }
    }

    /// Parses a mode name, accepting `crawl` as an alias for `crawler`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "crawler" | "crawl" => Some(Self::Crawler),
            _ => None,
        }
    }
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link checker configuration
///
/// Every key is optional in the TOML file; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: CheckMode,

    /// Maximum number of probes in flight at once
    pub concurrency: usize,

    /// Per-probe deadline in seconds
    pub timeout: u64,

    /// Crawl depth bound, 0 checks only the seeds
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Follow redirects instead of reporting them
    #[serde(rename = "follow-redirects")]
    pub follow_redirects: bool,

    /// Domains discovered links must belong to (empty = any)
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Regular expressions for URLs that are never probed
    #[serde(rename = "ignore-patterns")]
    pub ignore_patterns: Vec<String>,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Carried for the CLI; the engine does not consult robots.txt
    #[serde(rename = "respect-robots-txt")]
    pub respect_robots_txt: bool,
}

impl Config {
    /// Per-probe deadline as a `Duration`
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: CheckMode::Single,
            concurrency: 10,
            timeout: 30,
            max_depth: 3,
            follow_redirects: true,
            allowed_domains: Vec::new(),
            ignore_patterns: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            respect_robots_txt: true,
        }
    }
}
