/// Link status definitions
///
/// Every checked link ends up with exactly one of these values.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the classified outcome of a checked link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// Terminal response was 2xx
    Ok,

    /// A response was received but it was not 2xx or 3xx
    Dead,

    /// Terminal response was 3xx
    Redirect,

    /// No response before the deadline
    Timeout,

    /// No response for any other reason (DNS, TLS, refused, bad URL...)
    Error,

    /// Never probed: ignored by pattern or already seen
    Skipped,
}

impl LinkStatus {
    /// Returns true for the statuses that indicate a broken link
    pub fn is_broken(&self) -> bool {
        matches!(self, Self::Dead | Self::Timeout | Self::Error)
    }

    /// Returns true if no response was received
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Timeout | Self::Error)
    }

    /// Returns the lowercase name used in reports and config
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Dead => "dead",
            Self::Redirect => "redirect",
            Self::Timeout => "timeout",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }

    /// Returns all link statuses
    pub fn all() -> [Self; 6] {
        [
            Self::Ok,
            Self::Dead,
            Self::Redirect,
            Self::Timeout,
            Self::Error,
            Self::Skipped,
        ]
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown link status '{}'", s))
    }
}
