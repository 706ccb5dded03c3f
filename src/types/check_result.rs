use crate::types::{LinkResult, LinkStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Summary of a complete check run
///
/// Produced once by the result aggregator. `links` is in completion order,
/// which is not stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: Duration,

    /// Number of recorded links, skipped ones included
    pub total_checked: usize,
    pub total_ok: usize,
    pub total_dead: usize,
    pub total_redirect: usize,

    /// `error` plus `timeout`
    pub total_errors: usize,

    pub links: Vec<LinkResult>,
}

impl CheckResult {
    /// Iterates over links that are dead, errored or timed out
    pub fn broken(&self) -> impl Iterator<Item = &LinkResult> {
        self.links.iter().filter(|link| link.is_broken())
    }

    /// Returns true if any link is broken
    pub fn has_broken(&self) -> bool {
        self.total_dead + self.total_errors > 0
    }

    /// Number of links that were skipped without a request
    pub fn total_skipped(&self) -> usize {
        self.links
            .iter()
            .filter(|link| link.status == LinkStatus::Skipped)
            .count()
    }

    /// Percentage of probed (non-skipped) links that were ok or redirects
    pub fn success_rate(&self) -> f64 {
        let probed = self.total_ok + self.total_dead + self.total_redirect + self.total_errors;
        if probed == 0 {
            return 0.0;
        }
        ((self.total_ok + self.total_redirect) as f64 / probed as f64) * 100.0
    }
}
