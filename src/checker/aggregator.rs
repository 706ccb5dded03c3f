//! Thread-safe accumulation of link results

use crate::types::{CheckResult, LinkResult, LinkStatus};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct Tally {
    links: Vec<LinkResult>,
    ok: usize,
    dead: usize,
    redirect: usize,
    errors: usize,
}

/// Collects results from every probing task
///
/// The result list and the counters live under the same lock, so a snapshot
/// always has counts that agree with its links.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    tally: Mutex<Tally>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result and bumps the matching counter
    pub fn record(&self, result: LinkResult) {
        let mut tally = self.tally.lock().unwrap_or_else(PoisonError::into_inner);
        match result.status {
            LinkStatus::Ok => tally.ok += 1,
            LinkStatus::Dead => tally.dead += 1,
            LinkStatus::Redirect => tally.redirect += 1,
            status if status.is_transport_failure() => tally.errors += 1,
            _ => {}
        }
        tally.links.push(result);
    }

    /// Number of results recorded so far
    pub fn len(&self) -> usize {
        self.tally
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .links
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the summary from the current state
    pub fn finalize(&self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> CheckResult {
        let tally = self.tally.lock().unwrap_or_else(PoisonError::into_inner);

        CheckResult {
            start_time,
            end_time,
            duration: (end_time - start_time).to_std().unwrap_or_default(),
            total_checked: tally.links.len(),
            total_ok: tally.ok,
            total_dead: tally.dead,
            total_redirect: tally.redirect,
            total_errors: tally.errors,
            links: tally.links.clone(),
        }
    }
}
