//! Frontier queue and global concurrency limiting
//!
//! URLs wait in a FIFO frontier until a permit from the engine-wide
//! semaphore is free. Nothing is spawned for a URL before it holds a permit,
//! so queued work costs memory, not tasks.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A URL waiting to be checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlItem {
    /// The URL to check
    pub url: String,

    /// Page the URL was found on, None for seeds
    pub found_on: Option<String>,

    /// Distance from the seed (seeds are depth 0)
    pub depth: u32,
}

impl CrawlItem {
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            found_on: None,
            depth: 0,
        }
    }

    /// A link discovered on `parent`, one level deeper
    pub fn child(url: impl Into<String>, parent: &CrawlItem) -> Self {
        Self {
            url: url.into(),
            found_on: Some(parent.url.clone()),
            depth: parent.depth + 1,
        }
    }

    pub fn is_seed(&self) -> bool {
        self.found_on.is_none()
    }
}

/// A frontier entry paired with the permit that lets it run
///
/// The permit is released when this value (or the task it moved into) is
/// dropped.
#[derive(Debug)]
pub struct ScheduledVisit {
    pub item: CrawlItem,
    pub permit: OwnedSemaphorePermit,
}

/// Frontier of URLs plus the global concurrency limit
#[derive(Debug)]
pub struct Scheduler {
    /// Shared by every crawl of the engine
    semaphore: Arc<Semaphore>,

    frontier: VecDeque<CrawlItem>,
}

impl Scheduler {
    pub fn new(semaphore: Arc<Semaphore>, initial_frontier: Vec<CrawlItem>) -> Self {
        Self {
            semaphore,
            frontier: VecDeque::from(initial_frontier),
        }
    }

    /// Gets the next URL if a permit is free right now
    ///
    /// Returns None when the frontier is empty or every permit is taken;
    /// in the latter case the caller must wait for a running visit to end.
    pub fn try_next(&mut self) -> Option<ScheduledVisit> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = Arc::clone(&self.semaphore).try_acquire_owned().ok()?;
        let item = self.frontier.pop_front()?;
        tracing::trace!("Scheduling {} (depth {})", item.url, item.depth);

        Some(ScheduledVisit { item, permit })
    }

    pub fn add_to_frontier(&mut self, item: CrawlItem) {
        self.frontier.push_back(item);
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Clears the frontier, returning how many URLs were dropped
    pub fn clear(&mut self) -> usize {
        let dropped = self.frontier.len();
        self.frontier.clear();
        dropped
    }
}
