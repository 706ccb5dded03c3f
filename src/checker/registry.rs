//! Run-wide URL deduplication

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Remembers every URL handed to the engine
///
/// `mark_if_new` is the only way in: the membership test and the insert
/// happen under one lock, so two tasks racing on the same URL cannot both
/// win.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    seen: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this call is the first to see `url`
    ///
    /// A caller that gets `false` must not probe the URL.
    pub fn mark_if_new(&self, url: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(url) {
            return false;
        }
        seen.insert(url.to_string())
    }

    /// Number of distinct URLs seen so far
    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
