//! Crawler coordinator - main traversal loop
//!
//! This module drives a frontier of URLs to completion:
//! - Admitting URLs through the ignore and dedup gates
//! - Dispatching admitted URLs as tasks while permits are free
//! - Feeding links discovered by finished tasks back into the frontier
//! - Observing cancellation between dispatches and while waiting

use crate::checker::{Admission, Engine, ProgressNotifier};
use crate::crawler::scheduler::{CrawlItem, Scheduler};
use crate::url::normalize_seed;
use crate::UnlinkedError;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How a frontier run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    /// The frontier drained; `recorded` results were written
    Completed { recorded: usize },

    /// Cancellation fired; in-flight visits were aborted
    Cancelled { recorded: usize },
}

/// Drives frontier runs against a shared engine
pub(crate) struct Coordinator {
    engine: Arc<Engine>,
    notifier: ProgressNotifier,
    cancel: CancellationToken,
}

impl Coordinator {
    pub(crate) fn new(
        engine: Arc<Engine>,
        notifier: ProgressNotifier,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            engine,
            notifier,
            cancel,
        }
    }

    /// Crawls from one seed until the frontier is empty
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutcome)` - The crawl ran (failures on pages are recorded as results)
    /// * `Err(UnlinkedError::CrawlStart)` - The seed is not an absolute http(s) URL
    pub(crate) async fn crawl(&self, seed: &str) -> Result<RunOutcome, UnlinkedError> {
        let parsed = Url::parse(seed).map_err(|e| UnlinkedError::CrawlStart {
            url: seed.to_string(),
            reason: e.to_string(),
        })?;

        if !crate::url::is_http_url(&parsed) {
            return Err(UnlinkedError::CrawlStart {
                url: seed.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        tracing::info!(
            "Crawling {} (max depth {})",
            parsed,
            self.engine.config.max_depth
        );
        Ok(self.run(vec![CrawlItem::seed(parsed.as_str())]).await)
    }

    /// Checks every seed directly, without link extraction
    pub(crate) async fn check_all(&self, seeds: &[String]) -> RunOutcome {
        let initial = seeds
            .iter()
            .map(|seed| CrawlItem::seed(normalize_seed(seed)))
            .collect();
        self.run(initial).await
    }

    /// Runs the frontier loop
    ///
    /// Dispatches as many admitted URLs as there are free permits, then
    /// waits for a visit to finish (or for cancellation) and repeats.
    async fn run(&self, initial: Vec<CrawlItem>) -> RunOutcome {
        let mut scheduler = Scheduler::new(Arc::clone(&self.engine.semaphore), initial);
        let mut in_flight: JoinSet<Vec<CrawlItem>> = JoinSet::new();
        let mut recorded = 0;

        loop {
            while !self.cancel.is_cancelled() {
                let Some(visit) = scheduler.try_next() else {
                    break;
                };

                match self.engine.admit(&visit.item) {
                    Admission::Probe => {
                        let engine = Arc::clone(&self.engine);
                        let notifier = self.notifier.clone();
                        in_flight.spawn(async move {
                            let _permit = visit.permit;
                            engine.visit(visit.item, &notifier).await
                        });
                    }
                    Admission::Skipped => recorded += 1,
                    Admission::Dropped => {}
                }
            }

            if self.cancel.is_cancelled() {
                return self.abort(&mut scheduler, &mut in_flight, recorded).await;
            }

            if in_flight.is_empty() {
                if scheduler.is_empty() {
                    return RunOutcome::Completed { recorded };
                }

                // Every permit is held outside this run; wait for one.
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    permit = Arc::clone(&self.engine.semaphore).acquire_owned() => drop(permit),
                }
                continue;
            }

            tokio::select! {
                _ = self.cancel.cancelled() => {}
                joined = in_flight.join_next() => match joined {
                    Some(Ok(children)) => {
                        recorded += 1;
                        for child in children {
                            scheduler.add_to_frontier(child);
                        }
                    }
                    Some(Err(e)) => tracing::warn!("Visit task failed: {}", e),
                    None => {}
                },
            }
        }
    }

    /// Aborts in-flight visits and waits until every task is gone
    async fn abort(
        &self,
        scheduler: &mut Scheduler,
        in_flight: &mut JoinSet<Vec<CrawlItem>>,
        mut recorded: usize,
    ) -> RunOutcome {
        let aborted = in_flight.len();
        in_flight.abort_all();

        while let Some(joined) = in_flight.join_next().await {
            if joined.is_ok() {
                recorded += 1;
            }
        }

        let dropped = scheduler.clear();
        tracing::warn!(
            "Cancelled: aborted {} in-flight checks, dropped {} queued URLs",
            aborted,
            dropped
        );

        RunOutcome::Cancelled { recorded }
    }
}
