//! Link-checking engine
//!
//! This module contains the public entry point, [`Checker`], and the pieces
//! it shares between probing tasks:
//! - The HTTP prober and status classification
//! - The visited registry (run-wide deduplication)
//! - The result aggregator
//! - The progress notifier

mod aggregator;
mod engine;
mod progress;
mod prober;
mod registry;

pub use aggregator::ResultAggregator;
pub use progress::{ProgressCallback, ProgressDispatcher, ProgressEvent, ProgressNotifier};
pub use prober::{
    build_http_client, classify_error, classify_status, is_html, PageFetch, Prober,
    ProberSettings,
};
pub use registry::VisitedRegistry;

pub(crate) use engine::{Admission, Engine};

use crate::config::{validate, CheckMode, Config};
use crate::crawler::{Coordinator, HtmlLinkExtractor, LinkExtractor, RunOutcome};
use crate::types::{CheckResult, LinkStatus};
use crate::url::{DomainScope, IgnoreFilter};
use crate::UnlinkedError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Builder for a [`Checker`] with a custom ignore filter or link extractor
pub struct CheckerBuilder {
    config: Config,
    ignore: Option<IgnoreFilter>,
    extractor: Option<Arc<dyn LinkExtractor>>,
}

impl CheckerBuilder {
    /// Uses an already compiled filter instead of `config.ignore_patterns`
    pub fn ignore_filter(mut self, filter: IgnoreFilter) -> Self {
        self.ignore = Some(filter);
        self
    }

    /// Replaces the default HTML link extractor
    pub fn link_extractor(mut self, extractor: Arc<dyn LinkExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Validates the configuration and builds the engine
    ///
    /// # Returns
    ///
    /// * `Ok(Checker)` - Ready to run
    /// * `Err(UnlinkedError::Config)` - Invalid setting or ignore pattern
    /// * `Err(UnlinkedError::HttpClient)` - The HTTP client could not be built
    pub fn build(self) -> Result<Checker, UnlinkedError> {
        validate(&self.config)?;

        let ignore = match self.ignore {
            Some(filter) => filter,
            None => IgnoreFilter::new(self.config.ignore_patterns.as_slice())?,
        };
        let prober = Prober::new(&ProberSettings::from(&self.config))?;
        let extractor = self
            .extractor
            .unwrap_or_else(|| Arc::new(HtmlLinkExtractor::new()));

        let engine = Engine {
            scope: DomainScope::new(&self.config.allowed_domains),
            semaphore: Arc::new(Semaphore::new(self.config.concurrency)),
            config: self.config,
            ignore,
            prober,
            registry: VisitedRegistry::new(),
            aggregator: ResultAggregator::new(),
            extractor,
        };

        Ok(Checker {
            engine: Arc::new(engine),
            on_progress: None,
            created_at: Utc::now(),
        })
    }
}

/// Checks links for one run configuration
///
/// The visited registry and result list live as long as the checker: a URL
/// checked by one `check_urls` call is skipped by later calls on the same
/// checker.
///
/// # Example
///
/// ```no_run
/// use unlinked::{CancellationToken, Checker, Config};
///
/// # async fn example() -> unlinked::Result<()> {
/// let checker = Checker::new(Config::default())?;
/// let urls = vec!["https://example.com/".to_string()];
/// let result = checker.check_urls(&urls, &CancellationToken::new()).await?;
/// println!("{} links, {} dead", result.total_checked, result.total_dead);
/// # Ok(())
/// # }
/// ```
pub struct Checker {
    engine: Arc<Engine>,
    on_progress: Option<ProgressCallback>,
    created_at: DateTime<Utc>,
}

/// Progress of a run across its seeds
struct SeedProgress {
    completed: usize,
    cancelled: bool,
}

impl Checker {
    /// Creates a checker, compiling the configured ignore patterns
    pub fn new(config: Config) -> Result<Self, UnlinkedError> {
        Self::builder(config).build()
    }

    pub fn builder(config: Config) -> CheckerBuilder {
        CheckerBuilder {
            config,
            ignore: None,
            extractor: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.engine.config
    }

    /// Registers the progress callback, replacing any previous one
    ///
    /// The callback runs once per completed network probe, on a blocking
    /// thread, never while the engine holds a lock. Skipped URLs (ignored
    /// or already seen) do not trigger it.
    pub fn set_progress_callback<F>(&mut self, callback: F)
    where
        F: Fn(&str, LinkStatus) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
    }

    pub fn clear_progress_callback(&mut self) {
        self.on_progress = None;
    }

    /// Snapshot of everything recorded since this checker was built
    pub fn summary(&self) -> CheckResult {
        self.engine.aggregator.finalize(self.created_at, Utc::now())
    }

    /// Checks the given URLs according to the configured mode
    ///
    /// Single mode probes every URL, up to `concurrency` at a time. Crawler
    /// mode crawls from each URL in turn.
    ///
    /// # Returns
    ///
    /// * `Ok(CheckResult)` - Everything recorded by this checker so far; partial if
    ///   cancelled after at least one seed completed
    /// * `Err(UnlinkedError::Cancelled)` - Cancelled before any seed completed
    /// * `Err(UnlinkedError::CrawlStart)` - A crawl seed could not be dispatched
    pub async fn check_urls(
        &self,
        urls: &[String],
        cancel: &CancellationToken,
    ) -> Result<CheckResult, UnlinkedError> {
        let start_time = Utc::now();
        tracing::info!(
            "Checking {} URL(s) in {} mode",
            urls.len(),
            self.engine.config.mode
        );

        let (notifier, dispatcher) = match &self.on_progress {
            Some(callback) => {
                let (notifier, dispatcher) = ProgressDispatcher::start(Arc::clone(callback));
                (notifier, Some(dispatcher))
            }
            None => (ProgressNotifier::disabled(), None),
        };

        let progress = self.run(urls, notifier, cancel).await;

        if let Some(dispatcher) = dispatcher {
            dispatcher.finish().await;
        }

        let progress = progress?;
        if progress.cancelled {
            if progress.completed == 0 {
                return Err(UnlinkedError::Cancelled);
            }
            tracing::warn!(
                "Cancelled after {} of {} seeds; returning partial results",
                progress.completed,
                urls.len()
            );
        }

        let result = self.engine.aggregator.finalize(start_time, Utc::now());
        tracing::info!(
            "Checked {} links in {:?}: {} ok, {} dead, {} redirects, {} errors",
            result.total_checked,
            result.duration,
            result.total_ok,
            result.total_dead,
            result.total_redirect,
            result.total_errors
        );
        Ok(result)
    }

    /// Processes the seeds; the notifier is dropped when this returns
    async fn run(
        &self,
        urls: &[String],
        notifier: ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<SeedProgress, UnlinkedError> {
        let coordinator = Coordinator::new(Arc::clone(&self.engine), notifier, cancel.clone());

        if cancel.is_cancelled() {
            return Ok(SeedProgress {
                completed: 0,
                cancelled: true,
            });
        }

        match self.engine.config.mode {
            CheckMode::Single => Ok(match coordinator.check_all(urls).await {
                RunOutcome::Completed { recorded } => SeedProgress {
                    completed: recorded,
                    cancelled: false,
                },
                RunOutcome::Cancelled { recorded } => SeedProgress {
                    completed: recorded,
                    cancelled: true,
                },
            }),
            CheckMode::Crawler => {
                for (index, seed) in urls.iter().enumerate() {
                    if cancel.is_cancelled() {
                        return Ok(SeedProgress {
                            completed: index,
                            cancelled: true,
                        });
                    }

                    match coordinator.crawl(seed).await? {
                        RunOutcome::Completed { recorded } => {
                            tracing::info!("Finished crawl of {} ({} results)", seed, recorded);
                        }
                        RunOutcome::Cancelled { .. } => {
                            return Ok(SeedProgress {
                                completed: index,
                                cancelled: true,
                            });
                        }
                    }
                }

                Ok(SeedProgress {
                    completed: urls.len(),
                    cancelled: false,
                })
            }
        }
    }
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker")
            .field("config", &self.engine.config)
            .field("visited", &self.engine.registry.len())
            .field("recorded", &self.engine.aggregator.len())
            .field("progress_callback", &self.on_progress.is_some())
            .finish()
    }
}
