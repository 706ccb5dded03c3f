//! State shared by every task of a check run
//!
//! Each URL goes through the same sequence: ignore-check, dedup-check,
//! probe, record, notify.

use crate::checker::aggregator::ResultAggregator;
use crate::checker::progress::ProgressNotifier;
use crate::checker::prober::Prober;
use crate::checker::registry::VisitedRegistry;
use crate::config::{CheckMode, Config};
use crate::crawler::{CrawlItem, LinkExtractor};
use crate::types::LinkResult;
use crate::url::{extract_domain, DomainScope, IgnoreFilter};
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// What to do with a URL taken from the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// First sighting, not ignored: probe it
    Probe,

    /// A `skipped` result was recorded instead of probing
    Skipped,

    /// Rediscovered during a crawl; nothing recorded
    Dropped,
}

pub(crate) struct Engine {
    pub(crate) config: Config,
    pub(crate) ignore: IgnoreFilter,
    pub(crate) scope: DomainScope,
    pub(crate) prober: Prober,
    pub(crate) registry: VisitedRegistry,
    pub(crate) aggregator: ResultAggregator,
    pub(crate) extractor: Arc<dyn LinkExtractor>,

    /// Bounds in-flight probes across every crawl of this engine
    pub(crate) semaphore: Arc<Semaphore>,
}

impl Engine {
    /// Runs the ignore and dedup gates for one URL
    ///
    /// Seeds that lose the dedup gate are recorded as `skipped`; links found
    /// again while crawling are dropped so a page linked from every other
    /// page yields one result.
    pub(crate) fn admit(&self, item: &CrawlItem) -> Admission {
        let ignored = self.ignore.should_ignore(&item.url);

        if !self.registry.mark_if_new(&item.url) {
            if item.is_seed() {
                tracing::debug!("Skipping duplicate seed {}", item.url);
                self.aggregator
                    .record(LinkResult::skipped(item.url.as_str(), None));
                return Admission::Skipped;
            }
            tracing::trace!("Already seen {}", item.url);
            return Admission::Dropped;
        }

        if ignored {
            tracing::debug!("Ignoring {} (matches ignore pattern)", item.url);
            self.aggregator
                .record(LinkResult::skipped(item.url.as_str(), item.found_on.clone()));
            return Admission::Skipped;
        }

        Admission::Probe
    }

    /// Returns true if links should be extracted from this item's page
    fn should_expand(&self, item: &CrawlItem) -> bool {
        self.config.mode == CheckMode::Crawler && item.depth < self.config.max_depth
    }

    /// Probes an admitted URL, records the result and notifies progress
    ///
    /// Returns the in-scope links to schedule next; empty unless the page
    /// was expanded.
    pub(crate) async fn visit(&self, item: CrawlItem, notifier: &ProgressNotifier) -> Vec<CrawlItem> {
        let (result, links) = if self.should_expand(&item) {
            self.fetch_and_extract(&item).await
        } else {
            let result = self.prober.probe(&item.url, item.found_on.as_deref()).await;
            (result, Vec::new())
        };

        let status = result.status;
        tracing::debug!(
            "{} -> {} ({}) in {:?}",
            item.url,
            status,
            result.status_code,
            result.response_time
        );

        self.aggregator.record(result);
        notifier.notify(&item.url, status);

        links
            .into_iter()
            .filter(|link| {
                let allowed = self.scope.allows(link);
                if !allowed {
                    tracing::trace!("{} is outside the allowed domains", link);
                }
                allowed
            })
            .map(|link| CrawlItem::child(link, &item))
            .collect()
    }

    /// Returns true if following redirects moved the page to a host outside
    /// the allowed domains
    ///
    /// A seed on an out-of-scope host that stays on that host is still
    /// expanded.
    fn redirected_out_of_scope(&self, item: &CrawlItem, final_url: &Url) -> bool {
        let final_host = final_url.host_str().map(str::to_ascii_lowercase);
        final_host != extract_domain(&item.url) && !self.scope.allows(final_url.as_str())
    }

    /// GETs a page and extracts its links
    ///
    /// Extraction failure turns the page's result into `error`.
    async fn fetch_and_extract(&self, item: &CrawlItem) -> (LinkResult, Vec<String>) {
        let page = self
            .prober
            .fetch_page(&item.url, item.found_on.as_deref())
            .await;

        let (Some(body), Some(base_url)) = (page.body, page.final_url) else {
            return (page.result, Vec::new());
        };

        if self.redirected_out_of_scope(item, &base_url) {
            tracing::debug!(
                "{} redirected outside the allowed domains to {}; not following its links",
                item.url,
                base_url
            );
            return (page.result, Vec::new());
        }

        match self.extractor.extract(&body, &base_url) {
            Ok(links) => {
                tracing::debug!("Found {} links on {}", links.len(), item.url);
                (page.result, links)
            }
            Err(e) => {
                tracing::warn!("Failed to extract links from {}: {}", item.url, e);
                let result = page
                    .result
                    .into_page_failure(format!("link extraction failed: {}", e));
                (result, Vec::new())
            }
        }
    }
}
