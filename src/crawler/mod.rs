//! Crawler module for frontier traversal and link discovery
//!
//! This module contains the crawling logic, including:
//! - HTML link extraction behind the `LinkExtractor` trait
//! - The frontier queue and permit-gated dispatch
//! - Overall crawl coordination and cancellation

mod coordinator;
mod parser;
mod scheduler;

pub use parser::{ExtractError, HtmlLinkExtractor, LinkExtractor};
pub use scheduler::{CrawlItem, ScheduledVisit, Scheduler};

pub(crate) use coordinator::{Coordinator, RunOutcome};
