//! Per-probe progress notification
//!
//! Probing tasks never call the user's callback themselves. They push events
//! into an unbounded channel and a single consumer on the blocking pool
//! invokes the callback, so a slow callback only delays its own queue.

use crate::types::LinkStatus;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

/// Callback invoked with `(url, status)` once per completed probe
pub type ProgressCallback = Arc<dyn Fn(&str, LinkStatus) + Send + Sync>;

/// A completed probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub url: String,
    pub status: LinkStatus,
}

/// Sending half handed to probing tasks
#[derive(Clone, Default)]
pub struct ProgressNotifier {
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressNotifier {
    /// A notifier that drops every event
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queues an event; never blocks
    pub fn notify(&self, url: &str, status: LinkStatus) {
        if let Some(tx) = &self.tx {
            let event = ProgressEvent {
                url: url.to_string(),
                status,
            };
            if tx.send(event).is_err() {
                tracing::trace!("Progress consumer gone, dropping event for {}", url);
            }
        }
    }
}

impl fmt::Debug for ProgressNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressNotifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Consumer side, owns the task that runs the callback
#[derive(Debug)]
pub struct ProgressDispatcher {
    handle: JoinHandle<()>,
}

impl ProgressDispatcher {
    /// Starts the consumer and returns the notifier feeding it
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(callback: ProgressCallback) -> (ProgressNotifier, Self) {
        let (tx, mut rx) = mpsc::unbounded_channel::<ProgressEvent>();

        let handle = tokio::task::spawn_blocking(move || {
            while let Some(event) = rx.blocking_recv() {
                callback(&event.url, event.status);
            }
        });

        (ProgressNotifier { tx: Some(tx) }, Self { handle })
    }

    /// Waits until every queued event has been delivered
    ///
    /// Only returns once all notifiers feeding this dispatcher are dropped.
    pub async fn finish(self) {
        if let Err(e) = self.handle.await {
            tracing::warn!("Progress callback panicked: {}", e);
        }
    }
}
