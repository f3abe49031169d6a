//! Change notifications
//!
//! Admin writes publish a [`ChangeEvent`]; browsing front ends subscribe and
//! re-resolve. Publishing with no subscribers is not an error.

use faq_tree::ForestDigest;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Something that changes what resolution returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// The local forest was replaced
    ForestSaved {
        /// Digest of the saved forest
        digest: ForestDigest,
    },
    /// The local forest was removed; other sources apply again
    ForestCleared,
    /// The category list changed
    CategoriesChanged,
    /// Cached remote forests were dropped
    SourcesRefreshed,
}

/// Broadcast channel for [`ChangeEvent`]s
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    /// Create notifier buffering up to `capacity` events per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish an event, returning how many subscribers received it
    pub fn publish(&self, event: ChangeEvent) -> usize {
        debug!(?event, "change published");
        self.tx.send(event).unwrap_or(0)
    }

    /// Current subscriber count
    #[inline]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}
