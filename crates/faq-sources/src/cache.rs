//! Remote forest cache using moka
//!
//! Memoizes the outcome of loading a remote source (including "absent") per
//! [`SourceKind`] so repeated resolutions do not refetch the feed or the
//! snapshot. Entries expire after a TTL or when invalidated explicitly.

use crate::source::{ForestSource, SourceKind};
use faq_tree::Forest;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Cached load results keyed by source kind
#[derive(Debug, Clone)]
pub struct SourceCache {
    inner: Cache<SourceKind, Option<Arc<Forest>>>,
}

impl SourceCache {
    /// Create cache without expiration
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Cached load result for `source`, loading it on a miss
    ///
    /// Concurrent misses for the same kind share a single load.
    pub async fn load(&self, source: &dyn ForestSource) -> Option<Arc<Forest>> {
        self.inner
            .get_with(source.kind(), async { source.load().await.map(Arc::new) })
            .await
    }

    /// Cached entry without loading
    #[inline]
    pub async fn get(&self, kind: SourceKind) -> Option<Option<Arc<Forest>>> {
        self.inner.get(&kind).await
    }

    /// Drop one source's entry
    #[inline]
    pub async fn invalidate(&self, kind: SourceKind) {
        self.inner.invalidate(&kind).await;
    }

    /// Drop every entry
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for SourceCache {
    /// Five-minute TTL, room for every source kind
    fn default() -> Self {
        Self::with_ttl(16, Duration::from_secs(300))
    }
}
