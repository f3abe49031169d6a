//! The common shape of every forest provider

use crate::error::SourceResult;
use async_trait::async_trait;
use faq_tree::Forest;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tracing::{debug, warn};

/// Where a forest came from, ordered by precedence (highest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The admin's working copy; exclusive once written
    LocalStore,
    /// Spreadsheet exported as CSV
    Feed,
    /// Last published export
    Snapshot,
    /// Compiled-in defaults
    Defaults,
}

impl SourceKind {
    /// Precedence rank, 0 is consulted first
    #[inline]
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::LocalStore => 0,
            Self::Feed => 1,
            Self::Snapshot => 2,
            Self::Defaults => 3,
        }
    }

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalStore => "local_store",
            Self::Feed => "feed",
            Self::Snapshot => "snapshot",
            Self::Defaults => "defaults",
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider of a full forest, or nothing
///
/// Implementations return `Ok(None)` when the source genuinely has no data
/// and an error when it could not be read. [`ForestSource::load`] folds both
/// into "absent" for callers that only care about fallthrough.
#[async_trait]
pub trait ForestSource: Send + Sync {
    /// Which source this is
    fn kind(&self) -> SourceKind;

    /// Read the whole forest
    ///
    /// # Errors
    /// Returns error if the source exists but cannot be read or parsed
    async fn fetch(&self) -> SourceResult<Option<Forest>>;

    /// Read the whole forest, logging and swallowing failures
    async fn load(&self) -> Option<Forest> {
        match self.fetch().await {
            Ok(Some(forest)) => {
                debug!(source = %self.kind(), categories = forest.len(), "source loaded");
                Some(forest)
            }
            Ok(None) => {
                debug!(source = %self.kind(), "source has no data");
                None
            }
            Err(err) => {
                warn!(source = %self.kind(), error = %err, "source unavailable, treating as absent");
                None
            }
        }
    }
}
