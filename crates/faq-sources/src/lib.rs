//! Forest sources
//!
//! Three independent providers of a full forest keyed by category id:
//!
//! - [`LocalStore`]: the admin's working copy; synchronous, read/write
//! - [`SnapshotSource`]: the last published export; read-only, async
//! - [`FeedSource`]: a spreadsheet exported as CSV; read-only, async
//!
//! Each answers "the full forest, or nothing" through [`ForestSource`], so a
//! caller can tell an empty-by-design source from one that is unavailable.
//! [`SourceCache`] memoizes the remote ones.

#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod feed;
pub mod local;
pub mod snapshot;
pub mod source;

// Re-exports
pub use cache::{CacheStats, SourceCache};
pub use error::{SourceError, SourceResult};
pub use feed::{parse_feed, parse_feed_categories, FeedLocation, FeedSource};
pub use local::{
    FileKeyValueStore, KeyValueStore, LocalStore, MemoryKeyValueStore, CATEGORIES_KEY, FOREST_KEY,
};
pub use snapshot::{export_snapshot, SnapshotLocation, SnapshotSource};
pub use source::{ForestSource, SourceKind};
