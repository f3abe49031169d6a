//! Category identity
//!
//! Category records shown to end users, and the alias table that maps a
//! category id onto the key a given source uses for it.
//!
//! # Example
//!
//! ```rust
//! use faq_category::{AliasTable, MatchKind};
//!
//! let aliases = AliasTable::default();
//! let hit = aliases.resolve("appointment", ["appoint"]).unwrap();
//! assert_eq!(hit.key, "appoint");
//! assert_eq!(hit.matched_by, MatchKind::Alias);
//! ```

#![warn(missing_docs)]

pub mod alias;
pub mod error;
pub mod label;
pub mod record;
pub mod registry;

// Re-exports
pub use alias::{AliasTable, CategoryMatch, MatchKind};
pub use error::CategoryError;
pub use label::{clean_label, description_for, strip_emoji};
pub use record::{default_categories, CategoryPatch, CategoryRecord};
pub use registry::CategoryRegistry;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
