//! Preset-answer tree model
//!
//! Recursive option trees shown by the support desk, keyed per category.
//!
//! # Core Concepts
//!
//! - [`PresetNode`]: one option; a branch, an answer leaf, or a title-only leaf
//! - [`Forest`]: category id → ordered top-level nodes, as exposed by one source
//! - [`SelectionPath`]: node ids chosen so far, root to current
//! - [`TreePosition`]: tagged position reached while walking a path
//! - [`TreeEdit`]: path-addressed add/delete/update/reorder commands
//!
//! # Example
//!
//! ```rust
//! use faq_tree::{default_forest, find_node, SelectionPath};
//!
//! let forest = default_forest();
//! let nodes = forest.get("support").unwrap();
//! let node = find_node(nodes, &SelectionPath::from(["A", "가"])).unwrap();
//! assert!(node.active_answer().is_some());
//! ```

#![warn(unreachable_pub)]

mod defaults;
mod digest;
mod edit;
mod forest;
mod node;
mod path;
mod position;

pub use defaults::{default_forest, seeded_answer, DEFAULT_CATEGORY_IDS};
pub use digest::{DigestError, ForestDigest};
pub use edit::{
    add_node, delete_node, find_node, find_node_mut, reorder_top_level, update_node, validate_label,
    EditError, EditOutcome, NodePatch, TreeEdit,
};
pub use forest::Forest;
pub use node::{fresh_node_id, NodeKind, PresetNode};
pub use path::{PathError, SelectionPath};
pub use position::{breadcrumb, walk, TreePosition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
