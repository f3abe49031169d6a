//! Preset-answer resolution engine
//!
//! Decides what the support chat shows for a category and a selection path,
//! and lets an admin edit and publish the answer trees.
//!
//! # Components
//!
//! - [`ResolutionEngine`]: picks the effective forest per category and
//!   classifies paths into [`Resolution`]s
//! - [`BrowsingSession`]: one end user's path through a category
//! - [`AdminSession`]: working copy of the forest and category list
//! - [`ChangeNotifier`]: broadcasts admin writes to browsing front ends
//! - [`Assistant`]: free-text questions answered from documents, with
//!   escalation to a staff contact
//!
//! # Example
//!
//! ```rust
//! use faq_engine::{Resolution, ResolutionEngine};
//! use faq_sources::LocalStore;
//! use faq_tree::SelectionPath;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = ResolutionEngine::new(LocalStore::in_memory());
//! let resolution = engine.resolve("support", &SelectionPath::from(["A", "가"])).await;
//! assert!(matches!(resolution, Resolution::Answer { .. }));
//! # }
//! ```

#![warn(missing_docs)]

pub mod admin;
pub mod assist;
pub mod config;
pub mod contacts;
pub mod documents;
pub mod engine;
pub mod error;
pub mod notify;
pub mod resolution;
pub mod session;

// Re-exports
pub use admin::{AdminSession, CategoryDeletion, DEFAULT_OPTION_LABEL};
pub use assist::{
    reply_from_text, AnswerProvider, AnswerReply, AnswerRequest, AssistOutcome, Assistant, HttpAnswerProvider,
};
pub use config::{DeskConfig, FeedConfig};
pub use contacts::{default_contact, extract_from_document, format_extensions, ContactInfo, MAIN_PHONE};
pub use documents::{filter_for_category, merge_documents, Document, CONTACT_DOCUMENT};
pub use engine::{EffectiveForest, ResolutionEngine};
pub use error::{AssistError, ConfigError, EngineError, EngineResult};
pub use notify::{ChangeEvent, ChangeNotifier};
pub use resolution::{classify, select_in, OptionView, Resolution, SelectOutcome};
pub use session::{BrowsingSession, Turn};

/// Version of the engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
