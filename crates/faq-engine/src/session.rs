//! End-user browsing session
//!
//! Holds the category and selection path between turns and applies the
//! engine's path recovery rules, so front ends only render what they get.

use crate::engine::ResolutionEngine;
use crate::resolution::{Resolution, SelectOutcome};
use faq_tree::SelectionPath;
use serde::Serialize;
use tracing::debug;

/// What a front end renders after one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "turn", rename_all = "snake_case")]
pub enum Turn {
    /// Show a resolution at the current path
    Show {
        /// Current resolution
        resolution: Resolution,
    },
    /// Speak `label` as the answer, then show what follows
    Echo {
        /// Label spoken as the answer
        label: String,
        /// Resolution after the echo
        then: Resolution,
    },
}

impl Turn {
    /// Resolution left on screen after this turn
    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        match self {
            Self::Show { resolution } | Self::Echo { then: resolution, .. } => resolution,
        }
    }
}

/// One user's walk through a category
#[derive(Debug)]
pub struct BrowsingSession<'a> {
    engine: &'a ResolutionEngine,
    category: String,
    path: SelectionPath,
}

impl<'a> BrowsingSession<'a> {
    /// Start at the top of `category`
    #[must_use]
    pub fn new(engine: &'a ResolutionEngine, category: impl Into<String>) -> Self {
        Self {
            engine,
            category: category.into(),
            path: SelectionPath::root(),
        }
    }

    /// Resume at `path`
    #[must_use]
    pub fn at(mut self, path: SelectionPath) -> Self {
        self.path = path;
        self
    }

    /// Category id
    #[inline]
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Current path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &SelectionPath {
        &self.path
    }

    /// Resolve the current path
    ///
    /// A title-only terminus is echoed and the path pops one level. A path
    /// that no longer resolves is cleared.
    pub async fn view(&mut self) -> Turn {
        let resolution = self.engine.resolve(&self.category, &self.path).await;
        match resolution {
            Resolution::LeafEcho { label } => {
                self.path = self.path.back();
                let then = self.engine.resolve(&self.category, &self.path).await;
                Turn::Echo { label, then }
            }
            Resolution::Empty if !self.path.is_empty() => {
                debug!(category = %self.category, path = %self.path, "clearing stale path");
                self.path = SelectionPath::root();
                Turn::Show {
                    resolution: self.engine.resolve(&self.category, &self.path).await,
                }
            }
            resolution => Turn::Show { resolution },
        }
    }

    /// Select a displayed option
    pub async fn select(&mut self, option_id: &str) -> Turn {
        match self.engine.select(&self.category, &self.path, option_id).await {
            SelectOutcome::Advanced { path, resolution } => {
                self.path = path;
                match resolution {
                    Resolution::Answer { .. } | Resolution::Options { .. } => Turn::Show { resolution },
                    _ => self.view().await,
                }
            }
            SelectOutcome::Echo { label, path } => {
                self.path = path;
                let then = self.engine.resolve(&self.category, &self.path).await;
                Turn::Echo { label, then }
            }
            SelectOutcome::Reset => {
                debug!(category = %self.category, option_id, "option vanished, resetting");
                self.reset().await
            }
        }
    }

    /// Go up one level
    pub async fn back(&mut self) -> Turn {
        self.path = self.engine.back(&self.path);
        self.view().await
    }

    /// Return to the top of the category
    pub async fn reset(&mut self) -> Turn {
        self.path = SelectionPath::root();
        self.view().await
    }

    /// Labels along the current path
    pub async fn breadcrumb(&self) -> Vec<String> {
        self.engine.breadcrumb(&self.category, &self.path).await
    }
}
