//! Admin editing session
//!
//! An [`AdminSession`] owns a working copy of the whole forest plus the
//! category list. Edits are applied to the working copy only; [`AdminSession::save`]
//! replaces the local store, which from then on wins precedence for every
//! category.

use crate::engine::ResolutionEngine;
use crate::error::{EngineError, EngineResult};
use crate::notify::ChangeEvent;
use faq_category::{CategoryPatch, CategoryRecord, CategoryRegistry};
use faq_sources::{ForestSource, SourceKind};
use faq_tree::{EditOutcome, Forest, ForestDigest, PresetNode, SelectionPath, TreeEdit};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Label given to options created with [`AdminSession::add_option`]
pub const DEFAULT_OPTION_LABEL: &str = "새 옵션";

/// What a category deletion removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryDeletion {
    /// The category record existed and was removed
    pub record_removed: bool,
    /// The forest held options for the category and they were removed
    pub forest_removed: bool,
}

/// Working copy of the forest and categories for one admin
#[derive(Debug)]
pub struct AdminSession<'a> {
    engine: &'a ResolutionEngine,
    forest: Forest,
    categories: CategoryRegistry,
    loaded_from: SourceKind,
    dirty: bool,
}

impl<'a> AdminSession<'a> {
    /// Open a session, loading the local store, else the snapshot, else defaults
    pub async fn load(engine: &'a ResolutionEngine) -> AdminSession<'a> {
        let (forest, loaded_from) = working_copy(engine).await;
        info!(source = %loaded_from, categories = forest.len(), "admin working copy loaded");
        Self {
            engine,
            forest,
            categories: CategoryRegistry::from_records(engine.local().read_categories()),
            loaded_from,
            dirty: false,
        }
    }

    /// The working forest
    #[inline]
    #[must_use]
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// The working category list
    #[inline]
    #[must_use]
    pub fn categories(&self) -> &[CategoryRecord] {
        self.categories.list()
    }

    /// Where the working copy was last loaded from
    #[inline]
    #[must_use]
    pub fn loaded_from(&self) -> SourceKind {
        self.loaded_from
    }

    /// Check for unsaved edits
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forest key used for `category` in the working copy
    ///
    /// An existing key is found through the alias table; otherwise the
    /// category's outward id is used.
    #[must_use]
    pub fn category_key(&self, category: &str) -> String {
        let aliases = self.engine.aliases();
        aliases
            .resolve(category, self.forest.keys())
            .map_or_else(|| aliases.outward_id(category).to_string(), |matched| matched.key)
    }

    /// Top-level nodes of `category` in the working copy
    #[must_use]
    pub fn nodes(&self, category: &str) -> &[PresetNode] {
        self.forest.get(&self.category_key(category)).unwrap_or_default()
    }

    /// Apply an edit to `category`
    ///
    /// A category without options gains a key only when the edit applies.
    ///
    /// # Errors
    /// Returns error on invalid input; the working copy is left untouched
    pub fn apply(&mut self, category: &str, edit: &TreeEdit) -> EngineResult<EditOutcome> {
        let key = self.category_key(category);
        let current = self.forest.get(&key).unwrap_or_default();
        let (nodes, outcome) = edit.applied(current)?;

        if outcome.is_applied() {
            self.forest.insert(key.clone(), nodes);
            self.dirty = true;
            debug!(category = %key, %edit, "edit applied");
        } else {
            debug!(category = %key, %edit, ?outcome, "edit skipped");
        }
        Ok(outcome)
    }

    /// Append a title-only option labelled [`DEFAULT_OPTION_LABEL`] under `parent`
    ///
    /// Returns the outcome and the new option's id.
    ///
    /// # Errors
    /// Returns error on invalid input
    pub fn add_option(&mut self, category: &str, parent: &SelectionPath) -> EngineResult<(EditOutcome, String)> {
        let node = PresetNode::draft(DEFAULT_OPTION_LABEL);
        let id = node.id.clone();
        let outcome = self.apply(
            category,
            &TreeEdit::Add {
                parent: parent.clone(),
                node,
            },
        )?;
        Ok((outcome, id))
    }

    /// Write the working copy to the local store
    ///
    /// # Errors
    /// Returns error if the local store cannot be written
    pub fn save(&mut self) -> EngineResult<ForestDigest> {
        self.engine.local().write_forest(&self.forest)?;
        let digest = self.forest.digest();
        self.dirty = false;
        self.loaded_from = SourceKind::LocalStore;
        info!(digest = %digest.short(), categories = self.forest.len(), "working copy saved");
        self.engine.notify_changed(ChangeEvent::ForestSaved { digest });
        Ok(digest)
    }

    /// Drop the local forest and start over from the compiled-in defaults
    ///
    /// Other sources apply again until the next save.
    ///
    /// # Errors
    /// Returns error if the local store cannot be cleared
    pub fn reset_to_defaults(&mut self) -> EngineResult<()> {
        self.engine.local().clear_forest()?;
        self.forest = self.engine.defaults().clone();
        self.loaded_from = SourceKind::Defaults;
        self.dirty = false;
        info!("local forest cleared, working copy reset to defaults");
        self.engine.notify_changed(ChangeEvent::ForestCleared);
        Ok(())
    }

    /// Discard unsaved edits and reload the working copy
    pub async fn restore(&mut self) -> SourceKind {
        let (forest, loaded_from) = working_copy(self.engine).await;
        if self.dirty {
            warn!("discarding unsaved edits");
        }
        self.forest = forest;
        self.loaded_from = loaded_from;
        self.dirty = false;
        loaded_from
    }

    /// Replace the working copy with the feed's forest
    ///
    /// Returns `false` when the feed has no data; the working copy is then
    /// unchanged. The result still has to be saved.
    ///
    /// # Errors
    /// Returns error if no feed is configured or the feed cannot be read
    pub async fn import_feed(&mut self) -> EngineResult<bool> {
        let feed = self
            .engine
            .source(SourceKind::Feed)
            .ok_or(EngineError::SourceNotConfigured("feed"))?;

        let Some(forest) = feed.fetch().await? else {
            warn!("feed has no data, working copy unchanged");
            return Ok(false);
        };
        info!(categories = forest.len(), nodes = forest.node_count(), "working copy imported from feed");
        self.forest = forest;
        self.loaded_from = SourceKind::Feed;
        self.dirty = true;
        Ok(true)
    }

    /// Publish the working copy as a snapshot file
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub async fn export_snapshot(&self, path: &Path) -> EngineResult<ForestDigest> {
        faq_sources::export_snapshot(&self.forest, path).await?;
        Ok(self.forest.digest())
    }

    /// Add a custom category and persist the list
    ///
    /// # Errors
    /// Returns error if the label is blank or the list cannot be written
    pub fn add_category(&mut self, label: &str, emoji: &str) -> EngineResult<CategoryRecord> {
        let record = self.categories.add(label, emoji)?;
        self.persist_categories()?;
        Ok(record)
    }

    /// Patch a category and persist the list
    ///
    /// Returns `false` when the id is unknown.
    ///
    /// # Errors
    /// Returns error if the label is blank or the list cannot be written
    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> EngineResult<bool> {
        if !self.categories.update(id, patch)? {
            return Ok(false);
        }
        self.persist_categories()?;
        Ok(true)
    }

    /// Delete a category record, then its options
    ///
    /// The record is removed and persisted right away. The forest entry stored
    /// under exactly `id` is dropped from the working copy only and reaches
    /// the local store with the next [`save`](Self::save); until then it is an
    /// unreachable orphan.
    ///
    /// # Errors
    /// Returns error if the category list cannot be written
    pub fn delete_category(&mut self, id: &str) -> EngineResult<CategoryDeletion> {
        let mut deletion = CategoryDeletion {
            record_removed: self.categories.delete(id),
            ..CategoryDeletion::default()
        };
        if deletion.record_removed {
            self.persist_categories()?;
        }

        if self.forest.remove(id).is_some() {
            deletion.forest_removed = true;
            self.dirty = true;
        }
        info!(id, ?deletion, "category deleted");
        Ok(deletion)
    }

    /// Restore the default category list
    ///
    /// # Errors
    /// Returns error if the local store cannot be written
    pub fn reset_categories(&mut self) -> EngineResult<()> {
        self.categories.reset();
        self.engine.local().clear_categories()?;
        self.engine.notify_changed(ChangeEvent::CategoriesChanged);
        Ok(())
    }

    fn persist_categories(&self) -> EngineResult<()> {
        self.engine.local().write_categories(self.categories.list())?;
        self.engine.notify_changed(ChangeEvent::CategoriesChanged);
        Ok(())
    }
}

async fn working_copy(engine: &ResolutionEngine) -> (Forest, SourceKind) {
    if let Some(forest) = engine.local().read_forest() {
        return (forest, SourceKind::LocalStore);
    }
    if let Some(forest) = engine.load_remote(SourceKind::Snapshot).await {
        return (Forest::clone(&forest), SourceKind::Snapshot);
    }
    (engine.defaults().clone(), SourceKind::Defaults)
}
