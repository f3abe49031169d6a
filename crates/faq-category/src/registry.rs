//! In-memory category registry
//!
//! # Deleting a category
//!
//! Categories and the forest entries keyed on their ids have independent
//! lifecycles. Deletion runs as two steps: the record is removed here first,
//! then the caller drops the forest key. Either step may be the last one to
//! succeed, and both leftovers are safe: a forest entry without a record is
//! unreachable from the category list, and a record without a forest entry
//! simply has no options.

use crate::error::CategoryError;
use crate::label::clean_label;
use crate::record::{default_categories, CategoryPatch, CategoryRecord};
use chrono::Utc;
use tracing::debug;

/// Ordered list of categories with CRUD helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    records: Vec<CategoryRecord>,
}

impl CategoryRegistry {
    /// Create a registry holding the default categories
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: default_categories(),
        }
    }

    /// Create from stored records
    ///
    /// An empty list falls back to the defaults.
    #[must_use]
    pub fn from_records(records: Vec<CategoryRecord>) -> Self {
        if records.is_empty() {
            Self::new()
        } else {
            Self { records }
        }
    }

    /// All categories in display order
    #[inline]
    #[must_use]
    pub fn list(&self) -> &[CategoryRecord] {
        &self.records
    }

    /// Consume into the stored representation
    #[inline]
    #[must_use]
    pub fn into_records(self) -> Vec<CategoryRecord> {
        self.records
    }

    /// Look up a category by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CategoryRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Check if a category id exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Create a custom category
    ///
    /// The label is trimmed and stripped of emoji. The id is `custom-` plus the
    /// current Unix time in milliseconds, bumped until it is unused.
    ///
    /// # Errors
    /// Returns [`CategoryError::EmptyLabel`] if the cleaned label is empty
    pub fn add(&mut self, label: &str, emoji: &str) -> Result<CategoryRecord, CategoryError> {
        let label = clean_label(label)?;
        let id = self.next_custom_id(Utc::now().timestamp_millis());
        let record = CategoryRecord::new(id, label, emoji.trim());

        debug!(id = %record.id, label = %record.label, "category added");
        self.records.push(record.clone());
        Ok(record)
    }

    fn next_custom_id(&self, mut millis: i64) -> String {
        loop {
            let id = format!("custom-{millis}");
            if !self.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }

    /// Insert a record with a caller-chosen id
    ///
    /// # Errors
    /// - [`CategoryError::EmptyLabel`] if the cleaned label is empty
    /// - [`CategoryError::DuplicateId`] if the id is taken
    pub fn insert(&mut self, mut record: CategoryRecord) -> Result<(), CategoryError> {
        record.label = clean_label(&record.label)?;
        if self.contains(&record.id) {
            return Err(CategoryError::duplicate(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    /// Merge `patch` into the category `id`
    ///
    /// Returns `Ok(false)` when the id is unknown.
    ///
    /// # Errors
    /// Returns [`CategoryError::EmptyLabel`] if the patch carries a blank label
    pub fn update(&mut self, id: &str, patch: CategoryPatch) -> Result<bool, CategoryError> {
        let label = patch.label.as_deref().map(clean_label).transpose()?;
        let Some(record) = self.records.iter_mut().find(|record| record.id == id) else {
            return Ok(false);
        };

        if let Some(label) = label {
            record.label = label;
        }
        if let Some(emoji) = patch.emoji {
            record.emoji = emoji;
        }
        if let Some(description) = patch.description {
            record.description = description;
        }
        debug!(id, "category updated");
        Ok(true)
    }

    /// Remove the category `id`; first step of a category deletion
    ///
    /// Returns `false` when the id is unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        let removed = self.records.len() != before;
        if removed {
            debug!(id, "category removed");
        }
        removed
    }

    /// Restore the default categories
    pub fn reset(&mut self) {
        self.records = default_categories();
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
