//! Locally persisted working copy
//!
//! The local store keeps the admin's forest and category list as JSON text
//! under two well-known keys in a [`KeyValueStore`]. Once a forest has been
//! written here it shadows every other source.

use crate::error::{SourceError, SourceResult};
use crate::source::{ForestSource, SourceKind};
use async_trait::async_trait;
use faq_category::{default_categories, CategoryRecord};
use faq_tree::Forest;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key holding the serialized forest
pub const FOREST_KEY: &str = "preset-answers-data";

/// Key holding the serialized category list
pub const CATEGORIES_KEY: &str = "categories-list";

/// Synchronous string key-value storage, whole-value replace only
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be read
    fn get(&self, key: &str) -> SourceResult<Option<String>>;

    /// Replace a value
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written
    fn set(&self, key: &str, value: &str) -> SourceResult<()>;

    /// Remove a value; removing a missing key is not an error
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written
    fn remove(&self, key: &str) -> SourceResult<()>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create store rooted at `dir` (created on first write)
    #[inline]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> SourceResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SourceError::io_error(path, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> SourceResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| SourceError::io_error(&self.dir, e))?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| SourceError::io_error(path, e))
    }

    fn remove(&self, key: &str) -> SourceResult<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SourceError::io_error(path, err)),
        }
    }
}

/// In-memory store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Check if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> SourceResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SourceResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SourceResult<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// The admin's working copy, with an optional file mirror
///
/// Writes replace the whole forest. After a successful write the forest is
/// also copied, pretty-printed, to the mirror file if one is configured; a
/// mirror failure is logged and never fails the write.
#[derive(Clone)]
pub struct LocalStore {
    store: Arc<dyn KeyValueStore>,
    mirror: Option<PathBuf>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("mirror", &self.mirror)
            .finish_non_exhaustive()
    }
}

impl LocalStore {
    /// Create over any key-value store
    #[must_use]
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            mirror: None,
        }
    }

    /// Create over a shared key-value store
    #[must_use]
    pub fn from_shared(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, mirror: None }
    }

    /// File-backed store in `dir`
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileKeyValueStore::new(dir))
    }

    /// In-memory store
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryKeyValueStore::new())
    }

    /// With a secondary file copy of every forest write
    #[must_use]
    pub fn with_mirror(mut self, path: impl Into<PathBuf>) -> Self {
        self.mirror = Some(path.into());
        self
    }

    /// Mirror file, if configured
    #[inline]
    #[must_use]
    pub fn mirror(&self) -> Option<&Path> {
        self.mirror.as_deref()
    }

    /// Read the stored forest
    ///
    /// A stored `{}` counts as no data.
    ///
    /// # Errors
    /// Returns error if the store fails or the stored JSON is malformed
    pub fn try_read_forest(&self) -> SourceResult<Option<Forest>> {
        let Some(text) = self.store.get(FOREST_KEY)? else {
            return Ok(None);
        };
        let forest = Forest::from_json(&text).map_err(|e| SourceError::malformed(FOREST_KEY, e))?;
        Ok(forest.has_data().then_some(forest))
    }

    /// Read the stored forest, treating any failure as no data
    #[must_use]
    pub fn read_forest(&self) -> Option<Forest> {
        match self.try_read_forest() {
            Ok(forest) => forest,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable local forest");
                None
            }
        }
    }

    /// Check if the local store holds any forest at all
    #[inline]
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.read_forest().is_some()
    }

    /// Replace the stored forest, then refresh the mirror
    ///
    /// # Errors
    /// Returns error if the primary write fails; mirror failures are only logged
    pub fn write_forest(&self, forest: &Forest) -> SourceResult<()> {
        let json = forest.to_json().map_err(|e| SourceError::malformed(FOREST_KEY, e))?;
        self.store.set(FOREST_KEY, &json)?;
        debug!(categories = forest.len(), digest = %forest.digest().short(), "local forest written");

        if let Some(mirror) = &self.mirror {
            if let Err(err) = write_pretty(mirror, forest) {
                warn!(path = %mirror.display(), error = %err, "mirror write failed");
            }
        }
        Ok(())
    }

    /// Remove the stored forest
    ///
    /// # Errors
    /// Returns error if the store cannot be written
    pub fn clear_forest(&self) -> SourceResult<()> {
        self.store.remove(FOREST_KEY)
    }

    /// Read the category list
    ///
    /// Missing, empty or malformed data yields the default categories.
    #[must_use]
    pub fn read_categories(&self) -> Vec<CategoryRecord> {
        let text = match self.store.get(CATEGORIES_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return default_categories(),
            Err(err) => {
                warn!(error = %err, "category list unreadable, using defaults");
                return default_categories();
            }
        };
        match serde_json::from_str::<Vec<CategoryRecord>>(&text) {
            Ok(records) if !records.is_empty() => records,
            Ok(_) => default_categories(),
            Err(err) => {
                warn!(error = %err, "malformed category list, using defaults");
                default_categories()
            }
        }
    }

    /// Replace the category list
    ///
    /// # Errors
    /// Returns error if the store cannot be written
    pub fn write_categories(&self, records: &[CategoryRecord]) -> SourceResult<()> {
        let json = serde_json::to_string(records).map_err(|e| SourceError::malformed(CATEGORIES_KEY, e))?;
        self.store.set(CATEGORIES_KEY, &json)
    }

    /// Remove the category list
    ///
    /// # Errors
    /// Returns error if the store cannot be written
    pub fn clear_categories(&self) -> SourceResult<()> {
        self.store.remove(CATEGORIES_KEY)
    }
}

fn write_pretty(path: &Path, forest: &Forest) -> SourceResult<()> {
    let json = forest
        .to_json_pretty()
        .map_err(|e| SourceError::malformed(path.display().to_string(), e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SourceError::io_error(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| SourceError::io_error(path, e))
}

#[async_trait]
impl ForestSource for LocalStore {
    fn kind(&self) -> SourceKind {
        SourceKind::LocalStore
    }

    async fn fetch(&self) -> SourceResult<Option<Forest>> {
        self.try_read_forest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_tree::PresetNode;
    use pretty_assertions::assert_eq;

    fn forest() -> Forest {
        let mut forest = Forest::new();
        forest.insert("support", vec![PresetNode::new("A", "A 옵션").with_answer("답")]);
        forest
    }

    #[test]
    fn empty_store_has_no_forest() {
        let local = LocalStore::in_memory();
        assert!(local.read_forest().is_none());
        assert!(!local.has_data());
    }

    #[test]
    fn forest_roundtrip() {
        let local = LocalStore::in_memory();
        local.write_forest(&forest()).unwrap();
        assert_eq!(local.read_forest(), Some(forest()));
    }

    #[test]
    fn empty_category_counts_as_data() {
        let store = MemoryKeyValueStore::new();
        store.set(FOREST_KEY, r#"{"support": []}"#).unwrap();
        let local = LocalStore::new(store);
        assert!(local.has_data());
    }

    #[test]
    fn empty_object_is_no_data() {
        let store = MemoryKeyValueStore::new();
        store.set(FOREST_KEY, "{}").unwrap();
        assert!(LocalStore::new(store).read_forest().is_none());
    }

    #[test]
    fn malformed_json_is_no_data() {
        let store = MemoryKeyValueStore::new();
        store.set(FOREST_KEY, "{not json").unwrap();
        let local = LocalStore::new(store);
        assert!(matches!(local.try_read_forest(), Err(SourceError::MalformedJson { .. })));
        assert!(local.read_forest().is_none());
    }

    #[test]
    fn clear_forest_removes_data() {
        let local = LocalStore::in_memory();
        local.write_forest(&forest()).unwrap();
        local.clear_forest().unwrap();
        assert!(!local.has_data());
    }

    #[test]
    fn categories_fall_back_to_defaults() {
        let store = MemoryKeyValueStore::new();
        let local = LocalStore::new(store.clone());
        assert_eq!(local.read_categories(), default_categories());

        store.set(CATEGORIES_KEY, "[]").unwrap();
        assert_eq!(local.read_categories(), default_categories());

        store.set(CATEGORIES_KEY, "oops").unwrap();
        assert_eq!(local.read_categories(), default_categories());

        let custom = vec![CategoryRecord::new("custom-1", "교육", "🎓")];
        local.write_categories(&custom).unwrap();
        assert_eq!(local.read_categories(), custom);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::in_dir(dir.path().join("store"));
        assert!(local.read_forest().is_none());

        local.write_forest(&forest()).unwrap();
        assert!(dir.path().join("store").join("preset-answers-data.json").exists());
        assert_eq!(local.read_forest(), Some(forest()));
    }

    #[test]
    fn mirror_receives_pretty_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = dir.path().join("public").join("preset-answers.json");
        let local = LocalStore::in_memory().with_mirror(&mirror);
        local.write_forest(&forest()).unwrap();

        let text = std::fs::read_to_string(&mirror).unwrap();
        assert!(text.contains("\n  \"support\""));
        assert_eq!(Forest::from_json(&text).unwrap(), forest());
    }

    #[test]
    fn mirror_failure_does_not_fail_write() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let local = LocalStore::in_memory().with_mirror(blocker.join("preset-answers.json"));
        local.write_forest(&forest()).unwrap();
        assert_eq!(local.read_forest(), Some(forest()));
    }

    #[tokio::test]
    async fn as_forest_source() {
        let local = LocalStore::in_memory();
        assert!(local.load().await.is_none());
        local.write_forest(&forest()).unwrap();
        assert_eq!(local.load().await, Some(forest()));
    }
}
