//! Forests: every category's top-level sequence from one source

use crate::digest::ForestDigest;
use crate::node::PresetNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category id → ordered top-level nodes
///
/// Serializes as a plain JSON object (`{"support": [...], ...}`); key order
/// is preserved from the input so "first match" rules are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest(IndexMap<String, Vec<PresetNode>>);

impl Forest {
    /// Create empty forest
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// Returns error if the text is not a JSON object of node arrays
    #[inline]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Compact JSON encoding
    ///
    /// # Errors
    /// Returns error if serialization fails
    #[inline]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pretty JSON encoding (two-space indent)
    ///
    /// # Errors
    /// Returns error if serialization fails
    #[inline]
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Top-level nodes for a category key (exact match only)
    #[inline]
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&[PresetNode]> {
        self.0.get(category).map(Vec::as_slice)
    }

    /// Mutable top-level nodes for a category key
    #[inline]
    pub fn get_mut(&mut self, category: &str) -> Option<&mut Vec<PresetNode>> {
        self.0.get_mut(category)
    }

    /// Top-level nodes for a category key, created empty when missing
    #[inline]
    pub fn entry(&mut self, category: impl Into<String>) -> &mut Vec<PresetNode> {
        self.0.entry(category.into()).or_default()
    }

    /// Replace a category's nodes
    #[inline]
    pub fn insert(&mut self, category: impl Into<String>, nodes: Vec<PresetNode>) -> Option<Vec<PresetNode>> {
        self.0.insert(category.into(), nodes)
    }

    /// Remove a category, keeping the order of the remaining keys
    #[inline]
    pub fn remove(&mut self, category: &str) -> Option<Vec<PresetNode>> {
        self.0.shift_remove(category)
    }

    /// Check if the category key exists
    #[inline]
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    /// Category keys in insertion order
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate categories with their nodes
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PresetNode])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of category keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no category keys
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the forest holds any data at all
    ///
    /// A forest with a single empty category (`{"support": []}`) has data;
    /// only a forest without keys does not.
    #[inline]
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.0.is_empty()
    }

    /// Total node count across every category
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|nodes| nodes.iter())
            .map(PresetNode::subtree_len)
            .sum()
    }

    /// Digest over the canonical JSON encoding
    #[must_use]
    pub fn digest(&self) -> ForestDigest {
        // IndexMap of plain strings always serializes
        let json = serde_json::to_vec(&self.0).unwrap_or_default();
        ForestDigest::compute(&json)
    }
}

impl FromIterator<(String, Vec<PresetNode>)> for Forest {
    fn from_iter<I: IntoIterator<Item = (String, Vec<PresetNode>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Forest {
    type Item = (String, Vec<PresetNode>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<PresetNode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
