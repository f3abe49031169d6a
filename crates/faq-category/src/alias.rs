//! Category id resolution across sources
//!
//! The widget's category ids and the ids used inside a source's forest do not
//! always agree ("appointment" vs "appoint"). [`AliasTable`] maps each
//! canonical id to its acceptable source-side spellings and picks the key a
//! loaded forest actually uses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which rule matched during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The id itself is present
    Exact,
    /// An alias from the table is present
    Alias,
    /// The id or an alias is present with different casing
    CaseInsensitive,
}

/// Source-side key picked for a category id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatch {
    /// Key as it appears in the forest
    pub key: String,
    /// Rule that produced the key
    pub matched_by: MatchKind,
}

impl CategoryMatch {
    fn new(key: &str, matched_by: MatchKind) -> Self {
        Self {
            key: key.to_string(),
            matched_by,
        }
    }
}

/// Canonical id → ordered list of acceptable source-side ids
///
/// Lists are self-inclusive and most-preferred first. Ids without an entry
/// alias only to themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, Vec<String>>,
}

const DEFAULT_ALIASES: [(&str, &[&str]); 7] = [
    ("appointment", &["appointment", "appoint"]),
    ("appoint", &["appoint", "appointment"]),
    ("grant", &["grant", "guarantee"]),
    ("guarantee", &["guarantee", "grant"]),
    ("support", &["support", "grant", "guarantee"]),
    ("campus", &["campus", "gfe"]),
    ("gfe", &["gfe", "campus"]),
];

impl AliasTable {
    /// Create an empty table (every id aliases only to itself)
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register aliases for `canonical`
    ///
    /// `canonical` is moved to the front of the list if missing.
    pub fn insert(&mut self, canonical: impl Into<String>, aliases: impl IntoIterator<Item = impl Into<String>>) {
        let canonical = canonical.into();
        let mut list: Vec<String> = Vec::new();
        for alias in aliases.into_iter().map(Into::into) {
            if !list.contains(&alias) {
                list.push(alias);
            }
        }
        if !list.contains(&canonical) {
            list.insert(0, canonical.clone());
        }
        self.entries.insert(canonical, list);
    }

    /// Builder form of [`AliasTable::insert`]
    #[must_use]
    pub fn with_aliases(mut self, canonical: impl Into<String>, aliases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.insert(canonical, aliases);
        self
    }

    /// Ordered aliases for `id`, self-inclusive
    #[must_use]
    pub fn aliases<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        match self.entries.get(id) {
            Some(list) => list.iter().map(String::as_str).collect(),
            None => vec![id],
        }
    }

    /// The id a source would use for writes (first alias)
    #[must_use]
    pub fn outward_id<'a>(&'a self, id: &'a str) -> &'a str {
        self.entries
            .get(id)
            .and_then(|list| list.first())
            .map_or(id, String::as_str)
    }

    /// Resolve `id` against the keys actually present in a forest
    ///
    /// Tries an exact match, then each alias in order, then a
    /// case-insensitive match of the id or any alias. Returns `None` when
    /// nothing matches.
    #[must_use]
    pub fn resolve<'k>(&self, id: &str, present: impl IntoIterator<Item = &'k str>) -> Option<CategoryMatch> {
        let present: Vec<&str> = present.into_iter().collect();

        if present.contains(&id) {
            return Some(CategoryMatch::new(id, MatchKind::Exact));
        }

        let aliases = self.aliases(id);
        if let Some(hit) = aliases.iter().find(|alias| present.contains(alias)) {
            return Some(CategoryMatch::new(hit, MatchKind::Alias));
        }

        aliases.iter().find_map(|alias| {
            let wanted = alias.to_lowercase();
            present
                .iter()
                .find(|key| key.to_lowercase() == wanted)
                .map(|key| CategoryMatch::new(key, MatchKind::CaseInsensitive))
        })
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        DEFAULT_ALIASES
            .iter()
            .fold(Self::empty(), |table, (canonical, aliases)| {
                table.with_aliases(*canonical, aliases.iter().copied())
            })
    }
}
