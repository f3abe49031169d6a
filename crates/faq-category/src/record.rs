//! Category records

use crate::label::description_for;
use serde::{Deserialize, Serialize};

/// A category offered to end users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Category id, also the forest key
    pub id: String,
    /// Display label
    pub label: String,
    /// Icon shown next to the label
    #[serde(default)]
    pub emoji: String,
    /// Short description
    #[serde(default)]
    pub description: String,
}

impl CategoryRecord {
    /// Create a record with the default description
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, emoji: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            description: description_for(&label),
            label,
            emoji: emoji.into(),
        }
    }

    /// With a custom description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update for a category record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatch {
    /// New label (cleaned before storing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New emoji
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The categories that exist until explicitly deleted
#[must_use]
pub fn default_categories() -> Vec<CategoryRecord> {
    vec![
        CategoryRecord::new("support", "지원금", "💰"),
        CategoryRecord::new("campus", "금융캠퍼스", "🏫"),
        CategoryRecord::new("appointment", "위촉", "📋"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let records = default_categories();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["support", "campus", "appointment"]);
        assert_eq!(records[1].description, "금융캠퍼스 관련 문의");
    }

    #[test]
    fn serde_tolerates_missing_optional_fields() {
        let record: CategoryRecord = serde_json::from_str(r#"{"id":"x","label":"X"}"#).unwrap();
        assert_eq!(record.emoji, "");
        assert_eq!(record.description, "");
    }
}
