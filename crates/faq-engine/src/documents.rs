//! Reference documents for free-text answers

use faq_sources::SourceError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the document holding the contact tables
pub const CONTACT_DOCUMENT: &str = "contact-info.md";

/// A reference document, optionally scoped to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Display name
    pub name: String,
    /// Plain text content
    pub content: String,
    /// Category the document belongs to; `None` applies everywhere
    #[serde(default)]
    pub category: Option<String>,
}

impl Document {
    /// Create an unscoped document
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            category: None,
        }
    }

    /// Scope to a category
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Read a text file, named after its file name
    ///
    /// # Errors
    /// Returns error if the file cannot be read
    pub async fn from_file(path: &Path) -> Result<Self, SourceError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceError::io_error(path, e))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(name, content))
    }

    /// Check if the document applies to `category`
    #[inline]
    #[must_use]
    pub fn applies_to(&self, category: Option<&str>) -> bool {
        match (category, self.category.as_deref()) {
            (None, _) | (_, None) => true,
            (Some(wanted), Some(own)) => wanted == own,
        }
    }
}

/// Documents relevant to `category`
///
/// Without a category every document is relevant.
pub fn filter_for_category<'a>(documents: &'a [Document], category: Option<&str>) -> Vec<&'a Document> {
    documents.iter().filter(|doc| doc.applies_to(category)).collect()
}

/// Join documents into one context block
pub fn merge_documents<'a>(documents: impl IntoIterator<Item = &'a Document>) -> String {
    documents
        .into_iter()
        .map(|doc| format!("=== {} ===\n\n{}\n\n", doc.name, doc.content))
        .collect::<Vec<_>>()
        .join("\n")
}
