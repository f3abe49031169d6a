//! Category errors

use thiserror::Error;

/// Invalid category input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// Label is empty after trimming and emoji removal
    #[error("category label must not be empty")]
    EmptyLabel,

    /// Another category already uses the id
    #[error("category id '{id}' already exists")]
    DuplicateId {
        /// Clashing id
        id: String,
    },
}

impl CategoryError {
    /// Create duplicate id error
    #[inline]
    #[must_use]
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }
}
