//! Error types for the engine
//!
//! Resolution itself never fails: unresolvable categories, broken paths and
//! unavailable sources degrade to an empty result. Errors here come from admin
//! writes, configuration and the answer collaborator.

use faq_category::CategoryError;
use faq_sources::SourceError;
use faq_tree::EditError;
use std::path::PathBuf;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Reading or writing a source failed
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Invalid tree edit
    #[error("invalid edit: {0}")]
    Edit(#[from] EditError),

    /// Invalid category input
    #[error("invalid category: {0}")]
    Category(#[from] CategoryError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be built
    #[error("http client error: {0}")]
    Client(#[source] reqwest::Error),

    /// Admin action needs a source that is not configured
    #[error("no {0} source configured")]
    SourceNotConfigured(&'static str),
}

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override has an unusable value
    #[error("invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the free-text answer collaborator
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    /// The question is blank
    #[error("question must not be empty")]
    EmptyQuestion,

    /// No document context to answer from
    #[error("document context must not be empty")]
    EmptyContext,

    /// Request could not be completed
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Collaborator answered with a non-success status
    #[error("answer service returned status {0}")]
    Status(u16),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_error_converts() {
        let err: EngineError = EditError::EmptyLabel.into();
        assert_eq!(err.to_string(), "invalid edit: label must not be empty");
    }

    #[test]
    fn not_configured_display() {
        let err = EngineError::SourceNotConfigured("feed");
        assert_eq!(err.to_string(), "no feed source configured");
    }
}
