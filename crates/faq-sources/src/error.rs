//! Error types for forest sources
//!
//! Every variant is recoverable: callers going through
//! [`ForestSource::load`](crate::ForestSource::load) see an absent source, and
//! the error is only logged.

use std::path::PathBuf;

/// Errors reading or writing a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// IO error on a file-backed source
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored or fetched JSON does not describe a forest
    #[error("malformed json in {origin}: {source}")]
    MalformedJson {
        /// Store key, file or URL the text came from
        origin: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Request could not be completed
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Feed text is not valid CSV
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl SourceError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create malformed JSON error
    pub fn malformed(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedJson {
            origin: origin.into(),
            source,
        }
    }

    /// Create status error
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }
}

/// Result type alias for source operations
pub type SourceResult<T> = Result<T, SourceError>;
