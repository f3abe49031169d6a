//! Published snapshot of the forest
//!
//! The snapshot is a plain JSON forest produced by an explicit export step.
//! The running application only reads it.

use crate::error::{SourceError, SourceResult};
use crate::source::{ForestSource, SourceKind};
use async_trait::async_trait;
use faq_tree::Forest;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the snapshot lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotLocation {
    /// Local file
    File(PathBuf),
    /// Static file served over HTTP
    Url(String),
}

impl SnapshotLocation {
    /// Parse a location string: `http(s)://` prefixes are URLs, anything else a path
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

/// Read-only snapshot source
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    location: SnapshotLocation,
    client: reqwest::Client,
}

impl SnapshotSource {
    /// Create source for a location
    #[must_use]
    pub fn new(location: SnapshotLocation, client: reqwest::Client) -> Self {
        Self { location, client }
    }

    /// Snapshot file on disk
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(SnapshotLocation::File(path.into()), reqwest::Client::new())
    }

    /// Snapshot served over HTTP
    #[must_use]
    pub fn url(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self::new(SnapshotLocation::Url(url.into()), client)
    }

    /// Configured location
    #[inline]
    #[must_use]
    pub fn location(&self) -> &SnapshotLocation {
        &self.location
    }

    async fn read_text(&self) -> SourceResult<Option<(String, String)>> {
        match &self.location {
            SnapshotLocation::File(path) => match tokio::fs::read_to_string(path).await {
                Ok(text) => Ok(Some((text, path.display().to_string()))),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(SourceError::io_error(path, err)),
            },
            SnapshotLocation::Url(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if status == StatusCode::NOT_FOUND {
                    return Ok(None);
                }
                if !status.is_success() {
                    return Err(SourceError::status(url, status.as_u16()));
                }
                Ok(Some((response.text().await?, url.clone())))
            }
        }
    }
}

#[async_trait]
impl ForestSource for SnapshotSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Snapshot
    }

    async fn fetch(&self) -> SourceResult<Option<Forest>> {
        let Some((text, origin)) = self.read_text().await? else {
            return Ok(None);
        };
        let forest = Forest::from_json(&text).map_err(|e| SourceError::malformed(origin, e))?;
        Ok(forest.has_data().then_some(forest))
    }
}

/// Write `forest` as a pretty-printed snapshot file
///
/// # Errors
/// Returns error if the file or its parent directory cannot be written
pub async fn export_snapshot(forest: &Forest, path: &Path) -> SourceResult<()> {
    let mut json = forest
        .to_json_pretty()
        .map_err(|e| SourceError::malformed(path.display().to_string(), e))?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SourceError::io_error(parent, e))?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|e| SourceError::io_error(path, e))?;

    info!(path = %path.display(), categories = forest.len(), nodes = forest.node_count(), "snapshot exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_tree::default_forest;

    #[test]
    fn location_parse() {
        assert_eq!(
            SnapshotLocation::parse("https://cdn.example/preset-answers.json"),
            SnapshotLocation::Url("https://cdn.example/preset-answers.json".into())
        );
        assert_eq!(
            SnapshotLocation::parse("public/preset-answers.json"),
            SnapshotLocation::File(PathBuf::from("public/preset-answers.json"))
        );
    }

    #[tokio::test]
    async fn missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::file(dir.path().join("nope.json"));
        assert!(source.fetch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn export_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("preset-answers.json");
        export_snapshot(&default_forest(), &path).await.unwrap();

        let source = SnapshotSource::file(&path);
        assert_eq!(source.fetch().await.unwrap(), Some(default_forest()));
    }

    #[tokio::test]
    async fn malformed_file_is_error_then_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[]").unwrap();

        let source = SnapshotSource::file(&path);
        assert!(matches!(source.fetch().await, Err(SourceError::MalformedJson { .. })));
        assert!(source.load().await.is_none());
    }

    #[tokio::test]
    async fn empty_object_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(SnapshotSource::file(&path).fetch().await.unwrap().is_none());
    }
}
