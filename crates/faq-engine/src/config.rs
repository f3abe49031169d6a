//! Desk configuration
//!
//! Loaded from an optional TOML file, then overridden by `FAQ_DESK_*`
//! environment variables.

use crate::error::ConfigError;
use faq_sources::{FeedLocation, SnapshotLocation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Spreadsheet id override
pub const ENV_SHEET_ID: &str = "FAQ_DESK_SHEET_ID";
/// Spreadsheet tab override
pub const ENV_SHEET_GID: &str = "FAQ_DESK_SHEET_GID";
/// Explicit feed URL override
pub const ENV_FEED_URL: &str = "FAQ_DESK_FEED_URL";
/// Snapshot path or URL override
pub const ENV_SNAPSHOT: &str = "FAQ_DESK_SNAPSHOT";
/// Local store directory override
pub const ENV_STORE_DIR: &str = "FAQ_DESK_STORE_DIR";
/// Answer service endpoint override
pub const ENV_ASSIST_URL: &str = "FAQ_DESK_ASSIST_URL";

/// Feed settings; an explicit URL wins over a sheet id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Spreadsheet id
    pub sheet_id: Option<String>,
    /// Spreadsheet tab id
    pub gid: String,
    /// Explicit CSV URL
    pub url: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sheet_id: None,
            gid: "0".to_string(),
            url: None,
        }
    }
}

impl FeedConfig {
    /// Resolved feed location, if any is configured
    #[must_use]
    pub fn location(&self) -> Option<FeedLocation> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Some(FeedLocation::Url(url.to_string()));
        }
        self.sheet_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| FeedLocation::sheet(id, self.gid.clone()))
    }
}

/// Desk configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Directory of the local store
    pub store_dir: PathBuf,
    /// Secondary copy of every local forest write
    pub mirror: Option<PathBuf>,
    /// Published snapshot, file path or URL
    pub snapshot: Option<String>,
    /// Spreadsheet feed
    pub feed: FeedConfig,
    /// Seconds a remote forest stays cached
    pub cache_ttl_secs: u64,
    /// Maximum cached remote forests
    pub cache_capacity: u64,
    /// Answer service endpoint
    pub assist_url: Option<String>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Extra category aliases (canonical id → source ids)
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".faq-desk"),
            mirror: None,
            snapshot: None,
            feed: FeedConfig::default(),
            cache_ttl_secs: 300,
            cache_capacity: 16,
            assist_url: None,
            request_timeout_secs: 10,
            aliases: BTreeMap::new(),
        }
    }
}

impl DeskConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid configuration TOML
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from an optional file, then apply environment overrides
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    /// Returns error if an override cannot be used
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        if let Some(id) = get(ENV_SHEET_ID) {
            self.feed.sheet_id = Some(id);
        }
        if let Some(gid) = get(ENV_SHEET_GID) {
            if !gid.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::InvalidEnv {
                    var: ENV_SHEET_GID.to_string(),
                    value: gid,
                });
            }
            self.feed.gid = gid;
        }
        if let Some(url) = get(ENV_FEED_URL) {
            self.feed.url = Some(url);
        }
        if let Some(snapshot) = get(ENV_SNAPSHOT) {
            self.snapshot = Some(snapshot);
        }
        if let Some(dir) = get(ENV_STORE_DIR) {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(url) = get(ENV_ASSIST_URL) {
            self.assist_url = Some(url);
        }
        Ok(())
    }

    /// With local store directory
    #[inline]
    #[must_use]
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// With mirror file
    #[inline]
    #[must_use]
    pub fn with_mirror(mut self, path: impl Into<PathBuf>) -> Self {
        self.mirror = Some(path.into());
        self
    }

    /// With snapshot location
    #[inline]
    #[must_use]
    pub fn with_snapshot(mut self, location: impl Into<String>) -> Self {
        self.snapshot = Some(location.into());
        self
    }

    /// With explicit feed URL
    #[inline]
    #[must_use]
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed.url = Some(url.into());
        self
    }

    /// With cache TTL
    #[inline]
    #[must_use]
    pub fn with_cache_ttl(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// With answer service endpoint
    #[inline]
    #[must_use]
    pub fn with_assist_url(mut self, url: impl Into<String>) -> Self {
        self.assist_url = Some(url.into());
        self
    }

    /// Snapshot location, if configured
    #[must_use]
    pub fn snapshot_location(&self) -> Option<SnapshotLocation> {
        self.snapshot
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(SnapshotLocation::parse)
    }

    /// Cache TTL as a duration
    #[inline]
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
