//! Resolution engine
//!
//! Owns the sources and answers "what should the chat show" for a category
//! and a selection path.
//!
//! # Source precedence
//!
//! 1. The local store, if it holds any forest at all. It is then used for
//!    every category, including ones it does not mention.
//! 2. Otherwise each remote source in precedence order (feed, then snapshot),
//!    skipping any whose forest does not resolve the category.
//! 3. Otherwise the compiled-in defaults, if they resolve the category.

use crate::config::DeskConfig;
use crate::error::{EngineError, EngineResult};
use crate::notify::{ChangeEvent, ChangeNotifier};
use crate::resolution::{classify, select_in, Resolution, SelectOutcome};
use faq_category::{AliasTable, CategoryMatch, CategoryRecord};
use faq_sources::{
    FeedSource, ForestSource, LocalStore, SnapshotSource, SourceCache, SourceKind,
};
use faq_tree::{breadcrumb, default_forest, Forest, PresetNode, SelectionPath};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// The forest chosen for a category, and the key it uses there
#[derive(Debug, Clone)]
pub struct EffectiveForest {
    /// Source that won precedence
    pub source: SourceKind,
    /// The whole forest from that source
    pub forest: Arc<Forest>,
    /// Key for the category; `None` when the source does not have it
    pub matched: Option<CategoryMatch>,
}

impl EffectiveForest {
    /// Top-level nodes of the category, if the source has it
    #[must_use]
    pub fn nodes(&self) -> Option<&[PresetNode]> {
        self.matched
            .as_ref()
            .and_then(|matched| self.forest.get(&matched.key))
    }
}

/// Resolution engine over a local store and any number of remote sources
pub struct ResolutionEngine {
    local: LocalStore,
    remote: Vec<Arc<dyn ForestSource>>,
    defaults: Arc<Forest>,
    aliases: AliasTable,
    cache: SourceCache,
    notifier: ChangeNotifier,
}

impl std::fmt::Debug for ResolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("local", &self.local)
            .field("remote", &self.remote.iter().map(|s| s.kind()).collect::<Vec<_>>())
            .field("default_categories", &self.defaults.len())
            .finish_non_exhaustive()
    }
}

impl ResolutionEngine {
    /// Create engine over a local store with the default forest and aliases
    #[must_use]
    pub fn new(local: LocalStore) -> Self {
        Self {
            local,
            remote: Vec::new(),
            defaults: Arc::new(default_forest()),
            aliases: AliasTable::default(),
            cache: SourceCache::default(),
            notifier: ChangeNotifier::default(),
        }
    }

    /// Build from configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn from_config(config: &DeskConfig) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(EngineError::Client)?;

        let mut local = LocalStore::in_dir(&config.store_dir);
        if let Some(mirror) = &config.mirror {
            local = local.with_mirror(mirror);
        }

        let aliases = config
            .aliases
            .iter()
            .fold(AliasTable::default(), |table, (canonical, list)| {
                table.with_aliases(canonical.clone(), list.iter().cloned())
            });

        let mut engine = Self::new(local)
            .with_aliases(aliases)
            .with_cache(SourceCache::with_ttl(config.cache_capacity, config.cache_ttl()));

        if let Some(location) = config.feed.location() {
            engine = engine.with_source(Arc::new(FeedSource::new(location, client.clone())));
        }
        if let Some(location) = config.snapshot_location() {
            engine = engine.with_source(Arc::new(SnapshotSource::new(location, client)));
        }

        info!(
            store = %config.store_dir.display(),
            remote = engine.remote.len(),
            "resolution engine configured"
        );
        Ok(engine)
    }

    /// Add a remote source; sources are consulted in precedence order
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn ForestSource>) -> Self {
        self.remote.push(source);
        self.remote.sort_by_key(|source| source.kind());
        self
    }

    /// With a custom alias table
    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// With a custom remote cache
    #[must_use]
    pub fn with_cache(mut self, cache: SourceCache) -> Self {
        self.cache = cache;
        self
    }

    /// With a custom compiled-in forest
    #[must_use]
    pub fn with_defaults(mut self, defaults: Forest) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }

    /// With a shared notifier
    #[must_use]
    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// The local store
    #[inline]
    #[must_use]
    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// The alias table
    #[inline]
    #[must_use]
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// The compiled-in forest
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &Forest {
        &self.defaults
    }

    /// The remote source of a given kind
    #[must_use]
    pub fn source(&self, kind: SourceKind) -> Option<&dyn ForestSource> {
        self.remote
            .iter()
            .find(|source| source.kind() == kind)
            .map(|source| &**source)
    }

    /// Load a remote source through the cache
    pub async fn load_remote(&self, kind: SourceKind) -> Option<Arc<Forest>> {
        let source = self.source(kind)?;
        self.cache.load(source).await
    }

    /// Pick the forest that answers for `category`
    ///
    /// Returns `None` only when no source (including the defaults) resolves
    /// the category while the local store is empty.
    pub async fn effective_forest(&self, category: &str) -> Option<EffectiveForest> {
        if let Some(forest) = self.local.read_forest() {
            let matched = self.aliases.resolve(category, forest.keys());
            if matched.is_none() {
                debug!(category, "local store is authoritative but lacks category");
            }
            return Some(EffectiveForest {
                source: SourceKind::LocalStore,
                forest: Arc::new(forest),
                matched,
            });
        }

        for source in &self.remote {
            let kind = source.kind();
            let Some(forest) = self.cache.load(source.as_ref()).await else {
                continue;
            };
            match self.aliases.resolve(category, forest.keys()) {
                Some(matched) => {
                    debug!(category, source = %kind, key = %matched.key, "category resolved");
                    return Some(EffectiveForest {
                        source: kind,
                        forest,
                        matched: Some(matched),
                    });
                }
                None => debug!(category, source = %kind, "category not in source"),
            }
        }

        let matched = self.aliases.resolve(category, self.defaults.keys());
        if matched.is_none() {
            debug!(category, "category unresolved in every source");
            return None;
        }
        Some(EffectiveForest {
            source: SourceKind::Defaults,
            forest: Arc::clone(&self.defaults),
            matched,
        })
    }

    /// Top-level nodes for `category`, owned
    pub async fn category_nodes(&self, category: &str) -> Option<Vec<PresetNode>> {
        let effective = self.effective_forest(category).await?;
        effective.nodes().map(<[PresetNode]>::to_vec)
    }

    /// Resolve `path` within `category`
    pub async fn resolve(&self, category: &str, path: &SelectionPath) -> Resolution {
        let Some(effective) = self.effective_forest(category).await else {
            return Resolution::Empty;
        };
        let Some(nodes) = effective.nodes() else {
            return Resolution::Empty;
        };
        let resolution = classify(nodes, path);
        if resolution.is_empty() && !path.is_empty() {
            debug!(category, %path, "path no longer resolves");
        }
        resolution
    }

    /// Select `option_id` among the options shown at `path`
    pub async fn select(&self, category: &str, path: &SelectionPath, option_id: &str) -> SelectOutcome {
        let Some(effective) = self.effective_forest(category).await else {
            return SelectOutcome::Reset;
        };
        let Some(nodes) = effective.nodes() else {
            return SelectOutcome::Reset;
        };
        select_in(nodes, path, option_id)
    }

    /// Path one level up
    #[inline]
    #[must_use]
    pub fn back(&self, path: &SelectionPath) -> SelectionPath {
        path.back()
    }

    /// Labels of the nodes along `path`
    pub async fn breadcrumb(&self, category: &str, path: &SelectionPath) -> Vec<String> {
        match self.effective_forest(category).await {
            Some(effective) => effective
                .nodes()
                .map(|nodes| breadcrumb(nodes, path))
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Categories to offer end users
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryRecord> {
        self.local.read_categories()
    }

    /// Subscribe to change events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.notifier.subscribe()
    }

    /// Drop cached remote forests and publish `event`
    pub fn notify_changed(&self, event: ChangeEvent) {
        self.cache.invalidate_all();
        self.notifier.publish(event);
    }

    /// Drop cached remote forests so the next resolution refetches them
    pub fn refresh(&self) {
        self.notify_changed(ChangeEvent::SourcesRefreshed);
    }
}
