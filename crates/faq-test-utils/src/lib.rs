//! Testing utilities for the FAQ desk workspace
//!
//! Shared fixtures: sample forests, feed CSV text and in-process sources.

#![allow(missing_docs)]

use async_trait::async_trait;
use faq_sources::{ForestSource, LocalStore, MemoryKeyValueStore, SourceError, SourceKind, SourceResult};
use faq_tree::{Forest, PresetNode};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Two header rows as exported by the spreadsheet
pub const FEED_HEADER: &str =
    "카테고리설정,,,프리셋설정\nid,label,,category,option,detail,opt1,ans1,opt2,ans2\n";

pub fn feed_csv(rows: &str) -> String {
    format!("{FEED_HEADER}{rows}")
}

/// A forest exercising every node shape
///
/// `support`:
/// - `both`: answer staged under two children
/// - `collapse`: exactly one title-only child
/// - `title`: title-only leaf
/// - `answer`: plain answer leaf
pub fn sample_forest() -> Forest {
    let mut forest = Forest::new();
    forest.insert(
        "support",
        vec![
            PresetNode::new("both", "Staged")
                .with_answer("latent answer")
                .with_children(vec![
                    PresetNode::new("x", "X").with_answer("x answer"),
                    PresetNode::new("y", "Y").with_answer("y answer"),
                ]),
            PresetNode::new("collapse", "Collapse").with_children(vec![PresetNode::new("only", "Call the office")]),
            PresetNode::new("title", "Title only"),
            PresetNode::new("answer", "Answer").with_answer("the answer"),
        ],
    );
    forest
}

pub fn campus_forest(label: &str) -> Forest {
    let mut forest = Forest::new();
    forest.insert("campus", vec![PresetNode::new("c1", label).with_answer("campus answer")]);
    forest
}

/// Local store over a shared in-memory map
pub fn memory_local() -> (LocalStore, MemoryKeyValueStore) {
    let store = MemoryKeyValueStore::new();
    (LocalStore::new(store.clone()), store)
}

pub fn local_with(forest: &Forest) -> LocalStore {
    let (local, _) = memory_local();
    local.write_forest(forest).unwrap();
    local
}

/// In-process source standing in for the feed or the snapshot
#[derive(Debug)]
pub struct StaticSource {
    kind: SourceKind,
    forest: Option<Forest>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(kind: SourceKind, forest: Option<Forest>) -> Self {
        Self {
            kind,
            forest,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(kind: SourceKind) -> Self {
        Self {
            fail: true,
            ..Self::new(kind, None)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForestSource for StaticSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self) -> SourceResult<Option<Forest>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::status("http://unavailable", 503));
        }
        Ok(self.forest.clone())
    }
}
