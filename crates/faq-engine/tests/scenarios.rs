use faq_engine::{
    AdminSession, BrowsingSession, ChangeEvent, Resolution, ResolutionEngine, SelectOutcome, Turn,
};
use faq_sources::{FeedLocation, FeedSource, LocalStore, SnapshotSource, SourceKind};
use faq_test_utils::{feed_csv, local_with, memory_local};
use faq_tree::{Forest, PresetNode, SelectionPath, TreeEdit};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const SEEDED: &str = "지원금 A 옵션의 \"가\"에 대한 답변입니다.\n\n상세 내용:\n- 항목 1\n- 항목 2\n- 항목 3";

async fn feed_engine(server: &MockServer, local: LocalStore, csv: &str) -> ResolutionEngine {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed.csv");
            then.status(200).body(csv);
        })
        .await;
    let feed = FeedSource::new(FeedLocation::Url(server.url("/feed.csv")), reqwest::Client::new());
    ResolutionEngine::new(local).with_source(Arc::new(feed))
}

#[tokio::test]
async fn end_to_end_default_support() {
    let engine = ResolutionEngine::new(LocalStore::in_memory());

    let root = engine.resolve("support", &SelectionPath::root()).await;
    assert_eq!(root.labels(), vec!["A 옵션", "B 옵션", "C 옵션"]);

    let SelectOutcome::Advanced { path, resolution } = engine.select("support", &SelectionPath::root(), "A").await
    else {
        panic!("expected to advance into A");
    };
    assert_eq!(path, SelectionPath::single("A"));
    assert_eq!(resolution.labels(), vec!["가", "나", "다"]);

    let SelectOutcome::Advanced { path, resolution } = engine.select("support", &path, "가").await else {
        panic!("expected to advance into 가");
    };
    assert_eq!(path, SelectionPath::from(["A", "가"]));
    assert_eq!(
        resolution,
        Resolution::Answer {
            label: "가".into(),
            text: SEEDED.into()
        }
    );

    let back = engine.back(&path);
    assert_eq!(back, SelectionPath::single("A"));
    assert_eq!(engine.resolve("support", &back).await.labels(), vec!["가", "나", "다"]);
}

#[tokio::test]
async fn end_to_end_through_session() {
    let engine = ResolutionEngine::new(LocalStore::in_memory());
    let mut session = BrowsingSession::new(&engine, "support");

    assert_eq!(session.view().await.resolution().labels(), vec!["A 옵션", "B 옵션", "C 옵션"]);
    session.select("A").await;
    let turn = session.select("가").await;
    assert!(matches!(turn, Turn::Show { resolution: Resolution::Answer { ref text, .. } } if text == SEEDED));

    let turn = session.back().await;
    assert_eq!(session.path(), &SelectionPath::single("A"));
    assert_eq!(turn.resolution().labels(), vec!["가", "나", "다"]);
}

#[tokio::test]
async fn local_store_shadows_feed_for_every_category() {
    let server = MockServer::start_async().await;
    let mut forest = Forest::new();
    forest.insert("support", Vec::new());
    let csv = feed_csv("campus,금융캠퍼스,,campus,Hours,9-18\n");
    let engine = feed_engine(&server, local_with(&forest), &csv).await;

    assert_eq!(engine.resolve("campus", &SelectionPath::root()).await, Resolution::Empty);
    assert_eq!(engine.resolve("support", &SelectionPath::root()).await, Resolution::Empty);
}

#[tokio::test]
async fn feed_applies_while_local_store_is_empty() {
    let server = MockServer::start_async().await;
    let (local, _) = memory_local();
    let csv = feed_csv("support,지원금,,support,Pricing,$10/mo,Extra,ignored\n");
    let engine = feed_engine(&server, local, &csv).await;

    let effective = engine.effective_forest("support").await.unwrap();
    assert_eq!(effective.source, SourceKind::Feed);
    let nodes = effective.nodes().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].answer.as_deref(), Some("$10/mo"));
    assert!(nodes[0].children.is_none());

    let resolution = engine.resolve("support", &SelectionPath::single("level1-1")).await;
    assert_eq!(
        resolution,
        Resolution::Answer {
            label: "Pricing".into(),
            text: "$10/mo".into()
        }
    );

    // the feed does not know campus; the defaults do
    let effective = engine.effective_forest("campus").await.unwrap();
    assert_eq!(effective.source, SourceKind::Defaults);
}

#[tokio::test]
async fn snapshot_file_when_feed_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed.csv");
            then.status(503);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preset-answers.json");
    let mut snapshot = Forest::new();
    snapshot.insert("campus", vec![PresetNode::new("s1", "From snapshot").with_answer("snapshot answer")]);
    std::fs::write(&path, snapshot.to_json().unwrap()).unwrap();

    let engine = ResolutionEngine::new(LocalStore::in_memory())
        .with_source(Arc::new(SnapshotSource::file(&path)))
        .with_source(Arc::new(FeedSource::new(
            FeedLocation::Url(server.url("/feed.csv")),
            reqwest::Client::new(),
        )));

    let effective = engine.effective_forest("campus").await.unwrap();
    assert_eq!(effective.source, SourceKind::Snapshot);
    assert_eq!(engine.resolve("campus", &SelectionPath::root()).await.labels(), vec!["From snapshot"]);
}

#[tokio::test]
async fn alias_finds_appoint_key() {
    let mut forest = Forest::new();
    forest.insert("appoint", vec![PresetNode::new("a1", "위촉 절차").with_answer("서류를 제출하세요.")]);
    let engine = ResolutionEngine::new(local_with(&forest));

    let effective = engine.effective_forest("appointment").await.unwrap();
    let matched = effective.matched.unwrap();
    assert_eq!(matched.key, "appoint");
    assert_eq!(matched.matched_by, faq_category::MatchKind::Alias);
    assert_eq!(engine.resolve("appointment", &SelectionPath::root()).await.labels(), vec!["위촉 절차"]);
}

#[tokio::test]
async fn answer_is_latent_under_children() {
    let mut forest = Forest::new();
    forest.insert(
        "support",
        vec![PresetNode::new("p", "Parent")
            .with_answer("hidden")
            .with_children(vec![PresetNode::new("c", "Child").with_answer("shown")])],
    );
    let engine = ResolutionEngine::new(local_with(&forest));
    let resolution = engine.resolve("support", &SelectionPath::single("p")).await;
    assert_eq!(resolution.labels(), vec!["Child"]);
}

#[tokio::test]
async fn single_title_only_child_collapses() {
    let mut forest = Forest::new();
    forest.insert(
        "support",
        vec![
            PresetNode::new("call", "Call us").with_children(vec![PresetNode::new("tel", "02-6410-5000")]),
            PresetNode::new("other", "Other").with_answer("other answer"),
        ],
    );
    let engine = ResolutionEngine::new(local_with(&forest));

    let outcome = engine.select("support", &SelectionPath::root(), "call").await;
    assert_eq!(
        outcome,
        SelectOutcome::Echo {
            label: "02-6410-5000".into(),
            path: SelectionPath::root()
        }
    );

    let mut session = BrowsingSession::new(&engine, "support");
    match session.select("call").await {
        Turn::Echo { label, then } => {
            assert_eq!(label, "02-6410-5000");
            assert_eq!(then.labels(), vec!["Call us", "Other"]);
        }
        Turn::Show { .. } => panic!("expected echo"),
    }
    assert!(session.path().is_empty());
}

#[tokio::test]
async fn admin_save_switches_precedence_and_notifies() {
    let server = MockServer::start_async().await;
    let (local, _) = memory_local();
    let csv = feed_csv("campus,금융캠퍼스,,campus,Hours,9-18\n");
    let engine = feed_engine(&server, local, &csv).await;
    assert_eq!(engine.resolve("campus", &SelectionPath::root()).await.labels(), vec!["Hours"]);

    let mut rx = engine.subscribe();
    let mut admin = AdminSession::load(&engine).await;
    assert_eq!(admin.loaded_from(), SourceKind::Defaults);
    admin
        .apply(
            "support",
            &TreeEdit::Add {
                parent: SelectionPath::root(),
                node: PresetNode::new("D", "D 옵션").with_answer("새 답변"),
            },
        )
        .unwrap();
    admin.save().unwrap();
    assert!(matches!(rx.recv().await.unwrap(), ChangeEvent::ForestSaved { .. }));

    assert_eq!(
        engine.resolve("support", &SelectionPath::root()).await.labels(),
        vec!["A 옵션", "B 옵션", "C 옵션", "D 옵션"]
    );
    // the working copy came from the defaults, so campus keeps its default tree
    assert_eq!(
        engine.resolve("campus", &SelectionPath::root()).await.labels(),
        vec!["A 옵션", "B 옵션", "C 옵션"]
    );
}

#[tokio::test]
async fn malformed_local_data_is_ignored() {
    let (local, store) = memory_local();
    faq_sources::KeyValueStore::set(&store, faq_sources::FOREST_KEY, "{not json").unwrap();
    let engine = ResolutionEngine::new(local);
    let effective = engine.effective_forest("support").await.unwrap();
    assert_eq!(effective.source, SourceKind::Defaults);
}
