use faq_sources::{FeedLocation, FeedSource, ForestSource, SnapshotSource, SourceError};
use faq_tree::default_forest;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;

const FEED: &str = "\
카테고리설정,,,프리셋설정
id,label,,category,option,detail,opt1,ans1,opt2,ans2
support,지원금,,support,Pricing,$10/mo,Extra,ignored
campus,금융캠퍼스,,campus,\"Hours, campus\",,Weekday,\"9-18
lunch 12-13\",Weekend,
";

#[tokio::test]
async fn feed_fetches_and_parses() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/feed.csv");
            then.status(200)
                .header("content-type", "text/csv")
                .body(FEED);
        })
        .await;

    let source = FeedSource::new(FeedLocation::Url(server.url("/feed.csv")), reqwest::Client::new());
    let forest = source.fetch().await.unwrap().unwrap();
    mock.assert_async().await;

    let support = forest.get("support").unwrap();
    assert_eq!(support[0].answer.as_deref(), Some("$10/mo"));
    assert!(support[0].children.is_none());

    let campus = &forest.get("campus").unwrap()[0];
    assert_eq!(campus.label, "Hours, campus");
    assert_eq!(campus.children()[0].answer.as_deref(), Some("9-18\nlunch 12-13"));
    assert!(campus.children()[1].is_title_only());
}

#[tokio::test]
async fn feed_categories_from_same_sheet() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed.csv");
            then.status(200).body(FEED);
        })
        .await;

    let source = FeedSource::new(FeedLocation::Url(server.url("/feed.csv")), reqwest::Client::new());
    let records = source.fetch_categories().await.unwrap().unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["support", "campus"]);
}

#[tokio::test]
async fn feed_error_status_is_absent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed.csv");
            then.status(500);
        })
        .await;

    let source = FeedSource::new(FeedLocation::Url(server.url("/feed.csv")), reqwest::Client::new());
    assert!(matches!(
        source.fetch().await,
        Err(SourceError::Status { status: 500, .. })
    ));
    assert!(source.load().await.is_none());
}

#[tokio::test]
async fn feed_with_headers_only_is_absent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed.csv");
            then.status(200).body("a,b\nc,d\n");
        })
        .await;

    let source = FeedSource::new(FeedLocation::Url(server.url("/feed.csv")), reqwest::Client::new());
    assert!(source.fetch().await.unwrap().is_none());
}

#[tokio::test]
async fn snapshot_over_http() {
    let server = MockServer::start_async().await;
    let body = default_forest().to_json_pretty().unwrap();
    server
        .mock_async(|when, then| {
            when.method(GET).path("/preset-answers.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(body.clone());
        })
        .await;

    let source = SnapshotSource::url(server.url("/preset-answers.json"), reqwest::Client::new());
    assert_eq!(source.fetch().await.unwrap(), Some(default_forest()));
}

#[tokio::test]
async fn snapshot_not_found_is_absent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/preset-answers.json");
            then.status(404);
        })
        .await;

    let source = SnapshotSource::url(server.url("/preset-answers.json"), reqwest::Client::new());
    assert!(source.fetch().await.unwrap().is_none());
}

#[tokio::test]
async fn unreachable_snapshot_is_absent() {
    let source = SnapshotSource::url("http://127.0.0.1:9/preset-answers.json", reqwest::Client::new());
    assert!(matches!(source.fetch().await, Err(SourceError::Http(_))));
    assert!(source.load().await.is_none());
}
