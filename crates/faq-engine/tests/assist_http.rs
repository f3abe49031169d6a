use faq_category::default_categories;
use faq_engine::{
    AnswerProvider, AnswerRequest, AssistError, AssistOutcome, Assistant, Document, HttpAnswerProvider,
};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn posts_camel_case_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/chat")
                .json_body(json!({"question": "기간은?", "documentContext": "ctx", "categoryLabel": "금융캠퍼스"}));
            then.status(200)
                .json_body(json!({"hasAnswer": true, "answer": "총 12주 동안 진행됩니다."}));
        })
        .await;

    let provider = HttpAnswerProvider::new(server.url("/api/chat"), reqwest::Client::new());
    let request = AnswerRequest::new("기간은?", "ctx").with_category_label("금융캠퍼스");
    let reply = provider.answer(&request).await.unwrap();
    mock.assert_async().await;

    assert!(reply.has_answer);
    assert_eq!(reply.answer, "총 12주 동안 진행됩니다.");
}

#[tokio::test]
async fn bad_request_is_status_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(400).json_body(json!({"error": "질문과 문서 컨텍스트가 필요합니다."}));
        })
        .await;

    let provider = HttpAnswerProvider::new(server.url("/api/chat"), reqwest::Client::new());
    let err = provider.answer(&AnswerRequest::new("q", "ctx")).await.unwrap_err();
    assert!(matches!(err, AssistError::Status(400)));
}

#[tokio::test]
async fn assistant_escalates_over_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200).json_body(json!({"hasAnswer": false, "answer": "NO_ANSWER"}));
        })
        .await;

    let provider = HttpAnswerProvider::new(server.url("/api/chat"), reqwest::Client::new());
    let assistant = Assistant::new(provider, vec![Document::new("faq.md", "자주 묻는 질문")]);
    let support = default_categories().remove(0);

    match assistant.ask("환불 되나요?", Some(&support)).await.unwrap() {
        AssistOutcome::Escalate { contact, .. } => {
            assert_eq!(contact.name, "조준승 차장, 서미해 대리");
            assert_eq!(contact.phone, "02-6410-5000(내선 7258, 7439)");
        }
        AssistOutcome::Answered { .. } => panic!("expected escalation"),
    }
}
