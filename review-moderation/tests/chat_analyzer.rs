//! HTTP-level tests for the chat-completions analyzer.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use review_moderation::{
    AnalyzerError, ChatCompletionsAnalyzer, ModerationEngine, Provenance, SemanticAnalyzer,
    Review, Sentiment,
};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

fn analyzer(server: &MockServer, timeout: Duration) -> ChatCompletionsAnalyzer {
    ChatCompletionsAnalyzer::new(&server.uri(), Some("gsk_test_key"), "test-model", timeout)
}

#[tokio::test]
async fn test_fenced_reply_is_parsed() {
    let server = MockServer::start().await;
    let reply = "```json\n{\"sentiment\": \"SENTIMENT_NEGATIVE\", \"signals\": {\"abusive_language\": true}}\n```";

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk_test_key"))
        .and(body_partial_json(json!({"model": "test-model"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply)))
        .expect(1)
        .mount(&server)
        .await;

    let value = analyzer(&server, Duration::from_secs(5))
        .analyze("The night manager was an idiot", 1)
        .await
        .unwrap();

    assert_eq!(value["sentiment"], "SENTIMENT_NEGATIVE");
    assert_eq!(value["signals"]["abusive_language"], true);
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = analyzer(&server, Duration::from_secs(5))
        .analyze("Nice", 5)
        .await
        .unwrap_err();

    match err {
        AnalyzerError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_reply_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("I cannot help with that.")))
        .mount(&server)
        .await;

    let err = analyzer(&server, Duration::from_secs(5))
        .analyze("Nice", 5)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::Parse(_)));
}

#[tokio::test]
async fn test_empty_choices_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = analyzer(&server, Duration::from_secs(5))
        .analyze("Nice", 5)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::Parse(_)));
}

#[tokio::test]
async fn test_slow_server_is_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("{}"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = analyzer(&server, Duration::from_millis(200))
        .analyze("Nice", 5)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::Timeout));
}

#[tokio::test]
async fn test_engine_over_http_normal_and_fallback() {
    let server = MockServer::start().await;
    let reply = r#"{"summary": "Clean and central.", "sentiment": "SENTIMENT_POSITIVE", "signals": {}, "topic_tags": ["LOCATION"]}"#;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply)))
        .mount(&server)
        .await;

    let engine = ModerationEngine::new(std::sync::Arc::new(analyzer(&server, Duration::from_secs(5))));
    let review = Review::new("r1", "HOTEL_001", 5, "Clean room, central location, easy check-in");
    let result = engine.moderate(&review).await;

    assert_eq!(result.provenance, Provenance::Normal);
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.summary, "Clean and central.");
    assert_eq!(result.model_name, "test-model");

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = engine.moderate(&review).await;
    assert_eq!(result.provenance, Provenance::Fallback);
    assert!(result
        .fallback_reason
        .as_deref()
        .is_some_and(|r| r.contains("503")));
}
