use crossmodal::application::ports::TranscriptionEngine;
use crossmodal::infrastructure::audio::OpenAiWhisperEngine;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(server: &MockServer) -> OpenAiWhisperEngine {
    OpenAiWhisperEngine::new(
        reqwest::Client::new(),
        "test-key".to_string(),
        server.uri(),
        "whisper-1".to_string(),
    )
}

#[tokio::test]
async fn first_successful_variant_wins() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"text": "  hello from the lake  "})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = engine(&server).transcribe(b"wav bytes").await.unwrap();
    assert_eq!(text, "hello from the lake");
}

#[tokio::test]
async fn ladder_retries_until_a_variant_succeeds() {
    let server = MockServer::start().await;

    // Two failures, then success on the third variant.
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("transient"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "recovered"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = engine(&server).transcribe(b"wav bytes").await.unwrap();
    assert_eq!(text, "recovered");
}

#[tokio::test]
async fn all_variants_exhausted_returns_last_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend down"))
        .expect(4)
        .mount(&server)
        .await;

    let err = engine(&server).transcribe(b"wav bytes").await.unwrap_err();
    assert!(err.to_string().contains("backend down"));
}
