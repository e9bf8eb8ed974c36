use crossmodal::application::ports::{SpeechSynthesisError, SpeechSynthesizer};
use crossmodal::infrastructure::speech::ElevenLabsClient;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ElevenLabsClient {
    ElevenLabsClient::new(
        reqwest::Client::new(),
        "test-key".to_string(),
        server.uri(),
        "eleven_monolingual_v1".to_string(),
    )
}

#[tokio::test]
async fn synthesizes_with_voice_in_path_and_key_in_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/Rachel"))
        .and(header("xi-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "text": "hello from the lake",
            "model_id": "eleven_monolingual_v1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let audio = client(&server)
        .synthesize("hello from the lake", "Rachel")
        .await
        .unwrap();

    assert_eq!(audio, b"mp3-bytes");
}

#[tokio::test]
async fn backend_error_propagates_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/Rachel"))
        .respond_with(ResponseTemplate::new(429).set_body_string("voice quota exceeded"))
        .mount(&server)
        .await;

    let err = client(&server)
        .synthesize("hello", "Rachel")
        .await
        .unwrap_err();

    assert!(matches!(err, SpeechSynthesisError::ApiRequestFailed(_)));
    assert!(err.to_string().contains("voice quota exceeded"));
}

#[tokio::test]
async fn empty_audio_payload_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/Rachel"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client(&server)
        .synthesize("hello", "Rachel")
        .await
        .unwrap_err();

    assert!(matches!(err, SpeechSynthesisError::InvalidResponse(_)));
}
