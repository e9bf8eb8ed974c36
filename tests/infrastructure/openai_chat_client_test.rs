use crossmodal::application::ports::{DescriptionError, DescriptionGenerator};
use crossmodal::infrastructure::llm::OpenAiChatClient;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(server: &MockServer) -> OpenAiChatClient {
    OpenAiChatClient::new(
        reqwest::Client::new(),
        "test-key".to_string(),
        server.uri(),
        "gpt-4o-mini".to_string(),
        "gpt-4o".to_string(),
        300,
    )
}

fn completion(text: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": text}}]
    })
}

#[tokio::test]
async fn describe_text_returns_first_completion_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(
            serde_json::json!({"model": "gpt-4o-mini", "max_tokens": 300}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("  a misty lake  ")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let description = client(&server)
        .describe_text("hello from the lake", None)
        .await
        .unwrap();

    // Verbatim, including whitespace.
    assert_eq!(description, "  a misty lake  ");
}

#[tokio::test]
async fn guidance_is_folded_into_the_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(move |req: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            let user = body["messages"][1]["content"].as_str().unwrap();
            assert!(user.contains("hello from the lake"));
            assert!(user.contains("Additional guidance: make it moody"));
            ResponseTemplate::new(200).set_body_json(completion("ok"))
        })
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .describe_text("hello from the lake", Some("make it moody"))
        .await
        .unwrap();
}

#[tokio::test]
async fn describe_image_sends_inline_base64_to_vision_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(move |req: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            assert_eq!(body["model"], "gpt-4o");
            let image_url = body["messages"][1]["content"][1]["image_url"]["url"]
                .as_str()
                .unwrap();
            assert!(image_url.starts_with("data:image/png;base64,"));
            ResponseTemplate::new(200).set_body_json(completion("a red bicycle"))
        })
        .expect(1)
        .mount(&server)
        .await;

    let description = client(&server)
        .describe_image(b"\x89PNG fake", "image/png", Some("noir"))
        .await
        .unwrap();

    assert_eq!(description, "a red bicycle");
}

#[tokio::test]
async fn rate_limit_maps_to_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client(&server)
        .describe_text("anything", None)
        .await
        .unwrap_err();

    assert!(matches!(err, DescriptionError::RateLimited));
}

#[tokio::test]
async fn empty_choices_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .describe_text("anything", None)
        .await
        .unwrap_err();

    assert!(matches!(err, DescriptionError::InvalidResponse(_)));
}
