use crossmodal::application::ports::{ImageSynthesisError, ImageSynthesizer};
use crossmodal::infrastructure::image::OpenAiImageClient;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OpenAiImageClient {
    OpenAiImageClient::new(
        reqwest::Client::new(),
        "test-key".to_string(),
        server.uri(),
        "dall-e-3".to_string(),
        "1024x1024".to_string(),
        "standard".to_string(),
    )
}

#[tokio::test]
async fn generates_then_downloads_the_asset() {
    let server = MockServer::start().await;

    let asset_url = format!("{}/assets/generated.png", server.uri());
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(serde_json::json!({
            "model": "dall-e-3",
            "n": 1,
            "size": "1024x1024",
            "quality": "standard",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": [{"url": asset_url}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/generated.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let image = client(&server).synthesize("a misty lake").await.unwrap();
    assert_eq!(image, b"png-bytes");
}

#[tokio::test]
async fn backend_error_propagates_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(400).set_body_string("prompt rejected"))
        .mount(&server)
        .await;

    let err = client(&server).synthesize("a misty lake").await.unwrap_err();
    assert!(matches!(err, ImageSynthesisError::ApiRequestFailed(_)));
    assert!(err.to_string().contains("prompt rejected"));
}

#[tokio::test]
async fn failed_download_is_a_download_error() {
    let server = MockServer::start().await;

    let asset_url = format!("{}/assets/missing.png", server.uri());
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": [{"url": asset_url}]})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).synthesize("a misty lake").await.unwrap_err();
    assert!(matches!(err, ImageSynthesisError::DownloadFailed(_)));
}
