use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{ImageSynthesisError, ImageSynthesizer};

/// Image-generation client: one generation request with fixed size and
/// quality, then a plain GET for the asset the backend points at.
pub struct OpenAiImageClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    size: String,
    quality: String,
}

impl OpenAiImageClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        model: String,
        size: String,
        quality: String,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            model,
            size,
            quality,
        }
    }
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: String,
}

#[async_trait]
impl ImageSynthesizer for OpenAiImageClient {
    async fn synthesize(&self, description: &str) -> Result<Vec<u8>, ImageSynthesisError> {
        let url = format!("{}/images/generations", self.base_url);

        tracing::debug!(model = %self.model, chars = description.len(), "Requesting image generation");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "prompt": description,
                "n": 1,
                "size": self.size,
                "quality": self.quality,
            }))
            .send()
            .await
            .map_err(|e| ImageSynthesisError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ImageSynthesisError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let generation: ImageGenerationResponse = response
            .json()
            .await
            .map_err(|e| ImageSynthesisError::InvalidResponse(format!("parse response: {}", e)))?;

        let asset = generation
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ImageSynthesisError::InvalidResponse("no image returned".to_string()))?;

        let download = self
            .client
            .get(&asset.url)
            .send()
            .await
            .map_err(|e| ImageSynthesisError::DownloadFailed(format!("request: {}", e)))?;

        if !download.status().is_success() {
            return Err(ImageSynthesisError::DownloadFailed(format!(
                "status {}",
                download.status()
            )));
        }

        let bytes = download
            .bytes()
            .await
            .map_err(|e| ImageSynthesisError::DownloadFailed(format!("body: {}", e)))?;

        tracing::info!(image_bytes = bytes.len(), "Image generated and downloaded");

        Ok(bytes.to_vec())
    }
}
