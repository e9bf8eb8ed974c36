use async_trait::async_trait;
use serde_json::json;

use crate::application::ports::{SpeechSynthesisError, SpeechSynthesizer};

const XI_API_KEY_HEADER: &str = "xi-api-key";

pub struct ElevenLabsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model_id: String,
}

impl ElevenLabsClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        model_id: String,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            model_id,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, SpeechSynthesisError> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, voice_id);

        tracing::debug!(voice = %voice_id, model = %self.model_id, chars = text.len(), "Requesting speech synthesis");

        let response = self
            .client
            .post(&url)
            .header(XI_API_KEY_HEADER, &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": self.model_id,
            }))
            .send()
            .await
            .map_err(|e| SpeechSynthesisError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SpeechSynthesisError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechSynthesisError::InvalidResponse(format!("body: {}", e)))?;

        if bytes.is_empty() {
            return Err(SpeechSynthesisError::InvalidResponse(
                "empty audio payload".to_string(),
            ));
        }

        tracing::info!(audio_bytes = bytes.len(), "Speech synthesized");

        Ok(bytes.to_vec())
    }
}
