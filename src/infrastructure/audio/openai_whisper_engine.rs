use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

/// Option variants tried in order against the transcription endpoint,
/// stopping at the first success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionVariant {
    Default,
    PinnedTemperature,
    ForcedEnglish,
    ExplicitTask,
}

const VARIANT_LADDER: [OptionVariant; 4] = [
    OptionVariant::Default,
    OptionVariant::PinnedTemperature,
    OptionVariant::ForcedEnglish,
    OptionVariant::ExplicitTask,
];

pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }

    async fn attempt(
        &self,
        audio_data: &[u8],
        variant: OptionVariant,
    ) -> Result<String, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", file_part);

        form = match variant {
            OptionVariant::Default => form,
            OptionVariant::PinnedTemperature => form.text("temperature", "0"),
            OptionVariant::ForcedEnglish => form.text("language", "en"),
            OptionVariant::ExplicitTask => form.text("task", "transcribe"),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(format!("parse response: {}", e)))?;

        Ok(result.text)
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        let mut last_error = None;

        for variant in VARIANT_LADDER {
            tracing::debug!(model = %self.model, ?variant, "Sending audio for transcription");
            match self.attempt(audio_data, variant).await {
                Ok(text) => {
                    tracing::info!(chars = text.len(), ?variant, "Transcription completed");
                    return Ok(text.trim().to_string());
                }
                Err(e) => {
                    tracing::warn!(?variant, error = %e, "Transcription attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TranscriptionError::ApiRequestFailed("no transcription attempts made".to_string())
        }))
    }
}
