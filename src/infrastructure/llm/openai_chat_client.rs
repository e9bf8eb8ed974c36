use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{DescriptionError, DescriptionGenerator};

const TEXT_SYSTEM_ROLE: &str =
    "You are an assistant that turns audio transcripts into rich visual scene descriptions \
     suitable for image generation.";
const VISION_SYSTEM_ROLE: &str =
    "You are an assistant that describes images as short narration scripts suitable for \
     text-to-speech.";

pub struct OpenAiChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    vision_model: String,
    max_tokens: u32,
}

impl OpenAiChatClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        chat_model: String,
        vision_model: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            chat_model,
            vision_model,
            max_tokens,
        }
    }

    async fn complete(
        &self,
        model: &str,
        messages: serde_json::Value,
    ) -> Result<String, DescriptionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": model,
                "messages": messages,
                "max_tokens": self.max_tokens,
            }))
            .send()
            .await
            .map_err(|e| DescriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DescriptionError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DescriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DescriptionError::InvalidResponse(format!("parse response: {}", e)))?;

        let first = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DescriptionError::InvalidResponse("no choices returned".to_string()))?;

        Ok(first.message.content)
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl DescriptionGenerator for OpenAiChatClient {
    async fn describe_text(
        &self,
        source_text: &str,
        guidance: Option<&str>,
    ) -> Result<String, DescriptionError> {
        // Exactly two prompt branches: guidance present or absent.
        let user_prompt = match guidance {
            Some(guidance) => format!(
                "Write a vivid visual description of a scene based on this transcript: \
                 \"{}\". Additional guidance: {}",
                source_text, guidance
            ),
            None => format!(
                "Write a vivid visual description of a scene based on this transcript: \"{}\"",
                source_text
            ),
        };

        tracing::debug!(model = %self.chat_model, chars = source_text.len(), "Requesting scene description");

        let messages = json!([
            {"role": "system", "content": TEXT_SYSTEM_ROLE},
            {"role": "user", "content": user_prompt},
        ]);

        self.complete(&self.chat_model, messages).await
    }

    async fn describe_image(
        &self,
        image_data: &[u8],
        mime_type: &str,
        style: Option<&str>,
    ) -> Result<String, DescriptionError> {
        let user_prompt = match style {
            Some(style) => format!(
                "Describe this image as a narration script. Style: {}",
                style
            ),
            None => "Describe this image as a narration script.".to_string(),
        };

        let encoded = base64::engine::general_purpose::STANDARD.encode(image_data);
        let data_url = format!("data:{};base64,{}", mime_type, encoded);

        tracing::debug!(model = %self.vision_model, image_bytes = image_data.len(), "Requesting image description");

        let messages = json!([
            {"role": "system", "content": VISION_SYSTEM_ROLE},
            {"role": "user", "content": [
                {"type": "text", "text": user_prompt},
                {"type": "image_url", "image_url": {"url": data_url}},
            ]},
        ]);

        self.complete(&self.vision_model, messages).await
    }
}
