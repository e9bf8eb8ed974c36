use async_trait::async_trait;

/// Text-to-speech backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, SpeechSynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechSynthesisError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
