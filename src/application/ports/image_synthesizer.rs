use async_trait::async_trait;

/// Image-generation backend. Returns the generated image bytes, including
/// the follow-up download when the backend hands back a URL.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    async fn synthesize(&self, description: &str) -> Result<Vec<u8>, ImageSynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageSynthesisError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
}
