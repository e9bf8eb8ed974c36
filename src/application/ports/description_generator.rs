use async_trait::async_trait;

/// Text-generation backend used to turn a transcript or an image into a
/// free-form description. Errors propagate; recovery is the orchestrator's
/// concern.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// Describes a visual scene from transcript text, with optional caller
    /// guidance folded into the prompt.
    async fn describe_text(
        &self,
        source_text: &str,
        guidance: Option<&str>,
    ) -> Result<String, DescriptionError>;

    /// Describes an inline image (base64-encoded on the wire) with an
    /// optional narration style.
    async fn describe_image(
        &self,
        image_data: &[u8],
        mime_type: &str,
        style: Option<&str>,
    ) -> Result<String, DescriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
