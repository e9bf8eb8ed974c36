use async_trait::async_trait;

/// Result of normalizing container audio to 16 kHz mono 16-bit PCM WAV.
///
/// `fallback_used` is true when the encoder was unavailable and a synthetic
/// tone was substituted; the pipeline keeps going but must surface this to
/// the caller as a warning.
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    pub wav: Vec<u8>,
    pub fallback_used: bool,
}

/// Converts container audio (webm/ogg browser captures) into linear PCM.
/// Never blocks the pipeline on a missing encoder.
#[async_trait]
pub trait AudioNormalizer: Send + Sync {
    async fn normalize(&self, data: &[u8]) -> Result<NormalizedAudio, NormalizeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fallback synthesis failed: {0}")]
    FallbackFailed(String),
}
