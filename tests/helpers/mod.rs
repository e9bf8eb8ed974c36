use async_trait::async_trait;
use bytes::Bytes;

use crossmodal::application::ports::{
    AudioNormalizer, DescriptionError, DescriptionGenerator, ImageSynthesisError,
    ImageSynthesizer, NormalizeError, NormalizedAudio, SpeechSynthesisError, SpeechSynthesizer,
    TranscriptionEngine, TranscriptionError,
};

/// Stub behavior shared by the mock adapters: succeed with a canned value
/// or fail with a canned message.
#[derive(Clone)]
pub enum Stub {
    Succeed(&'static str),
    Fail(&'static str),
}

pub struct StubTranscriber(pub Stub);

#[async_trait]
impl TranscriptionEngine for StubTranscriber {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
        match &self.0 {
            Stub::Succeed(text) => Ok(text.to_string()),
            Stub::Fail(msg) => Err(TranscriptionError::ApiRequestFailed(msg.to_string())),
        }
    }
}

pub struct StubDescriber(pub Stub);

#[async_trait]
impl DescriptionGenerator for StubDescriber {
    async fn describe_text(
        &self,
        _source_text: &str,
        _guidance: Option<&str>,
    ) -> Result<String, DescriptionError> {
        match &self.0 {
            Stub::Succeed(text) => Ok(text.to_string()),
            Stub::Fail(msg) => Err(DescriptionError::ApiRequestFailed(msg.to_string())),
        }
    }

    async fn describe_image(
        &self,
        _image_data: &[u8],
        _mime_type: &str,
        _style: Option<&str>,
    ) -> Result<String, DescriptionError> {
        match &self.0 {
            Stub::Succeed(text) => Ok(text.to_string()),
            Stub::Fail(msg) => Err(DescriptionError::ApiRequestFailed(msg.to_string())),
        }
    }
}

pub struct StubImageSynthesizer(pub Stub);

#[async_trait]
impl ImageSynthesizer for StubImageSynthesizer {
    async fn synthesize(&self, _description: &str) -> Result<Vec<u8>, ImageSynthesisError> {
        match &self.0 {
            Stub::Succeed(data) => Ok(data.as_bytes().to_vec()),
            Stub::Fail(msg) => Err(ImageSynthesisError::ApiRequestFailed(msg.to_string())),
        }
    }
}

pub struct StubSpeechSynthesizer(pub Stub);

#[async_trait]
impl SpeechSynthesizer for StubSpeechSynthesizer {
    async fn synthesize(
        &self,
        _text: &str,
        _voice_id: &str,
    ) -> Result<Vec<u8>, SpeechSynthesisError> {
        match &self.0 {
            Stub::Succeed(data) => Ok(data.as_bytes().to_vec()),
            Stub::Fail(msg) => Err(SpeechSynthesisError::ApiRequestFailed(msg.to_string())),
        }
    }
}

/// Normalizer stub that echoes its input back, optionally flagging the
/// fallback path.
pub struct StubNormalizer {
    pub fallback_used: bool,
}

#[async_trait]
impl AudioNormalizer for StubNormalizer {
    async fn normalize(&self, data: &[u8]) -> Result<NormalizedAudio, NormalizeError> {
        Ok(NormalizedAudio {
            wav: data.to_vec(),
            fallback_used: self.fallback_used,
        })
    }
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        self.body
            .extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> (String, Bytes) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        (
            format!("multipart/form-data; boundary={}", BOUNDARY),
            Bytes::from(self.body),
        )
    }
}
