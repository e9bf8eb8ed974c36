use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::application::ports::{
    AudioNormalizer, DescriptionGenerator, ImageSynthesizer, MediaStore, MediaStoreError,
    RepositoryError, SessionRepository, SpeechSynthesizer, TranscriptionEngine,
};
use crate::domain::{
    AudioRecording, ConversionDirection, ConversionSession, ConversionWarning, MediaRole,
    SessionId, StoragePath,
};

/// Fixed sentence substituted for a transcript when every transcription
/// attempt fails and placeholder mode is enabled.
pub const PLACEHOLDER_TRANSCRIPT: &str =
    "This is a placeholder transcription of the audio content.";

const TARGET_SAMPLE_RATE: u32 = 16_000;
const WAV_HEADER_BYTES: usize = 44;

/// What to do when the transcription backend fails on every option variant.
/// `Placeholder` keeps the pipeline going with a fixed transcript and a
/// warning in the envelope; `Propagate` fails the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFallback {
    Propagate,
    Placeholder,
}

impl std::str::FromStr for TranscriptFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" => Ok(TranscriptFallback::Propagate),
            "placeholder" => Ok(TranscriptFallback::Placeholder),
            other => Err(format!(
                "Invalid transcript fallback: {}. Expected: propagate or placeholder",
                other
            )),
        }
    }
}

/// Pipeline step names, used for sanitized client-facing error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Normalization,
    Transcription,
    Description,
    ImageSynthesis,
    SpeechSynthesis,
    OutputStaging,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Normalization => "normalization",
            PipelineStage::Transcription => "transcription",
            PipelineStage::Description => "description",
            PipelineStage::ImageSynthesis => "image synthesis",
            PipelineStage::SpeechSynthesis => "speech synthesis",
            PipelineStage::OutputStaging => "output staging",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Session store write failed. Fatal to the request.
    #[error("session persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
    #[error("media staging failed: {0}")]
    Staging(#[from] MediaStoreError),
    /// An adapter failed; the session has already been marked Failed with
    /// the backend's raw message.
    #[error("{stage} failed: {message}")]
    Pipeline {
        session_id: SessionId,
        stage: PipelineStage,
        message: String,
    },
}

struct StageFailure {
    stage: PipelineStage,
    message: String,
}

impl StageFailure {
    fn new(stage: PipelineStage, err: impl fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

/// Audio submitted for conversion, either a file upload or a browser
/// recording decoded from base64.
pub struct AudioInput {
    pub bytes: Bytes,
    pub filename: String,
    /// Container formats (webm/ogg captures) need transcoding to PCM
    /// before transcription.
    pub needs_normalization: bool,
    /// Browser recordings additionally get an AudioRecording child row.
    pub is_recording: bool,
}

pub struct ImageInput {
    pub bytes: Bytes,
    pub filename: String,
    pub mime_type: String,
}

#[derive(Debug)]
pub struct AudioToImageOutcome {
    pub session_id: SessionId,
    pub image: Vec<u8>,
    pub transcript: String,
    pub description: String,
    pub models_used: String,
    pub warnings: Vec<ConversionWarning>,
}

#[derive(Debug)]
pub struct ImageToAudioOutcome {
    pub session_id: SessionId,
    pub audio: Vec<u8>,
    pub description: String,
    pub voice: String,
    pub models_used: String,
}

/// Orchestrator-level policy knobs, resolved from settings at startup.
#[derive(Debug, Clone)]
pub struct ConversionPolicy {
    pub transcript_fallback: TranscriptFallback,
    pub default_voice: String,
    pub audio_to_image_models: String,
    pub image_to_audio_models: String,
}

/// Sequences the adapters for one conversion direction and owns the single
/// failure boundary: adapter errors are converted here, and only here, into
/// a Failed session with the backend's message.
pub struct ConversionService<T, D, I, S>
where
    T: TranscriptionEngine,
    D: DescriptionGenerator,
    I: ImageSynthesizer,
    S: SpeechSynthesizer,
{
    transcriber: Arc<T>,
    describer: Arc<D>,
    image_synthesizer: Arc<I>,
    speech_synthesizer: Arc<S>,
    normalizer: Arc<dyn AudioNormalizer>,
    media_store: Arc<dyn MediaStore>,
    sessions: Arc<dyn SessionRepository>,
    policy: ConversionPolicy,
}

impl<T, D, I, S> ConversionService<T, D, I, S>
where
    T: TranscriptionEngine,
    D: DescriptionGenerator,
    I: ImageSynthesizer,
    S: SpeechSynthesizer,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transcriber: Arc<T>,
        describer: Arc<D>,
        image_synthesizer: Arc<I>,
        speech_synthesizer: Arc<S>,
        normalizer: Arc<dyn AudioNormalizer>,
        media_store: Arc<dyn MediaStore>,
        sessions: Arc<dyn SessionRepository>,
        policy: ConversionPolicy,
    ) -> Self {
        Self {
            transcriber,
            describer,
            image_synthesizer,
            speech_synthesizer,
            normalizer,
            media_store,
            sessions,
            policy,
        }
    }

    #[tracing::instrument(skip(self, input, prompt), fields(filename = %input.filename))]
    pub async fn audio_to_image(
        &self,
        input: AudioInput,
        prompt: Option<String>,
    ) -> Result<AudioToImageOutcome, ConversionError> {
        let input_role = if input.is_recording {
            MediaRole::Recording
        } else {
            MediaRole::Upload
        };

        let mut session = ConversionSession::new(
            ConversionDirection::AudioToImage,
            StoragePath::from_raw(""),
            prompt.clone(),
        );
        let session_id = session.id;
        let input_ref = StoragePath::new(input_role, &session_id, &input.filename);
        session.input_ref = input_ref.clone();

        self.sessions.create(&session).await?;
        if let Err(e) = self
            .media_store
            .store(&input_ref, input.bytes.clone())
            .await
        {
            self.discard_pending(session_id).await;
            return Err(e.into());
        }
        if let Err(e) = self.sessions.mark_processing(session_id).await {
            self.discard_pending(session_id).await;
            return Err(e.into());
        }

        let mut warnings = Vec::new();
        let result = self
            .run_audio_pipeline(session_id, &input, &input_ref, prompt.as_deref(), &mut warnings)
            .await;

        match result {
            Ok((transcript, description, image)) => {
                let output_ref =
                    StoragePath::new(MediaRole::GeneratedImage, &session_id, "output.png");
                if let Err(e) = self
                    .media_store
                    .store(&output_ref, Bytes::from(image.clone()))
                    .await
                {
                    return self
                        .fail_session(
                            session_id,
                            StageFailure::new(PipelineStage::OutputStaging, e),
                        )
                        .await;
                }
                if let Err(e) = self
                    .sessions
                    .complete(session_id, &output_ref, &self.policy.audio_to_image_models)
                    .await
                {
                    return Err(self.persistence_failure(session_id, e).await);
                }

                tracing::info!(
                    session_id = %session_id,
                    image_bytes = image.len(),
                    warnings = warnings.len(),
                    "Audio-to-image conversion completed"
                );

                Ok(AudioToImageOutcome {
                    session_id,
                    image,
                    transcript,
                    description,
                    models_used: self.policy.audio_to_image_models.clone(),
                    warnings,
                })
            }
            Err(failure) => self.fail_session(session_id, failure).await,
        }
    }

    #[tracing::instrument(skip(self, input, style, voice), fields(filename = %input.filename))]
    pub async fn image_to_audio(
        &self,
        input: ImageInput,
        style: Option<String>,
        voice: Option<String>,
    ) -> Result<ImageToAudioOutcome, ConversionError> {
        let voice = voice.unwrap_or_else(|| self.policy.default_voice.clone());

        let mut session = ConversionSession::new(
            ConversionDirection::ImageToAudio,
            StoragePath::from_raw(""),
            style.clone(),
        );
        let session_id = session.id;
        let input_ref = StoragePath::new(MediaRole::Upload, &session_id, &input.filename);
        session.input_ref = input_ref.clone();

        self.sessions.create(&session).await?;
        if let Err(e) = self
            .media_store
            .store(&input_ref, input.bytes.clone())
            .await
        {
            self.discard_pending(session_id).await;
            return Err(e.into());
        }
        if let Err(e) = self.sessions.mark_processing(session_id).await {
            self.discard_pending(session_id).await;
            return Err(e.into());
        }

        let result = self.run_image_pipeline(&input, style.as_deref(), &voice).await;

        match result {
            Ok((description, audio)) => {
                let output_ref =
                    StoragePath::new(MediaRole::GeneratedAudio, &session_id, "narration.mp3");
                if let Err(e) = self
                    .media_store
                    .store(&output_ref, Bytes::from(audio.clone()))
                    .await
                {
                    return self
                        .fail_session(
                            session_id,
                            StageFailure::new(PipelineStage::OutputStaging, e),
                        )
                        .await;
                }
                if let Err(e) = self
                    .sessions
                    .complete(session_id, &output_ref, &self.policy.image_to_audio_models)
                    .await
                {
                    return Err(self.persistence_failure(session_id, e).await);
                }

                tracing::info!(
                    session_id = %session_id,
                    audio_bytes = audio.len(),
                    voice = %voice,
                    "Image-to-audio conversion completed"
                );

                Ok(ImageToAudioOutcome {
                    session_id,
                    audio,
                    description,
                    voice,
                    models_used: self.policy.image_to_audio_models.clone(),
                })
            }
            Err(failure) => self.fail_session(session_id, failure).await,
        }
    }

    async fn run_audio_pipeline(
        &self,
        session_id: SessionId,
        input: &AudioInput,
        input_ref: &StoragePath,
        guidance: Option<&str>,
        warnings: &mut Vec<ConversionWarning>,
    ) -> Result<(String, String, Vec<u8>), StageFailure> {
        let audio = if input.needs_normalization {
            let normalized = self
                .normalizer
                .normalize(&input.bytes)
                .await
                .map_err(|e| StageFailure::new(PipelineStage::Normalization, e))?;
            if normalized.fallback_used {
                tracing::warn!(
                    session_id = %session_id,
                    "Encoder unavailable: synthetic tone substituted for input audio"
                );
                warnings.push(ConversionWarning::SyntheticAudioSubstituted);
            }
            normalized.wav
        } else {
            input.bytes.to_vec()
        };

        if input.is_recording {
            let duration = pcm_duration_secs(&audio);
            let recording = AudioRecording::new(session_id, input_ref.clone(), duration);
            self.sessions
                .attach_recording(&recording)
                .await
                .map_err(|e| StageFailure::new(PipelineStage::Normalization, e))?;
        }

        let transcript = match self.transcriber.transcribe(&audio).await {
            Ok(text) => text,
            Err(e) => match self.policy.transcript_fallback {
                TranscriptFallback::Placeholder => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "All transcription attempts failed: using placeholder transcript"
                    );
                    warnings.push(ConversionWarning::PlaceholderTranscriptUsed);
                    PLACEHOLDER_TRANSCRIPT.to_string()
                }
                TranscriptFallback::Propagate => {
                    return Err(StageFailure::new(PipelineStage::Transcription, e));
                }
            },
        };

        let description = self
            .describer
            .describe_text(&transcript, guidance)
            .await
            .map_err(|e| StageFailure::new(PipelineStage::Description, e))?;

        let image = self
            .image_synthesizer
            .synthesize(&description)
            .await
            .map_err(|e| StageFailure::new(PipelineStage::ImageSynthesis, e))?;

        Ok((transcript, description, image))
    }

    async fn run_image_pipeline(
        &self,
        input: &ImageInput,
        style: Option<&str>,
        voice: &str,
    ) -> Result<(String, Vec<u8>), StageFailure> {
        let description = self
            .describer
            .describe_image(&input.bytes, &input.mime_type, style)
            .await
            .map_err(|e| StageFailure::new(PipelineStage::Description, e))?;

        let audio = self
            .speech_synthesizer
            .synthesize(&description, voice)
            .await
            .map_err(|e| StageFailure::new(PipelineStage::SpeechSynthesis, e))?;

        Ok((description, audio))
    }

    async fn fail_session<O>(
        &self,
        session_id: SessionId,
        failure: StageFailure,
    ) -> Result<O, ConversionError> {
        tracing::error!(
            session_id = %session_id,
            stage = %failure.stage,
            error = %failure.message,
            "Conversion failed"
        );
        self.sessions.fail(session_id, &failure.message).await?;
        Err(ConversionError::Pipeline {
            session_id,
            stage: failure.stage,
            message: failure.message,
        })
    }

    /// Removes a session that never reached Processing. A request that
    /// fails before any adapter runs leaves no row behind, matching the
    /// handler-level validation rule.
    async fn discard_pending(&self, session_id: SessionId) {
        if let Err(e) = self.sessions.delete(session_id).await {
            tracing::warn!(
                session_id = %session_id,
                error = %e,
                "Failed to remove unstarted session"
            );
        }
    }

    /// A `complete` that did not land still has to end the lifecycle, so
    /// the session is failed best-effort before the error surfaces.
    async fn persistence_failure(
        &self,
        session_id: SessionId,
        err: RepositoryError,
    ) -> ConversionError {
        tracing::error!(
            session_id = %session_id,
            error = %err,
            "Failed to record completion"
        );
        if let Err(fail_err) = self.sessions.fail(session_id, &err.to_string()).await {
            tracing::warn!(
                session_id = %session_id,
                error = %fail_err,
                "Failed to mark session failed after a persistence error"
            );
        }
        ConversionError::Persistence(err)
    }
}

/// Duration of a normalized WAV payload, read from its header so extra
/// chunks emitted by the encoder do not inflate the count. Unparseable
/// payloads fall back to a length estimate in the target format.
fn pcm_duration_secs(wav: &[u8]) -> f64 {
    if let Ok(reader) = hound::WavReader::new(std::io::Cursor::new(wav)) {
        let spec = reader.spec();
        if spec.sample_rate > 0 {
            return f64::from(reader.duration()) / f64::from(spec.sample_rate);
        }
    }
    let data_bytes = wav.len().saturating_sub(WAV_HEADER_BYTES);
    data_bytes as f64 / (TARGET_SAMPLE_RATE as f64 * 2.0)
}
