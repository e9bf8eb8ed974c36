use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine as _;
use bytes::Bytes;
use serde::Serialize;

use crate::application::ports::{
    DescriptionGenerator, ImageSynthesizer, SpeechSynthesizer, TranscriptionEngine,
};
use crate::application::services::{AudioInput, ConversionError, ImageInput};
use crate::presentation::state::AppState;

/// Unified JSON envelope for successful conversions.
#[derive(Serialize)]
pub struct ConversionEnvelope {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
    pub session_id: String,
    pub ai_model_used: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorEnvelope {
            kind: "error",
            error: message.into(),
            session_id: None,
        }),
    )
        .into_response()
}

/// Maps orchestrator failures to a 500 envelope. The raw backend message is
/// logged and persisted with the session, but the client only sees which
/// stage failed.
fn conversion_error_response(err: ConversionError) -> Response {
    let envelope = match &err {
        ConversionError::Pipeline {
            session_id, stage, ..
        } => ErrorEnvelope {
            kind: "error",
            error: format!("conversion failed: {}", stage),
            session_id: Some(session_id.to_string()),
        },
        ConversionError::Persistence(_) | ConversionError::Staging(_) => ErrorEnvelope {
            kind: "error",
            error: "internal error".to_string(),
            session_id: None,
        },
    };
    tracing::error!(error = %err, "Conversion request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
}

struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

/// Container formats produced by browser capture need transcoding to PCM
/// before they reach the transcription backend.
fn needs_normalization(filename: &str, content_type: &str) -> bool {
    let ext = filename.rsplit('.').next().unwrap_or("");
    matches!(content_type, "audio/webm" | "audio/ogg" | "video/webm")
        || matches!(ext, "webm" | "ogg")
}

/// Single conversion endpoint: exactly one of `audio_file`, `image_file`,
/// or a base64 `recorded_audio` field, plus optional text fields.
#[tracing::instrument(skip(state, multipart))]
pub async fn convert_handler<T, D, I, S>(
    State(state): State<AppState<T, D, I, S>>,
    mut multipart: Multipart,
) -> Response
where
    T: TranscriptionEngine + 'static,
    D: DescriptionGenerator + 'static,
    I: ImageSynthesizer + 'static,
    S: SpeechSynthesizer + 'static,
{
    let mut audio_file: Option<UploadedFile> = None;
    let mut image_file: Option<UploadedFile> = None;
    let mut recorded_audio: Option<String> = None;
    let mut prompt: Option<String> = None;
    let mut voice_preference: Option<String> = None;
    let mut description_style: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                return bad_request(format!("Failed to read multipart: {}", e));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio_file" | "image_file" => {
                let filename = field.file_name().unwrap_or("unknown").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = match field.bytes().await {
                    Ok(b) => b,
                    Err(e) => {
                        tracing::warn!(error = %e, field = %name, "Failed to read file bytes");
                        return bad_request(format!("Failed to read file: {}", e));
                    }
                };
                let upload = UploadedFile {
                    filename,
                    content_type,
                    bytes,
                };
                if name == "audio_file" {
                    audio_file = Some(upload);
                } else {
                    image_file = Some(upload);
                }
            }
            "recorded_audio" => match field.text().await {
                Ok(text) => recorded_audio = Some(text),
                Err(e) => return bad_request(format!("Failed to read recorded audio: {}", e)),
            },
            "prompt" => prompt = field.text().await.ok().filter(|s| !s.is_empty()),
            "voice_preference" => {
                voice_preference = field.text().await.ok().filter(|s| !s.is_empty())
            }
            "description_style" => {
                description_style = field.text().await.ok().filter(|s| !s.is_empty())
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    // Input validation happens before any session is created: a rejected
    // request leaves no trace in the store.
    if let Some(upload) = audio_file {
        if upload.bytes.is_empty() {
            return bad_request("Empty audio file");
        }
        let input = AudioInput {
            needs_normalization: needs_normalization(&upload.filename, &upload.content_type),
            bytes: upload.bytes,
            filename: upload.filename,
            is_recording: false,
        };
        return match state.conversion_service.audio_to_image(input, prompt).await {
            Ok(outcome) => image_envelope(outcome),
            Err(e) => conversion_error_response(e),
        };
    }

    if let Some(upload) = image_file {
        if upload.bytes.is_empty() {
            return bad_request("Empty image file");
        }
        let input = ImageInput {
            bytes: upload.bytes,
            filename: upload.filename,
            mime_type: upload.content_type,
        };
        return match state
            .conversion_service
            .image_to_audio(input, description_style, voice_preference)
            .await
        {
            Ok(outcome) => audio_envelope(outcome),
            Err(e) => conversion_error_response(e),
        };
    }

    if let Some(encoded) = recorded_audio {
        // Browser recorders ship data URLs; strip the prefix if present.
        let encoded = encoded
            .rsplit_once("base64,")
            .map(|(_, data)| data.to_string())
            .unwrap_or(encoded);
        let bytes = match base64::engine::general_purpose::STANDARD.decode(encoded.trim()) {
            Ok(b) => b,
            Err(e) => return bad_request(format!("Invalid base64 audio: {}", e)),
        };
        if bytes.is_empty() {
            return bad_request("Empty audio recording");
        }
        let input = AudioInput {
            bytes: Bytes::from(bytes),
            filename: "recording.webm".to_string(),
            needs_normalization: true,
            is_recording: true,
        };
        return match state.conversion_service.audio_to_image(input, prompt).await {
            Ok(outcome) => image_envelope(outcome),
            Err(e) => conversion_error_response(e),
        };
    }

    tracing::warn!("Conversion request with no recognizable input");
    bad_request("No file provided")
}

fn image_envelope(outcome: crate::application::services::AudioToImageOutcome) -> Response {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&outcome.image);
    (
        StatusCode::OK,
        Json(ConversionEnvelope {
            kind: "image",
            image: Some(encoded),
            audio: None,
            transcription: Some(outcome.transcript),
            image_description: Some(outcome.description),
            session_id: outcome.session_id.to_string(),
            ai_model_used: outcome.models_used,
            warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
        }),
    )
        .into_response()
}

fn audio_envelope(outcome: crate::application::services::ImageToAudioOutcome) -> Response {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&outcome.audio);
    (
        StatusCode::OK,
        Json(ConversionEnvelope {
            kind: "audio",
            image: None,
            audio: Some(encoded),
            transcription: None,
            image_description: Some(outcome.description),
            session_id: outcome.session_id.to_string(),
            ai_model_used: outcome.models_used,
            warnings: Vec::new(),
        }),
    )
        .into_response()
}
