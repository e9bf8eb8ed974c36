use std::time::Duration;

use serde::Deserialize;

use crate::application::services::TranscriptFallback;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub openai: OpenAiSettings,
    pub elevenlabs: ElevenLabsSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub vision_model: String,
    pub whisper_model: String,
    pub image_model: String,
    pub image_size: String,
    pub image_quality: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElevenLabsSettings {
    pub api_key: String,
    pub base_url: String,
    pub model_id: String,
    pub default_voice: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub transcript_fallback: TranscriptFallback,
    pub request_timeout_secs: u64,
}

impl PipelineSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Settings {
    /// Builds settings from environment variables with local defaults.
    /// Only the API keys have no fallback; everything else is tuned for a
    /// local run.
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_or("SERVER_PORT", "3000").parse().unwrap_or(3000),
            },
            database: DatabaseSettings {
                url: env_or("DATABASE_URL", "sqlite:crossmodal.db"),
            },
            storage: StorageSettings {
                root: env_or("STORAGE_ROOT", "./media"),
            },
            openai: OpenAiSettings {
                api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
                base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                chat_model: env_or("OPENAI_CHAT_MODEL", "gpt-4o-mini"),
                vision_model: env_or("OPENAI_VISION_MODEL", "gpt-4o"),
                whisper_model: env_or("OPENAI_WHISPER_MODEL", "whisper-1"),
                image_model: env_or("OPENAI_IMAGE_MODEL", "dall-e-3"),
                image_size: env_or("OPENAI_IMAGE_SIZE", "1024x1024"),
                image_quality: env_or("OPENAI_IMAGE_QUALITY", "standard"),
                max_tokens: env_or("OPENAI_MAX_TOKENS", "300").parse().unwrap_or(300),
            },
            elevenlabs: ElevenLabsSettings {
                api_key: std::env::var("ELEVENLABS_API_KEY").unwrap_or_default(),
                base_url: env_or("ELEVENLABS_BASE_URL", "https://api.elevenlabs.io"),
                model_id: env_or("ELEVENLABS_MODEL_ID", "eleven_monolingual_v1"),
                default_voice: env_or("ELEVENLABS_DEFAULT_VOICE", "Rachel"),
            },
            pipeline: PipelineSettings {
                transcript_fallback: env_or("TRANSCRIPT_FALLBACK", "propagate")
                    .parse()
                    .unwrap_or(TranscriptFallback::Propagate),
                request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "120")
                    .parse()
                    .unwrap_or(120),
            },
        }
    }

    /// Label of the backends an audio-to-image session passes through.
    pub fn audio_to_image_models(&self) -> String {
        format!(
            "{} + {} + {}",
            self.openai.whisper_model, self.openai.chat_model, self.openai.image_model
        )
    }

    /// Label of the backends an image-to-audio session passes through.
    pub fn image_to_audio_models(&self) -> String {
        format!(
            "{} + elevenlabs/{}",
            self.openai.vision_model, self.elevenlabs.model_id
        )
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
