mod ffmpeg_normalizer;
mod openai_whisper_engine;

pub use ffmpeg_normalizer::{synthesize_fallback_tone, FfmpegNormalizer};
pub use openai_whisper_engine::OpenAiWhisperEngine;
