mod conversion_service;

pub use conversion_service::{
    AudioInput, AudioToImageOutcome, ConversionError, ConversionPolicy, ConversionService,
    ImageInput, ImageToAudioOutcome, PipelineStage, TranscriptFallback, PLACEHOLDER_TRANSCRIPT,
};
