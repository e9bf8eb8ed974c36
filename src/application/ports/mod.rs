mod audio_normalizer;
mod description_generator;
mod image_synthesizer;
mod media_store;
mod repository_error;
mod session_repository;
mod speech_synthesizer;
mod transcription_engine;

pub use audio_normalizer::{AudioNormalizer, NormalizeError, NormalizedAudio};
pub use description_generator::{DescriptionError, DescriptionGenerator};
pub use image_synthesizer::{ImageSynthesisError, ImageSynthesizer};
pub use media_store::{MediaStore, MediaStoreError};
pub use repository_error::RepositoryError;
pub use session_repository::SessionRepository;
pub use speech_synthesizer::{SpeechSynthesisError, SpeechSynthesizer};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
