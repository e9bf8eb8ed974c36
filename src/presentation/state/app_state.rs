use std::sync::Arc;

use crate::application::ports::{
    DescriptionGenerator, ImageSynthesizer, SessionRepository, SpeechSynthesizer,
    TranscriptionEngine,
};
use crate::application::services::ConversionService;

pub struct AppState<T, D, I, S>
where
    T: TranscriptionEngine,
    D: DescriptionGenerator,
    I: ImageSynthesizer,
    S: SpeechSynthesizer,
{
    pub conversion_service: Arc<ConversionService<T, D, I, S>>,
    pub session_repository: Arc<dyn SessionRepository>,
}

impl<T, D, I, S> Clone for AppState<T, D, I, S>
where
    T: TranscriptionEngine,
    D: DescriptionGenerator,
    I: ImageSynthesizer,
    S: SpeechSynthesizer,
{
    fn clone(&self) -> Self {
        Self {
            conversion_service: Arc::clone(&self.conversion_service),
            session_repository: Arc::clone(&self.session_repository),
        }
    }
}
