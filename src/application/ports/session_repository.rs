use async_trait::async_trait;

use crate::domain::{AudioRecording, ConversionSession, SessionId, StoragePath};

use super::RepositoryError;

/// Durable record of each conversion attempt.
///
/// A session is created once, moved to Processing before any adapter runs,
/// and finished exactly once via `complete` or `fail`. A write failure here
/// is fatal to the request.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &ConversionSession) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: SessionId)
        -> Result<Option<ConversionSession>, RepositoryError>;

    async fn mark_processing(&self, id: SessionId) -> Result<(), RepositoryError>;

    async fn complete(
        &self,
        id: SessionId,
        output_ref: &StoragePath,
        models_used: &str,
    ) -> Result<(), RepositoryError>;

    async fn fail(&self, id: SessionId, error_text: &str) -> Result<(), RepositoryError>;

    /// Deletes the session and, by cascade, any attached recordings.
    async fn delete(&self, id: SessionId) -> Result<(), RepositoryError>;

    async fn attach_recording(&self, recording: &AudioRecording) -> Result<(), RepositoryError>;

    async fn recordings_for(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AudioRecording>, RepositoryError>;
}
