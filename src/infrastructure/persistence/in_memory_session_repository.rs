use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::application::ports::{RepositoryError, SessionRepository};
use crate::domain::{AudioRecording, ConversionSession, SessionId, SessionStatus, StoragePath};

/// HashMap-backed session store for tests. Enforces the same monotonic
/// status transitions as the SQLite implementation.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<SessionId, ConversionSession>>,
    recordings: Mutex<Vec<AudioRecording>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().expect("repo lock poisoned").len()
    }

    fn update<F>(&self, id: SessionId, expected: SessionStatus, apply: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut ConversionSession),
    {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.status == expected)
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("no {} session {}", expected, id))
            })?;
        apply(session);
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &ConversionSession) -> Result<(), RepositoryError> {
        self.sessions
            .lock()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn get_by_id(
        &self,
        id: SessionId,
    ) -> Result<Option<ConversionSession>, RepositoryError> {
        Ok(self
            .sessions
            .lock()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .get(&id)
            .cloned())
    }

    async fn mark_processing(&self, id: SessionId) -> Result<(), RepositoryError> {
        self.update(id, SessionStatus::Pending, |s| {
            s.status = SessionStatus::Processing;
        })
    }

    async fn complete(
        &self,
        id: SessionId,
        output_ref: &StoragePath,
        models_used: &str,
    ) -> Result<(), RepositoryError> {
        self.update(id, SessionStatus::Processing, |s| {
            s.status = SessionStatus::Completed;
            s.output_ref = Some(output_ref.clone());
            s.models_used = models_used.to_string();
            s.completed_at = Some(Utc::now());
        })
    }

    async fn fail(&self, id: SessionId, error_text: &str) -> Result<(), RepositoryError> {
        self.update(id, SessionStatus::Processing, |s| {
            s.status = SessionStatus::Failed;
            s.error_text = Some(error_text.to_string());
            s.completed_at = Some(Utc::now());
        })
    }

    async fn delete(&self, id: SessionId) -> Result<(), RepositoryError> {
        self.sessions
            .lock()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .remove(&id);
        self.recordings
            .lock()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .retain(|r| r.session_id != id);
        Ok(())
    }

    async fn attach_recording(&self, recording: &AudioRecording) -> Result<(), RepositoryError> {
        self.recordings
            .lock()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .push(recording.clone());
        Ok(())
    }

    async fn recordings_for(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AudioRecording>, RepositoryError> {
        Ok(self
            .recordings
            .lock()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect())
    }
}
