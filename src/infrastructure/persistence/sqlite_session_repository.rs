use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, SessionRepository};
use crate::domain::{
    AudioRecording, ConversionDirection, ConversionSession, SessionId, SessionStatus, StoragePath,
};

pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ConversionSession, RepositoryError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let id = Uuid::parse_str(&id).map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let direction: String = row
            .try_get("direction")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let direction = direction
            .parse::<ConversionDirection>()
            .map_err(RepositoryError::QueryFailed)?;

        let status: String = row
            .try_get("status")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let status = status
            .parse::<SessionStatus>()
            .map_err(RepositoryError::QueryFailed)?;

        let input_ref: String = row
            .try_get("input_ref")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let output_ref: Option<String> = row
            .try_get("output_ref")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        let completed_at: Option<DateTime<Utc>> = row
            .try_get("completed_at")
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(ConversionSession {
            id: SessionId::from_uuid(id),
            direction,
            input_ref: StoragePath::from_raw(input_ref),
            prompt: row
                .try_get("prompt")
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            output_ref: output_ref.map(StoragePath::from_raw),
            models_used: row
                .try_get("models_used")
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            status,
            error_text: row
                .try_get("error_text")
                .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
            created_at,
            completed_at,
        })
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn create(&self, session: &ConversionSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO conversion_sessions
                (id, direction, input_ref, prompt, output_ref, models_used,
                 status, error_text, created_at, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(session.id.as_uuid().to_string())
        .bind(session.direction.as_str())
        .bind(session.input_ref.as_str())
        .bind(&session.prompt)
        .bind(session.output_ref.as_ref().map(|p| p.as_str().to_string()))
        .bind(&session.models_used)
        .bind(session.status.as_str())
        .bind(&session.error_text)
        .bind(session.created_at)
        .bind(session.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn get_by_id(
        &self,
        id: SessionId,
    ) -> Result<Option<ConversionSession>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, direction, input_ref, prompt, output_ref, models_used,
                   status, error_text, created_at, completed_at
            FROM conversion_sessions
            WHERE id = ?1
            "#,
        )
        .bind(id.as_uuid().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(|r| Self::session_from_row(&r)).transpose()
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn mark_processing(&self, id: SessionId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE conversion_sessions SET status = ?1 WHERE id = ?2 AND status = ?3",
        )
        .bind(SessionStatus::Processing.as_str())
        .bind(id.as_uuid().to_string())
        .bind(SessionStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "no pending session {}",
                id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, output_ref, models_used), fields(session_id = %id))]
    async fn complete(
        &self,
        id: SessionId,
        output_ref: &StoragePath,
        models_used: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE conversion_sessions
            SET status = ?1, output_ref = ?2, models_used = ?3, completed_at = ?4
            WHERE id = ?5 AND status = ?6
            "#,
        )
        .bind(SessionStatus::Completed.as_str())
        .bind(output_ref.as_str())
        .bind(models_used)
        .bind(Utc::now())
        .bind(id.as_uuid().to_string())
        .bind(SessionStatus::Processing.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "no processing session {}",
                id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, error_text), fields(session_id = %id))]
    async fn fail(&self, id: SessionId, error_text: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE conversion_sessions
            SET status = ?1, error_text = ?2, completed_at = ?3
            WHERE id = ?4 AND status = ?5
            "#,
        )
        .bind(SessionStatus::Failed.as_str())
        .bind(error_text)
        .bind(Utc::now())
        .bind(id.as_uuid().to_string())
        .bind(SessionStatus::Processing.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "no processing session {}",
                id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn delete(&self, id: SessionId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM conversion_sessions WHERE id = ?1")
            .bind(id.as_uuid().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self, recording), fields(session_id = %recording.session_id))]
    async fn attach_recording(&self, recording: &AudioRecording) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO audio_recordings (id, session_id, media_ref, duration_secs, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(recording.id.to_string())
        .bind(recording.session_id.as_uuid().to_string())
        .bind(recording.media_ref.as_str())
        .bind(recording.duration_secs)
        .bind(recording.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %session_id))]
    async fn recordings_for(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AudioRecording>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, media_ref, duration_secs, created_at
            FROM audio_recordings
            WHERE session_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(session_id.as_uuid().to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let id: String = row
                    .try_get("id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let sid: String = row
                    .try_get("session_id")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
                let media_ref: String = row
                    .try_get("media_ref")
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

                Ok(AudioRecording {
                    id: Uuid::parse_str(&id)
                        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                    session_id: SessionId::from_uuid(
                        Uuid::parse_str(&sid)
                            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                    ),
                    media_ref: StoragePath::from_raw(media_ref),
                    duration_secs: row
                        .try_get("duration_secs")
                        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                    created_at: row
                        .try_get("created_at")
                        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
                })
            })
            .collect()
    }
}
