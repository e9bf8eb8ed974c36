use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::session_id::SessionId;
use super::storage_path::StoragePath;

/// Raw browser-recorded audio attached to a session. Owned by the session
/// and deleted with it.
#[derive(Debug, Clone)]
pub struct AudioRecording {
    pub id: Uuid,
    pub session_id: SessionId,
    pub media_ref: StoragePath,
    pub duration_secs: f64,
    pub created_at: DateTime<Utc>,
}

impl AudioRecording {
    pub fn new(session_id: SessionId, media_ref: StoragePath, duration_secs: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            media_ref,
            duration_secs,
            created_at: Utc::now(),
        }
    }
}
