use chrono::{DateTime, Utc};

use super::direction::ConversionDirection;
use super::session_id::SessionId;
use super::session_status::SessionStatus;
use super::storage_path::StoragePath;

/// One user-initiated conversion attempt and its full lifecycle record.
///
/// Once the status leaves Processing exactly one of `output_ref` (on
/// Completed) or `error_text` (on Failed) is set.
#[derive(Debug, Clone)]
pub struct ConversionSession {
    pub id: SessionId,
    pub direction: ConversionDirection,
    pub input_ref: StoragePath,
    pub prompt: Option<String>,
    pub output_ref: Option<StoragePath>,
    pub models_used: String,
    pub status: SessionStatus,
    pub error_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid session transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: SessionStatus,
    pub to: SessionStatus,
}

impl ConversionSession {
    pub fn new(
        direction: ConversionDirection,
        input_ref: StoragePath,
        prompt: Option<String>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            direction,
            input_ref,
            prompt,
            output_ref: None,
            models_used: String::new(),
            status: SessionStatus::Pending,
            error_text: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn start_processing(&mut self) -> Result<(), InvalidTransition> {
        self.transition(SessionStatus::Processing)
    }

    pub fn complete(
        &mut self,
        output_ref: StoragePath,
        models_used: String,
    ) -> Result<(), InvalidTransition> {
        self.transition(SessionStatus::Completed)?;
        self.output_ref = Some(output_ref);
        self.models_used = models_used;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn fail(&mut self, error_text: String) -> Result<(), InvalidTransition> {
        self.transition(SessionStatus::Failed)?;
        self.error_text = Some(error_text);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: SessionStatus) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
