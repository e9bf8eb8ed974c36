use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{
    DescriptionGenerator, ImageSynthesizer, SpeechSynthesizer, TranscriptionEngine,
};
use crate::domain::SessionId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct SessionStatusResponse {
    pub id: String,
    pub direction: String,
    pub status: String,
    pub input_ref: String,
    pub output_ref: Option<String>,
    pub models_used: String,
    pub error_text: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn session_status_handler<T, D, I, S>(
    State(state): State<AppState<T, D, I, S>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse
where
    T: TranscriptionEngine + 'static,
    D: DescriptionGenerator + 'static,
    I: ImageSynthesizer + 'static,
    S: SpeechSynthesizer + 'static,
{
    let uuid = match Uuid::parse_str(&session_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid session ID: {}", session_id),
                }),
            )
                .into_response();
        }
    };

    match state
        .session_repository
        .get_by_id(SessionId::from_uuid(uuid))
        .await
    {
        Ok(Some(session)) => {
            let response = SessionStatusResponse {
                id: session.id.to_string(),
                direction: session.direction.as_str().to_string(),
                status: session.status.as_str().to_string(),
                input_ref: session.input_ref.as_str().to_string(),
                output_ref: session.output_ref.map(|p| p.as_str().to_string()),
                models_used: session.models_used,
                error_text: session.error_text,
                created_at: session.created_at.to_rfc3339(),
                completed_at: session.completed_at.map(|t| t.to_rfc3339()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session not found: {}", session_id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch session status");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch session: {}", e),
                }),
            )
                .into_response()
        }
    }
}
