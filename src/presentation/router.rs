use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{
    DescriptionGenerator, ImageSynthesizer, SpeechSynthesizer, TranscriptionEngine,
};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{convert_handler, health_handler, session_status_handler};
use crate::presentation::state::AppState;

pub fn create_router<T, D, I, S>(state: AppState<T, D, I, S>) -> Router
where
    T: TranscriptionEngine + 'static,
    D: DescriptionGenerator + 'static,
    I: ImageSynthesizer + 'static,
    S: SpeechSynthesizer + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/convert", post(convert_handler::<T, D, I, S>))
        .route(
            "/api/v1/sessions/{session_id}",
            get(session_status_handler::<T, D, I, S>),
        )
        // No upload size cap: media uploads are unbounded, a known gap.
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
