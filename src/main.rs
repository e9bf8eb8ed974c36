use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use crossmodal::application::ports::SessionRepository;
use crossmodal::application::services::{ConversionPolicy, ConversionService};
use crossmodal::infrastructure::audio::{FfmpegNormalizer, OpenAiWhisperEngine};
use crossmodal::infrastructure::image::OpenAiImageClient;
use crossmodal::infrastructure::llm::OpenAiChatClient;
use crossmodal::infrastructure::observability::{init_tracing, TracingConfig};
use crossmodal::infrastructure::persistence::{connect_sqlite, SqliteSessionRepository};
use crossmodal::infrastructure::speech::ElevenLabsClient;
use crossmodal::infrastructure::storage::LocalMediaStore;
use crossmodal::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(TracingConfig::default(), settings.server.port);

    let pool = connect_sqlite(&settings.database.url).await?;
    let session_repository: Arc<dyn SessionRepository> =
        Arc::new(SqliteSessionRepository::new(pool));

    let media_store = Arc::new(LocalMediaStore::new(PathBuf::from(&settings.storage.root))?);

    // One shared HTTP client so every backend call carries the same
    // explicit timeout.
    let http_client = reqwest::Client::builder()
        .timeout(settings.pipeline.request_timeout())
        .build()?;

    let transcriber = Arc::new(OpenAiWhisperEngine::new(
        http_client.clone(),
        settings.openai.api_key.clone(),
        settings.openai.base_url.clone(),
        settings.openai.whisper_model.clone(),
    ));
    let describer = Arc::new(OpenAiChatClient::new(
        http_client.clone(),
        settings.openai.api_key.clone(),
        settings.openai.base_url.clone(),
        settings.openai.chat_model.clone(),
        settings.openai.vision_model.clone(),
        settings.openai.max_tokens,
    ));
    let image_synthesizer = Arc::new(OpenAiImageClient::new(
        http_client.clone(),
        settings.openai.api_key.clone(),
        settings.openai.base_url.clone(),
        settings.openai.image_model.clone(),
        settings.openai.image_size.clone(),
        settings.openai.image_quality.clone(),
    ));
    let speech_synthesizer = Arc::new(ElevenLabsClient::new(
        http_client,
        settings.elevenlabs.api_key.clone(),
        settings.elevenlabs.base_url.clone(),
        settings.elevenlabs.model_id.clone(),
    ));

    let policy = ConversionPolicy {
        transcript_fallback: settings.pipeline.transcript_fallback,
        default_voice: settings.elevenlabs.default_voice.clone(),
        audio_to_image_models: settings.audio_to_image_models(),
        image_to_audio_models: settings.image_to_audio_models(),
    };

    let conversion_service = Arc::new(ConversionService::new(
        transcriber,
        describer,
        image_synthesizer,
        speech_synthesizer,
        Arc::new(FfmpegNormalizer::default()),
        media_store,
        Arc::clone(&session_repository),
        policy,
    ));

    let state = AppState {
        conversion_service,
        session_repository,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
