use chrono::Utc;
use uuid::Uuid;

use crossmodal::application::ports::{RepositoryError, SessionRepository};
use crossmodal::domain::{
    AudioRecording, ConversionDirection, ConversionSession, MediaRole, SessionId, SessionStatus,
    StoragePath,
};
use crossmodal::infrastructure::persistence::{connect_sqlite, SqliteSessionRepository};

async fn repository() -> (SqliteSessionRepository, tempfile::TempDir) {
    // A file-backed database per test: pooled connections to ":memory:"
    // would each see their own empty database.
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/sessions.db", dir.path().display());
    let pool = connect_sqlite(&url).await.unwrap();
    (SqliteSessionRepository::new(pool), dir)
}

fn pending_session() -> ConversionSession {
    ConversionSession::new(
        ConversionDirection::AudioToImage,
        StoragePath::new(MediaRole::Upload, &SessionId::new(), "clip.wav"),
        Some("a sunset over mountains".to_string()),
    )
}

#[tokio::test]
async fn create_then_get_roundtrips_the_session() {
    let (repo, _dir) = repository().await;

    let session = pending_session();
    repo.create(&session).await.unwrap();

    let loaded = repo.get_by_id(session.id).await.unwrap().unwrap();
    assert_eq!(loaded.id, session.id);
    assert_eq!(loaded.direction, ConversionDirection::AudioToImage);
    assert_eq!(loaded.status, SessionStatus::Pending);
    assert_eq!(loaded.input_ref.as_str(), session.input_ref.as_str());
    assert_eq!(loaded.prompt.as_deref(), Some("a sunset over mountains"));
    assert!(loaded.output_ref.is_none());
    assert!(loaded.completed_at.is_none());
}

#[tokio::test]
async fn unknown_id_is_none() {
    let (repo, _dir) = repository().await;
    assert!(repo.get_by_id(SessionId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn full_lifecycle_to_completed() {
    let (repo, _dir) = repository().await;

    let session = pending_session();
    repo.create(&session).await.unwrap();
    repo.mark_processing(session.id).await.unwrap();

    let output = StoragePath::new(MediaRole::GeneratedImage, &session.id, "output.png");
    repo.complete(session.id, &output, "whisper + chat + image")
        .await
        .unwrap();

    let loaded = repo.get_by_id(session.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, SessionStatus::Completed);
    assert_eq!(loaded.output_ref.unwrap().as_str(), output.as_str());
    assert_eq!(loaded.models_used, "whisper + chat + image");
    assert!(loaded.completed_at.is_some());
}

#[tokio::test]
async fn fail_records_the_error_text() {
    let (repo, _dir) = repository().await;

    let session = pending_session();
    repo.create(&session).await.unwrap();
    repo.mark_processing(session.id).await.unwrap();
    repo.fail(session.id, "api request failed: backend down")
        .await
        .unwrap();

    let loaded = repo.get_by_id(session.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, SessionStatus::Failed);
    assert_eq!(
        loaded.error_text.as_deref(),
        Some("api request failed: backend down")
    );
}

#[tokio::test]
async fn guarded_updates_reject_sessions_in_the_wrong_state() {
    let (repo, _dir) = repository().await;

    let session = pending_session();
    repo.create(&session).await.unwrap();

    // Completing a session that was never marked processing.
    let output = StoragePath::new(MediaRole::GeneratedImage, &session.id, "output.png");
    let err = repo
        .complete(session.id, &output, "models")
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    repo.mark_processing(session.id).await.unwrap();

    // A second mark_processing finds no pending row.
    let err = repo.mark_processing(session.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    repo.fail(session.id, "boom").await.unwrap();

    // Terminal sessions cannot be failed again.
    let err = repo.fail(session.id, "boom again").await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[tokio::test]
async fn recordings_attach_and_cascade_on_delete() {
    let (repo, _dir) = repository().await;

    let session = pending_session();
    repo.create(&session).await.unwrap();

    let recording = AudioRecording {
        id: Uuid::new_v4(),
        session_id: session.id,
        media_ref: StoragePath::new(MediaRole::Recording, &session.id, "recording.webm"),
        duration_secs: 2.0,
        created_at: Utc::now(),
    };
    repo.attach_recording(&recording).await.unwrap();

    let recordings = repo.recordings_for(session.id).await.unwrap();
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].id, recording.id);
    assert_eq!(recordings[0].duration_secs, 2.0);
    assert_eq!(
        recordings[0].media_ref.as_str(),
        recording.media_ref.as_str()
    );

    repo.delete(session.id).await.unwrap();
    assert!(repo.get_by_id(session.id).await.unwrap().is_none());
    assert!(repo.recordings_for(session.id).await.unwrap().is_empty());
}
