use crossmodal::domain::{
    ConversionDirection, ConversionSession, SessionStatus, StoragePath,
};

fn new_session() -> ConversionSession {
    ConversionSession::new(
        ConversionDirection::AudioToImage,
        StoragePath::from_raw("uploads/x/clip.wav"),
        None,
    )
}

#[test]
fn new_session_starts_pending() {
    let session = new_session();
    assert_eq!(session.status, SessionStatus::Pending);
    assert!(session.output_ref.is_none());
    assert!(session.error_text.is_none());
    assert!(session.completed_at.is_none());
}

#[test]
fn lifecycle_pending_processing_completed() {
    let mut session = new_session();
    session.start_processing().unwrap();
    assert_eq!(session.status, SessionStatus::Processing);

    session
        .complete(
            StoragePath::from_raw("generated-images/x/output.png"),
            "whisper-1 + gpt-4o-mini + dall-e-3".to_string(),
        )
        .unwrap();

    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.output_ref.is_some());
    assert!(session.error_text.is_none());
    assert!(session.completed_at.is_some());
}

#[test]
fn lifecycle_pending_processing_failed() {
    let mut session = new_session();
    session.start_processing().unwrap();
    session.fail("backend exploded".to_string()).unwrap();

    assert_eq!(session.status, SessionStatus::Failed);
    assert!(session.output_ref.is_none());
    assert_eq!(session.error_text.as_deref(), Some("backend exploded"));
    assert!(session.completed_at.is_some());
}

#[test]
fn cannot_complete_without_processing() {
    let mut session = new_session();
    let err = session
        .complete(StoragePath::from_raw("out.png"), String::new())
        .unwrap_err();
    assert_eq!(err.from, SessionStatus::Pending);
    assert_eq!(err.to, SessionStatus::Completed);
}

#[test]
fn cannot_fail_without_processing() {
    let mut session = new_session();
    assert!(session.fail("too early".to_string()).is_err());
}

#[test]
fn terminal_states_reject_further_transitions() {
    let mut session = new_session();
    session.start_processing().unwrap();
    session
        .complete(StoragePath::from_raw("out.png"), String::new())
        .unwrap();

    assert!(session.status.is_terminal());
    assert!(session.start_processing().is_err());
    assert!(session.fail("late".to_string()).is_err());

    let mut failed = new_session();
    failed.start_processing().unwrap();
    failed.fail("boom".to_string()).unwrap();
    assert!(failed
        .complete(StoragePath::from_raw("out.png"), String::new())
        .is_err());
}

#[test]
fn no_reentry_into_processing() {
    let mut session = new_session();
    session.start_processing().unwrap();
    assert!(!session.status.is_terminal());
    assert!(session.start_processing().is_err());
}

#[test]
fn status_roundtrips_through_strings() {
    for status in [
        SessionStatus::Pending,
        SessionStatus::Processing,
        SessionStatus::Completed,
        SessionStatus::Failed,
    ] {
        assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
    }
    assert!("BOGUS".parse::<SessionStatus>().is_err());
}
