use crossmodal::domain::{MediaRole, SessionId, StoragePath};

#[test]
fn paths_are_namespaced_by_role_and_session() {
    let id = SessionId::new();
    let path = StoragePath::new(MediaRole::Upload, &id, "clip.wav");

    assert_eq!(
        path.as_str(),
        format!("uploads/{}/clip.wav", id.as_uuid())
    );
}

#[test]
fn roles_map_to_distinct_directories() {
    let id = SessionId::new();
    let dirs: Vec<&str> = [
        MediaRole::Upload,
        MediaRole::Recording,
        MediaRole::GeneratedImage,
        MediaRole::GeneratedAudio,
    ]
    .iter()
    .map(|r| r.as_dir())
    .collect();

    assert_eq!(
        dirs,
        vec!["uploads", "recordings", "generated-images", "generated-audio"]
    );

    // Same filename under two sessions never collides.
    let other = SessionId::new();
    assert_ne!(
        StoragePath::new(MediaRole::Upload, &id, "clip.wav"),
        StoragePath::new(MediaRole::Upload, &other, "clip.wav")
    );
}
