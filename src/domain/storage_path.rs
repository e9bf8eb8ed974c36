use std::fmt;

use super::session_id::SessionId;

/// Role a staged blob plays in a conversion. Each role maps to its own
/// subdirectory so inputs and generated outputs never share a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRole {
    Upload,
    Recording,
    GeneratedImage,
    GeneratedAudio,
}

impl MediaRole {
    pub fn as_dir(&self) -> &'static str {
        match self {
            MediaRole::Upload => "uploads",
            MediaRole::Recording => "recordings",
            MediaRole::GeneratedImage => "generated-images",
            MediaRole::GeneratedAudio => "generated-audio",
        }
    }
}

/// Location of a staged blob, always keyed by session id so concurrent
/// sessions cannot clobber each other's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(role: MediaRole, session_id: &SessionId, filename: &str) -> Self {
        Self(format!(
            "{}/{}/{}",
            role.as_dir(),
            session_id.as_uuid(),
            filename
        ))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
