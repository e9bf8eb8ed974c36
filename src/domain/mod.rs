mod audio_recording;
mod direction;
mod session;
mod session_id;
mod session_status;
mod storage_path;
mod warning;

pub use audio_recording::AudioRecording;
pub use direction::ConversionDirection;
pub use session::{ConversionSession, InvalidTransition};
pub use session_id::SessionId;
pub use session_status::SessionStatus;
pub use storage_path::{MediaRole, StoragePath};
pub use warning::ConversionWarning;
