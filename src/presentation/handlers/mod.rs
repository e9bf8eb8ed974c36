mod convert;
mod health;
mod session_status;

pub use convert::{convert_handler, ConversionEnvelope, ErrorEnvelope};
pub use health::health_handler;
pub use session_status::{session_status_handler, SessionStatusResponse};
