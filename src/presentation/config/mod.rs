mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, ElevenLabsSettings, OpenAiSettings, PipelineSettings, ServerSettings,
    Settings, StorageSettings,
};
