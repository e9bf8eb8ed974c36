use crate::presentation::config::Environment;

/// Configuration for tracing initialization, resolved from `APP_ENV` and
/// `LOG_FORMAT`. Production defaults to json output; everything else to
/// human-readable lines.
pub struct TracingConfig {
    pub environment: Environment,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let environment = std::env::var("APP_ENV")
            .ok()
            .and_then(|v| Environment::try_from(v).ok())
            .unwrap_or(Environment::Local);

        let json_format = std::env::var("LOG_FORMAT")
            .map(|v| v.to_lowercase() == "json")
            .unwrap_or(environment == Environment::Prod);

        Self {
            environment,
            json_format,
        }
    }
}
