use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use super::TracingConfig;

/// Installs the global subscriber. `RUST_LOG` wins when set; otherwise the
/// crate logs at debug and everything else at info.
pub fn init_tracing(config: TracingConfig, port: u16) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crossmodal=debug,tower_http=debug"));

    let fmt_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!(
        port = port,
        environment = %config.environment,
        json_format = config.json_format,
        "Logging initialized"
    );
}
