//! Logging and tracing utilities

use crate::config::{AppConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing from `PULSE_*` environment settings
pub fn init_tracing() -> anyhow::Result<()> {
    init_tracing_with(&AppConfig::from_env())
}

/// Initialize tracing from an [`AppConfig`]
///
/// `RUST_LOG` wins over `config.log_filter` when set. Logs go to stderr so
/// stdout stays clean for JSON digests. Fails if a global subscriber is
/// already installed.
pub fn init_tracing_with(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
    }

    tracing::debug!(app = %config.app_name, env = %config.environment, "tracing initialized");
    Ok(())
}
