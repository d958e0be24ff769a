//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after configuration is loaded, and keep
//! the returned guard alive until shutdown. Lines are handed to a background
//! worker so request tasks never block on stdout.

use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

use crate::config::{LogFormat, ServerConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    AlreadyInstalled(String),
}

/// Builds the filter: `RUST_LOG` wins, `server.log_level` is the fallback.
pub fn env_filter(config: &ServerConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::InvalidFilter {
            directive: config.log_level.clone(),
            reason: e.to_string(),
        })
}

/// Installs the global subscriber in the configured format, writing to
/// stdout through a non-blocking worker.
///
/// Dropping the guard flushes pending lines.
pub fn init(config: &ServerConfig) -> Result<WorkerGuard, TelemetryError> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing::subscriber::set_global_default(subscriber(config, writer)?)
        .map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))?;
    Ok(guard)
}

fn subscriber<W>(
    config: &ServerConfig,
    writer: W,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_target(true)
        .with_writer(writer);

    Ok(match config.log_format {
        LogFormat::Pretty => Box::new(builder.finish()),
        LogFormat::Json => Box::new(builder.json().with_current_span(true).finish()),
    })
}
