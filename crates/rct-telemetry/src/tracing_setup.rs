//! Tracing subscriber setup.
//!
//! Logs go to stderr so that stdout stays free for the node's response
//! stream.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{TelemetryConfig, TelemetryError};

/// Guard returned by [`init_tracing`]. Logs a final line on drop.
#[derive(Debug)]
pub struct TracingGuard {
    service: String,
}

impl TracingGuard {
    /// Service name the subscriber was installed for.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service, "Tracing shut down");
    }
}

/// Build the env filter: `RUST_LOG` wins, then the configured level.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<TracingGuard, TelemetryError> {
    let env_filter = build_filter(config)?;

    let output_layer = if !config.console_output {
        None
    } else if config.json_logs {
        // JSON output for containers/production
        Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        )
    } else {
        // Pretty output for development
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(true)
                .boxed(),
        )
    };

    tracing_subscriber::registry()
        .with(output_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    let service = config.full_service_name();
    tracing::info!(
        service = %service,
        json = config.json_logs,
        level = %config.log_level,
        "Tracing initialized"
    );

    Ok(TracingGuard { service })
}
