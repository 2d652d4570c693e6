//! # RCT Telemetry
//!
//! Observability for the RecycleToken ledger.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with env filter, plain or JSON output
//! - **Metrics**: Prometheus counters, gauges and histograms
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rct_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RCT_SERVICE_NAME` | `rct-node` | Service name in logs |
//! | `RCT_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honored) |
//! | `RCT_CONSOLE_OUTPUT` | `true` | Write logs to stderr |
//! | `RCT_JSON_LOGS` | `false` | JSON log lines |
//! | `RCT_NETWORK` | `devnet` | Network label |

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{gather_metrics, register_metrics};
pub use tracing_setup::{init_tracing, TracingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    let tracing = init_tracing(config)?;
    Ok(TelemetryGuard { _tracing: tracing })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
}
