//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or full directive
    pub log_level: String,

    /// Whether to write logs to stderr at all
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Network identifier (devnet, testnet, mainnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "rct-node".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "devnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RCT_SERVICE_NAME`: Service name (default: rct-node)
    /// - `RCT_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `RCT_CONSOLE_OUTPUT`: Enable log output (default: true)
    /// - `RCT_JSON_LOGS`: JSON logs (default: false, true inside containers)
    /// - `RCT_NETWORK`: Network name (default: devnet)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("RCT_SERVICE_NAME").unwrap_or_else(|_| "rct-node".to_string()),

            log_level: env::var("RCT_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("RCT_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("RCT_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            network: env::var("RCT_NETWORK").unwrap_or_else(|_| "devnet".to_string()),
        }
    }

    /// Service name qualified by network, e.g. `rct-node@testnet`.
    pub fn full_service_name(&self) -> String {
        format!("{}@{}", self.service_name, self.network)
    }
}
