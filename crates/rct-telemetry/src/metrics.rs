//! Prometheus metrics for the RecycleToken ledger.
//!
//! All metrics follow the naming convention: `rct_ledger_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: operations by name and outcome
//! - **Gauge**: total supply, pause flag
//! - **Histogram**: time spent inside the ledger lock per operation

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Ledger operations by name and outcome (`ok` or the error kind)
    pub static ref LEDGER_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("rct_ledger_operations_total", "Ledger mutations by operation and outcome"),
        &["operation", "outcome"]
    ).expect("metric creation failed");

    /// Operation latency
    pub static ref LEDGER_OPERATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "rct_ledger_operation_duration_seconds",
            "Time spent executing ledger operations"
        ).buckets(vec![0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01]),
        &["operation"]
    ).expect("metric creation failed");

    /// Current total supply in base units
    pub static ref TOTAL_SUPPLY: Gauge = Gauge::new(
        "rct_ledger_total_supply",
        "Total supply including unclaimed vesting reserve, in base units"
    ).expect("metric creation failed");

    /// 1 while the ledger is paused
    pub static ref PAUSED: Gauge = Gauge::new(
        "rct_ledger_paused",
        "Whether the ledger is paused (1) or not (0)"
    ).expect("metric creation failed");
}

/// Register all ledger metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LEDGER_OPERATIONS.clone()),
        Box::new(LEDGER_OPERATION_DURATION.clone()),
        Box::new(TOTAL_SUPPLY.clone()),
        Box::new(PAUSED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Count one ledger operation and record its duration.
pub fn record_operation(operation: &str, outcome: &str, seconds: f64) {
    LEDGER_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
    LEDGER_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(seconds);
}

/// Publish the current total supply. Precision loss above 2^53 is accepted.
#[allow(clippy::cast_precision_loss)]
pub fn set_total_supply(supply: u128) {
    TOTAL_SUPPLY.set(supply as f64);
}

/// Publish the pause flag.
pub fn set_paused(paused: bool) {
    PAUSED.set(if paused { 1.0 } else { 0.0 });
}
