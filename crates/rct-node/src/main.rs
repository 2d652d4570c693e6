//! # RCT Node
//!
//! Entry point for the RecycleToken ledger node.
//!
//! ## Startup Sequence
//!
//! 1. Load telemetry configuration from env and install the subscriber
//! 2. Load genesis (file or devnet default) and build the ledger
//! 3. Serve JSON-lines requests from stdin until EOF or Ctrl-C

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use rct_ledger::prelude::ServiceConfig;
use rct_node::{serve, spawn_stdin_lines, GenesisConfig, Node};
use rct_telemetry::{init_telemetry, TelemetryConfig};

/// Request lines buffered between the stdin thread and the loop.
const STDIN_BUFFER: usize = 64;

/// RecycleToken ledger node
#[derive(Parser, Debug)]
#[command(name = "rct-node")]
#[command(about = "RecycleToken reward ledger serving JSON-lines requests on stdin")]
struct Args {
    /// Genesis file (JSON). Uses the devnet genesis when omitted.
    #[arg(short, long, env = "RCT_GENESIS")]
    genesis: Option<PathBuf>,

    /// Write Prometheus metrics to stderr on exit
    #[arg(long)]
    dump_metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::from_env();
    let _telemetry_guard = init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    let genesis = match &args.genesis {
        Some(path) => GenesisConfig::load(path)
            .with_context(|| format!("Failed to load genesis from {}", path.display()))?,
        None => {
            warn!("No genesis file given, using devnet genesis");
            GenesisConfig::devnet()
        }
    };

    let service_config = ServiceConfig::from_env();
    info!(?service_config, "Starting {}", telemetry.full_service_name());

    let node = Node::new(service_config, &genesis).context("Failed to build ledger from genesis")?;

    let lines = spawn_stdin_lines(STDIN_BUFFER).context("Failed to start stdin reader")?;
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Ctrl-C handler unavailable, running until end of input");
                std::future::pending::<()>().await;
            }
        }
    };

    let summary = serve(&node, lines, tokio::io::stdout(), shutdown)
        .await
        .context("Request loop failed")?;
    info!(
        lines = summary.lines_read,
        responses = summary.responses_written,
        rejected = summary.rejected,
        interrupted = summary.interrupted,
        "Request loop finished"
    );

    let stats = node.service().stats();
    info!(
        operations = stats.operations_executed,
        successful = stats.successful_operations,
        rejected = stats.rejected_operations,
        queries = stats.queries_served,
        "Final service stats"
    );

    if args.dump_metrics {
        let metrics = rct_telemetry::gather_metrics().context("Failed to encode metrics")?;
        eprint!("{metrics}");
    }

    Ok(())
}
