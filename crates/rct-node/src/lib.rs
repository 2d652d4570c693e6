//! # RCT Node
//!
//! Hosts one [`LedgerService`] behind a JSON-lines protocol.
//!
//! ## Wire Format
//!
//! One request per line:
//!
//! ```json
//! {"correlation_id":"…","caller":"0x0202…","height":12,
//!  "request":{"op":"mint","amount":"1000000","recipient":"0x0a0a…","metadata":"…"}}
//! ```
//!
//! `correlation_id` and `height` are optional. A supplied height moves the
//! node's height counter forward before the request runs; a height behind
//! the current one is rejected with code 200.
//!
//! One response per request line, in order:
//!
//! ```json
//! {"correlation_id":"…","height":12,"response":{"status":"id","id":1}}
//! ```
//!
//! Blank lines are skipped. A line that does not decode produces an error
//! response with code 201 and the loop carries on. The loop ends at end of
//! input or when the shutdown future resolves, whichever comes first.

pub mod genesis;

use std::future::Future;
use std::io::BufRead;
use std::sync::Arc;

use rct_ledger::prelude::{
    AccountId, Height, InMemoryEventLog, LedgerRequest, LedgerResponse, LedgerService,
    ManualHeightSource, ServiceConfig, ServiceError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use genesis::{GenesisConfig, GenesisError};

/// Service type hosted by the node.
pub type NodeService = LedgerService<ManualHeightSource, InMemoryEventLog>;

/// Request loop errors. Ledger rejections are responses, not errors.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One request line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub correlation_id: Option<Uuid>,
    pub caller: AccountId,
    #[serde(default)]
    pub height: Option<Height>,
    pub request: LedgerRequest,
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub correlation_id: Uuid,
    pub height: Height,
    pub response: LedgerResponse,
}

/// Counters for one run of the request loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub lines_read: u64,
    pub responses_written: u64,
    pub rejected: u64,
    /// Stopped by the shutdown signal rather than end of input.
    pub interrupted: bool,
}

/// A ledger node.
pub struct Node {
    service: NodeService,
}

impl Node {
    /// Build a node from a genesis configuration.
    pub fn new(config: ServiceConfig, genesis: &GenesisConfig) -> Result<Self, GenesisError> {
        let ledger = genesis.build()?;
        let service = LedgerService::new(
            config,
            ledger,
            Arc::new(ManualHeightSource::new(genesis.start_height)),
            Arc::new(InMemoryEventLog::new()),
        );

        info!(
            admin = %genesis.admin,
            minters = genesis.minters.len(),
            start_height = genesis.start_height,
            "Ledger initialized from genesis"
        );
        Ok(Self { service })
    }

    /// The hosted service.
    pub fn service(&self) -> &NodeService {
        &self.service
    }

    /// Decode and execute one request line.
    pub fn handle_line(&self, line: &str) -> ResponseEnvelope {
        let envelope = match serde_json::from_str::<RequestEnvelope>(line) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Undecodable request line");
                return self.respond(
                    Uuid::new_v4(),
                    ServiceError::MalformedRequest(e.to_string()).into(),
                );
            }
        };
        self.handle_envelope(envelope)
    }

    /// Execute one decoded request.
    pub fn handle_envelope(&self, envelope: RequestEnvelope) -> ResponseEnvelope {
        let correlation_id = envelope.correlation_id.unwrap_or_else(Uuid::new_v4);

        if let Some(height) = envelope.height {
            if let Err(e) = self.service.heights().advance_to(height) {
                warn!(%correlation_id, error = %e, "Rejected request height");
                return self.respond(correlation_id, e.into());
            }
        }

        let response =
            self.service
                .handle_request(correlation_id, envelope.caller, envelope.request);
        self.respond(correlation_id, response)
    }

    fn respond(&self, correlation_id: Uuid, response: LedgerResponse) -> ResponseEnvelope {
        ResponseEnvelope {
            correlation_id,
            height: self.service.current_height(),
            response,
        }
    }
}

/// Read stdin line by line on a dedicated OS thread.
///
/// The thread is detached: a read blocked on an open pipe or terminal does
/// not hold up process exit the way a runtime blocking-pool read would.
pub fn spawn_stdin_lines(buffer: usize) -> std::io::Result<mpsc::Receiver<std::io::Result<String>>> {
    let (tx, rx) = mpsc::channel(buffer);
    std::thread::Builder::new()
        .name("rct-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Serve request lines from `lines` until the channel closes or `shutdown`
/// resolves, writing one response line per request to `writer`.
pub async fn serve<W, F>(
    node: &Node,
    mut lines: mpsc::Receiver<std::io::Result<String>>,
    mut writer: W,
    shutdown: F,
) -> Result<LoopSummary, NodeError>
where
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut summary = LoopSummary::default();

    loop {
        let line = tokio::select! {
            biased;
            () = &mut shutdown => {
                summary.interrupted = true;
                break;
            }
            line = lines.recv() => match line {
                Some(line) => line?,
                None => break,
            },
        };

        summary.lines_read += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = node.handle_line(line);
        if response.response.is_error() {
            summary.rejected += 1;
        }

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        summary.responses_written += 1;
    }

    debug!(?summary, "Request loop stopped");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rct_ledger::prelude::RecycleTokenApi;

    fn node() -> Node {
        Node::new(ServiceConfig::default(), &GenesisConfig::devnet()).unwrap()
    }

    fn envelope(caller: AccountId, height: Option<Height>, request: LedgerRequest) -> RequestEnvelope {
        RequestEnvelope {
            correlation_id: None,
            caller,
            height,
            request,
        }
    }

    #[test]
    fn test_height_advances_with_request() {
        let node = node();
        let genesis = GenesisConfig::devnet();
        let response = node.handle_envelope(envelope(
            genesis.minters[0],
            Some(12),
            LedgerRequest::Mint {
                amount: 5,
                recipient: AccountId::new([0x0A; 20]),
                metadata: String::new(),
            },
        ));

        assert_eq!(response.height, 12);
        assert_eq!(response.response, LedgerResponse::Id { id: 1 });
        let record = node.service().mint_record(1).unwrap();
        assert_eq!(record.timestamp, 12);
    }

    #[test]
    fn test_height_regression_rejected() {
        let node = node();
        let admin = GenesisConfig::devnet().admin;
        node.handle_envelope(envelope(admin, Some(10), LedgerRequest::Pause));

        let response = node.handle_envelope(envelope(admin, Some(9), LedgerRequest::Unpause));
        assert_eq!(response.response.error_code(), Some(200));
        assert_eq!(response.height, 10);
        assert!(node.service().is_paused());
    }

    #[test]
    fn test_malformed_line() {
        let response = node().handle_line("{not json");
        assert_eq!(response.response.error_code(), Some(201));
    }

    #[test]
    fn test_correlation_id_echoed() {
        let id = Uuid::new_v4();
        let line = format!(
            r#"{{"correlation_id":"{id}","caller":"{}","request":{{"op":"get-symbol"}}}}"#,
            AccountId::new([0x09; 20]).to_hex()
        );
        let response = node().handle_line(&line);
        assert_eq!(response.correlation_id, id);
        assert_eq!(response.response, LedgerResponse::symbol());
    }
}
