//! Outbound (Driven) ports for the reward ledger.
//!
//! The ledger never reads a clock and never talks to an audit trail directly;
//! both are supplied by the embedding environment through these traits.

use crate::domain::Height;
use crate::events::LedgerEvent;
use thiserror::Error;

/// External, monotonically non-decreasing time counter.
pub trait HeightSource: Send + Sync {
    /// Current height. Must never go backwards between calls.
    fn current_height(&self) -> Height;
}

/// Receiver for committed mutations (audit log, indexer, bus bridge).
pub trait EventSink: Send + Sync {
    /// Delivers one event. Called in commit order while the ledger is locked,
    /// so implementations must not call back into the service.
    fn publish(&self, event: LedgerEvent) -> Result<(), PublishError>;
}

/// Error type for publish operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishError {
    /// The downstream consumer is gone.
    #[error("event sink closed")]
    Closed,
}
