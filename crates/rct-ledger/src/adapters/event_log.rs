//! In-memory audit trail.
//!
//! Implements the `EventSink` port by appending every event to a vector.

use crate::domain::{AccountId, Height};
use crate::events::LedgerEvent;
use crate::ports::outbound::{EventSink, PublishError};
use parking_lot::RwLock;
use tracing::trace;

/// Append-only event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<LedgerEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Copy of every event in commit order.
    pub fn snapshot(&self) -> Vec<LedgerEvent> {
        self.events.read().clone()
    }

    /// Events committed at or after `height`.
    pub fn since(&self, height: Height) -> Vec<LedgerEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.height() >= height)
            .cloned()
            .collect()
    }

    /// Events that credited or debited `account`.
    pub fn involving(&self, account: &AccountId) -> Vec<LedgerEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| touches(event, account))
            .cloned()
            .collect()
    }

    /// Most recent event.
    pub fn last(&self) -> Option<LedgerEvent> {
        self.events.read().last().cloned()
    }
}

fn touches(event: &LedgerEvent, account: &AccountId) -> bool {
    match event {
        LedgerEvent::Minted { recipient, .. }
        | LedgerEvent::VestingGranted { recipient, .. }
        | LedgerEvent::VestingClaimed { recipient, .. } => recipient == account,
        LedgerEvent::Transferred {
            sender, recipient, ..
        } => sender == account || recipient == account,
        LedgerEvent::TransferredFrom {
            owner, recipient, ..
        } => owner == account || recipient == account,
        LedgerEvent::Burned { account: burner, .. } => burner == account,
        _ => false,
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: LedgerEvent) -> Result<(), PublishError> {
        trace!(?event, "recording ledger event");
        self.events.write().push(event);
        Ok(())
    }
}
