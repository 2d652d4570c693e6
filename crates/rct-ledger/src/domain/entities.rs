//! # Domain Entities
//!
//! Records held by the ledger and the per-call context.

use super::value_objects::{amount_format, AccountId, Amount, Height, Metadata};
use serde::{Deserialize, Serialize};

// =============================================================================
// TOKEN METADATA
// =============================================================================

/// Fixed token descriptors.
pub mod token {
    /// Token name.
    pub const NAME: &str = "RecycleToken";

    /// Token ticker symbol.
    pub const SYMBOL: &str = "RCT";

    /// Decimal places of one whole token.
    pub const DECIMALS: u8 = 6;
}

// =============================================================================
// CALL CONTEXT
// =============================================================================

/// Identity and time supplied by the calling environment for one operation.
///
/// The ledger never reads a clock; `height` is the only notion of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Account invoking the operation.
    pub caller: AccountId,
    /// External time counter at the moment of the call.
    pub height: Height,
}

impl CallContext {
    /// Create a context for `caller` at `height`.
    #[must_use]
    pub const fn new(caller: AccountId, height: Height) -> Self {
        Self { caller, height }
    }
}

// =============================================================================
// MINT RECORD
// =============================================================================

/// Immutable record written for every issuance (plain or vesting).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
    /// Units issued.
    #[serde(with = "amount_format")]
    pub amount: Amount,
    /// Account the units were issued to.
    pub recipient: AccountId,
    /// Bounded free text describing the reward.
    pub metadata: Metadata,
    /// Height at creation.
    pub timestamp: Height,
}

// =============================================================================
// VESTING SCHEDULE
// =============================================================================

/// Linear release of `granted` units over `duration` height units.
///
/// Only `claimed` ever changes, and only upward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    /// Total units reserved for the recipient.
    #[serde(with = "amount_format")]
    pub granted: Amount,
    /// Height at which vesting began.
    pub start: Height,
    /// Height units until fully vested. Always non-zero.
    pub duration: Height,
    /// Units already credited to the recipient.
    #[serde(with = "amount_format")]
    pub claimed: Amount,
}

impl VestingSchedule {
    /// Units reserved but not yet credited.
    #[must_use]
    pub fn outstanding(&self) -> Amount {
        self.granted.saturating_sub(self.claimed)
    }

    /// Returns true once everything granted has been claimed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.claimed >= self.granted
    }
}

// =============================================================================
// TESTS
// =============================================================================
