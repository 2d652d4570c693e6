//! # Error Types
//!
//! All error types for the reward ledger.
//!
//! `LedgerError` kinds are stable: each carries a fixed numeric code and a
//! fixed identifier so callers across a service boundary can match on them.

use crate::domain::value_objects::{Amount, Height, MintId};
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors returned by ledger operations.
///
/// The first violated precondition of an operation decides the kind, and no
/// state has changed when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller lacks the role, ownership or allowance the operation needs.
    #[error("unauthorized")]
    Unauthorized,

    /// Ledger is paused; only administration is accepted.
    #[error("ledger is paused")]
    Paused,

    /// Amount (or vesting duration) must be greater than zero.
    #[error("invalid amount: must be greater than zero")]
    InvalidAmount,

    /// Recipient may not be the ledger's own identity.
    #[error("invalid recipient: ledger identity cannot receive issuance")]
    InvalidRecipient,

    /// Caller is not an active minter.
    #[error("caller is not a registered minter")]
    InvalidMinter,

    /// Account already has a minter entry.
    #[error("account already registered as minter")]
    AlreadyRegistered,

    /// Metadata exceeds the character bound.
    #[error("metadata too long: {length} > {max} characters")]
    MetadataTooLong { length: usize, max: usize },

    /// Balance cannot cover the debit.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    /// No vesting schedule for (caller, id).
    #[error("vesting schedule not found: id {id}")]
    VestingNotFound { id: MintId },

    /// Nothing new has vested since the last claim.
    #[error("vesting not mature: nothing claimable for id {id} at height {height}")]
    VestingNotMature { id: MintId, height: Height },

    /// A balance, supply or counter would exceed its integer range.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

impl LedgerError {
    /// Stable numeric code for this kind.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Unauthorized => 100,
            Self::Paused => 101,
            Self::InvalidAmount => 102,
            Self::InvalidRecipient => 103,
            Self::InvalidMinter => 104,
            Self::AlreadyRegistered => 105,
            Self::MetadataTooLong { .. } => 106,
            Self::InsufficientBalance { .. } => 107,
            Self::VestingNotFound { .. } => 108,
            Self::VestingNotMature { .. } => 109,
            Self::ArithmeticOverflow => 110,
        }
    }

    /// Stable identifier for this kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Paused => "Paused",
            Self::InvalidAmount => "InvalidAmount",
            Self::InvalidRecipient => "InvalidRecipient",
            Self::InvalidMinter => "InvalidMinter",
            Self::AlreadyRegistered => "AlreadyRegistered",
            Self::MetadataTooLong { .. } => "MetadataTooLong",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
            Self::VestingNotFound { .. } => "VestingNotFound",
            Self::VestingNotMature { .. } => "VestingNotMature",
            Self::ArithmeticOverflow => "ArithmeticOverflow",
        }
    }

    /// Returns true if retrying later may succeed without changing the input
    /// (pause lifted, balance topped up, time advanced).
    #[must_use]
    pub fn is_state_dependent(&self) -> bool {
        matches!(
            self,
            Self::Paused | Self::InsufficientBalance { .. } | Self::VestingNotMature { .. }
        )
    }
}

// =============================================================================
// SERVICE ERRORS
// =============================================================================

/// Errors raised at the service boundary, outside the ledger rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Supplied height is behind the current one.
    #[error("height regression: current {current}, requested {requested}")]
    HeightRegression { current: Height, requested: Height },

    /// Request payload could not be decoded.
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl ServiceError {
    /// Numeric code. Ledger kinds keep their own; boundary errors use 2xx.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Ledger(err) => err.code(),
            Self::HeightRegression { .. } => 200,
            Self::MalformedRequest(_) => 201,
        }
    }

    /// Stable identifier for this kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.kind_name(),
            Self::HeightRegression { .. } => "HeightRegression",
            Self::MalformedRequest(_) => "MalformedRequest",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
