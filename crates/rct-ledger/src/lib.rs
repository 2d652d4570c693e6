//! # RCT Ledger - RecycleToken Reward Ledger
//!
//! **Token:** RecycleToken (`RCT`), 6 decimals
//!
//! ## Purpose
//!
//! Tracks balances of a fungible reward token issued to users for verified
//! recycling actions. Issuance is restricted to registered minters and may be
//! released immediately or linearly over time through vesting schedules.
//! Holders transfer, delegate spending and burn their units; an administrator
//! manages minters and can pause the ledger.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Supply equals balances plus vesting reserve | `domain/invariants.rs` - `check_conservation_invariant()` |
//! | INVARIANT-2 | A schedule never pays out more than granted | `domain/vesting.rs` clamps elapsed time; `check_vesting_invariant()` |
//! | INVARIANT-3 | Mint ids strictly increase | `domain/state.rs` counter; `check_mint_ids_invariant()` |
//! | INVARIANT-4 | Failed operations leave no trace | `domain/ledger.rs` - validate-then-apply |
//!
//! ## Authorization
//!
//! | Operation | Required Role | Blocked by Pause |
//! |-----------|---------------|------------------|
//! | `set_admin`, `pause`, `unpause`, `add_minter`, `remove_minter` | admin | no |
//! | `mint`, `mint_with_vesting` | active minter | yes |
//! | `claim_vesting` | schedule recipient | yes |
//! | `transfer` | sender | yes |
//! | `approve` | any | yes |
//! | `transfer_from` | spender with allowance | yes |
//! | `burn` | any (own balance) | yes |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `HeightSource` | External time counter |
//! | `EventSink` | Audit trail of committed mutations |
//!
//! ## Usage Example
//!
//! ```ignore
//! use rct_ledger::prelude::*;
//!
//! let service = create_test_service(admin);
//! service.add_minter(admin, minter)?;
//! let id = service.mint(minter, 1_000_000, user, "Reward for recycling 10kg plastic")?;
//! assert_eq!(service.balance_of(&user), 1_000_000);
//! ```

#![warn(clippy::all)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{token, CallContext, MintRecord, VestingSchedule};
    pub use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
    pub use crate::domain::ledger::RecycleLedger;
    pub use crate::domain::state::LedgerState;
    pub use crate::domain::value_objects::{AccountId, Amount, Height, Metadata, MintId};

    // Errors
    pub use crate::errors::{LedgerError, ServiceError};

    // Payloads and events
    pub use crate::events::{LedgerEvent, LedgerRequest, LedgerResponse};

    // Ports
    pub use crate::ports::inbound::RecycleTokenApi;
    pub use crate::ports::outbound::{EventSink, HeightSource};

    // Adapters
    pub use crate::adapters::{InMemoryEventLog, ManualHeightSource};

    // Service
    pub use crate::service::{
        create_test_service, LedgerService, ServiceConfig, ServiceStats, TEST_LEDGER_IDENTITY,
    };
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
