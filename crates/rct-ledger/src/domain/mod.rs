//! # Domain Layer - Reward Ledger
//!
//! Pure business logic: no I/O, no locking, no clock.
//!
//! ## Components
//!
//! - `value_objects`: AccountId, Metadata, numeric aliases
//! - `entities`: CallContext, MintRecord, VestingSchedule, token constants
//! - `state`: LedgerState aggregate
//! - `policy`: AccessPolicy role predicates
//! - `vesting`: linear release arithmetic
//! - `ledger`: RecycleLedger engine
//! - `invariants`: whole-state consistency checks

pub mod entities;
pub mod invariants;
pub mod ledger;
pub mod policy;
pub mod state;
pub mod value_objects;
pub mod vesting;

pub use entities::*;
pub use invariants::*;
pub use ledger::*;
pub use policy::*;
pub use state::*;
pub use value_objects::*;
