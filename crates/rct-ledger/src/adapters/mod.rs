//! Adapters layer for the reward ledger.
//!
//! In-process implementations of the outbound ports.

pub mod event_log;
pub mod height;

pub use event_log::InMemoryEventLog;
pub use height::ManualHeightSource;
