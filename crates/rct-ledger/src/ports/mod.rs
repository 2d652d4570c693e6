//! Ports layer for the reward ledger.
//!
//! - Inbound (driving) port: `RecycleTokenApi`, the operations callers invoke
//! - Outbound (driven) ports: `HeightSource` and `EventSink`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
