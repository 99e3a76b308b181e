//! Runtime orchestration: starting, wiring and stopping the ledger, plus tracing setup.

pub mod inventory_system;
pub mod tracing;

pub use inventory_system::*;
pub use tracing::*;
