//! Domain model for the inventory ledger.
//!
//! Contains the [`InventoryItem`] entity, its creation and edit payloads, and the pure
//! [`classify`] function that derives a [`StockStatus`].

pub mod item;
pub mod status;

pub use item::{normalize, InventoryItem, ItemCode, ItemUpdate, NewItem};
pub use status::{classify, StockStatus};
