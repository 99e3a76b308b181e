//! Stock movements for the item actor.
//!
//! These are the only operations that change an item's quantity. They are handled by
//! [`ActorEntity::handle_action`](keyed_actor::ActorEntity::handle_action) inside the item's own
//! actor, so two movements on the same item never interleave.

use crate::model::StockStatus;
use rust_decimal::Decimal;

/// Custom actions for inventory items.
#[derive(Debug, Clone, PartialEq)]
pub enum StockAction {
    /// Adds a receipt. The amount must be positive.
    Receive(Decimal),
    /// Takes a withdrawal.
    ///
    /// # Errors
    /// Fails with `InsufficientStock` if the amount exceeds the quantity on hand.
    Withdraw(Decimal),
}

/// The committed stock level after a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub quantity: Decimal,
    pub status: StockStatus,
}

impl StockLevel {
    /// At or below the minimum level.
    pub fn is_low(&self) -> bool {
        self.status == StockStatus::Critical
    }
}
