//! [`ActorEntity`] implementation for [`InventoryItem`].
//!
//! The runtime owns identity and audit stamps; this impl only supplies the ledger rules.

use super::actions::{StockAction, StockLevel};
use super::error::InventoryError;
use crate::model::{InventoryItem, ItemCode, ItemUpdate, NewItem};
use async_trait::async_trait;
use keyed_actor::{ActorEntity, AuditStamp};

#[async_trait]
impl ActorEntity for InventoryItem {
    type Id = ItemCode;
    type Create = NewItem;
    type Update = ItemUpdate;
    type Action = StockAction;
    type ActionResult = StockLevel;
    type Context = ();
    type Error = InventoryError;

    fn id(&self) -> ItemCode {
        self.code
    }

    fn audit(&self) -> &AuditStamp {
        &self.stamp
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.stamp
    }

    fn requested_id(params: &NewItem) -> Option<ItemCode> {
        params.code
    }

    fn from_create_params(
        code: ItemCode,
        params: NewItem,
        stamp: AuditStamp,
    ) -> Result<Self, InventoryError> {
        InventoryItem::new(code, params, stamp)
    }

    /// Edits name, unit, price or minimum level. Never the quantity.
    async fn on_update(&mut self, update: ItemUpdate, _ctx: &()) -> Result<(), InventoryError> {
        self.apply(update)
    }

    async fn handle_action(
        &mut self,
        action: StockAction,
        _ctx: &(),
    ) -> Result<StockLevel, InventoryError> {
        let quantity = match action {
            StockAction::Receive(amount) => self.receive(amount)?,
            StockAction::Withdraw(amount) => self.withdraw(amount)?,
        };
        Ok(StockLevel {
            quantity,
            status: self.status(),
        })
    }
}
