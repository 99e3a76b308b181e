use crate::item_actor::{InventoryError, StockAction, StockLevel};
use crate::model::{InventoryItem, ItemCode, ItemUpdate, NewItem};
use crate::report::{sort_items, StockReport};
use async_trait::async_trait;
use keyed_actor::{ActorClient, Clock, FrameworkError, ResourceClient};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Client for the inventory ledger.
///
/// Every call is one request to the item registry; stock movements run inside the owning
/// item's actor, so concurrent callers cannot oversell an item.
#[derive(Clone)]
pub struct InventoryClient {
    inner: ResourceClient<InventoryItem>,
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl ActorClient<InventoryItem> for InventoryClient {
    type Error = InventoryError;

    fn inner(&self) -> &ResourceClient<InventoryItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        InventoryError::from_framework(None, e)
    }
}

impl InventoryClient {
    pub fn new(inner: ResourceClient<InventoryItem>, clock: Arc<dyn Clock>) -> Self {
        Self { inner, clock }
    }

    /// Adds an item and returns its code.
    ///
    /// A requested code that is already taken is rejected as invalid input.
    #[instrument(skip(self, item), fields(name = %item.name))]
    pub async fn create_item(&self, item: NewItem) -> Result<ItemCode, InventoryError> {
        debug!(?item, "create_item called");
        let requested = item.code;
        self.inner
            .create(item)
            .await
            .map_err(|e| InventoryError::from_framework(requested, e))
    }

    /// Records a receipt of `amount`.
    #[instrument(skip(self))]
    pub async fn receive(&self, code: ItemCode, amount: Decimal) -> Result<StockLevel, InventoryError> {
        debug!("Sending request");
        self.movement(code, StockAction::Receive(amount)).await
    }

    /// Records a withdrawal of `amount`.
    ///
    /// Emits a low-stock warning when the committed quantity is at or below the minimum level.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, code: ItemCode, amount: Decimal) -> Result<StockLevel, InventoryError> {
        debug!("Sending request");
        let level = self.movement(code, StockAction::Withdraw(amount)).await?;
        if level.is_low() {
            warn!(%code, quantity = %level.quantity, "Minimum stock level reached");
        }
        Ok(level)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, code: ItemCode) -> Result<InventoryItem, InventoryError> {
        self.get(code).await?.ok_or(InventoryError::NotFound(code))
    }

    /// All items, ordered by name and then code.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<InventoryItem>, InventoryError> {
        let mut items = self.list().await?;
        sort_items(&mut items);
        Ok(items)
    }

    /// Items at or below their minimum level.
    #[instrument(skip(self))]
    pub async fn list_critical_items(&self) -> Result<Vec<InventoryItem>, InventoryError> {
        let mut items = self.list_items().await?;
        items.retain(InventoryItem::is_critical);
        info!(count = items.len(), "Critical items listed");
        Ok(items)
    }

    /// Edits name, unit, price or minimum level and returns the committed item.
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        code: ItemCode,
        update: ItemUpdate,
    ) -> Result<InventoryItem, InventoryError> {
        self.inner
            .update(code, update)
            .await
            .map_err(|e| InventoryError::from_framework(Some(code), e))
    }

    /// Removes an item. Its code is never issued again.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, code: ItemCode) -> Result<(), InventoryError> {
        self.delete(code).await
    }

    #[instrument(skip(self))]
    pub async fn stock_report(&self) -> Result<StockReport, InventoryError> {
        let items = self.list().await?;
        Ok(StockReport::build(items, self.clock.now()))
    }

    async fn movement(
        &self,
        code: ItemCode,
        action: StockAction,
    ) -> Result<StockLevel, InventoryError> {
        self.inner
            .perform_action(code, action)
            .await
            .map_err(|e| InventoryError::from_framework(Some(code), e))
    }
}
