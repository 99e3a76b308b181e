//! The inventory item actor: ledger rules, stock movements and errors.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::InventoryClient;
use crate::model::InventoryItem;
use keyed_actor::{Clock, ResourceActor, Store};
use std::sync::Arc;

/// Creates the item registry actor and its client.
///
/// The actor still has to be spawned with `actor.run(())`.
pub fn new(
    mailbox_size: usize,
    store: Arc<dyn Store<InventoryItem>>,
    clock: Arc<dyn Clock>,
) -> (ResourceActor<InventoryItem>, InventoryClient) {
    let (actor, generic_client) = ResourceActor::new(mailbox_size, store, Arc::clone(&clock));
    let client = InventoryClient::new(generic_client, clock);

    (actor, client)
}
