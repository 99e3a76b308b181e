use crate::clients::InventoryClient;
use crate::config::{Config, ConfigError};
use crate::model::InventoryItem;
use crate::storage::JsonFileStore;
use keyed_actor::{Clock, MemoryStore, Store, StoreError, SystemClock};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Errors raised while starting or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot open store: {0}")]
    Store(#[from] StoreError),

    #[error("Actor task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Owns the running ledger.
///
/// `InventorySystem` is responsible for:
/// - **Wiring**: store, clock and the item registry actor
/// - **Lifecycle**: spawning the registry and waiting for it on shutdown
///
/// # Example
///
/// ```ignore
/// let system = InventorySystem::from_config(&Config::load()?).await?;
///
/// let code = system.inventory_client.create_item(new_item).await?;
/// system.inventory_client.withdraw(code, dec!(850)).await?;
///
/// system.shutdown().await?;
/// ```
pub struct InventorySystem {
    /// Client for the item registry. Clone it freely; the registry stops once every
    /// clone is gone.
    pub inventory_client: InventoryClient,

    handles: Vec<JoinHandle<()>>,
}

impl InventorySystem {
    /// An in-memory ledger on the wall clock.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::<InventoryItem>::new());
        Self::with_store(Config::default().mailbox_size, store, Arc::new(SystemClock))
    }

    /// Starts the registry on `store`. Rows already stored are restored before the first
    /// request is served.
    pub fn with_store(
        mailbox_size: usize,
        store: Arc<dyn Store<InventoryItem>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (item_actor, inventory_client) = crate::item_actor::new(mailbox_size, store, clock);
        let item_handle = tokio::spawn(item_actor.run(()));

        Self {
            inventory_client,
            handles: vec![item_handle],
        }
    }

    /// Starts the ledger described by `config`: a JSON snapshot store when `data_file`
    /// is set, memory otherwise.
    pub async fn from_config(config: &Config) -> Result<Self, SystemError> {
        let store: Arc<dyn Store<InventoryItem>> = match &config.data_file {
            Some(path) => {
                let store = JsonFileStore::<InventoryItem>::open(path).await?;
                info!(path = %store.path().display(), "Using JSON snapshot store");
                Arc::new(store)
            }
            None => {
                info!("Using in-memory store");
                Arc::new(MemoryStore::<InventoryItem>::new())
            }
        };
        Ok(Self::with_store(
            config.mailbox_size,
            store,
            Arc::new(SystemClock),
        ))
    }

    /// Gracefully shuts the system down.
    ///
    /// Drops the client, which closes the registry channel, then waits for the registry and
    /// every item actor to finish. Clones of the client held elsewhere keep the registry
    /// running, so drop them first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        drop(self.inventory_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

impl Default for InventorySystem {
    fn default() -> Self {
        Self::new()
    }
}
