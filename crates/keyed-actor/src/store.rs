//! # Durable Store
//!
//! The [`Store`] trait is the persistence seam of the runtime. Each call is atomic on its
//! own: when it returns `Err`, the stored state is exactly what it was before the call.
//! Row exclusivity is not the store's job; the per-entity actor already serialises every
//! read-validate-write against a row.
//!
//! [`MemoryStore`] keeps rows in a `HashMap` and is used by default and in tests.

use crate::entity::ActorEntity;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Errors reported by a [`Store`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("row {0} already exists")]
    Duplicate(String),
    #[error("row {0} does not exist")]
    Missing(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Transactional storage for one entity type.
#[async_trait]
pub trait Store<T: ActorEntity>: Send + Sync + 'static {
    /// Inserts a new row and records `last_issued` as the identifier high-water mark,
    /// as one step.
    async fn insert(&self, row: &T, last_issued: u64) -> Result<(), StoreError>;

    /// Replaces an existing row.
    async fn update(&self, row: &T) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<T>, StoreError>;

    async fn remove(&self, id: T::Id) -> Result<(), StoreError>;

    /// The highest identifier ever issued (0 for an empty store).
    async fn last_issued(&self) -> Result<u64, StoreError>;
}

struct MemoryState<T: ActorEntity> {
    rows: HashMap<T::Id, T>,
    last_issued: u64,
}

/// In-memory [`Store`].
pub struct MemoryStore<T: ActorEntity> {
    state: RwLock<MemoryState<T>>,
}

impl<T: ActorEntity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                rows: HashMap::new(),
                last_issued: 0,
            }),
        }
    }

    /// A store pre-loaded with `rows`, as if they had been inserted earlier.
    pub fn with_rows(rows: impl IntoIterator<Item = T>, last_issued: u64) -> Self {
        let rows: HashMap<_, _> = rows.into_iter().map(|row| (row.id(), row)).collect();
        let highest = rows.keys().map(|id| Into::<u64>::into(*id)).max().unwrap_or(0);
        Self {
            state: RwLock::new(MemoryState {
                rows,
                last_issued: last_issued.max(highest),
            }),
        }
    }
}

impl<T: ActorEntity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: ActorEntity> Store<T> for MemoryStore<T> {
    async fn insert(&self, row: &T, last_issued: u64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let id = row.id();
        if state.rows.contains_key(&id) {
            return Err(StoreError::Duplicate(id.to_string()));
        }
        state.rows.insert(id, row.clone());
        state.last_issued = state.last_issued.max(last_issued);
        Ok(())
    }

    async fn update(&self, row: &T) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match state.rows.get_mut(&row.id()) {
            Some(slot) => {
                *slot = row.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(row.id().to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn remove(&self, id: T::Id) -> Result<(), StoreError> {
        match self.state.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::Missing(id.to_string())),
        }
    }

    async fn last_issued(&self) -> Result<u64, StoreError> {
        Ok(self.state.read().await.last_issued)
    }
}
