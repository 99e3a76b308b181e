//! JSON snapshot store.
//!
//! The whole table lives in one JSON document together with the identifier high-water mark.
//! Each write serialises a new snapshot to a temporary file beside the target and renames it
//! over the old one, so a crash leaves either the previous or the next snapshot on disk,
//! never a torn one. The in-memory copy only changes after the rename succeeded.

use async_trait::async_trait;
use keyed_actor::{ActorEntity, Store, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Serialize, Deserialize)]
struct Snapshot<T> {
    last_issued_id: u64,
    items: Vec<T>,
}

struct Table<T> {
    rows: BTreeMap<u64, T>,
    last_issued: u64,
}

impl<T: Clone> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            last_issued: self.last_issued,
        }
    }
}

/// A [`Store`] backed by a single JSON file.
pub struct JsonFileStore<T> {
    path: PathBuf,
    table: Mutex<Table<T>>,
}

impl<T> JsonFileStore<T>
where
    T: ActorEntity + Serialize + DeserializeOwned,
{
    /// Opens the snapshot at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let table = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot<T> = serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::Unavailable(format!("corrupt snapshot {}: {e}", path.display()))
                })?;
                let rows: BTreeMap<u64, T> = snapshot
                    .items
                    .into_iter()
                    .map(|row| (row.id().into(), row))
                    .collect();
                let highest = rows.keys().next_back().copied().unwrap_or(0);
                Table {
                    last_issued: snapshot.last_issued_id.max(highest),
                    rows,
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot yet");
                Table {
                    rows: BTreeMap::new(),
                    last_issued: 0,
                }
            }
            Err(e) => return Err(io_error(&path, e)),
        };
        info!(
            path = %path.display(),
            rows = table.rows.len(),
            last_issued = table.last_issued,
            "Snapshot loaded"
        );
        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, table: &Table<T>) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            last_issued_id: table.last_issued,
            items: table.rows.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Unavailable(format!("cannot encode snapshot: {e}")))?;

        super::replace_file(&self.path, &bytes).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to write snapshot");
            io_error(&self.path, e)
        })
    }

    /// Applies `change` to a copy of the table, persists it, then keeps it.
    async fn write(
        &self,
        change: impl FnOnce(&mut Table<T>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        change(&mut next)?;
        self.persist(&next).await?;
        *table = next;
        Ok(())
    }
}

#[async_trait]
impl<T> Store<T> for JsonFileStore<T>
where
    T: ActorEntity + Serialize + DeserializeOwned,
{
    async fn insert(&self, row: &T, last_issued: u64) -> Result<(), StoreError> {
        let key: u64 = row.id().into();
        self.write(|table| {
            if table.rows.contains_key(&key) {
                return Err(StoreError::Duplicate(row.id().to_string()));
            }
            table.rows.insert(key, row.clone());
            table.last_issued = table.last_issued.max(last_issued).max(key);
            Ok(())
        })
        .await
    }

    async fn update(&self, row: &T) -> Result<(), StoreError> {
        let key: u64 = row.id().into();
        self.write(|table| match table.rows.get_mut(&key) {
            Some(slot) => {
                *slot = row.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(row.id().to_string())),
        })
        .await
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn remove(&self, id: T::Id) -> Result<(), StoreError> {
        let key: u64 = id.into();
        self.write(|table| match table.rows.remove(&key) {
            Some(_) => Ok(()),
            None => Err(StoreError::Missing(id.to_string())),
        })
        .await
    }

    async fn last_issued(&self) -> Result<u64, StoreError> {
        Ok(self.table.lock().await.last_issued)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InventoryItem, ItemCode, NewItem};
    use chrono::{TimeZone, Utc};
    use keyed_actor::AuditStamp;
    use rust_decimal_macros::dec;

    fn item(code: u64) -> InventoryItem {
        let stamp = AuditStamp::new(Utc.with_ymd_and_hms(2024, 2, 2, 9, 0, 0).unwrap());
        let params = NewItem::new("Calcario", dec!(500), "kg", dec!(0.8), dec!(100));
        InventoryItem::new(ItemCode(code), params, stamp).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<InventoryItem>::open(dir.path().join("stock.json"))
            .await
            .unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.last_issued().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rows_and_mark_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.json");
        {
            let store = JsonFileStore::<InventoryItem>::open(&path).await.unwrap();
            store.insert(&item(1), 1).await.unwrap();
            store.insert(&item(2), 2).await.unwrap();
            store.remove(ItemCode(2)).await.unwrap();
            let mut changed = item(1);
            changed.quantity = dec!(420);
            store.update(&changed).await.unwrap();
        }

        let store = JsonFileStore::<InventoryItem>::open(&path).await.unwrap();
        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, dec!(420));
        assert_eq!(store.last_issued().await.unwrap(), 2);
        assert!(!crate::storage::tmp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_rejected_writes_leave_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.json");
        let store = JsonFileStore::<InventoryItem>::open(&path).await.unwrap();
        store.insert(&item(1), 1).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        assert!(matches!(
            store.insert(&item(1), 1).await,
            Err(StoreError::Duplicate(_))
        ));
        assert!(matches!(
            store.update(&item(9)).await,
            Err(StoreError::Missing(_))
        ));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_unwritable_directory_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("stock.json");
        let store = JsonFileStore::<InventoryItem>::open(&path).await.unwrap();

        assert!(matches!(
            store.insert(&item(1), 1).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.last_issued().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::<InventoryItem>::open(&path).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
