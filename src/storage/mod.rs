//! Durable stores for the ledger.
//!
//! [`MemoryStore`](keyed_actor::MemoryStore) is used when no data file is configured.

pub mod json_file;

pub use json_file::JsonFileStore;

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Replaces `path` with `bytes` through a synced temporary file and a rename.
///
/// Readers see either the old contents or the new ones. The temporary file is removed when
/// any step fails.
pub(crate) async fn replace_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = tmp_path(path);
    let result = async {
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }
    result
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
