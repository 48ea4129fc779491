//! Persisted counter cursor — a single JSON record.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use warden_types::{ChannelId, StoreError};

/// The one counter record in the system. `channel = None` means the counter
/// is disabled; no evaluation happens regardless of `next_expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterCursor {
    pub channel: Option<ChannelId>,
    pub next_expected: i64,
}

impl Default for CounterCursor {
    fn default() -> Self {
        Self {
            channel: None,
            next_expected: 1,
        }
    }
}

/// File-based cursor store: one `counter.json`, atomic writes.
pub struct CounterStore {
    path: PathBuf,
}

impl CounterStore {
    /// Create a store rooted at `state_dir`, ensuring the directory exists.
    pub async fn new(state_dir: PathBuf) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(&state_dir).await?;
        Ok(Self {
            path: state_dir.join("counter.json"),
        })
    }

    /// Load the cursor. A missing, unreadable, or corrupt file degrades to
    /// the disabled default — the counter fails closed, it never errors.
    pub async fn load(&self) -> CounterCursor {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return CounterCursor::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return CounterCursor::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(cursor) => cursor,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", self.path.display(), e);
                CounterCursor::default()
            }
        }
    }

    /// Save the cursor (atomic write: .tmp → rename).
    pub async fn save(&self, cursor: &CounterCursor) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(cursor)?;
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (CounterStore, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = CounterStore::new(tmp.path().to_path_buf()).await.unwrap();
        (store, tmp)
    }

    #[tokio::test]
    async fn missing_file_is_the_disabled_default() {
        let (store, _tmp) = test_store().await;
        assert_eq!(store.load().await, CounterCursor::default());
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let (store, _tmp) = test_store().await;
        let cursor = CounterCursor {
            channel: Some(ChannelId(7)),
            next_expected: 42,
        };
        store.save(&cursor).await.unwrap();
        assert_eq!(store.load().await, cursor);
    }

    #[tokio::test]
    async fn corrupt_file_degrades_to_disabled() {
        let (store, tmp) = test_store().await;
        tokio::fs::write(tmp.path().join("counter.json"), "][")
            .await
            .unwrap();
        assert_eq!(store.load().await, CounterCursor::default());
    }
}
