//! In-Memory Storage Implementation
//!
//! Provides in-memory storage for testing and development.
//! Data is lost when the service restarts.
//!
//! The snapshot is kept in its encoded form so a round trip through this
//! store exercises the same serialization as the SQLite store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{decode, encode, EncodedSnapshot, StateStore, StorageResult};
use crate::state::BridgeSnapshot;

/// In-memory state store
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    snapshot: Arc<RwLock<Option<EncodedSnapshot>>>,
}

impl MemoryStateStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn save(&self, snapshot: &BridgeSnapshot) -> StorageResult<()> {
        let encoded = encode(snapshot)?;
        *self.snapshot.write().await = Some(encoded);
        Ok(())
    }

    async fn load(&self) -> StorageResult<Option<BridgeSnapshot>> {
        self.snapshot.read().await.as_ref().map(decode).transpose()
    }

    async fn schema_version(&self) -> StorageResult<Option<u32>> {
        Ok(self.snapshot.read().await.as_ref().map(|s| s.schema_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{migrate_v1_to_v2, StateV1, VersionedState};
    use crate::types::Address;

    fn snapshot(state: VersionedState, ledgers: &str) -> BridgeSnapshot {
        BridgeSnapshot {
            state,
            ledgers: ledgers.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStateStore::new();
        assert!(store.load().await.unwrap().is_none());
        assert!(store.schema_version().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_snapshot() {
        let store = MemoryStateStore::new();
        let v1 = StateV1::new(Address::new([9; 20]));

        store
            .save(&snapshot(VersionedState::V1(v1.clone()), "{}"))
            .await
            .unwrap();
        assert_eq!(store.schema_version().await.unwrap(), Some(1));

        let v2 = snapshot(VersionedState::V2(migrate_v1_to_v2(v1)), "{\"tokens\":{}}");
        store.save(&v2).await.unwrap();
        assert_eq!(store.schema_version().await.unwrap(), Some(2));
        assert_eq!(store.load().await.unwrap(), Some(v2));
    }
}
