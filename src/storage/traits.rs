//! Storage Trait Definitions
//!
//! Defines the abstract snapshot store for bridge state and token ledgers.
//! Implementations can use SQLite (production) or in-memory (testing).

use async_trait::async_trait;
use thiserror::Error;

use crate::state::{BridgeSnapshot, VersionedState};

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Bridge state storage interface
///
/// Holds a single snapshot: each save replaces the previous one.
///
/// Implementations:
/// - `SqliteStateStore` - Production storage with SQLite
/// - `MemoryStateStore` - In-memory storage for testing
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Replace the stored snapshot
    async fn save(&self, snapshot: &BridgeSnapshot) -> StorageResult<()>;

    /// Load the stored snapshot, if any
    async fn load(&self) -> StorageResult<Option<BridgeSnapshot>>;

    /// Schema version of the stored snapshot, if any
    async fn schema_version(&self) -> StorageResult<Option<u32>>;
}

/// A snapshot in its stored form
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EncodedSnapshot {
    pub schema_version: u32,
    pub body: String,
    pub ledgers: String,
}

/// Encode a snapshot for storage
pub(crate) fn encode(snapshot: &BridgeSnapshot) -> StorageResult<EncodedSnapshot> {
    let (schema_version, body) = snapshot.state.to_snapshot().map_err(into_storage_error)?;
    Ok(EncodedSnapshot {
        schema_version,
        body,
        ledgers: snapshot.ledgers.clone(),
    })
}

/// Decode a stored snapshot
pub(crate) fn decode(encoded: &EncodedSnapshot) -> StorageResult<BridgeSnapshot> {
    let state = VersionedState::from_snapshot(encoded.schema_version, &encoded.body)
        .map_err(into_storage_error)?;
    Ok(BridgeSnapshot {
        state,
        ledgers: encoded.ledgers.clone(),
    })
}

fn into_storage_error(err: crate::common::error::BridgeError) -> StorageError {
    match err {
        crate::common::error::BridgeError::Storage(e) => e,
        other => StorageError::InvalidData(other.to_string()),
    }
}
