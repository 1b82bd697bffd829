//! SQLite Persistent Storage for Bridge State
//!
//! Provides durable storage for the bridge snapshot that survives service
//! restarts. Uses connection pooling via r2d2 for concurrent access.
//!
//! The table holds at most one row: the latest committed snapshot, the
//! schema version it was written with, and the token ledgers beside it.

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

use super::traits::{decode, encode, EncodedSnapshot, StateStore, StorageError, StorageResult};
use crate::state::BridgeSnapshot;

/// SQLite-backed state store with connection pooling
pub struct SqliteStateStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStateStore {
    /// Create a new store with the given database path
    ///
    /// Creates the database file and runs migrations if needed.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations()?;

        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations()?;

        Ok(store)
    }

    /// Get a connection from the pool
    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        self.pool
            .get()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS bridge_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                schema_version INTEGER NOT NULL,
                body TEXT NOT NULL,
                ledgers TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    // Synchronous helper methods for the trait implementations

    fn save_sync(&self, snapshot: &BridgeSnapshot) -> Result<(), StorageError> {
        let encoded = encode(snapshot)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO bridge_state (id, schema_version, body, ledgers, updated_at)
            VALUES (1, ?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                schema_version = excluded.schema_version,
                body = excluded.body,
                ledgers = excluded.ledgers,
                updated_at = excluded.updated_at
            "#,
            params![
                encoded.schema_version,
                encoded.body,
                encoded.ledgers,
                chrono::Utc::now().timestamp()
            ],
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }

    fn read_row(&self) -> Result<Option<EncodedSnapshot>, StorageError> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT schema_version, body, ledgers FROM bridge_state WHERE id = 1",
            [],
            |row| {
                Ok(EncodedSnapshot {
                    schema_version: row.get::<_, i64>(0)? as u32,
                    body: row.get(1)?,
                    ledgers: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(|e| StorageError::Database(e.to_string()))
    }

    fn load_sync(&self) -> Result<Option<BridgeSnapshot>, StorageError> {
        self.read_row()?.as_ref().map(decode).transpose()
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn save(&self, snapshot: &BridgeSnapshot) -> StorageResult<()> {
        self.save_sync(snapshot)
    }

    async fn load(&self) -> StorageResult<Option<BridgeSnapshot>> {
        self.load_sync()
    }

    async fn schema_version(&self) -> StorageResult<Option<u32>> {
        Ok(self.read_row()?.map(|row| row.schema_version))
    }
}
