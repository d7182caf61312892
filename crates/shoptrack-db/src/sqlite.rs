//! SQLite-backed key-value store.

use rusqlite::OptionalExtension;
use shoptrack_common::{Error, Result};

use crate::kv::{check_quota, KvStore};
use crate::pool::{get_conn, init_memory_pool, init_pool, DbPool};

/// Key-value store persisted in the `kv_entries` table.
pub struct SqliteKv {
    pool: DbPool,
    quota: Option<u64>,
}

impl SqliteKv {
    /// Wrap an initialized pool.
    pub fn new(pool: DbPool, quota: Option<u64>) -> Self {
        Self { pool, quota }
    }

    /// Open (or create) a database file.
    pub fn open(db_path: &str, quota: Option<u64>) -> Result<Self> {
        tracing::debug!("Opening key-value database at {}", db_path);
        Ok(Self::new(init_pool(db_path)?, quota))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(quota: Option<u64>) -> Result<Self> {
        Ok(Self::new(init_memory_pool()?, quota))
    }

    /// Bytes used by every entry except `key`.
    fn size_excluding(conn: &rusqlite::Connection, key: &str) -> Result<u64> {
        let size: i64 = conn
            .query_row(
                "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
                 FROM kv_entries WHERE key != ?1",
                [key],
                |row| row.get(0),
            )
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(size.max(0) as u64)
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = get_conn(&self.pool)?;
        conn.query_row(
            "SELECT value FROM kv_entries WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::storage(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::storage(e.to_string()))?;

        let others = Self::size_excluding(&tx, key)?;
        check_quota(self.quota, others, key, value)?;

        tx.execute(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value],
        )
        .map_err(|e| Error::storage(e.to_string()))?;

        tx.commit().map_err(|e| Error::storage(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        conn.execute("DELETE FROM kv_entries WHERE key = ?1", [key])
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(())
    }

    fn usage(&self) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        let size: i64 = conn
            .query_row(
                "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
                 FROM kv_entries",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(size.max(0) as u64)
    }

    fn quota(&self) -> Option<u64> {
        self.quota
    }
}
