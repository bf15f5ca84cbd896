//! SQLite storage layer for PageSentinel
//!
//! This module handles persistent storage of the latest fingerprint per
//! monitored URI. No history is kept: each write replaces the previous
//! record for that URI.

mod schema;

pub use schema::{is_valid_table_name, schema, DEFAULT_TABLE};

use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Latest fingerprint stored for a URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintRecord {
    /// Monitored page URI (record key)
    pub uri: String,
    /// Hex fingerprint, empty when the record has none
    pub hash: String,
    /// Milliseconds since the Unix epoch of the last write
    pub updated_at: i64,
}

/// Read and conditionally write fingerprints keyed by URI
pub trait FingerprintStore {
    /// Stored hash for `uri`, or an empty string when there is none
    fn cached_hash(&self, uri: &str) -> Result<String, StoreError>;

    /// Upsert the hash for `uri` and stamp it with the current time
    fn store_hash(&self, uri: &str, hash: &str) -> Result<(), StoreError>;
}

/// Database connection wrapper
///
/// The connection sits behind a mutex so a `&Database` can be shared across
/// tasks; no lock is held across an await point.
pub struct Database {
    conn: Mutex<Connection>,
    table: String,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P, table: &str) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let conn = Connection::open(path)
            .map_err(StoreError::unavailable(format!("failed to open database at {:?}", path)))?;

        Self::with_connection(conn, table)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory(table: &str) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(StoreError::unavailable("failed to open in-memory database"))?;

        Self::with_connection(conn, table)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self, StoreError> {
        let db = Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        };
        db.initialize()?;

        Ok(db)
    }

    /// Lock the connection; a panic in another holder does not corrupt SQLite state
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Initialize the database schema
    fn initialize(&self) -> Result<(), StoreError> {
        let sql = schema(&self.table)?;
        self.conn()
            .execute_batch(&sql)
            .map_err(StoreError::unavailable("failed to initialize database schema"))?;
        Ok(())
    }

    /// Name of the fingerprint table
    pub fn table(&self) -> &str {
        &self.table
    }

    // ==================== Fingerprints ====================

    /// Get the full record for a URI
    pub fn record(&self, uri: &str) -> Result<Option<FingerprintRecord>, StoreError> {
        let sql = format!(
            "SELECT uri, hash, updated_at FROM {} WHERE uri = ?1",
            self.table
        );

        let result = self
            .conn()
            .query_row(&sql, params![uri], |row| {
                Ok(FingerprintRecord {
                    uri: row.get(0)?,
                    hash: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    updated_at: row.get(2)?,
                })
            })
            .optional()
            .map_err(StoreError::unavailable("failed to read fingerprint"))?;

        Ok(result)
    }

    /// Get all stored records, most recently updated first
    pub fn records(&self) -> Result<Vec<FingerprintRecord>, StoreError> {
        let sql = format!(
            "SELECT uri, hash, updated_at FROM {} ORDER BY updated_at DESC, uri",
            self.table
        );

        let conn = self.conn();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(StoreError::unavailable("failed to list fingerprints"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(FingerprintRecord {
                    uri: row.get(0)?,
                    hash: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    updated_at: row.get(2)?,
                })
            })
            .map_err(StoreError::unavailable("failed to list fingerprints"))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(StoreError::unavailable("failed to read fingerprint row"))?);
        }

        Ok(records)
    }

    /// Delete the record for a URI, returning whether one existed
    pub fn forget(&self, uri: &str) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE uri = ?1", self.table);
        let deleted = self
            .conn()
            .execute(&sql, params![uri])
            .map_err(StoreError::unavailable("failed to delete fingerprint"))?;

        Ok(deleted > 0)
    }
}

impl FingerprintStore for Database {
    fn cached_hash(&self, uri: &str) -> Result<String, StoreError> {
        Ok(self.record(uri)?.map(|r| r.hash).unwrap_or_default())
    }

    fn store_hash(&self, uri: &str, hash: &str) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} (uri, hash, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(uri) DO UPDATE SET
                hash = excluded.hash,
                updated_at = excluded.updated_at
            "#,
            self.table
        );

        self.conn()
            .execute(&sql, params![uri, hash, chrono::Utc::now().timestamp_millis()])
            .map_err(StoreError::unavailable("failed to store fingerprint"))?;

        tracing::debug!("Stored fingerprint {} for {}", hash, uri);
        Ok(())
    }
}
