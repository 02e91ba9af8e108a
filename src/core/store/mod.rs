//! SQLite-backed batch record store
//!
//! This module provides the record store the assistant answers from:
//! - Batches and the products they contain
//! - Timestamped tracking events (location, status, handler)
//! - Latest-event queries per batch and per status
//!
//! The store is opened once per process and queried read-only by the
//! pipeline. Writes only happen through seeding and the admin helpers.

mod queries;
mod schema;
mod seed;
mod types;

pub use seed::SeedStats;
pub use types::*;

use std::fs;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

/// Current schema version - tables are recreated on version mismatch
const SCHEMA_VERSION: i32 = 1;

/// Errors raised by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Could not create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid stored value in {column}: {value}")]
    InvalidData { column: &'static str, value: String },

    #[error("Batch not found: {0}")]
    BatchNotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read interface the assistant consumes
///
/// Every lookup distinguishes "nothing matched" (`Ok(None)` / empty list)
/// from a failing store (`Err`).
pub trait RecordStore {
    /// Find a batch by its exact code
    fn get_batch_by_code(&self, code: &str) -> StoreResult<Option<Batch>>;

    /// Most recent tracking event for a batch
    fn get_current_batch_location(&self, code: &str) -> StoreResult<Option<CurrentLocation>>;

    /// Full tracking history for a batch, oldest first
    fn get_batch_tracking(&self, batch_id: i64) -> StoreResult<Vec<TrackingEvent>>;

    /// Batches whose latest tracking event has the given status
    fn get_batches_by_status(&self, status: BatchStatus) -> StoreResult<Vec<BatchSummary>>;

    /// Aggregate counts across all batches
    fn get_batch_statistics(&self) -> StoreResult<BatchStatistics>;
}

/// The record store backed by SQLite
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given path
    ///
    /// Missing parent directories are created. A schema version mismatch
    /// drops and recreates all tables.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        let mut store = Self { conn };
        store.prepare_schema()?;
        Ok(store)
    }

    /// Open a private in-memory store (for tests and dry runs)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let mut store = Self { conn };
        store.prepare_schema()?;
        Ok(store)
    }

    fn prepare_schema(&mut self) -> StoreResult<()> {
        if self.needs_schema_rebuild()? {
            self.reinitialize_schema()?;
        }
        Ok(())
    }

    /// Check if schema version matches current version
    ///
    /// A missing or empty `schema_version` table means a fresh file. Any other
    /// failure is returned so existing records are never dropped by mistake.
    fn needs_schema_rebuild(&self) -> StoreResult<bool> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !has_version_table {
            return Ok(true);
        }

        let current_version: Option<i32> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(current_version != Some(SCHEMA_VERSION))
    }

    /// Drop all tables and reinitialize schema
    fn reinitialize_schema(&mut self) -> StoreResult<()> {
        self.conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS schema_version;
            DROP TABLE IF EXISTS batch_tracking;
            DROP TABLE IF EXISTS batches;
            DROP TABLE IF EXISTS employees;
            DROP TABLE IF EXISTS products;
            "#,
        )?;

        self.init_schema()
    }
}
