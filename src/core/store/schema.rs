//! Database schema initialization

use rusqlite::params;

use super::{SqliteStore, StoreResult, SCHEMA_VERSION};

impl SqliteStore {
    /// Initialize database schema
    pub(super) fn init_schema(&mut self) -> StoreResult<()> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category TEXT,
                unit_price REAL
            );

            CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE,
                designation TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_employees_name ON employees(name);

            CREATE TABLE IF NOT EXISTS batches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER REFERENCES products(id),
                batch_code TEXT NOT NULL UNIQUE,
                quantity INTEGER,
                manufactured_date TEXT,
                expiry_date TEXT
            );

            -- Timestamps are 'YYYY-MM-DD HH:MM:SS' so text order is time order
            CREATE TABLE IF NOT EXISTS batch_tracking (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                batch_id INTEGER NOT NULL REFERENCES batches(id) ON DELETE CASCADE,
                location TEXT NOT NULL,
                status TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                handled_by INTEGER REFERENCES employees(id)
            );
            CREATE INDEX IF NOT EXISTS idx_tracking_batch_time ON batch_tracking(batch_id, timestamp);
            CREATE INDEX IF NOT EXISTS idx_tracking_status ON batch_tracking(status);
            "#,
        )?;

        self.conn.execute("DELETE FROM schema_version", [])?;
        self.conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }
}
