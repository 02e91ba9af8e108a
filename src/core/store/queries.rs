//! Query methods for retrieving batch records
//!
//! Read-side lookups behind [`RecordStore`] plus the write helpers used by
//! seeding and tests.

use rusqlite::{params, OptionalExtension};

use super::{
    parse_date, parse_timestamp, Batch, BatchStatistics, BatchStatus, BatchSummary,
    CurrentLocation, NewBatch, NewTracking, RecordStore, SqliteStore, StoreError, StoreResult,
    TrackingEvent, DB_DATE_FORMAT, DB_TIMESTAMP_FORMAT,
};

fn status_from_db(value: String) -> StoreResult<BatchStatus> {
    value.parse().map_err(|_| StoreError::InvalidData {
        column: "batch_tracking.status",
        value,
    })
}

fn timestamp_from_db(value: String) -> StoreResult<chrono::NaiveDateTime> {
    parse_timestamp(&value).ok_or(StoreError::InvalidData {
        column: "batch_tracking.timestamp",
        value,
    })
}

fn date_from_db(value: Option<String>) -> Option<chrono::NaiveDate> {
    value.as_deref().and_then(parse_date)
}

impl RecordStore for SqliteStore {
    fn get_batch_by_code(&self, code: &str) -> StoreResult<Option<Batch>> {
        let row = self
            .conn
            .query_row(
                r#"SELECT b.id, b.batch_code, p.name, b.quantity, b.manufactured_date, b.expiry_date
                   FROM batches b
                   LEFT JOIN products p ON p.id = b.product_id
                   WHERE b.batch_code = ?1"#,
                params![code],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(
            |(id, batch_code, product_name, quantity, manufactured, expiry)| Batch {
                id,
                batch_code,
                product_name,
                quantity,
                manufactured_date: date_from_db(manufactured),
                expiry_date: date_from_db(expiry),
            },
        ))
    }

    fn get_current_batch_location(&self, code: &str) -> StoreResult<Option<CurrentLocation>> {
        let row = self
            .conn
            .query_row(
                r#"SELECT b.batch_code, t.location, t.status, t.timestamp, e.name
                   FROM batch_tracking t
                   JOIN batches b ON b.id = t.batch_id
                   LEFT JOIN employees e ON e.id = t.handled_by
                   WHERE b.batch_code = ?1
                   ORDER BY t.timestamp DESC, t.id DESC
                   LIMIT 1"#,
                params![code],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((batch_code, location, status, timestamp, handler)) => {
                Ok(Some(CurrentLocation {
                    batch_code,
                    location,
                    status: status_from_db(status)?,
                    timestamp: timestamp_from_db(timestamp)?,
                    handler,
                }))
            }
            None => Ok(None),
        }
    }

    fn get_batch_tracking(&self, batch_id: i64) -> StoreResult<Vec<TrackingEvent>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT t.location, t.status, t.timestamp, e.name
               FROM batch_tracking t
               LEFT JOIN employees e ON e.id = t.handled_by
               WHERE t.batch_id = ?1
               ORDER BY t.timestamp ASC, t.id ASC"#,
        )?;

        let rows = stmt.query_map(params![batch_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (location, status, timestamp, handler) = row?;
            events.push(TrackingEvent {
                location,
                status: status_from_db(status)?,
                timestamp: timestamp_from_db(timestamp)?,
                handler,
            });
        }
        Ok(events)
    }

    fn get_batches_by_status(&self, status: BatchStatus) -> StoreResult<Vec<BatchSummary>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT b.batch_code, p.name, t.location, e.name
               FROM batch_tracking t
               JOIN batches b ON b.id = t.batch_id
               LEFT JOIN products p ON p.id = b.product_id
               LEFT JOIN employees e ON e.id = t.handled_by
               WHERE t.id = (
                   SELECT latest.id FROM batch_tracking latest
                   WHERE latest.batch_id = t.batch_id
                   ORDER BY latest.timestamp DESC, latest.id DESC
                   LIMIT 1
               )
               AND t.status = ?1
               ORDER BY b.batch_code"#,
        )?;

        let rows = stmt.query_map(params![status.db_key()], |row| {
            Ok(BatchSummary {
                batch_code: row.get(0)?,
                product_name: row.get(1)?,
                location: row.get(2)?,
                handler: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_batch_statistics(&self) -> StoreResult<BatchStatistics> {
        let mut stats = BatchStatistics {
            total_batches: self
                .conn
                .query_row("SELECT COUNT(*) FROM batches", [], |row| row.get(0))?,
            untracked_batches: self.conn.query_row(
                r#"SELECT COUNT(*) FROM batches b
                   WHERE NOT EXISTS (SELECT 1 FROM batch_tracking t WHERE t.batch_id = b.id)"#,
                [],
                |row| row.get(0),
            )?,
            ..Default::default()
        };

        let mut stmt = self.conn.prepare(
            r#"SELECT t.status, COUNT(*)
               FROM batch_tracking t
               WHERE t.id = (
                   SELECT latest.id FROM batch_tracking latest
                   WHERE latest.batch_id = t.batch_id
                   ORDER BY latest.timestamp DESC, latest.id DESC
                   LIMIT 1
               )
               GROUP BY t.status"#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        for row in rows {
            let (status, count) = row?;
            match status_from_db(status)? {
                BatchStatus::Manufactured => stats.manufactured = count,
                BatchStatus::InTransit => stats.in_transit = count,
                BatchStatus::Delivered => stats.delivered = count,
            }
        }

        Ok(stats)
    }
}

impl SqliteStore {
    /// Insert a product, returning its row id
    pub fn add_product(
        &self,
        name: &str,
        category: Option<&str>,
        unit_price: Option<f64>,
    ) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO products (name, category, unit_price) VALUES (?1, ?2, ?3)",
            params![name, category, unit_price],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert an employee, returning its row id
    pub fn add_employee(
        &self,
        name: &str,
        email: Option<&str>,
        designation: Option<&str>,
    ) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO employees (name, email, designation) VALUES (?1, ?2, ?3)",
            params![name, email, designation],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch, returning its row id
    pub fn add_batch(&self, batch: &NewBatch) -> StoreResult<i64> {
        self.conn.execute(
            r#"INSERT INTO batches (product_id, batch_code, quantity, manufactured_date, expiry_date)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                batch.product_id,
                batch.batch_code,
                batch.quantity,
                batch
                    .manufactured_date
                    .map(|d| d.format(DB_DATE_FORMAT).to_string()),
                batch.expiry_date.map(|d| d.format(DB_DATE_FORMAT).to_string()),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Record a tracking event for an existing batch
    ///
    /// The handler is matched by employee name; an unknown name is stored
    /// as an event without a handler.
    pub fn record_tracking(&self, event: &NewTracking) -> StoreResult<i64> {
        let batch_id: i64 = self
            .conn
            .query_row(
                "SELECT id FROM batches WHERE batch_code = ?1",
                params![event.batch_code],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::BatchNotFound(event.batch_code.clone()))?;

        let handler_id: Option<i64> = match &event.handler {
            Some(name) => self
                .conn
                .query_row(
                    "SELECT id FROM employees WHERE name = ?1 ORDER BY id LIMIT 1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?,
            None => None,
        };

        self.conn.execute(
            r#"INSERT INTO batch_tracking (batch_id, location, status, timestamp, handled_by)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                batch_id,
                event.location,
                event.status.db_key(),
                event.timestamp.format(DB_TIMESTAMP_FORMAT).to_string(),
                handler_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, min: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn seeded() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.seed_sample_data().unwrap();
        store
    }

    #[test]
    fn test_get_batch_by_code() {
        let store = seeded();
        let batch = store.get_batch_by_code("VDT-052025-A").unwrap().unwrap();
        assert_eq!(batch.product_name.as_deref(), Some("Vitamin D Tablets"));
        assert_eq!(batch.quantity, Some(10000));
        assert_eq!(batch.manufactured_date, NaiveDate::from_ymd_opt(2025, 5, 20));

        assert!(store.get_batch_by_code("XYZ-000000-Z").unwrap().is_none());
    }

    #[test]
    fn test_current_location_is_latest_event() {
        let store = seeded();
        let current = store
            .get_current_batch_location("VDT-052025-A")
            .unwrap()
            .unwrap();
        assert_eq!(current.location, "Warehouse B");
        assert_eq!(current.status, BatchStatus::Delivered);
        assert_eq!(current.handler.as_deref(), Some("John Smith"));
        assert_eq!(current.timestamp, at(22, 9, 15));
    }

    #[test]
    fn test_current_location_none_without_tracking() {
        let store = seeded();
        assert!(store
            .get_current_batch_location("PCM-062025-B")
            .unwrap()
            .is_none());
        assert!(store
            .get_current_batch_location("NOPE-1")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_tracking_history_ascending() {
        let store = seeded();
        // Inserted out of order; must still come back sorted by time
        store
            .record_tracking(&NewTracking {
                batch_code: "PCM-062025-B".to_string(),
                location: "Dock 3".to_string(),
                status: BatchStatus::InTransit,
                timestamp: at(25, 8, 0),
                handler: None,
            })
            .unwrap();
        store
            .record_tracking(&NewTracking {
                batch_code: "PCM-062025-B".to_string(),
                location: "Line 2".to_string(),
                status: BatchStatus::Manufactured,
                timestamp: at(24, 8, 0),
                handler: Some("Jane Doe".to_string()),
            })
            .unwrap();

        let batch = store.get_batch_by_code("PCM-062025-B").unwrap().unwrap();
        let history = store.get_batch_tracking(batch.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].location, "Line 2");
        assert_eq!(history[0].handler.as_deref(), Some("Jane Doe"));
        assert_eq!(history[1].location, "Dock 3");
        assert_eq!(history[1].handler, None);
    }

    #[test]
    fn test_batches_by_status_uses_latest_event_only() {
        let store = seeded();
        let delivered = store.get_batches_by_status(BatchStatus::Delivered).unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].batch_code, "VDT-052025-A");
        assert_eq!(delivered[0].location, "Warehouse B");

        // VDT was manufactured once, but that is no longer its latest state
        let manufactured = store
            .get_batches_by_status(BatchStatus::Manufactured)
            .unwrap();
        assert!(manufactured.is_empty());
    }

    #[test]
    fn test_record_tracking_unknown_batch() {
        let store = seeded();
        let err = store
            .record_tracking(&NewTracking {
                batch_code: "ZZZ-999999-Z".to_string(),
                location: "Nowhere".to_string(),
                status: BatchStatus::InTransit,
                timestamp: at(1, 0, 0),
                handler: None,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::BatchNotFound(code) if code == "ZZZ-999999-Z"));
    }

    #[test]
    fn test_statistics() {
        let store = seeded();
        let stats = store.get_batch_statistics().unwrap();
        assert_eq!(stats.total_batches, 2);
        assert_eq!(stats.untracked_batches, 1);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.in_transit, 0);
        assert_eq!(stats.count_for(BatchStatus::Delivered), 1);
    }

    #[test]
    fn test_invalid_status_in_db_is_error() {
        let store = seeded();
        store
            .conn
            .execute("UPDATE batch_tracking SET status = 'quarantined'", [])
            .unwrap();
        let err = store.get_current_batch_location("VDT-052025-A").unwrap_err();
        assert!(matches!(err, StoreError::InvalidData { .. }));
    }
}
