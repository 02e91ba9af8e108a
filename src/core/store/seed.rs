//! Sample data for demos and tests

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::{BatchStatus, NewBatch, NewTracking, SqliteStore, StoreResult};

/// Counts of rows created by [`SqliteStore::seed_sample_data`]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SeedStats {
    pub products: usize,
    pub employees: usize,
    pub batches: usize,
    pub tracking_events: usize,
}

impl SqliteStore {
    /// Load the sample batches into the store
    ///
    /// `VDT-052025-A` gets three tracking events ending at Warehouse B;
    /// `PCM-062025-B` has no tracking yet. Fails if the sample batches are
    /// already present.
    pub fn seed_sample_data(&mut self) -> StoreResult<SeedStats> {
        let tx = self.conn.unchecked_transaction()?;
        let mut stats = SeedStats::default();

        self.add_employee(
            "John Smith",
            Some("john.smith@acmepharma.com"),
            Some("Warehouse Manager"),
        )?;
        self.add_employee(
            "Jane Doe",
            Some("jane.doe@acmepharma.com"),
            Some("QC Specialist"),
        )?;
        stats.employees = 2;

        let vitamin_d = self.add_product("Vitamin D Tablets", Some("Supplements"), Some(0.50))?;
        let paracetamol = self.add_product("Paracetamol 500mg", Some("Analgesics"), Some(0.20))?;
        stats.products = 2;

        self.add_batch(&NewBatch {
            batch_code: "VDT-052025-A".to_string(),
            product_id: vitamin_d,
            quantity: Some(10000),
            manufactured_date: NaiveDate::from_ymd_opt(2025, 5, 20),
            expiry_date: NaiveDate::from_ymd_opt(2027, 5, 20),
        })?;
        self.add_batch(&NewBatch {
            batch_code: "PCM-062025-B".to_string(),
            product_id: paracetamol,
            quantity: Some(5000),
            manufactured_date: NaiveDate::from_ymd_opt(2025, 6, 2),
            expiry_date: NaiveDate::from_ymd_opt(2028, 6, 2),
        })?;
        stats.batches = 2;

        let events = [
            ("Production Floor A", BatchStatus::Manufactured, (20, 10, 0), "Jane Doe"),
            ("Quality Control Lab", BatchStatus::InTransit, (21, 14, 30), "Jane Doe"),
            ("Warehouse B", BatchStatus::Delivered, (22, 9, 15), "John Smith"),
        ];
        for (location, status, (day, hour, min), handler) in events {
            let timestamp = NaiveDate::from_ymd_opt(2025, 5, day)
                .and_then(|d| d.and_hms_opt(hour, min, 0))
                .unwrap_or_default();
            self.record_tracking(&NewTracking {
                batch_code: "VDT-052025-A".to_string(),
                location: location.to_string(),
                status,
                timestamp,
                handler: Some(handler.to_string()),
            })?;
            stats.tracking_events += 1;
        }

        tx.commit()?;
        info!(
            batches = stats.batches,
            tracking_events = stats.tracking_events,
            "seeded sample data"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::StoreError;

    #[test]
    fn test_seed_counts() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let stats = store.seed_sample_data().unwrap();
        assert_eq!(stats.batches, 2);
        assert_eq!(stats.tracking_events, 3);
    }

    #[test]
    fn test_seed_twice_fails() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.seed_sample_data().unwrap();
        let err = store.seed_sample_data().unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
