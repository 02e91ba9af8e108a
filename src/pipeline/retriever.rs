//! Data retrieval - maps entities to record store lookups
//!
//! Each function serves one group of intents. `Ok(None)` means the query
//! was valid but nothing matched; a store failure comes back as
//! [`RetrievalError::Store`] so callers can tell the two apart.

use thiserror::Error;

use crate::core::store::{RecordStore, StoreError};
use crate::nlu::EntitySet;

use super::payload::{
    ChartPayload, ChartPoint, DataPayload, HistoryPayload, InfoPayload, StatusListingPayload,
    TrackingPayload, DISPLAY_TIMESTAMP_FORMAT, UNKNOWN,
};

#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The query lacks the entity this intent needs
    #[error("Missing entity: {0}")]
    MissingEntity(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Retrieval = Result<Option<DataPayload>, RetrievalError>;

/// Signature shared by all retrieval functions
pub type RetrieveFn = fn(&dyn RecordStore, &EntitySet) -> Retrieval;

fn require_batch_code(entities: &EntitySet) -> Result<&str, RetrievalError> {
    entities
        .batch_code
        .as_deref()
        .ok_or(RetrievalError::MissingEntity("batch_code"))
}

/// Latest tracking event (batch_location, batch_handler)
pub fn current_tracking(store: &dyn RecordStore, entities: &EntitySet) -> Retrieval {
    let code = require_batch_code(entities)?;

    Ok(store.get_current_batch_location(code)?.map(|current| {
        DataPayload::Tracking(TrackingPayload {
            batch_code: current.batch_code,
            location: current.location,
            status: current.status,
            timestamp: current.timestamp,
            handler: current.handler,
        })
    }))
}

/// Batch master data plus its latest location (batch_info)
pub fn batch_info(store: &dyn RecordStore, entities: &EntitySet) -> Retrieval {
    let code = require_batch_code(entities)?;

    let Some(batch) = store.get_batch_by_code(code)? else {
        return Ok(None);
    };
    let current = store.get_current_batch_location(code)?;

    let (status, location) = match current {
        Some(current) => (current.status.label().to_string(), current.location),
        None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
    };

    Ok(Some(DataPayload::Info(InfoPayload {
        batch_code: batch.batch_code,
        product_name: batch.product_name,
        quantity: batch.quantity,
        manufactured_date: batch.manufactured_date,
        status,
        location,
    })))
}

/// Full tracking history, oldest first (batch_history)
pub fn batch_history(store: &dyn RecordStore, entities: &EntitySet) -> Retrieval {
    let code = require_batch_code(entities)?;

    let Some(batch) = store.get_batch_by_code(code)? else {
        return Ok(None);
    };
    let history = store.get_batch_tracking(batch.id)?;

    Ok(Some(DataPayload::History(HistoryPayload {
        batch_code: batch.batch_code,
        history,
    })))
}

/// Status-over-time series (batch_chart)
pub fn batch_chart(store: &dyn RecordStore, entities: &EntitySet) -> Retrieval {
    let code = require_batch_code(entities)?;

    let Some(batch) = store.get_batch_by_code(code)? else {
        return Ok(None);
    };
    let chart_data = store
        .get_batch_tracking(batch.id)?
        .into_iter()
        .map(|event| ChartPoint {
            x: event.timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
            y: event.status,
        })
        .collect();

    Ok(Some(DataPayload::Chart(ChartPayload {
        batch_code: batch.batch_code,
        chart_data,
    })))
}

/// Batches currently at a status (batches_by_status)
///
/// An empty listing is a valid result, not a miss.
pub fn batches_by_status(store: &dyn RecordStore, entities: &EntitySet) -> Retrieval {
    let status = entities
        .status
        .ok_or(RetrievalError::MissingEntity("status"))?;

    let batches = store.get_batches_by_status(status)?;
    Ok(Some(DataPayload::StatusListing(StatusListingPayload {
        status,
        batches,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{BatchStatus, SqliteStore};

    fn seeded() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.seed_sample_data().unwrap();
        store
    }

    fn code(c: &str) -> EntitySet {
        EntitySet {
            batch_code: Some(c.to_string()),
            status: None,
        }
    }

    #[test]
    fn test_current_tracking() {
        let store = seeded();
        let payload = current_tracking(&store, &code("VDT-052025-A")).unwrap().unwrap();
        let DataPayload::Tracking(tracking) = payload else {
            panic!("expected tracking payload");
        };
        assert_eq!(tracking.location, "Warehouse B");
        assert_eq!(tracking.handler.as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_current_tracking_misses() {
        let store = seeded();
        assert!(matches!(
            current_tracking(&store, &EntitySet::default()),
            Err(RetrievalError::MissingEntity("batch_code"))
        ));
        // Known batch without tracking, and unknown batch
        assert!(current_tracking(&store, &code("PCM-062025-B")).unwrap().is_none());
        assert!(current_tracking(&store, &code("1234")).unwrap().is_none());
    }

    #[test]
    fn test_batch_info_untracked_defaults_to_unknown() {
        let store = seeded();
        let payload = batch_info(&store, &code("PCM-062025-B")).unwrap().unwrap();
        let DataPayload::Info(info) = payload else {
            panic!("expected info payload");
        };
        assert_eq!(info.status, "Unknown");
        assert_eq!(info.location, "Unknown");
        assert_eq!(info.product_name.as_deref(), Some("Paracetamol 500mg"));
    }

    #[test]
    fn test_batch_info_tracked() {
        let store = seeded();
        let payload = batch_info(&store, &code("VDT-052025-A")).unwrap().unwrap();
        let DataPayload::Info(info) = payload else {
            panic!("expected info payload");
        };
        assert_eq!(info.status, "Delivered");
        assert_eq!(info.location, "Warehouse B");
        assert!(batch_info(&store, &code("ZZZ-000000-Z")).unwrap().is_none());
    }

    #[test]
    fn test_history_and_chart() {
        let store = seeded();
        let DataPayload::History(history) =
            batch_history(&store, &code("VDT-052025-A")).unwrap().unwrap()
        else {
            panic!("expected history payload");
        };
        let locations: Vec<_> = history.history.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(
            locations,
            ["Production Floor A", "Quality Control Lab", "Warehouse B"]
        );

        let DataPayload::Chart(chart) =
            batch_chart(&store, &code("VDT-052025-A")).unwrap().unwrap()
        else {
            panic!("expected chart payload");
        };
        assert_eq!(chart.chart_data.len(), 3);
        assert_eq!(chart.chart_data[0].x, "2025-05-20 10:00");
        assert_eq!(chart.chart_data[0].y, BatchStatus::Manufactured);
        assert_eq!(chart.chart_data[2].y, BatchStatus::Delivered);

        assert!(batch_history(&store, &code("ZZZ-000000-Z")).unwrap().is_none());
        assert!(batch_chart(&store, &code("ZZZ-000000-Z")).unwrap().is_none());
    }

    #[test]
    fn test_batches_by_status_empty_is_valid() {
        let store = seeded();
        let entities = EntitySet {
            batch_code: None,
            status: Some(BatchStatus::InTransit),
        };
        let DataPayload::StatusListing(listing) =
            batches_by_status(&store, &entities).unwrap().unwrap()
        else {
            panic!("expected status listing");
        };
        assert_eq!(listing.status, BatchStatus::InTransit);
        assert!(listing.batches.is_empty());

        assert!(matches!(
            batches_by_status(&store, &EntitySet::default()),
            Err(RetrievalError::MissingEntity("status"))
        ));
    }
}
