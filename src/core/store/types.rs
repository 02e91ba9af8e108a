//! Record store type definitions
//!
//! Rows returned by the batch record store and the status vocabulary shared
//! with the NLU layer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp format used for persisted tracking events
pub(crate) const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format used for persisted batch dates
pub(crate) const DB_DATE_FORMAT: &str = "%Y-%m-%d";

// =========================================================================
// Batch Status
// =========================================================================

/// Lifecycle status of a batch at a tracking event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchStatus {
    #[serde(rename = "Manufactured")]
    Manufactured,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl BatchStatus {
    /// Human-readable, title-cased label
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Manufactured => "Manufactured",
            BatchStatus::InTransit => "In Transit",
            BatchStatus::Delivered => "Delivered",
        }
    }

    /// Key used for the status column in the database
    pub fn db_key(&self) -> &'static str {
        match self {
            BatchStatus::Manufactured => "manufactured",
            BatchStatus::InTransit => "in_transit",
            BatchStatus::Delivered => "delivered",
        }
    }

    pub fn all() -> &'static [BatchStatus] {
        &[
            BatchStatus::Manufactured,
            BatchStatus::InTransit,
            BatchStatus::Delivered,
        ]
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "manufactured" => Ok(BatchStatus::Manufactured),
            "in_transit" | "intransit" => Ok(BatchStatus::InTransit),
            "delivered" => Ok(BatchStatus::Delivered),
            _ => Err(format!(
                "Invalid batch status: {}. Use manufactured, in_transit, or delivered",
                s
            )),
        }
    }
}

// =========================================================================
// Rows
// =========================================================================

/// A manufactured lot of product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    pub id: i64,
    pub batch_code: String,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub manufactured_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

/// Latest tracking event of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentLocation {
    pub batch_code: String,
    pub location: String,
    pub status: BatchStatus,
    pub timestamp: NaiveDateTime,
    pub handler: Option<String>,
}

/// One timestamped tracking event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingEvent {
    pub location: String,
    pub status: BatchStatus,
    pub timestamp: NaiveDateTime,
    pub handler: Option<String>,
}

/// A batch whose latest event matched a status query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub batch_code: String,
    pub product_name: Option<String>,
    pub location: String,
    pub handler: Option<String>,
}

/// Aggregate counts over all batches
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStatistics {
    pub total_batches: i64,
    pub untracked_batches: i64,
    pub manufactured: i64,
    pub in_transit: i64,
    pub delivered: i64,
}

impl BatchStatistics {
    pub fn count_for(&self, status: BatchStatus) -> i64 {
        match status {
            BatchStatus::Manufactured => self.manufactured,
            BatchStatus::InTransit => self.in_transit,
            BatchStatus::Delivered => self.delivered,
        }
    }
}

// =========================================================================
// Inserts
// =========================================================================

/// Input for creating a batch
#[derive(Debug, Clone)]
pub struct NewBatch {
    pub batch_code: String,
    pub product_id: i64,
    pub quantity: Option<i64>,
    pub manufactured_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

/// Input for recording a tracking event
#[derive(Debug, Clone)]
pub struct NewTracking {
    pub batch_code: String,
    pub location: String,
    pub status: BatchStatus,
    pub timestamp: NaiveDateTime,
    /// Employee name, resolved to an employee row
    pub handler: Option<String>,
}

/// Parse a stored timestamp, accepting both the storage format and RFC 3339-ish input
pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DB_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .ok()
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DB_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_variants() {
        assert_eq!("In Transit".parse::<BatchStatus>(), Ok(BatchStatus::InTransit));
        assert_eq!("in_transit".parse::<BatchStatus>(), Ok(BatchStatus::InTransit));
        assert_eq!("in-transit".parse::<BatchStatus>(), Ok(BatchStatus::InTransit));
        assert_eq!("DELIVERED".parse::<BatchStatus>(), Ok(BatchStatus::Delivered));
        assert!("lost".parse::<BatchStatus>().is_err());
    }

    #[test]
    fn test_status_label_and_key() {
        for status in BatchStatus::all() {
            assert_eq!(status.label().parse::<BatchStatus>(), Ok(*status));
            assert_eq!(status.db_key().parse::<BatchStatus>(), Ok(*status));
        }
        assert_eq!(BatchStatus::InTransit.to_string(), "In Transit");
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&BatchStatus::InTransit).unwrap();
        assert_eq!(json, "\"In Transit\"");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-05-20 10:00:00").is_some());
        assert!(parse_timestamp("2025-05-20T10:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
