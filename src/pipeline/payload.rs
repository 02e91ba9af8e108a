//! Intent-shaped data payloads attached to responses

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::core::store::{BatchStatus, BatchSummary, TrackingEvent};

/// Display format for timestamps in payloads and rendered messages
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Label used wherever a value is not known
pub const UNKNOWN: &str = "Unknown";

/// Data retrieved for a task intent
///
/// Serialized without a tag so the envelope carries the plain object
/// (`{"batch_code": ..., "location": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataPayload {
    /// Latest event; used by batch_location and batch_handler
    Tracking(TrackingPayload),
    Info(InfoPayload),
    History(HistoryPayload),
    Chart(ChartPayload),
    StatusListing(StatusListingPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingPayload {
    pub batch_code: String,
    pub location: String,
    pub status: BatchStatus,
    pub timestamp: NaiveDateTime,
    pub handler: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoPayload {
    pub batch_code: String,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub manufactured_date: Option<NaiveDate>,
    /// Status label of the latest event, or "Unknown" when untracked
    pub status: String,
    /// Location of the latest event, or "Unknown" when untracked
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPayload {
    pub batch_code: String,
    pub history: Vec<TrackingEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub batch_code: String,
    pub chart_data: Vec<ChartPoint>,
}

/// One point of the status-over-time series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Timestamp formatted as `YYYY-MM-DD HH:MM`
    pub x: String,
    pub y: BatchStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusListingPayload {
    pub status: BatchStatus,
    pub batches: Vec<BatchSummary>,
}
