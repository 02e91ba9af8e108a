//! Entity extraction - batch codes and status keywords

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::core::store::BatchStatus;

/// Strict batch code: three letters, six digits, one letter (e.g. VDT-052025-A)
static BATCH_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{3}-[0-9]{6}-[A-Z]").unwrap());

/// Bare numeric reference used when no strict code is present
static NUMERIC_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{2,6}\b").unwrap());

/// Status keyword groups, checked in this order
static STATUS_PATTERNS: LazyLock<Vec<(BatchStatus, Regex)>> = LazyLock::new(|| {
    vec![
        (
            BatchStatus::Manufactured,
            Regex::new(r"\b(manufactured|production|made)\b").unwrap(),
        ),
        (
            BatchStatus::InTransit,
            Regex::new(r"\b(transit|shipping|transport|moving)\b").unwrap(),
        ),
        (
            BatchStatus::Delivered,
            Regex::new(r"\b(delivered|received|arrived|completed)\b").unwrap(),
        ),
    ]
});

/// Structured values pulled out of a query
///
/// Fields are independent: a missing batch code never blocks the status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BatchStatus>,
}

impl EntitySet {
    pub fn is_empty(&self) -> bool {
        self.batch_code.is_none() && self.status.is_none()
    }
}

/// Extracts batch codes and status values from free text
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Find a batch code in the text
    ///
    /// A strict code wins over any bare number, wherever the number appears.
    /// Strict codes are returned upper-cased.
    pub fn extract_batch_code(&self, text: &str) -> Option<String> {
        let upper = text.to_uppercase();
        if let Some(m) = BATCH_CODE_RE.find(&upper) {
            return Some(m.as_str().to_string());
        }

        NUMERIC_CODE_RE
            .find(&upper)
            .map(|m| m.as_str().to_string())
    }

    /// Find the first matching status keyword group
    pub fn extract_status(&self, text: &str) -> Option<BatchStatus> {
        let lower = text.to_lowercase();
        STATUS_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(&lower))
            .map(|(status, _)| *status)
    }

    /// Run every extractor over the text
    pub fn extract(&self, text: &str) -> EntitySet {
        EntitySet {
            batch_code: self.extract_batch_code(text),
            status: self.extract_status(text),
        }
    }
}
