//! Natural language understanding - intent + entities for one query
//!
//! The extractor and classifier are stateless; one [`NluService`] can be
//! shared by any number of concurrent queries.

pub mod entities;
pub mod intent;

pub use entities::{EntityExtractor, EntitySet};
pub use intent::{Intent, IntentClassifier};

use serde::Serialize;

/// Result of understanding one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub intent: Intent,
    pub entities: EntitySet,
    pub original_query: String,
}

/// Composes entity extraction and intent classification
#[derive(Debug, Clone, Copy, Default)]
pub struct NluService {
    extractor: EntityExtractor,
    classifier: IntentClassifier,
}

impl NluService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&self, query: &str) -> ParseResult {
        ParseResult {
            intent: self.classifier.classify(query),
            entities: self.extractor.extract(query),
            original_query: query.to_string(),
        }
    }
}
