//! Intent classification using ordered keyword rules
//!
//! Rules are evaluated top to bottom and the first match wins, so the rule
//! order is the tie-break when a query contains words from several intents:
//!
//! 1. greeting
//! 2. thanks
//! 3. farewell
//! 4. batch_location
//! 5. batch_handler
//! 6. batch_history
//! 7. batches_by_status
//! 8. batch_info
//! 9. batch_chart
//!
//! Anything else is `unknown`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// What the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BatchLocation,
    BatchHandler,
    BatchHistory,
    BatchesByStatus,
    BatchInfo,
    BatchChart,
    Greeting,
    Thanks,
    Farewell,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::BatchLocation => "batch_location",
            Intent::BatchHandler => "batch_handler",
            Intent::BatchHistory => "batch_history",
            Intent::BatchesByStatus => "batches_by_status",
            Intent::BatchInfo => "batch_info",
            Intent::BatchChart => "batch_chart",
            Intent::Greeting => "greeting",
            Intent::Thanks => "thanks",
            Intent::Farewell => "farewell",
            Intent::Unknown => "unknown",
        }
    }

    pub fn all() -> &'static [Intent] {
        &[
            Intent::BatchLocation,
            Intent::BatchHandler,
            Intent::BatchHistory,
            Intent::BatchesByStatus,
            Intent::BatchInfo,
            Intent::BatchChart,
            Intent::Greeting,
            Intent::Thanks,
            Intent::Farewell,
            Intent::Unknown,
        ]
    }

    /// Small-talk intents answered without touching the record store
    pub fn is_conversational(&self) -> bool {
        matches!(self, Intent::Greeting | Intent::Thanks | Intent::Farewell)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::all()
            .iter()
            .find(|intent| intent.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| format!("Invalid intent: {}", s))
    }
}

/// A single classification rule; every pattern must match
struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
}

impl IntentRule {
    fn new(intent: Intent, patterns: &[&str]) -> Self {
        Self {
            intent,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(&format!(r"(?i)\b({})\b", p)).unwrap())
                .collect(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().all(|p| p.is_match(text))
    }
}

static RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        IntentRule::new(
            Intent::Greeting,
            &["hi|hello|hey|good morning|good afternoon|good evening"],
        ),
        IntentRule::new(Intent::Thanks, &["thanks|thank you|appreciate|grateful"]),
        IntentRule::new(Intent::Farewell, &["bye|goodbye|see you|take care"]),
        IntentRule::new(
            Intent::BatchLocation,
            &["where|location|located|position|current place"],
        ),
        IntentRule::new(
            Intent::BatchHandler,
            &["who|handler|handled|delivered by|responsible|employee"],
        ),
        IntentRule::new(
            Intent::BatchHistory,
            &["history|tracking|timeline|complete record|how it went"],
        ),
        // Both clauses must match, in either order
        IntentRule::new(
            Intent::BatchesByStatus,
            &[
                "batches|all|list|show",
                "status|state|condition|delivered|manufactured|in transit|completed",
            ],
        ),
        IntentRule::new(
            Intent::BatchInfo,
            &["info|information|details|about|summary"],
        ),
        IntentRule::new(
            Intent::BatchChart,
            &["graph|chart|plot|visual|trend|line graph|draw"],
        ),
    ]
});

/// Maps free text to exactly one [`Intent`]
///
/// Pure and deterministic: the rule table is read-only and shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> Intent {
        let text = text.trim().to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.matches(&text))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentClassifier::new().classify(text)
    }

    #[test]
    fn test_task_intents() {
        assert_eq!(classify("Where is batch VDT-052025-A?"), Intent::BatchLocation);
        assert_eq!(classify("Who handled VDT-052025-A?"), Intent::BatchHandler);
        assert_eq!(classify("Show the full history of ABC-123456-B"), Intent::BatchHistory);
        assert_eq!(classify("List all batches that are delivered"), Intent::BatchesByStatus);
        assert_eq!(classify("Give me details for VDT-052025-A"), Intent::BatchInfo);
        assert_eq!(classify("Plot VDT-052025-A over time"), Intent::BatchChart);
    }

    #[test]
    fn test_conversational_intents() {
        assert_eq!(classify("Hello there"), Intent::Greeting);
        assert_eq!(classify("good evening!"), Intent::Greeting);
        assert_eq!(classify("Thank you so much"), Intent::Thanks);
        assert_eq!(classify("ok bye"), Intent::Farewell);
        assert_eq!(classify("see you tomorrow"), Intent::Farewell);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify("What's the weather in Chennai?"), Intent::Unknown);
        assert_eq!(classify(""), Intent::Unknown);
    }

    #[test]
    fn test_rule_order_breaks_ties() {
        // Greeting is checked before any task intent
        assert_eq!(classify("Hi, where is VDT-052025-A?"), Intent::Greeting);
        // Location before handler
        assert_eq!(classify("where is it and who has it"), Intent::BatchLocation);
        // History before status listing
        assert_eq!(classify("show tracking history of delivered batches"), Intent::BatchHistory);
    }

    #[test]
    fn test_status_listing_needs_both_clauses() {
        assert_eq!(classify("delivered batches please"), Intent::BatchesByStatus);
        assert_eq!(classify("which are in transit? list them"), Intent::BatchesByStatus);
        // Only the first clause
        assert_eq!(classify("list them"), Intent::Unknown);
        // Only the second clause
        assert_eq!(classify("is it delivered"), Intent::Unknown);
    }

    #[test]
    fn test_whole_word_matching() {
        // "this" contains "hi", "whose" contains "who"
        assert_eq!(classify("this"), Intent::Unknown);
        assert_eq!(classify("whose"), Intent::Unknown);
    }

    #[test]
    fn test_case_insensitive_and_deterministic() {
        let text = "WHERE IS VDT-052025-A";
        let first = classify(text);
        assert_eq!(first, Intent::BatchLocation);
        for _ in 0..5 {
            assert_eq!(classify(text), first);
        }
    }

    #[test]
    fn test_intent_string_roundtrip() {
        for intent in Intent::all() {
            assert_eq!(intent.as_str().parse::<Intent>(), Ok(*intent));
        }
        assert_eq!(
            serde_json::to_string(&Intent::BatchesByStatus).unwrap(),
            "\"batches_by_status\""
        );
        assert!("weather".parse::<Intent>().is_err());
    }
}
