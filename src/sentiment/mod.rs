//! Sentiment classification for review text.
//!
//! This module provides:
//! - Sentiment label and result types with strict normalization
//! - A classifier that wraps an external LLM backend and never fails
//! - Response parsing for LLM output
//! - Prompt templates for the classification call

mod classifier;
mod parser;
mod prompts;

pub use classifier::{ClassifierBackend, MockBackend, OpenAiBackend, SentimentClassifier};
pub use parser::parse_verdict;
pub use prompts::{build_user_prompt, SYSTEM_INSTRUCTION};

use serde::{Deserialize, Serialize};

/// Neutral midpoint on the 0-100 sentiment scale
pub const NEUTRAL_SCORE: u8 = 50;

/// Errors that can occur when calling the classification backend.
///
/// These never escape the classifier boundary: every variant degrades to
/// [`SentimentResult::fallback`].
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("Invalid API key")]
    Authentication,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No API credentials configured")]
    MissingCredentials,

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

/// Sentiment classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Positive sentiment
    Positive,
    /// Negative sentiment
    Negative,
    /// Neutral sentiment
    Neutral,
}

impl SentimentLabel {
    /// Parse a label string, coercing anything unrecognized to `Neutral`
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying a single piece of text.
///
/// `score` runs from 0 (maximally negative) through 50 (neutral) to 100
/// (maximally positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Classified label
    pub label: SentimentLabel,
    /// Sentiment score in [0, 100]
    pub score: u8,
    /// Confidence in the classification, in [0, 1]
    pub confidence: f64,
}

impl SentimentResult {
    /// Build a normalized result from raw backend values.
    ///
    /// The score is rounded and clamped to [0, 100]; confidence is clamped
    /// to [0, 1] and defaults to 0.5 when the backend did not supply one.
    pub fn new(label: SentimentLabel, raw_score: f64, confidence: Option<f64>) -> Self {
        Self {
            label,
            score: raw_score.round().clamp(0.0, 100.0) as u8,
            confidence: confidence.unwrap_or(0.5).clamp(0.0, 1.0),
        }
    }

    /// The fixed result returned when the backend cannot produce an answer
    pub fn fallback() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: NEUTRAL_SCORE,
            confidence: 0.5,
        }
    }

    /// Check whether this is the neutral fallback
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_raw() {
        assert_eq!(SentimentLabel::from_raw("positive"), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_raw("NEGATIVE"), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_raw("  neutral "), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_raw("mixed"), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_raw(""), SentimentLabel::Neutral);
    }

    #[test]
    fn test_score_clamping() {
        let high = SentimentResult::new(SentimentLabel::Positive, 150.0, Some(0.9));
        assert_eq!(high.score, 100);

        let low = SentimentResult::new(SentimentLabel::Negative, -10.0, Some(0.9));
        assert_eq!(low.score, 0);

        let rounded = SentimentResult::new(SentimentLabel::Positive, 89.6, None);
        assert_eq!(rounded.score, 90);
    }

    #[test]
    fn test_confidence_clamping() {
        let over = SentimentResult::new(SentimentLabel::Neutral, 50.0, Some(2.0));
        assert_eq!(over.confidence, 1.0);

        let under = SentimentResult::new(SentimentLabel::Neutral, 50.0, Some(-0.5));
        assert_eq!(under.confidence, 0.0);

        let missing = SentimentResult::new(SentimentLabel::Neutral, 50.0, None);
        assert_eq!(missing.confidence, 0.5);
    }

    #[test]
    fn test_fallback() {
        let fallback = SentimentResult::fallback();
        assert_eq!(fallback.label, SentimentLabel::Neutral);
        assert_eq!(fallback.score, 50);
        assert_eq!(fallback.confidence, 0.5);
        assert!(fallback.is_fallback());
    }
}
