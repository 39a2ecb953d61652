//! Aggregate sentiment statistics over an analyzed batch

use super::AnalyzedReview;
use crate::sentiment::SentimentLabel;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Aggregate sentiment statistics for one analysis.
///
/// When `review_count > 0` the three percentage fields always sum to exactly
/// 100: positive and negative are rounded independently and neutral absorbs
/// the rounding remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    /// Mean sentiment score over the batch, 0.0 when empty
    pub average_score: f64,
    /// Number of reviews that were classified
    pub review_count: usize,
    /// Human-readable date the summary was computed
    pub generated_at: String,
    /// Share of positive reviews, percent
    pub positive_pct: i64,
    /// Share of negative reviews, percent
    pub negative_pct: i64,
    /// Share of neutral reviews, percent (remainder, never rounded)
    pub neutral_pct: i64,
}

impl SentimentSummary {
    /// The summary for an empty batch
    pub fn empty() -> Self {
        Self {
            average_score: 0.0,
            review_count: 0,
            generated_at: current_date(),
            positive_pct: 0,
            negative_pct: 0,
            neutral_pct: 0,
        }
    }

    /// Compute aggregate statistics over an analyzed batch
    pub fn from_reviews(reviews: &[AnalyzedReview]) -> Self {
        let review_count = reviews.len();
        if review_count == 0 {
            return Self::empty();
        }

        let mut total_score: u64 = 0;
        let mut positive = 0usize;
        let mut negative = 0usize;

        for review in reviews {
            total_score += review.sentiment_score as u64;
            match review.sentiment {
                SentimentLabel::Positive => positive += 1,
                SentimentLabel::Negative => negative += 1,
                SentimentLabel::Neutral => {}
            }
        }

        let positive_pct = pct(positive, review_count);
        let negative_pct = pct(negative, review_count);

        Self {
            average_score: total_score as f64 / review_count as f64,
            review_count,
            generated_at: current_date(),
            positive_pct,
            negative_pct,
            neutral_pct: 100 - positive_pct - negative_pct,
        }
    }
}

fn pct(count: usize, total: usize) -> i64 {
    (count as f64 / total as f64 * 100.0).round() as i64
}

/// Render the current date in the wire format (`"Jun 1, 2024"`)
fn current_date() -> String {
    Utc::now().format("%b %-d, %Y").to_string()
}
