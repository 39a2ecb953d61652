//! Concurrent classification of a review batch.
//!
//! The analyzer filters out empty reviews, classifies the rest against the
//! classifier with a bounded number of in-flight calls, and restores input
//! order before computing the aggregate summary.

use super::SentimentSummary;
use crate::catalog::RawReview;
use crate::sentiment::{SentimentClassifier, SentimentLabel, SentimentResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Default cap on concurrent classification calls
pub const DEFAULT_CONCURRENCY: usize = 5;

/// A review joined with its classification result.
///
/// Only constructed for reviews with non-empty content; timestamps are
/// canonicalized to RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedReview {
    /// Upstream review identifier
    pub id: String,
    /// Reviewer display name
    pub user_name: Option<String>,
    /// Reviewer avatar URL
    pub user_image: Option<String>,
    /// Review body text, never empty
    pub content: String,
    /// Star rating, 1-5
    pub score: u8,
    /// Helpful votes
    pub thumbs_up_count: u64,
    /// App version the review was written against
    pub review_created_version: Option<String>,
    /// When the review was posted, RFC 3339
    pub at: String,
    /// Developer reply text, if any
    pub reply_content: Option<String>,
    /// When the developer replied, RFC 3339
    pub reply_at: Option<String>,
    /// Classified sentiment label
    pub sentiment: SentimentLabel,
    /// Sentiment score in [0, 100]
    pub sentiment_score: u8,
    /// Classification confidence in [0, 1]
    pub confidence: f64,
}

impl AnalyzedReview {
    fn from_parts(raw: RawReview, verdict: SentimentResult) -> Self {
        Self {
            id: raw.review_id,
            user_name: raw.user_name,
            user_image: raw.user_image,
            content: raw.content,
            score: raw.score,
            thumbs_up_count: raw.thumbs_up_count,
            review_created_version: raw.review_created_version,
            at: raw.at.to_rfc3339(),
            reply_content: raw.reply_content,
            reply_at: raw.reply_at.map(|t| t.to_rfc3339()),
            sentiment: verdict.label,
            sentiment_score: verdict.score,
            confidence: verdict.confidence,
        }
    }
}

/// Runs the classification stage over one review batch
pub struct BatchAnalyzer {
    concurrency_limit: usize,
}

impl Default for BatchAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchAnalyzer {
    /// Create an analyzer with the default concurrency cap
    pub fn new() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY,
        }
    }

    /// Override the concurrency cap (floored at 1)
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    /// Classify a batch and compute its aggregate summary.
    ///
    /// Reviews with empty or whitespace-only content are dropped before
    /// classification and never appear in the output. The remaining reviews
    /// are classified with at most `concurrency_limit` calls in flight;
    /// output order matches input order regardless of completion order.
    /// Individual classification failures degrade to the neutral fallback
    /// inside the classifier, so this stage itself cannot fail.
    pub async fn run(
        &self,
        raw_reviews: Vec<RawReview>,
        classifier: Arc<SentimentClassifier>,
    ) -> (Vec<AnalyzedReview>, SentimentSummary) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));

        let mut handles = Vec::new();
        for raw in raw_reviews.into_iter().filter(RawReview::has_content) {
            let classifier = Arc::clone(&classifier);
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                let verdict = match semaphore.acquire_owned().await {
                    Ok(_permit) => classifier.classify(&raw.content).await,
                    // Semaphore closure cannot happen here; degrade anyway
                    Err(_) => SentimentResult::fallback(),
                };
                AnalyzedReview::from_parts(raw, verdict)
            }));
        }

        // Awaiting handles in spawn order restores fetch order
        let mut analyzed = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(review) => analyzed.push(review),
                Err(e) => tracing::warn!(error = %e, "classification task failed"),
            }
        }

        let summary = SentimentSummary::from_reviews(&analyzed);
        (analyzed, summary)
    }
}
