//! Review batch analysis pipeline.
//!
//! This module provides:
//! - [`BatchAnalyzer`] for bounded-concurrency classification of a batch
//! - [`AnalyzedReview`], the joined review + classification record
//! - [`SentimentSummary`], deterministic aggregate statistics

mod batch;
mod summary;

pub use batch::{AnalyzedReview, BatchAnalyzer, DEFAULT_CONCURRENCY};
pub use summary::SentimentSummary;
