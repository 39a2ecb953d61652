//! # Review Sentiment
//!
//! HTTP service and library for analyzing the sentiment of app store
//! reviews using an external LLM classifier.
//!
//! ## Modules
//!
//! - `catalog` - App-store catalog access: search, details, review batches
//! - `sentiment` - LLM-backed sentiment classification with neutral fallback
//! - `analysis` - Bounded-concurrency batch classification and aggregation
//! - `history` - In-memory ledger of past analyses
//! - `service` - End-to-end analyze/history/lookup operations
//! - `api` - axum HTTP surface
//! - `utils` - Configuration and logging
//!
//! ## Example
//!
//! ```rust,no_run
//! use review_sentiment::{
//!     AnalysisHistoryStore, AnalysisService, MockBackend, PlayCatalogClient,
//!     ReviewFetcher, SentimentClassifier,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Arc::new(PlayCatalogClient::new()?);
//!     let classifier = Arc::new(SentimentClassifier::new(Box::new(MockBackend::new())));
//!     let history = Arc::new(AnalysisHistoryStore::new());
//!
//!     let service = AnalysisService::new(
//!         ReviewFetcher::new(catalog),
//!         classifier,
//!         history,
//!     );
//!
//!     let result = service.analyze("com.example.app").await?;
//!     println!(
//!         "{}: {} reviews, average score {:.1}",
//!         result.app_info.display_name,
//!         result.sentiment.review_count,
//!         result.sentiment.average_score
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod catalog;
pub mod error;
pub mod history;
pub mod sentiment;
pub mod service;
pub mod utils;

// Re-exports for convenience
pub use analysis::{AnalyzedReview, BatchAnalyzer, SentimentSummary, DEFAULT_CONCURRENCY};
pub use catalog::{
    AppInfo, CatalogError, CatalogSource, PlayCatalogClient, RawReview, ReviewFetcher,
    ReviewSort, SearchCandidate, DEFAULT_REVIEW_COUNT,
};
pub use error::{Error, Result};
pub use history::{AnalysisHistoryStore, HistoryRecord, NewHistoryRecord};
pub use sentiment::{
    ClassifierBackend, MockBackend, OpenAiBackend, SentimentClassifier, SentimentError,
    SentimentLabel, SentimentResult,
};
pub use service::{AnalysisResult, AnalysisService};
pub use utils::{load_config, AppConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
