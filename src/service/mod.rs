//! End-to-end analysis service.
//!
//! Composes the review fetcher, batch analyzer, classifier, and history
//! store into the operations the HTTP layer exposes. `analyze` is the single
//! write path into history.

use crate::analysis::{AnalyzedReview, BatchAnalyzer, SentimentSummary};
use crate::catalog::{AppInfo, ReviewFetcher, SearchCandidate};
use crate::error::{Error, Result};
use crate::history::{AnalysisHistoryStore, HistoryRecord, NewHistoryRecord};
use crate::sentiment::{SentimentClassifier, SentimentResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Full outcome of one analyze call. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// App snapshot captured at analysis time
    pub app_info: AppInfo,
    /// Aggregate sentiment statistics
    pub sentiment: SentimentSummary,
    /// Analyzed reviews in fetch order
    pub reviews: Vec<AnalyzedReview>,
}

/// Orchestrates fetch, classification, aggregation, and history
pub struct AnalysisService {
    fetcher: ReviewFetcher,
    analyzer: BatchAnalyzer,
    classifier: Arc<SentimentClassifier>,
    history: Arc<AnalysisHistoryStore>,
}

impl AnalysisService {
    /// Create a service over its collaborators
    pub fn new(
        fetcher: ReviewFetcher,
        classifier: Arc<SentimentClassifier>,
        history: Arc<AnalysisHistoryStore>,
    ) -> Self {
        Self {
            fetcher,
            analyzer: BatchAnalyzer::new(),
            classifier,
            history,
        }
    }

    /// Override the batch analyzer (e.g. a different concurrency cap)
    pub fn with_analyzer(mut self, analyzer: BatchAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Analyze an app by name or package identifier.
    ///
    /// Resolves the query, fetches one batch of recent reviews, classifies
    /// them, computes the summary, appends a history record, and returns the
    /// full result.
    pub async fn analyze(&self, query: &str) -> Result<AnalysisResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation(
                "App name or package ID is required".to_string(),
            ));
        }

        tracing::info!(query, "starting review analysis");

        let app_id = self.fetcher.resolve(query).await?;
        let app_info = self.fetcher.fetch_details(&app_id).await?;
        let raw_reviews = self.fetcher.fetch_reviews(&app_id).await?;

        let (reviews, sentiment) = self
            .analyzer
            .run(raw_reviews, Arc::clone(&self.classifier))
            .await;

        tracing::info!(
            app_id,
            review_count = sentiment.review_count,
            average_score = sentiment.average_score,
            "analysis complete"
        );

        let result = AnalysisResult {
            app_info,
            sentiment,
            reviews,
        };

        let record = NewHistoryRecord {
            app_name: result.app_info.display_name.clone(),
            sentiment_score: result.sentiment.average_score,
            generated_at: result.sentiment.generated_at.clone(),
            app_icon: result.app_info.icon_url.clone(),
        };
        self.history.append(record, result.clone());

        Ok(result)
    }

    /// List all history records in insertion order
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.list()
    }

    /// Return the stored full result for a past analysis
    pub fn result_by_id(&self, id: u64) -> Result<AnalysisResult> {
        self.history
            .get_result(id)
            .ok_or_else(|| Error::NotFound(format!("Analysis not found for id: {}", id)))
    }

    /// Clear all history records
    pub fn clear_history(&self) {
        self.history.clear();
    }

    /// Classify a single piece of text
    pub async fn classify_text(&self, text: &str) -> Result<SentimentResult> {
        if text.trim().is_empty() {
            return Err(Error::Validation("Text is required".to_string()));
        }
        Ok(self.classifier.classify(text).await)
    }

    /// Search the catalog for app suggestions
    pub async fn search_apps(&self, query: &str, limit: usize) -> Result<Vec<SearchCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation("Search query is required".to_string()));
        }
        self.fetcher.search_candidates(query, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, CatalogSource, RawReview, ReviewSort};
    use crate::sentiment::{MockBackend, SentimentLabel};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct FakeCatalog;

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn search(
            &self,
            query: &str,
            _limit: usize,
        ) -> std::result::Result<Vec<SearchCandidate>, CatalogError> {
            if query == "Missing App" {
                return Ok(Vec::new());
            }
            Ok(vec![SearchCandidate {
                app_id: "com.test.app".to_string(),
                title: "Test App".to_string(),
                developer: None,
                icon: None,
            }])
        }

        async fn details(
            &self,
            app_id: &str,
        ) -> std::result::Result<AppInfo, CatalogError> {
            if app_id != "com.test.app" {
                return Err(CatalogError::NotFound(app_id.to_string()));
            }
            Ok(AppInfo {
                display_name: "Test App".to_string(),
                package_id: app_id.to_string(),
                developer: Some("Test Dev".to_string()),
                icon_url: Some("https://example.com/icon.png".to_string()),
                rating_text: Some("4.2".to_string()),
            })
        }

        async fn reviews(
            &self,
            _app_id: &str,
            _count: usize,
            _sort: ReviewSort,
        ) -> std::result::Result<Vec<RawReview>, CatalogError> {
            let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
            let review = |id: &str, content: &str| RawReview {
                review_id: id.to_string(),
                user_name: None,
                user_image: None,
                content: content.to_string(),
                score: 3,
                thumbs_up_count: 0,
                review_created_version: None,
                at,
                reply_content: None,
                reply_at: None,
            };
            Ok(vec![
                review("r1", "Great app!"),
                review("r2", ""),
                review("r3", "Terrible, crashes constantly"),
            ])
        }
    }

    fn service() -> AnalysisService {
        let mock = MockBackend::new();
        mock.add_response(
            "Great app!",
            SentimentResult::new(SentimentLabel::Positive, 90.0, Some(0.9)),
        );
        mock.add_response(
            "Terrible, crashes constantly",
            SentimentResult::new(SentimentLabel::Negative, 10.0, Some(0.9)),
        );

        AnalysisService::new(
            ReviewFetcher::new(Arc::new(FakeCatalog)),
            Arc::new(SentimentClassifier::new(Box::new(mock))),
            Arc::new(AnalysisHistoryStore::new()),
        )
    }

    #[tokio::test]
    async fn test_analyze_end_to_end() {
        let service = service();
        let result = service.analyze("com.test.app").await.unwrap();

        assert_eq!(result.app_info.display_name, "Test App");
        assert_eq!(result.sentiment.review_count, 2);
        assert_eq!(result.sentiment.average_score, 50.0);
        assert_eq!(result.sentiment.positive_pct, 50);
        assert_eq!(result.sentiment.negative_pct, 50);
        assert_eq!(result.sentiment.neutral_pct, 0);
        assert_eq!(result.reviews.len(), 2);
        assert!(result.reviews.iter().all(|r| r.id != "r2"));
    }

    #[tokio::test]
    async fn test_analyze_appends_history() {
        let service = service();
        service.analyze("com.test.app").await.unwrap();

        let history = service.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, 1);
        assert_eq!(history[0].app_name, "Test App");
        assert_eq!(history[0].sentiment_score, 50.0);
    }

    #[tokio::test]
    async fn test_analyze_blank_query_is_validation_error() {
        let service = service();
        let err = service.analyze("   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_analyze_unknown_name_is_not_found() {
        let service = service();
        let err = service.analyze("Missing App").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Missing App"));
    }

    #[tokio::test]
    async fn test_result_by_id_is_stable() {
        let service = service();
        let original = service.analyze("com.test.app").await.unwrap();

        let looked_up = service.result_by_id(1).unwrap();
        assert_eq!(
            serde_json::to_value(&original).unwrap(),
            serde_json::to_value(&looked_up).unwrap()
        );

        assert!(service.result_by_id(42).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_classify_text_requires_content() {
        let service = service();
        let err = service.classify_text("  ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let result = service.classify_text("Great app!").await.unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
    }
}
