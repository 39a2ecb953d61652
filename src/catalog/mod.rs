//! External app-store catalog access.
//!
//! This module provides:
//! - The [`CatalogSource`] trait over search, details, and review listing
//! - An HTTP implementation for a Play-catalog gateway
//! - The [`ReviewFetcher`] that resolves an app query and pulls one batch
//!   of recent reviews

mod play;
mod types;

pub use play::PlayCatalogClient;
pub use types::{AppInfo, RawReview, ReviewSort, SearchCandidate};

use crate::error::Error;
use async_trait::async_trait;
use std::sync::Arc;

/// Default number of reviews fetched per analysis
pub const DEFAULT_REVIEW_COUNT: usize = 100;

/// Errors from the catalog backend.
///
/// Not-found is kept distinct so the service can surface it as a 404; every
/// other failure is an upstream error.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("not found upstream: {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("catalog API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(subject) => Error::NotFound(format!("App not found: {}", subject)),
            other => Error::Upstream(other.to_string()),
        }
    }
}

/// Trait for app-store catalog backends
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Search the catalog, returning up to `limit` candidates, best first
    async fn search(&self, query: &str, limit: usize)
        -> Result<Vec<SearchCandidate>, CatalogError>;

    /// Fetch details for an exact package identifier
    async fn details(&self, app_id: &str) -> Result<AppInfo, CatalogError>;

    /// Fetch up to `count` reviews in upstream order, one page only
    async fn reviews(
        &self,
        app_id: &str,
        count: usize,
        sort: ReviewSort,
    ) -> Result<Vec<RawReview>, CatalogError>;
}

/// Resolves app queries and fetches review batches from a catalog source
pub struct ReviewFetcher {
    source: Arc<dyn CatalogSource>,
    review_count: usize,
}

impl ReviewFetcher {
    /// Create a fetcher over the given catalog source
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            review_count: DEFAULT_REVIEW_COUNT,
        }
    }

    /// Override the per-analysis review batch size
    pub fn with_review_count(mut self, count: usize) -> Self {
        self.review_count = count;
        self
    }

    /// Resolve a user query to a package identifier.
    ///
    /// A query containing a domain-style separator is treated as a package id
    /// and used directly; anything else goes through catalog search, taking
    /// the top hit.
    pub async fn resolve(&self, query: &str) -> Result<String, Error> {
        if query.contains('.') {
            return Ok(query.to_string());
        }

        let candidates = self.source.search(query, 1).await.map_err(Error::from)?;
        match candidates.into_iter().next() {
            Some(candidate) => Ok(candidate.app_id),
            None => Err(Error::NotFound(format!("No app found with name: {}", query))),
        }
    }

    /// Fetch the app snapshot for a resolved package identifier
    pub async fn fetch_details(&self, app_id: &str) -> Result<AppInfo, Error> {
        self.source.details(app_id).await.map_err(Error::from)
    }

    /// Fetch one batch of recent reviews in upstream order
    pub async fn fetch_reviews(&self, app_id: &str) -> Result<Vec<RawReview>, Error> {
        self.source
            .reviews(app_id, self.review_count, ReviewSort::Newest)
            .await
            .map_err(Error::from)
    }

    /// Search the catalog for suggestion candidates
    pub async fn search_candidates(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchCandidate>, Error> {
        self.source.search(query, limit).await.map_err(Error::from)
    }
}
