//! HTTP client for a Play-catalog JSON gateway.
//!
//! Talks to a `google-play-api`-style gateway exposing search, app details,
//! and review listing. The base URL is configurable so deployments can point
//! at whichever gateway instance they run.

use super::types::{AppInfo, RawReview, ReviewSort, SearchCandidate};
use super::{CatalogError, CatalogSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Default catalog gateway base URL
const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Search/review list response wrapper
#[derive(Debug, Deserialize)]
struct ListResult<T> {
    results: Vec<T>,
}

/// App details payload from the gateway
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppDetails {
    app_id: String,
    title: String,
    #[serde(default)]
    developer: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

impl From<AppDetails> for AppInfo {
    fn from(details: AppDetails) -> Self {
        AppInfo {
            display_name: details.title,
            package_id: details.app_id,
            developer: details.developer,
            icon_url: details.icon,
            rating_text: details.score.map(|s| format!("{:.1}", s)),
        }
    }
}

/// Play catalog client
pub struct PlayCatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl PlayCatalogClient {
    /// Create a client against the default gateway URL
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_BASE_URL, 30_000)
    }

    /// Create a client against a specific gateway URL
    pub fn with_base_url(base_url: &str, timeout_ms: u64) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(CatalogError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issue a GET and decode the JSON body, mapping HTTP status to errors
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        subject: &str,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(CatalogError::RequestFailed)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(subject.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            let message = message.chars().take(200).collect();
            return Err(CatalogError::Api { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for PlayCatalogClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchCandidate>, CatalogError> {
        let url = format!(
            "{}/apps/?q={}&num={}",
            self.base_url,
            urlencode(query),
            limit
        );
        let list: ListResult<SearchCandidate> = self.get_json(&url, query).await?;
        Ok(list.results)
    }

    async fn details(&self, app_id: &str) -> Result<AppInfo, CatalogError> {
        let url = format!("{}/apps/{}", self.base_url, urlencode(app_id));
        let details: AppDetails = self.get_json(&url, app_id).await?;
        Ok(details.into())
    }

    async fn reviews(
        &self,
        app_id: &str,
        count: usize,
        sort: ReviewSort,
    ) -> Result<Vec<RawReview>, CatalogError> {
        let url = format!(
            "{}/apps/{}/reviews?sort={}&num={}",
            self.base_url,
            urlencode(app_id),
            sort.as_str(),
            count
        );
        let list: ListResult<RawReview> = self.get_json(&url, app_id).await?;
        // One page only; the gateway caps the batch at `count`
        Ok(list.results.into_iter().take(count).collect())
    }
}

/// Minimal percent-encoding for query components
fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
