//! Sentiment classifier backed by an external LLM.
//!
//! The classifier wraps a [`ClassifierBackend`] and owns the fallback policy:
//! classification is best-effort annotation, so a failing backend call is
//! logged and converted to the neutral fallback rather than propagated.

use super::{parse_verdict, prompts, SentimentError, SentimentResult};
use async_trait::async_trait;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default OpenAI chat completions endpoint
const OPENAI_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Number of classification results kept in the response cache
const CACHE_SIZE: usize = 1000;

/// Trait for classification backends
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    /// Classify a single non-empty text
    async fn complete(&self, text: &str) -> Result<SentimentResult, SentimentError>;

    /// Get the backend name/model
    fn name(&self) -> &str;
}

/// OpenAI-based classification backend
pub struct OpenAiBackend {
    api_key: String,
    model: String,
    timeout_ms: u64,
    client: reqwest::Client,
}

impl OpenAiBackend {
    /// Create a new backend with the given API key
    pub fn new(api_key: &str, model: &str, timeout_ms: u64) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| SentimentError::Api(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_ms,
            client,
        })
    }
}

#[async_trait]
impl ClassifierBackend for OpenAiBackend {
    async fn complete(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompts::SYSTEM_INSTRUCTION },
                { "role": "user", "content": prompts::build_user_prompt(text) }
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.1
        });

        let response = self
            .client
            .post(OPENAI_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SentimentError::Timeout(self.timeout_ms)
                } else {
                    SentimentError::Api(e.to_string())
                }
            })?;

        if response.status() == 401 {
            return Err(SentimentError::Authentication);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Api(format!("status {}: {}", status, body)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SentimentError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| SentimentError::Parse("missing content in response".to_string()))?;

        parse_verdict(content)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Sentiment classifier with fallback policy and response caching.
///
/// `classify` never fails: backend errors are logged and replaced by the
/// neutral fallback so one misbehaving call cannot fail a whole batch.
pub struct SentimentClassifier {
    backend: Option<Box<dyn ClassifierBackend>>,
    cache: Option<Mutex<LruCache<String, SentimentResult>>>,
}

impl SentimentClassifier {
    /// Create a classifier over the given backend
    pub fn new(backend: Box<dyn ClassifierBackend>) -> Self {
        let cache_size = NonZeroUsize::new(CACHE_SIZE).unwrap();
        Self {
            backend: Some(backend),
            cache: Some(Mutex::new(LruCache::new(cache_size))),
        }
    }

    /// Create a classifier without a backend.
    ///
    /// Every call returns the neutral fallback. Used when no API credentials
    /// are configured, so the service stays up with degraded classification.
    pub fn fallback_only() -> Self {
        tracing::warn!("no classification credentials configured, running in fallback-only mode");
        Self {
            backend: None,
            cache: None,
        }
    }

    /// Disable the response cache
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Classify a single text. Never fails.
    pub async fn classify(&self, text: &str) -> SentimentResult {
        let backend = match &self.backend {
            Some(b) => b,
            None => return SentimentResult::fallback(),
        };

        let cache_key = self.cache_key(backend.name(), text);
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                if let Some(cached) = cache.get(&cache_key) {
                    tracing::debug!("classification cache hit");
                    return *cached;
                }
            }
        }

        match backend.complete(text).await {
            Ok(result) => {
                if let Some(cache) = &self.cache {
                    if let Ok(mut cache) = cache.lock() {
                        cache.put(cache_key, result);
                    }
                }
                result
            }
            Err(e) => {
                tracing::warn!(error = %e, "classification failed, using neutral fallback");
                SentimentResult::fallback()
            }
        }
    }

    /// Generate cache key for a text
    fn cache_key(&self, model: &str, text: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Shared state behind [`MockBackend`] clones
#[derive(Debug, Default)]
struct MockState {
    responses: Mutex<HashMap<String, SentimentResult>>,
    fail_texts: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    total_calls: AtomicUsize,
    delay_ms: AtomicUsize,
}

/// Mock classification backend for tests and demos.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the classifier owns another. Texts without a scripted response get a
/// simple keyword-based verdict.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<MockState>,
}

impl MockBackend {
    /// Create a new mock backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for an exact text
    pub fn add_response(&self, text: &str, result: SentimentResult) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(text.to_string(), result);
    }

    /// Make calls for an exact text fail
    pub fn fail_on(&self, text: &str) {
        self.state.fail_texts.lock().unwrap().push(text.to_string());
    }

    /// Hold every call open for `ms` milliseconds, forcing overlap
    pub fn with_delay_ms(self, ms: usize) -> Self {
        self.state.delay_ms.store(ms, Ordering::SeqCst);
        self
    }

    /// Highest number of calls observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Total number of classification calls made
    pub fn total_calls(&self) -> usize {
        self.state.total_calls.load(Ordering::SeqCst)
    }

    fn keyword_verdict(text: &str) -> SentimentResult {
        let lower = text.to_lowercase();
        let positive = ["great", "love", "excellent", "amazing", "perfect", "good"];
        let negative = ["terrible", "crash", "awful", "broken", "worst", "bad"];

        let pos = positive.iter().filter(|k| lower.contains(*k)).count() as i64;
        let neg = negative.iter().filter(|k| lower.contains(*k)).count() as i64;

        use super::SentimentLabel;
        match pos.cmp(&neg) {
            std::cmp::Ordering::Greater => {
                SentimentResult::new(SentimentLabel::Positive, 85.0, Some(0.8))
            }
            std::cmp::Ordering::Less => {
                SentimentResult::new(SentimentLabel::Negative, 15.0, Some(0.8))
            }
            std::cmp::Ordering::Equal => {
                SentimentResult::new(SentimentLabel::Neutral, 50.0, Some(0.6))
            }
        }
    }
}

#[async_trait]
impl ClassifierBackend for MockBackend {
    async fn complete(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        self.state.total_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state
            .peak_in_flight
            .fetch_max(current, Ordering::SeqCst);

        let delay = self.state.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        let outcome = if self
            .state
            .fail_texts
            .lock()
            .unwrap()
            .iter()
            .any(|t| t == text)
        {
            Err(SentimentError::Api("simulated backend failure".to_string()))
        } else if let Some(result) = self.state.responses.lock().unwrap().get(text) {
            Ok(*result)
        } else {
            Ok(Self::keyword_verdict(text))
        };

        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn name(&self) -> &str {
        "mock"
    }
}
