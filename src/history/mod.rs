//! In-memory ledger of past analyses.
//!
//! The store owns the record collection and the id counter behind a mutex;
//! ids are assigned monotonically starting at 1 and are never reused, even
//! after a clear. The full analysis result is retained alongside the compact
//! record so by-id lookups return exactly what the original analysis
//! produced.

use crate::service::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Compact summary of one past analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Monotonic record id, starting at 1
    pub id: u64,
    /// Display name of the analyzed app
    pub app_name: String,
    /// Average sentiment score of the analysis
    pub sentiment_score: f64,
    /// Human-readable date of the analysis
    pub generated_at: String,
    /// App icon URL, if known
    #[serde(default)]
    pub app_icon: Option<String>,
}

/// Fields of a history record before an id is assigned
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub app_name: String,
    pub sentiment_score: f64,
    pub generated_at: String,
    pub app_icon: Option<String>,
}

#[derive(Debug, Default)]
struct StoreInner {
    records: Vec<HistoryRecord>,
    results: HashMap<u64, AnalysisResult>,
    next_id: u64,
}

/// Mutex-guarded append-only history store
#[derive(Debug)]
pub struct AnalysisHistoryStore {
    inner: Mutex<StoreInner>,
}

impl Default for AnalysisHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisHistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                records: Vec::new(),
                results: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Append a record with its full result, returning the assigned id
    pub fn append(&self, record: NewHistoryRecord, result: AnalysisResult) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;

        inner.records.push(HistoryRecord {
            id,
            app_name: record.app_name,
            sentiment_score: record.sentiment_score,
            generated_at: record.generated_at,
            app_icon: record.app_icon,
        });
        inner.results.insert(id, result);
        id
    }

    /// Get a record by id
    pub fn get(&self, id: u64) -> Option<HistoryRecord> {
        let inner = self.inner.lock().unwrap();
        inner.records.iter().find(|r| r.id == id).cloned()
    }

    /// Get the full analysis result stored for an id
    pub fn get_result(&self, id: u64) -> Option<AnalysisResult> {
        let inner = self.inner.lock().unwrap();
        inner.results.get(&id).cloned()
    }

    /// List all records in insertion order
    pub fn list(&self) -> Vec<HistoryRecord> {
        let inner = self.inner.lock().unwrap();
        inner.records.clone()
    }

    /// Remove all records and results. The id counter is not reset, so ids
    /// handed out before the clear are never reassigned.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.records.clear();
        inner.results.clear();
    }

    /// Number of records currently stored
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    /// Check whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
