//! Cached search page records and cache key derivation.

use serde::{Deserialize, Serialize};

/// Placeholder stored in `Item::image_path` when the provider has no image.
pub const NO_IMAGE_PATH: &str = "NO_DATA";

/// A single search result as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub summary: String,
    pub relevance_score: f64,
    pub release_label: String,
    pub image_path: String,
}

/// One cached (query, page) result.
///
/// `timestamp` is set when the record is created and never touched again;
/// only `hit_counter` changes while the record lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    pub key: String,
    pub timestamp: i64,
    pub hit_counter: u64,
    pub total_pages: u32,
    pub items: Vec<Item>,
}

impl CacheRecord {
    /// Build a record for a freshly fetched page with a zeroed counter.
    pub fn fresh(key: String, timestamp: i64, total_pages: u32, items: Vec<Item>) -> Self {
        Self { key, timestamp, hit_counter: 0, total_pages, items }
    }

    /// Milliseconds elapsed since the record was created.
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis - self.timestamp
    }

    /// Whether the record is still inside the freshness window.
    ///
    /// The window is half-open: a record exactly `window_millis` old is stale.
    pub fn is_fresh(&self, now_millis: i64, window_millis: u64) -> bool {
        self.age_millis(now_millis) < i64::try_from(window_millis).unwrap_or(i64::MAX)
    }
}

/// Trim and lower-case a query so equivalent spellings share a cache entry.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Derive the cache key for a query and page: `<normalized query>_<page>`.
pub fn cache_key(query: &str, page: u32) -> String {
    format!("{}_{}", normalize_query(query), page)
}
