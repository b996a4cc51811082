//! Domain operations on cached search pages.

use std::sync::Arc;

use super::record::CacheRecord;
use super::store::{CounterField, RecordStore};
use crate::Error;

/// Repository for cached search pages, built on a `RecordStore`.
#[derive(Clone)]
pub struct CacheRepository {
    store: Arc<dyn RecordStore>,
}

impl CacheRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Look up the record stored at `key`.
    ///
    /// A missing record is `Ok(None)`, not an error.
    pub async fn find_by_id(&self, key: &str) -> Result<Option<CacheRecord>, Error> {
        let record = self.store.get(key).await?;
        tracing::debug!(key, found = record.is_some(), "cache lookup");
        Ok(record)
    }

    /// Write `record`, replacing whatever is stored at its key.
    ///
    /// This is a last-writer-wins upsert with no version check: an increment
    /// that lands between a caller's read and this write is overwritten.
    pub async fn create(&self, record: CacheRecord) -> Result<CacheRecord, Error> {
        self.store.put(&record).await?;
        tracing::debug!(key = %record.key, items = record.items.len(), "cache record written");
        Ok(record)
    }

    /// Atomically add one to the record's hit counter and return the result.
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordNotFound` if nothing is stored at `key`.
    pub async fn increment_cache_counter(&self, key: &str) -> Result<CacheRecord, Error> {
        let record = self
            .store
            .increment_field(key, CounterField::HitCounter, 1)
            .await?
            .ok_or_else(|| Error::RecordNotFound(key.to_string()))?;
        tracing::debug!(key, hit_counter = record.hit_counter, "cache counter incremented");
        Ok(record)
    }
}
