//! Cache-aside search orchestration.
//!
//! `SearchService::resolve` decides, per `<query>_<page>` key, whether to serve
//! the stored page (bumping its hit counter) or fetch from the provider and
//! overwrite the stored page. All shared state lives in the store; the
//! service itself holds nothing mutable.

use std::sync::Arc;
use std::time::Duration;

use cinecache_client::{MovieResult, SearchPage, SearchProvider, SearchRequest};
use cinecache_core::cache::{NO_IMAGE_PATH, cache_key};
use cinecache_core::{AppConfig, CacheRecord, CacheRepository, Clock, Error, Item};
use serde::{Deserialize, Serialize};

/// Page of results returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub items: Vec<Item>,
    pub total_pages: u32,
    pub hit_counter: u64,
}

impl From<CacheRecord> for ResultPage {
    fn from(record: CacheRecord) -> Self {
        Self { items: record.items, total_pages: record.total_pages, hit_counter: record.hit_counter }
    }
}

/// Tunables for `SearchService`.
#[derive(Debug, Clone)]
pub struct ResolveSettings {
    /// Records younger than this are served from cache.
    pub freshness_window: Duration,
    /// Extra provider attempts after a transient failure.
    pub provider_retries: u32,
    /// Backoff before the first retry; doubled for each further one.
    pub retry_backoff: Duration,
}

impl Default for ResolveSettings {
    fn default() -> Self {
        Self { freshness_window: Duration::from_secs(120), provider_retries: 0, retry_backoff: Duration::from_millis(250) }
    }
}

impl ResolveSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            freshness_window: config.freshness_window(),
            provider_retries: config.provider_retries,
            retry_backoff: config.provider_retry_backoff(),
        }
    }
}

/// Map a provider result onto the stored item shape.
pub fn to_item(movie: MovieResult) -> Item {
    Item {
        id: movie.id,
        title: movie.title,
        original_title: movie.original_title,
        summary: movie.overview,
        relevance_score: movie.vote_average,
        release_label: movie.release_date.unwrap_or_default(),
        image_path: movie.poster_path.unwrap_or_else(|| NO_IMAGE_PATH.to_string()),
    }
}

/// Cache-aside search over a `CacheRepository` and a `SearchProvider`.
pub struct SearchService {
    repository: CacheRepository,
    provider: Arc<dyn SearchProvider>,
    clock: Arc<dyn Clock>,
    settings: ResolveSettings,
}

impl SearchService {
    pub fn new(
        repository: CacheRepository, provider: Arc<dyn SearchProvider>, clock: Arc<dyn Clock>,
        settings: ResolveSettings,
    ) -> Self {
        Self { repository, provider, clock, settings }
    }

    /// Resolve one page of results for `query`.
    ///
    /// A fresh stored page is returned with its hit counter incremented and
    /// the provider is not called. A missing or stale page is fetched,
    /// stored with a zero counter, and returned.
    ///
    /// # Errors
    ///
    /// - `BadRequest` for a blank or over-long query or an out-of-range page (nothing is read)
    /// - `NoResults` when the provider page is empty (nothing is written)
    /// - `ProviderUnavailable` / `ProviderRateLimited` when the upstream call fails
    /// - store errors from the repository
    pub async fn resolve(&self, query: &str, page: u32) -> Result<ResultPage, Error> {
        let query = query.trim();
        SearchRequest::new(query, page).validate()?;

        let key = cache_key(query, page);

        if let Some(record) = self.repository.find_by_id(&key).await? {
            let now = self.clock.now_millis();
            let age_ms = record.age_millis(now);
            if record.is_fresh(now, self.window_millis()) {
                let updated = self.repository.increment_cache_counter(&key).await?;
                tracing::info!(key = %key, age_ms, hit_counter = updated.hit_counter, "cache hit");
                return Ok(updated.into());
            }
            tracing::info!(key = %key, age_ms, previous_hits = record.hit_counter, "cache stale, refreshing");
        } else {
            tracing::info!(key = %key, "cache miss");
        }

        let fetched = self.fetch_page(query, page).await?;
        if fetched.is_empty() {
            tracing::info!(key = %key, total_results = fetched.total_results, "provider returned no results");
            return Err(Error::NoResults("There are no results with given criteria".into()));
        }

        let items = fetched.results.into_iter().map(to_item).collect();
        let record = CacheRecord::fresh(key, self.clock.now_millis(), fetched.total_pages, items);
        let stored = self.repository.create(record).await?;

        Ok(stored.into())
    }

    fn window_millis(&self) -> u64 {
        u64::try_from(self.settings.freshness_window.as_millis()).unwrap_or(u64::MAX)
    }

    /// Call the provider, retrying transient failures with exponential backoff.
    async fn fetch_page(&self, query: &str, page: u32) -> Result<SearchPage, Error> {
        let mut attempt: u32 = 0;
        loop {
            let err = match self.provider.search(query, page).await {
                Ok(fetched) => return Ok(fetched),
                Err(e) => Error::from(e),
            };

            if attempt >= self.settings.provider_retries || !err.is_transient_provider_failure() {
                tracing::warn!(query, page, attempts = attempt + 1, error = %err, "provider call failed");
                return Err(err);
            }

            let backoff = self.settings.retry_backoff.saturating_mul(1 << attempt.min(16));
            tracing::warn!(
                query,
                page,
                attempt = attempt + 1,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "provider call failed, retrying"
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}
