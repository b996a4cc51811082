//! TMDB (The Movie Database) search client.
//!
//! ### Contract
//!
//! - **Endpoint**: `GET {base_url}/search/movie?query=<q>&page=<n>`
//! - **Authentication**: `Authorization: Bearer <token>` (v4 read access token).
//! - **Pacing**: optional minimum interval between requests. Off by default.
//! - **Retries**: none. A failed call is returned to the caller as-is.
//! - **Normalization**: converts TMDB's response into a stable `SearchPage`.

pub mod error;
pub mod request;
pub mod response;

pub use error::TmdbError;
pub use request::{MAX_PAGE, SearchRequest};
pub use response::{MovieResult, SearchPage, TmdbApiResponse};

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use crate::provider::SearchProvider;

/// Default base URL for the TMDB v3 API.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "cinecache/0.1";

/// TMDB client configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Bearer token for the TMDB API.
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: cinecache/0.x).
    pub user_agent: String,
    /// Minimum spacing between requests; zero disables pacing.
    pub min_request_interval: Duration,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_request_interval: Duration::ZERO,
        }
    }
}

impl TmdbConfig {
    /// Build a client config from the application config.
    pub fn from_app_config(config: &cinecache_core::AppConfig) -> Result<Self, TmdbError> {
        let api_key = config
            .require_tmdb_api_key()
            .map_err(|_| TmdbError::MissingApiKey)?
            .to_string();

        Ok(Self {
            api_key,
            base_url: config.tmdb_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            min_request_interval: config.provider_min_interval(),
        })
    }
}

/// Spaces outbound requests at least `min_interval` apart.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self { last_request: Mutex::new(None), min_interval }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// TMDB search API client.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: TmdbConfig,
    search_url: Url,
    rate_limiter: Arc<RateLimiter>,
}

impl TmdbClient {
    /// Create a new TMDB client with the given configuration.
    pub fn new(config: TmdbConfig) -> Result<Self, TmdbError> {
        if config.api_key.trim().is_empty() {
            return Err(TmdbError::MissingApiKey);
        }

        let search_url = Url::parse(&format!("{}/search/movie", config.base_url.trim_end_matches('/')))
            .map_err(|e| TmdbError::Parse(format!("invalid base URL {}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TmdbError::Network(Arc::new(e)))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.min_request_interval));

        Ok(Self { http, config, search_url, rate_limiter })
    }

    /// Execute a movie search.
    ///
    /// Validates the request, waits for the pacing slot, then performs a single
    /// HTTP call and normalizes the response.
    pub async fn search(&self, req: &SearchRequest) -> Result<SearchPage, TmdbError> {
        req.validate()?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        tracing::debug!(query = %req.query, page = req.page, "searching TMDB");

        let http_response = self
            .http
            .get(self.search_url.clone())
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(%status, "TMDB response status");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TmdbError::AuthError);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TmdbError::RateLimited);
        }

        if !status.is_success() {
            return Err(TmdbError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let api_response: TmdbApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| TmdbError::Parse(e.to_string()))?;

        let page = SearchPage::from(api_response);
        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            results = page.result_count(),
            total_pages = page.total_pages,
            "TMDB search completed"
        );

        Ok(page)
    }
}

#[async_trait]
impl SearchProvider for TmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, TmdbError> {
        TmdbClient::search(self, &SearchRequest::new(query, page)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const BATMAN_PAGE: &str = r#"{
        "page": 1,
        "results": [
            {"id": 268, "title": "Batman", "original_title": "Batman", "overview": "Gotham.",
             "vote_average": 7.2, "release_date": "1989-06-21", "poster_path": "/a.jpg"},
            {"id": 364, "title": "Batman Returns", "original_title": "Batman Returns", "overview": "Penguin.",
             "vote_average": 6.9, "release_date": "1992-06-19", "poster_path": null}
        ],
        "total_pages": 5,
        "total_results": 97
    }"#;

    fn client_for(server: &mockito::ServerGuard) -> TmdbClient {
        TmdbClient::new(TmdbConfig {
            api_key: "test-token".into(),
            base_url: server.url(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_client_new_missing_key() {
        let result = TmdbClient::new(TmdbConfig::default());
        assert!(matches!(result, Err(TmdbError::MissingApiKey)));
    }

    #[test]
    fn test_config_from_app_config() {
        let app = cinecache_core::AppConfig {
            tmdb_api_key: Some("abc".into()),
            provider_min_interval_ms: 250,
            ..Default::default()
        };
        let config = TmdbConfig::from_app_config(&app).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.min_request_interval, Duration::from_millis(250));

        let missing = TmdbConfig::from_app_config(&cinecache_core::AppConfig::default());
        assert!(matches!(missing, Err(TmdbError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_search_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "batman".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BATMAN_PAGE)
            .expect(1)
            .create_async()
            .await;

        let page = client_for(&server)
            .search(&SearchRequest::new("batman", 1))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.total_results, 97);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].poster_path, None);
    }

    #[tokio::test]
    async fn test_search_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let result = client_for(&server).search(&SearchRequest::new("batman", 1)).await;
        assert!(matches!(result, Err(TmdbError::RateLimited)));
    }

    #[tokio::test]
    async fn test_search_auth_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status_code":7,"status_message":"Invalid API key"}"#)
            .create_async()
            .await;

        let result = client_for(&server).search(&SearchRequest::new("batman", 1)).await;
        assert!(matches!(result, Err(TmdbError::AuthError)));
    }

    #[tokio::test]
    async fn test_search_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = client_for(&server).search(&SearchRequest::new("batman", 1)).await;
        assert!(matches!(result, Err(TmdbError::HttpError { status: 503 })));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = client_for(&server).search(&SearchRequest::new("batman", 1)).await;
        assert!(matches!(result, Err(TmdbError::Parse(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let result = client_for(&server).search(&SearchRequest::new("batman", 0)).await;
        assert!(matches!(result, Err(TmdbError::InvalidPage(0))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = TmdbClient::new(TmdbConfig {
            api_key: "test-token".into(),
            base_url: "http://127.0.0.1:1".into(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();

        let result = client.search(&SearchRequest::new("batman", 1)).await;
        assert!(matches!(result, Err(TmdbError::Network(_)) | Err(TmdbError::Timeout)));
    }

    #[tokio::test]
    async fn test_rate_limiter_spaces_requests() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(95));
    }

    #[tokio::test]
    async fn test_rate_limiter_disabled() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
