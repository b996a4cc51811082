//! TMDB API client error types.

use std::sync::Arc;

use cinecache_core::Error;

/// Errors from the TMDB search client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TmdbError {
    /// No API token configured.
    #[error("missing API key: TMDB token not set")]
    MissingApiKey,

    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Page outside the range TMDB serves.
    #[error("invalid page: {0} (must be 1-500)")]
    InvalidPage(u32),

    /// Authentication failed (invalid or revoked token).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by TMDB.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Non-2xx HTTP response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TmdbError::Timeout } else { TmdbError::Network(Arc::new(err)) }
    }
}

impl From<TmdbError> for Error {
    fn from(err: TmdbError) -> Self {
        match err {
            TmdbError::RateLimited => Error::ProviderRateLimited(err.to_string()),
            TmdbError::InvalidQuery(msg) => Error::BadRequest(msg),
            TmdbError::InvalidPage(_) => Error::BadRequest(err.to_string()),
            _ => Error::ProviderUnavailable(err.to_string()),
        }
    }
}
