//! Unified error types for cinecache.
//!
//! Every variant maps to exactly one response code at the HTTP boundary.

use tokio_rusqlite::rusqlite;

/// Unified error types for the search cache service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed request input (missing query, multi-valued page, ...).
    #[error("BAD_REQUEST: {0}")]
    BadRequest(String),

    /// Store operation failed.
    #[error("STORE_UNAVAILABLE: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_UNAVAILABLE: migration failed: {0}")]
    MigrationFailed(String),

    /// Counter increment against a key with no record.
    #[error("RECORD_NOT_FOUND: {0}")]
    RecordNotFound(String),

    /// Stored record could not be decoded or encoded.
    #[error("CORRUPT_RECORD: {0}")]
    CorruptRecord(String),

    /// Search provider unreachable or answered with a non-2xx status.
    #[error("PROVIDER_UNAVAILABLE: {0}")]
    ProviderUnavailable(String),

    /// Search provider throttled the request.
    #[error("PROVIDER_RATE_LIMITED: {0}")]
    ProviderRateLimited(String),

    /// Provider returned no results for the query.
    #[error("NO_RESULTS: {0}")]
    NoResults(String),
}

impl Error {
    /// Whether a retry of the upstream call may succeed.
    pub fn is_transient_provider_failure(&self) -> bool {
        matches!(self, Error::ProviderUnavailable(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close((_, e)) => e.into(),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::CorruptRecord(err.to_string())
    }
}
