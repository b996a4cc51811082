//! HTTP mapping for domain errors.
//!
//! Each `Error` variant maps to exactly one status code; bodies are plain text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinecache_core::Error;

/// Domain error carried out of an axum handler.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NoResults(_) => StatusCode::NOT_FOUND,
            Error::ProviderUnavailable(_) | Error::ProviderRateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Database(_) | Error::MigrationFailed(_) | Error::RecordNotFound(_) | Error::CorruptRecord(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> String {
        match &self.0 {
            Error::BadRequest(msg) | Error::NoResults(msg) => msg.clone(),
            Error::ProviderUnavailable(_) | Error::ProviderRateLimited(_) => {
                "The search provider is not available".to_string()
            }
            _ => "Something went wrong".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        (status, self.body()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (Error::NoResults("x".into()), StatusCode::NOT_FOUND),
            (Error::ProviderUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (Error::ProviderRateLimited("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (Error::RecordNotFound("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::CorruptRecord("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::MigrationFailed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let err = ApiError(Error::CorruptRecord("items for batman_1: expected value".into()));
        assert_eq!(err.body(), "Something went wrong");

        let err = ApiError(Error::BadRequest("Invalid 'page' query parameter".into()));
        assert_eq!(err.body(), "Invalid 'page' query parameter");
    }
}
