//! TMDB movie search request types and validation.

use serde::Serialize;

use crate::tmdb::TmdbError;

/// Highest page number the search endpoint will serve.
pub const MAX_PAGE: u32 = 500;

/// Longest query accepted before sending.
const MAX_QUERY_CHARS: usize = 500;

/// Query parameters for `GET /search/movie`.
///
/// Based on the TMDB API reference:
/// https://developer.themoviedb.org/reference/search-movie
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    /// Free-text query (required).
    pub query: String,

    /// 1-based page number (1-500).
    pub page: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self { query: query.into(), page }
    }

    /// Validate the search request parameters.
    ///
    /// Returns an error if the query is blank or too long, or the page is out of range.
    pub fn validate(&self) -> Result<(), TmdbError> {
        if self.query.trim().is_empty() {
            return Err(TmdbError::InvalidQuery("query cannot be empty".to_string()));
        }

        let chars = self.query.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(TmdbError::InvalidQuery(format!(
                "query too long: {chars} chars (max {MAX_QUERY_CHARS})"
            )));
        }

        if !(1..=MAX_PAGE).contains(&self.page) {
            return Err(TmdbError::InvalidPage(self.page));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        assert!(SearchRequest::new("batman", 1).validate().is_ok());
        assert!(SearchRequest::new("batman", MAX_PAGE).validate().is_ok());
    }

    #[test]
    fn test_empty_query() {
        assert!(matches!(SearchRequest::new("", 1).validate(), Err(TmdbError::InvalidQuery(_))));
        assert!(matches!(SearchRequest::new("   ", 1).validate(), Err(TmdbError::InvalidQuery(_))));
    }

    #[test]
    fn test_query_too_long() {
        let req = SearchRequest::new("a".repeat(501), 1);
        assert!(matches!(req.validate(), Err(TmdbError::InvalidQuery(_))));
    }

    #[test]
    fn test_page_out_of_range() {
        assert!(matches!(SearchRequest::new("batman", 0).validate(), Err(TmdbError::InvalidPage(0))));
        assert!(matches!(SearchRequest::new("batman", 501).validate(), Err(TmdbError::InvalidPage(501))));
    }

    #[test]
    fn test_serializes_as_query_params() {
        let req = SearchRequest::new("the matrix", 2);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["query"], "the matrix");
        assert_eq!(json["page"], 2);
    }
}
