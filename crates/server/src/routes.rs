//! HTTP routes.
//!
//! - `GET /search?query=<q>&page=<n>`: cached movie search (page defaults to 1)
//! - `GET /health`: liveness probe

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use cinecache_core::Error;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::search::{ResultPage, SearchService};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(search: SearchService) -> Self {
        Self { search: Arc::new(search) }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validated `/search` parameters.
#[derive(Debug, PartialEq, Eq)]
struct SearchParams {
    query: String,
    page: u32,
}

impl SearchParams {
    /// Parse raw query pairs, rejecting missing or repeated values.
    ///
    /// `pageNumber` is accepted as an alias of `page`; giving both counts as repeated.
    fn from_pairs(pairs: &[(String, String)]) -> Result<Self, Error> {
        let mut queries = pairs.iter().filter(|(k, _)| k == "query").map(|(_, v)| v);
        let query = match (queries.next(), queries.next()) {
            (Some(q), None) if !q.trim().is_empty() => q.clone(),
            _ => return Err(Error::BadRequest("Invalid or missing 'query' query parameter".into())),
        };

        let mut pages = pairs
            .iter()
            .filter(|(k, _)| k == "page" || k == "pageNumber")
            .map(|(_, v)| v);
        let page = match (pages.next(), pages.next()) {
            (None, _) => 1,
            (Some(raw), None) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| Error::BadRequest("Invalid 'page' query parameter".into()))?,
            (Some(_), Some(_)) => return Err(Error::BadRequest("Invalid 'page' query parameter".into())),
        };

        Ok(Self { query, page })
    }
}

async fn search(
    State(state): State<AppState>, Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ResultPage>, ApiError> {
    let params = SearchParams::from_pairs(&pairs)?;
    let page = state.search.resolve(&params.query, params.page).await?;
    Ok(Json(page))
}

async fn health() -> &'static str {
    "ok"
}
