//! Search provider abstraction.
//!
//! The orchestrator talks to the upstream search service only through this
//! trait, so a substitute provider can stand in for TMDB.

use async_trait::async_trait;

use crate::tmdb::{SearchPage, TmdbError};

/// An upstream service that answers one (query, page) search per call.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a single search. Implementations must not retry internally.
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, TmdbError>;
}
