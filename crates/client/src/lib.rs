//! Client code for cinecache.
//!
//! This crate provides the TMDB search client and the `SearchProvider`
//! abstraction the server's orchestrator depends on.

pub mod provider;
pub mod tmdb;

pub use provider::SearchProvider;
pub use tmdb::{MovieResult, SearchPage, SearchRequest, TmdbClient, TmdbConfig, TmdbError};
