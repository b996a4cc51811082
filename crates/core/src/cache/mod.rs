//! SQLite-backed cache for search result pages.
//!
//! This module provides a persistent key-value cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - One record per `<normalized query>_<page>` key
//! - Atomic hit counter increments
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod migrations;
pub mod record;
pub mod repository;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use record::{CacheRecord, Item, NO_IMAGE_PATH, cache_key, normalize_query};
pub use repository::CacheRepository;
pub use store::{CounterField, RecordStore};
