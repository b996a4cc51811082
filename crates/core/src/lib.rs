//! Core types and shared functionality for cinecache.
//!
//! This crate provides:
//! - Search cache with SQLite backend and the cache repository built on it
//! - Unified error types
//! - Configuration structures
//! - Clock abstraction used for freshness checks

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;

pub use cache::{CacheDb, CacheRecord, CacheRepository, CounterField, Item, RecordStore};
pub use clock::{Clock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
