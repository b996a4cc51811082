//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CINECACHE_*)
//! 2. TOML config file (if CINECACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CINECACHE_*)
/// 2. TOML config file (if CINECACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// TMDB API read access token, sent as a bearer token.
    ///
    /// Set via CINECACHE_TMDB_API_KEY environment variable.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// Base URL of the TMDB v3 API.
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    /// Path to SQLite cache database.
    ///
    /// Set via CINECACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Socket address the HTTP server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// User-Agent string for provider requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Provider request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum age of a cached page before it is refetched.
    ///
    /// Set via CINECACHE_FRESHNESS_WINDOW_MS environment variable.
    #[serde(default = "default_freshness_window_ms")]
    pub freshness_window_ms: u64,

    /// Extra attempts after a provider failure (0 = single attempt).
    #[serde(default)]
    pub provider_retries: u32,

    /// Base backoff between provider retries, doubled on each attempt.
    #[serde(default = "default_provider_retry_backoff_ms")]
    pub provider_retry_backoff_ms: u64,

    /// Minimum spacing between outbound provider requests (0 = no pacing).
    #[serde(default)]
    pub provider_min_interval_ms: u64,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./cinecache.sqlite")
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".into()
}

fn default_user_agent() -> String {
    "cinecache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_freshness_window_ms() -> u64 {
    120_000 // 2 minutes
}

fn default_provider_retry_backoff_ms() -> u64 {
    250
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: default_tmdb_base_url(),
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            freshness_window_ms: default_freshness_window_ms(),
            provider_retries: 0,
            provider_retry_backoff_ms: default_provider_retry_backoff_ms(),
            provider_min_interval_ms: 0,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Freshness window as Duration.
    pub fn freshness_window(&self) -> Duration {
        Duration::from_millis(self.freshness_window_ms)
    }

    pub fn provider_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.provider_retry_backoff_ms)
    }

    pub fn provider_min_interval(&self) -> Duration {
        Duration::from_millis(self.provider_min_interval_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CINECACHE_`
    /// 2. TOML file from `CINECACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CINECACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CINECACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return the TMDB token or a hint on how to set it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the TMDB API key is not set.
    pub fn require_tmdb_api_key(&self) -> Result<&str, ConfigError> {
        self.tmdb_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "tmdb_api_key".into(),
                hint: "Set CINECACHE_TMDB_API_KEY environment variable".into(),
            })
    }
}
