//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `freshness_window_ms` is 0
    /// - `user_agent` is empty
    /// - `tmdb_base_url` is not an http(s) URL
    /// - `bind_addr` is not a socket address
    /// - retry or pacing settings are out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.freshness_window_ms == 0 {
            return Err(invalid("freshness_window_ms", "must be greater than 0"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        match url::Url::parse(&self.tmdb_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => return Err(invalid("tmdb_base_url", "scheme must be http or https")),
            Err(e) => return Err(invalid("tmdb_base_url", &e.to_string())),
        }

        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(invalid("bind_addr", "must be a socket address such as 0.0.0.0:3000"));
        }

        if self.provider_retries > 5 {
            return Err(invalid("provider_retries", "must not exceed 5"));
        }
        if self.provider_retry_backoff_ms > 60_000 {
            return Err(invalid("provider_retry_backoff_ms", "must not exceed 60000ms"));
        }
        if self.provider_min_interval_ms > 60_000 {
            return Err(invalid("provider_min_interval_ms", "must not exceed 60000ms"));
        }

        if self.freshness_window_ms < self.timeout_ms {
            tracing::warn!(
                freshness_window_ms = self.freshness_window_ms,
                timeout_ms = self.timeout_ms,
                "freshness window is shorter than the provider timeout; \
                 pages may be stale by the time they are stored"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_zero_freshness_window() {
        let config = AppConfig { freshness_window_ms: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "freshness_window_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_base_url() {
        let config = AppConfig { tmdb_base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "tmdb_base_url"));

        let config = AppConfig { tmdb_base_url: "ftp://example.com".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "tmdb_base_url"));

        let config = AppConfig { tmdb_base_url: "http://127.0.0.1:8080/3".into(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bind_addr() {
        let config = AppConfig { bind_addr: "localhost".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "bind_addr"));
    }

    #[test]
    fn test_validate_retry_limits() {
        let config = AppConfig { provider_retries: 6, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "provider_retries"));

        let config = AppConfig { provider_retries: 5, provider_retry_backoff_ms: 60_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { timeout_ms: 100, freshness_window_ms: 1, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
