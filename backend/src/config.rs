//! Dashboard configuration
//!
//! Built in code or parsed from JSON. Every tunable has a default matching
//! the game's behaviour; only the server location and festival id are required.
//!
//! # Example
//!
//! ```rust
//! use festival_dashboard_core::DashboardConfig;
//!
//! let config = DashboardConfig::from_json(r#"{"base_url": "http://localhost:5000", "festival_id": 7}"#).unwrap();
//! assert_eq!(config.cache_window_ms, 5000);
//! assert_eq!(config.resolved_event_linger_ms, 3000);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CACHE_WINDOW_MS: u64 = 5_000;
pub const DEFAULT_RESOLVED_EVENT_LINGER_MS: u64 = 3_000;
pub const DEFAULT_INITIAL_BUDGET: f64 = 100_000.0;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("base_url must not be empty")]
    EmptyBaseUrl,

    #[error("cache_window_ms must be positive")]
    ZeroCacheWindow,

    #[error("initial_budget must be positive, got {0}")]
    InvalidInitialBudget(f64),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Game server origin, e.g. `http://localhost:5000`
    pub base_url: String,

    pub festival_id: u64,

    /// Snapshots younger than this are served from cache
    #[serde(default = "default_cache_window_ms")]
    pub cache_window_ms: u64,

    /// How long a resolved event stays on the board before it is dismissed
    #[serde(default = "default_resolved_event_linger_ms")]
    pub resolved_event_linger_ms: u64,

    /// Starting budget used by the budget-usage chart
    #[serde(default = "default_initial_budget")]
    pub initial_budget: f64,

    /// HTTP request timeout; none by default
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_cache_window_ms() -> u64 {
    DEFAULT_CACHE_WINDOW_MS
}

fn default_resolved_event_linger_ms() -> u64 {
    DEFAULT_RESOLVED_EVENT_LINGER_MS
}

fn default_initial_budget() -> f64 {
    DEFAULT_INITIAL_BUDGET
}

impl DashboardConfig {
    pub fn new(base_url: impl Into<String>, festival_id: u64) -> Self {
        Self {
            base_url: base_url.into(),
            festival_id,
            cache_window_ms: DEFAULT_CACHE_WINDOW_MS,
            resolved_event_linger_ms: DEFAULT_RESOLVED_EVENT_LINGER_MS,
            initial_budget: DEFAULT_INITIAL_BUDGET,
            request_timeout_ms: None,
        }
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.cache_window_ms == 0 {
            return Err(ConfigError::ZeroCacheWindow);
        }
        if self.initial_budget.is_nan() || self.initial_budget <= 0.0 {
            return Err(ConfigError::InvalidInitialBudget(self.initial_budget));
        }
        Ok(())
    }

    pub fn cache_window(&self) -> Duration {
        Duration::from_millis(self.cache_window_ms)
    }

    pub fn resolved_event_linger(&self) -> Duration {
        Duration::from_millis(self.resolved_event_linger_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::new("http://localhost:5000", 1);
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_window(), Duration::from_secs(5));
        assert_eq!(config.resolved_event_linger(), Duration::from_secs(3));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let config = DashboardConfig::new("  ", 1);
        assert_eq!(config.validate(), Err(ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn test_rejects_zero_window() {
        let err = DashboardConfig::from_json(
            r#"{"base_url": "http://x", "festival_id": 1, "cache_window_ms": 0}"#,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroCacheWindow);
    }

    #[test]
    fn test_rejects_non_positive_initial_budget() {
        let mut config = DashboardConfig::new("http://x", 1);
        config.initial_budget = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidInitialBudget(0.0)));
    }

    #[test]
    fn test_missing_festival_id_is_parse_error() {
        let err = DashboardConfig::from_json(r#"{"base_url": "http://x"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
