//! Client configuration.

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

pub const BASE_URL_VAR: &str = "TODO_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "TODO_API_TIMEOUT_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    EmptyBaseUrl { var: &'static str },
}

/// Settings for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Sent with every request in addition to the JSON defaults.
    pub headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `TODO_API_BASE_URL` and `TODO_API_TIMEOUT_MS`, falling back to
    /// the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_VAR) {
            if base_url.trim().is_empty() {
                return Err(ConfigError::EmptyBaseUrl { var: BASE_URL_VAR });
            }
            config.base_url = base_url;
        }
        if let Some(value) = lookup(TIMEOUT_VAR) {
            let invalid = || ConfigError::InvalidTimeout {
                var: TIMEOUT_VAR,
                value: value.clone(),
            };
            let millis: u64 = value.trim().parse().map_err(|_| invalid())?;
            // A zero global timeout fails every request immediately.
            if millis == 0 {
                return Err(invalid());
            }
            config.timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }
}
