//! Client configuration
//!
//! The base address of the weather service comes from the environment and
//! falls back to a local development server. The request timeout is fixed.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the service base address.
pub const BASE_URL_ENV: &str = "SKYCAST_API_BASE_URL";

/// Used when [`BASE_URL_ENV`] is unset or blank.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Upper bound for every request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fixed configuration of the API client.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config for the given base address with the standard timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.to_string()));
        }
        Ok(Self {
            base_url: parsed,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Read the base address from [`BASE_URL_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(std::env::var(BASE_URL_ENV).ok())
    }

    fn resolve(value: Option<String>) -> Result<Self, ConfigError> {
        match value.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    /// Override the request timeout. Only tests should need this.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
