//! Dashboard configuration.

use std::time::Duration;

use thiserror::Error;

pub const ENV_API_URL: &str = "ATRIUM_API_URL";
pub const ENV_AUTH_TOKEN: &str = "ATRIUM_AUTH_TOKEN";
pub const ENV_SOURCE_TIMEOUT_MS: &str = "ATRIUM_SOURCE_TIMEOUT_MS";
pub const ENV_RECENT_LIMIT: &str = "ATRIUM_RECENT_LIMIT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL '{0}'")]
    InvalidUrl(String),
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("source timeout must be greater than zero")]
    ZeroTimeout,
}

/// Where the backend lives and how patient to be with it.
#[derive(Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL every source path is joined onto.
    pub api_url: String,
    /// Bearer token sent with every source request.
    pub auth_token: Option<String>,
    /// Independent timeout applied to each source.
    pub source_timeout: Duration,
    /// Maximum number of `recent` entries kept per source.
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            auth_token: None,
            source_timeout: Duration::from_secs(5),
            recent_limit: 5,
        }
    }
}

impl core::fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("api_url", &self.api_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("source_timeout", &self.source_timeout)
            .field("recent_limit", &self.recent_limit)
            .finish()
    }
}

impl DashboardConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup, starting from
    /// the defaults. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config.api_url = url;
        }
        config.auth_token = get(ENV_AUTH_TOKEN);
        if let Some(ms) = get(ENV_SOURCE_TIMEOUT_MS) {
            config.source_timeout = Duration::from_millis(parse_number(ENV_SOURCE_TIMEOUT_MS, &ms)?);
        }
        if let Some(limit) = get(ENV_RECENT_LIMIT) {
            config.recent_limit = parse_number(ENV_RECENT_LIMIT, &limit)? as usize;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|_| ConfigError::InvalidUrl(self.api_url.clone()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(self.api_url.clone()));
        }
        if self.source_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Full URL for a backend path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}
