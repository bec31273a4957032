//! Client configuration, read from environment variables.

use std::time::Duration;

use crate::error::ClientError;

pub const API_URL_ENV: &str = "NOCPORTAL_API_URL";
pub const TOKEN_ENV: &str = "NOCPORTAL_TOKEN";
pub const TIMEOUT_ENV: &str = "NOCPORTAL_TIMEOUT_SECS";
pub const MAX_CONCURRENT_ENV: &str = "NOCPORTAL_MAX_CONCURRENT";

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Bearer token passed through to the backend, if any.
    pub token: Option<String>,
    pub timeout: Duration,
    /// Upper bound on timeline fetches in flight at once.
    pub max_concurrent: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get(API_URL_ENV).unwrap_or_else(|| {
            tracing::warn!("{API_URL_ENV} not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let timeout_secs = match get(TIMEOUT_ENV) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ClientError::Config(format!("{TIMEOUT_ENV}={raw}: {e}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let max_concurrent = match get(MAX_CONCURRENT_ENV) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                ClientError::Config(format!("{MAX_CONCURRENT_ENV}={raw}: {e}"))
            })?,
            None => DEFAULT_MAX_CONCURRENT,
        };

        Ok(Self {
            token: get(TOKEN_ENV),
            timeout: Duration::from_secs(timeout_secs),
            max_concurrent: max_concurrent.max(1),
            ..Self::new(api_url)
        })
    }
}
