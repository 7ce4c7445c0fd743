//! Network client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use super::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const GENERATE_PATH: &str = "/proxy/generate";
pub const VALIDATE_PATH: &str = "/proxy/validate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetConfig {
    /// Prefix for the proxy paths, without a trailing slash. Empty means
    /// same-origin relative URLs.
    pub base_url: String,
    pub retry: RetryPolicy,
    pub timeout: Duration,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl NetConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `BALLCATCH_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `BALLCATCH_MAX_RETRIES`: default 3
    /// - `BALLCATCH_RETRY_DELAY_MS`: default 2000
    /// - `BALLCATCH_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("BALLCATCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            base_url: normalize_base_url(&base_url),
            retry: RetryPolicy {
                max_retries: env_parse("BALLCATCH_MAX_RETRIES", DEFAULT_MAX_RETRIES),
                delay: Duration::from_millis(env_parse("BALLCATCH_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)),
            },
            timeout: Duration::from_secs(env_parse("BALLCATCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Config for the page the widget is embedded in: same-origin paths and
    /// default retry behavior.
    #[must_use]
    pub fn same_origin() -> Self {
        Self { base_url: String::new(), ..Self::default() }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn generate_url(&self) -> String {
        format!("{}{GENERATE_PATH}", self.base_url)
    }

    #[must_use]
    pub fn validate_url(&self) -> String {
        format!("{}{VALIDATE_PATH}", self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
