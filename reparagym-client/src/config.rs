//! Commerce API connection settings.

use std::time::Duration;

use reparagym_core::{env, ConfigError};
use serde::{Deserialize, Serialize};

/// Default backend address for local development.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:9000";

/// Default path for contact form submissions.
pub const DEFAULT_CONTACT_PATH: &str = "/store/contact";

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Connection settings for [`StoreClient`](crate::StoreClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend base URL without trailing slash.
    pub base_url: String,
    /// Sent as `x-publishable-api-key` on every store request.
    pub publishable_key: Option<String>,
    pub request_timeout: Duration,
    /// Path that accepts contact form submissions.
    pub contact_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            publishable_key: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            contact_path: DEFAULT_CONTACT_PATH.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_publishable_key(mut self, key: impl Into<String>) -> Self {
        self.publishable_key = Some(key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_contact_path(mut self, path: impl Into<String>) -> Self {
        self.contact_path = path.into();
        self
    }

    /// Create a StoreConfig from environment variables.
    ///
    /// Environment variables:
    /// - `MEDUSA_BACKEND_URL` or `NEXT_PUBLIC_MEDUSA_BACKEND_URL` (default: http://localhost:9000)
    /// - `MEDUSA_PUBLISHABLE_KEY` (optional)
    /// - `REPARAGYM_REQUEST_TIMEOUT_MS` (default: 10000)
    /// - `REPARAGYM_CONTACT_PATH` (default: /store/contact)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = env::first_var(&lookup, &["MEDUSA_BACKEND_URL", "NEXT_PUBLIC_MEDUSA_BACKEND_URL"]) {
            config = config.with_base_url(url);
        }
        config.publishable_key = env::var(&lookup, "MEDUSA_PUBLISHABLE_KEY");
        if let Some(timeout) = env::duration_ms_var(&lookup, "REPARAGYM_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = timeout;
        }
        if let Some(path) = env::var(&lookup, "REPARAGYM_CONTACT_PATH") {
            config.contact_path = path;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - base_url is an http(s) URL
    /// - request_timeout > 0
    /// - contact_path starts with '/'
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "base_url",
                &self.base_url,
                "must start with http:// or https://",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "request_timeout",
                self.request_timeout.as_millis(),
                "must be greater than zero",
            ));
        }
        if !self.contact_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "contact_path",
                &self.contact_path,
                "must start with '/'",
            ));
        }
        Ok(())
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
