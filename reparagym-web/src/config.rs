//! Server configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use reparagym_client::StoreConfig;
use reparagym_core::{env, ConfigError, QueryConfig};
use reparagym_storefront::SiteConfig;

use crate::telemetry::LogFormat;

/// Origins allowed when `STORE_CORS` is unset.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "https://reparagymstore.com"];

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    /// Period of the background garbage-collection sweep.
    pub gc_interval: Duration,
    pub log_format: LogFormat,
    /// Public origin used for canonical URLs.
    pub public_base_url: String,
    pub whatsapp_number: Option<String>,
    pub query: QueryConfig,
    pub store: StoreConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            gc_interval: Duration::from_secs(60),
            log_format: LogFormat::default(),
            public_base_url: "http://localhost:3000".to_string(),
            whatsapp_number: None,
            query: QueryConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl WebConfig {
    /// Create a WebConfig from environment variables.
    ///
    /// Environment variables:
    /// - `REPARAGYM_BIND` (default: 0.0.0.0)
    /// - `PORT` (default: 3000)
    /// - `STORE_CORS` comma-separated origins, `*` for any
    /// - `REPARAGYM_GC_INTERVAL_MS` (default: 60000)
    /// - `REPARAGYM_LOG_FORMAT` `pretty` or `json` (default: pretty)
    /// - `REPARAGYM_BASE_URL` or `NEXT_PUBLIC_BASE_URL`
    /// - `REPARAGYM_WHATSAPP_NUMBER`
    ///
    /// plus everything read by [`QueryConfig::from_env`] and
    /// [`StoreConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            query: QueryConfig::from_lookup(&lookup)?,
            store: StoreConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(bind) = env::parse_var(&lookup, "REPARAGYM_BIND")? {
            config.bind = bind;
        }
        if let Some(port) = env::parse_var(&lookup, "PORT")? {
            config.port = port;
        }
        if let Some(origins) = env::list_var(&lookup, "STORE_CORS") {
            config.cors_origins = if origins.iter().any(|o| o == "*") {
                Vec::new()
            } else {
                origins
            };
        }
        if let Some(interval) = env::duration_ms_var(&lookup, "REPARAGYM_GC_INTERVAL_MS")? {
            config.gc_interval = interval;
        }
        if let Some(raw) = env::var(&lookup, "REPARAGYM_LOG_FORMAT") {
            config.log_format = raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid("REPARAGYM_LOG_FORMAT", &raw, reason))?;
        }
        if let Some(url) = env::first_var(&lookup, &["REPARAGYM_BASE_URL", "NEXT_PUBLIC_BASE_URL"]) {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }
        config.whatsapp_number = env::var(&lookup, "REPARAGYM_WHATSAPP_NUMBER");

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - gc_interval > 0
    /// - public_base_url is an http(s) URL
    /// - the nested query and store settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gc_interval.is_zero() {
            return Err(ConfigError::invalid(
                "gc_interval",
                self.gc_interval.as_millis(),
                "must be greater than zero",
            ));
        }
        if !(self.public_base_url.starts_with("http://") || self.public_base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "public_base_url",
                &self.public_base_url,
                "must start with http:// or https://",
            ));
        }
        self.query.validate()?;
        self.store.validate()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Site settings for page rendering, stamped with `year`.
    pub fn site(&self, year: i32) -> SiteConfig {
        let site = SiteConfig::default()
            .with_base_url(&self.public_base_url)
            .with_year(year);
        match &self.whatsapp_number {
            Some(number) => site.with_whatsapp_number(number),
            None => site,
        }
    }
}
