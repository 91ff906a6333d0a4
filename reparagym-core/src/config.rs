//! Query cache configuration types

use crate::env;
use crate::error::{ConfigError, FetchError};
use crate::{DEFAULT_GC_TIME_MS, DEFAULT_MAX_RETRIES, DEFAULT_STALE_TIME_MS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pause between consecutive attempts of a failing read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetryDelay {
    /// Retry as soon as the previous attempt fails.
    #[default]
    Immediate,
    /// `initial * multiplier^n`, capped at `max`.
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

/// Retry policy for reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,
    pub delay: RetryDelay,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: RetryDelay::Immediate,
        }
    }
}

impl RetryPolicy {
    /// A policy that gives up after the first failure.
    pub fn never() -> Self {
        Self {
            max_retries: 0,
            delay: RetryDelay::Immediate,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delay(mut self, delay: RetryDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Decide whether to try again after `error`, given how many retries
    /// have already been spent.
    ///
    /// Client errors other than 429 fail fast regardless of budget.
    pub fn should_retry(&self, retries_so_far: u32, error: &FetchError) -> bool {
        if !error.is_retryable() {
            return false;
        }
        retries_so_far < self.max_retries
    }

    /// Pause before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        match &self.delay {
            RetryDelay::Immediate => Duration::ZERO,
            RetryDelay::Exponential {
                initial,
                max,
                multiplier,
            } => {
                let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
                let scaled = initial.as_secs_f64() * multiplier.powi(exponent);
                if !scaled.is_finite() || scaled >= max.as_secs_f64() {
                    *max
                } else if scaled <= 0.0 {
                    Duration::ZERO
                } else {
                    Duration::from_secs_f64(scaled)
                }
            }
        }
    }

    /// Upper bound on the number of times a fetch function is invoked.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Configuration for the query cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Age after which a cached value is refreshed on next access.
    pub stale_time: Duration,
    /// How long an unobserved entry survives before eviction.
    pub gc_time: Duration,
    /// Retry policy for reads. Mutations are never retried.
    pub retry: RetryPolicy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_millis(DEFAULT_STALE_TIME_MS),
            gc_time: Duration::from_millis(DEFAULT_GC_TIME_MS),
            retry: RetryPolicy::default(),
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Create a QueryConfig from environment variables.
    ///
    /// Environment variables:
    /// - `REPARAGYM_QUERY_STALE_TIME_MS` (default: 60000)
    /// - `REPARAGYM_QUERY_GC_TIME_MS` (default: 600000)
    /// - `REPARAGYM_QUERY_MAX_RETRIES` (default: 3)
    /// - `REPARAGYM_QUERY_RETRY_INITIAL_MS`: enables exponential backoff when set
    /// - `REPARAGYM_QUERY_RETRY_MAX_MS` (default: 30000)
    /// - `REPARAGYM_QUERY_RETRY_MULTIPLIER` (default: 2.0)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let stale_time = env::duration_ms_var(&lookup, "REPARAGYM_QUERY_STALE_TIME_MS")?
            .unwrap_or(defaults.stale_time);
        let gc_time = env::duration_ms_var(&lookup, "REPARAGYM_QUERY_GC_TIME_MS")?
            .unwrap_or(defaults.gc_time);
        let max_retries = env::parse_var(&lookup, "REPARAGYM_QUERY_MAX_RETRIES")?
            .unwrap_or(DEFAULT_MAX_RETRIES);

        let delay = match env::duration_ms_var(&lookup, "REPARAGYM_QUERY_RETRY_INITIAL_MS")? {
            Some(initial) => RetryDelay::Exponential {
                initial,
                max: env::duration_ms_var(&lookup, "REPARAGYM_QUERY_RETRY_MAX_MS")?
                    .unwrap_or(Duration::from_secs(30)),
                multiplier: env::parse_var(&lookup, "REPARAGYM_QUERY_RETRY_MULTIPLIER")?
                    .unwrap_or(2.0),
            },
            None => RetryDelay::Immediate,
        };

        let config = Self {
            stale_time,
            gc_time,
            retry: RetryPolicy { max_retries, delay },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - backoff multiplier >= 1.0
    /// - backoff max >= backoff initial
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let RetryDelay::Exponential {
            initial,
            max,
            multiplier,
        } = &self.retry.delay
        {
            if !(*multiplier >= 1.0) {
                return Err(ConfigError::invalid(
                    "retry.delay.multiplier",
                    multiplier,
                    "must be >= 1.0",
                ));
            }
            if max < initial {
                return Err(ConfigError::invalid(
                    "retry.delay.max",
                    format!("{:?}", max),
                    "must be >= initial",
                ));
            }
        }
        Ok(())
    }
}
