//! Reparagym Core - Shared Vocabulary
//!
//! Pure data types shared by every other crate in the workspace: cache
//! fingerprints, failure classification for commerce API calls, the error
//! hierarchy and configuration types. This crate performs no I/O apart from
//! reading process environment variables in the `from_env` constructors.

pub mod config;
pub mod env;
pub mod error;
pub mod fingerprint;
pub mod status;

pub use config::{QueryConfig, RetryDelay, RetryPolicy};
pub use error::{ConfigError, FetchError, QueryError, ReparagymError, ReparagymResult};
pub use fingerprint::{Fingerprint, FingerprintBuilder};
pub use status::FailureClass;

/// Milliseconds, as used by every `*_MS` environment variable.
pub type DurationMs = u64;

/// Default staleness window for cached reads (1 minute).
pub const DEFAULT_STALE_TIME_MS: DurationMs = 60 * 1000;

/// Default garbage-collection horizon for unobserved entries (10 minutes).
pub const DEFAULT_GC_TIME_MS: DurationMs = 10 * 60 * 1000;

/// Default number of retries after the initial attempt of a read.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
