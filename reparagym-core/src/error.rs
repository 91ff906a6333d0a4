//! Error types for Reparagym operations

use crate::fingerprint::Fingerprint;
use crate::status::FailureClass;
use thiserror::Error;

/// A single failed call to the commerce API.
///
/// This is what an injected fetch function reports back to the cache; the
/// cache decides from [`FetchError::class`] whether to try again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    #[error("Invalid response payload: {reason}")]
    Decode { reason: String },
}

impl FetchError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// HTTP status, when the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            Self::Status { status, .. } => FailureClass::from_status(*status),
            Self::Transport { .. } => FailureClass::Transport,
            Self::Decode { .. } => FailureClass::Decode,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }
}

/// Terminal outcome of a coordinated read or mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query {fingerprint} failed after {attempts} attempt(s): {source}")]
    FetchFailed {
        fingerprint: Fingerprint,
        attempts: u32,
        source: FetchError,
    },

    #[error("Mutation failed: {0}")]
    MutationFailed(FetchError),

    #[error("Query {fingerprint} was abandoned before it settled")]
    Abandoned { fingerprint: Fingerprint },
}

impl QueryError {
    /// The underlying API failure, if there was one.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::FetchFailed { source, .. } => Some(source),
            Self::MutationFailed(source) => Some(source),
            Self::Abandoned { .. } => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.fetch_error().and_then(FetchError::status_code)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Master error type for all Reparagym errors.
#[derive(Debug, Clone, Error)]
pub enum ReparagymError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Reparagym operations.
pub type ReparagymResult<T> = Result<T, ReparagymError>;

// =============================================================================
// TESTS
// =============================================================================
