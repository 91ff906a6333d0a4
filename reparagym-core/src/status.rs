//! Failure classification for commerce API calls.
//!
//! The cache only needs to know which bucket a failure falls into to decide
//! whether it may retry:
//!
//! | Class         | Source                          | Retried |
//! |---------------|---------------------------------|---------|
//! | `ClientError` | status 400..=499 except 429     | no      |
//! | `RateLimited` | status 429                      | yes     |
//! | `ServerError` | status >= 500 (or unexpected)   | yes     |
//! | `Transport`   | no status (connect, timeout)    | yes     |
//! | `Decode`      | 2xx with an unreadable payload  | yes     |

use serde::{Deserialize, Serialize};

pub const TOO_MANY_REQUESTS: u16 = 429;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    ClientError,
    RateLimited,
    ServerError,
    Transport,
    Decode,
}

impl FailureClass {
    /// Classify a non-success HTTP status.
    ///
    /// Anything outside 4xx is treated as a server-side problem, including
    /// stray 1xx/3xx codes that the transport did not resolve.
    pub fn from_status(status: u16) -> Self {
        match status {
            TOO_MANY_REQUESTS => Self::RateLimited,
            400..=499 => Self::ClientError,
            _ => Self::ServerError,
        }
    }

    /// Whether a read failing with this class may be attempted again.
    ///
    /// Only client errors are final; a failure without a status (transport
    /// or an unreadable body) counts as transient.
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::ClientError)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientError => "client_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Transport => "transport",
            Self::Decode => "decode",
        }
    }
}

/// True for 2xx statuses.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
