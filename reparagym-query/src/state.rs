//! Observable state of a cached query.
//!
//! Every read returns a [`QueryState`] rather than a bare value so callers
//! always see whether what they hold is fresh, being refreshed, or the
//! remnant of a failed refresh.

use reparagym_core::QueryError;

/// What an observer currently sees for a fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<V> {
    /// No value yet and a fetch is in flight.
    Pending,

    /// A value is available.
    Success {
        value: V,
        /// The staleness deadline has passed or the entry was invalidated.
        is_stale: bool,
        /// A background refresh is running.
        is_fetching: bool,
    },

    /// The last fetch exhausted its retries.
    ///
    /// The error stays visible while a retrying fetch runs, so a read that
    /// triggers the refetch still reports the failure.
    Error {
        error: QueryError,
        /// Value from an earlier successful fetch, if any.
        previous: Option<V>,
        /// A new fetch was started after the failure.
        is_fetching: bool,
    },
}

impl<V> QueryState<V> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// True while a fetch for this fingerprint is outstanding.
    pub fn is_fetching(&self) -> bool {
        match self {
            Self::Pending => true,
            Self::Success { is_fetching, .. } | Self::Error { is_fetching, .. } => *is_fetching,
        }
    }

    /// No fetch outstanding: the state is the outcome of the last fetch.
    pub fn is_settled(&self) -> bool {
        !self.is_fetching()
    }

    /// The best value available: current data, or data that survived a
    /// failed refresh.
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Pending => None,
            Self::Success { value, .. } => Some(value),
            Self::Error { previous, .. } => previous.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Pending => None,
            Self::Success { value, .. } => Some(value),
            Self::Error { previous, .. } => previous,
        }
    }

    /// Map the inner value to a new type.
    pub fn map<U, F>(self, f: F) -> QueryState<U>
    where
        F: FnOnce(V) -> U,
    {
        match self {
            Self::Pending => QueryState::Pending,
            Self::Success {
                value,
                is_stale,
                is_fetching,
            } => QueryState::Success {
                value: f(value),
                is_stale,
                is_fetching,
            },
            Self::Error {
                error,
                previous,
                is_fetching,
            } => QueryState::Error {
                error,
                previous: previous.map(f),
                is_fetching,
            },
        }
    }
}
