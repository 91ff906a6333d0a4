//! Error Types for the Storefront Server
//!
//! JSON error bodies for the non-HTML endpoints, and the mapping from
//! cache, client and template failures onto HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reparagym_client::ContactValidationError;
use reparagym_core::{ConfigError, QueryError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for JSON responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Client Errors (400, 404, 429)
    // ========================================================================
    /// Request body failed validation
    ValidationFailed,

    /// Request body could not be read
    InvalidInput,

    /// No such page or resource
    NotFound,

    /// The store API refused the request for rate reasons
    TooManyRequests,

    // ========================================================================
    // Upstream Errors (502, 504)
    // ========================================================================
    /// The store API failed or returned an unusable response
    UpstreamUnavailable,

    /// The store API did not answer in time
    UpstreamTimeout,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// A page template failed to render
    RenderFailed,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed | ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorCode::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::RenderFailed | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::TooManyRequests => "Rate limit exceeded",
            ErrorCode::UpstreamUnavailable => "Store API unavailable",
            ErrorCode::UpstreamTimeout => "Store API timed out",
            ErrorCode::RenderFailed => "Page rendering failed",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// WEB ERROR STRUCT
// ============================================================================

/// Structured error body returned by JSON endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebError {
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found", what))
    }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for WebError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Upstream status codes are not passed through verbatim: a 404 stays a
/// 404 and a 429 stays a 429, every other store failure is a bad gateway.
impl From<QueryError> for WebError {
    fn from(err: QueryError) -> Self {
        let code = match (&err, err.status_code()) {
            (_, Some(404)) => ErrorCode::NotFound,
            (_, Some(429)) => ErrorCode::TooManyRequests,
            (_, Some(408)) | (_, Some(504)) => ErrorCode::UpstreamTimeout,
            (QueryError::Abandoned { .. }, _) => ErrorCode::InternalError,
            _ => ErrorCode::UpstreamUnavailable,
        };
        if code.status_code().is_server_error() {
            tracing::warn!(error = %err, "Store request failed");
        }
        Self::new(code, err.to_string())
    }
}

impl From<ContactValidationError> for WebError {
    fn from(err: ContactValidationError) -> Self {
        Self::validation_failed(err.to_string())
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        tracing::error!("Template error: {:?}", err);
        Self::from_code(ErrorCode::RenderFailed)
    }
}

impl From<ConfigError> for WebError {
    fn from(err: ConfigError) -> Self {
        Self::internal_error(err.to_string())
    }
}
