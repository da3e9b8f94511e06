//! Client error type

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Normalized API error.
///
/// Every failure path collapses into this one shape so callers never branch
/// on error origin: transport failures, non-2xx responses, and unreadable
/// bodies all surface as an `ApiError`. A `status` of 0 marks a failure at
/// the network level, before any HTTP response was obtained.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable description of the failure
    pub message: String,
    /// HTTP status code, or 0 for a transport-level failure
    pub status: u16,
    /// Raw server payload, when a response body was available
    pub data: Option<Value>,
}

impl ApiError {
    /// Create an error with no server payload
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
            data: None,
        }
    }

    /// Error for a response outside the 2xx range.
    ///
    /// Prefers a server-supplied `message` field, falling back to
    /// `HTTP <status>: <reason>`.
    pub fn from_response(status: StatusCode, data: Value) -> Self {
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });
        Self {
            message,
            status: status.as_u16(),
            data: Some(data),
        }
    }

    /// Transport-level failure: connection error, unreadable body, or a
    /// malformed JSON payload
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Network error: {err}"),
            status: 0,
            data: None,
        }
    }

    /// Whether this failure happened below the HTTP layer
    pub fn is_network(&self) -> bool {
        self.status == 0
    }

    /// Whether the server rejected the caller's credentials
    pub fn is_auth(&self) -> bool {
        self.status == 401
    }
}

/// Standard result type for API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;
