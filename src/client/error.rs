//! Error types for REST calls and the shared user-message extraction.
//!
//! Every failure an action can hit is turned into a user-facing string in
//! exactly one place, [`ApiError::user_message`], so the passive channel
//! (`error_message` in state) and the active one (`on_error` callbacks)
//! always agree.

use serde_json::Value;
use thiserror::Error;

/// Shown when a non-2xx response carries no usable message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown when the server could not be reached at all.
pub const TRANSPORT_MESSAGE: &str = "Unable to reach the server";

/// Shown when a 2xx response body does not match the expected shape.
pub const DECODE_MESSAGE: &str = "Unexpected response from the server";

/// Errors that can occur while talking to the REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure, ...
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Rejected locally before any request was sent.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The task running the request panicked or was cancelled.
    #[error("Request task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

impl ApiError {
    /// The message surfaced to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport { .. } => TRANSPORT_MESSAGE.to_string(),
            ApiError::Decode { .. } => DECODE_MESSAGE.to_string(),
            ApiError::Task(_) => FALLBACK_MESSAGE.to_string(),
            ApiError::InvalidUrl { .. } | ApiError::InvalidQuery(_) | ApiError::Client(_) => {
                self.to_string()
            }
        }
    }

    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract the server-provided message from an error response body.
///
/// Accepted shapes, in order: `{"message": ".."}`, `{"error": ".."}`,
/// `{"error": {"message": ".."}}`. Anything else yields [`FALLBACK_MESSAGE`].
pub fn extract_message(body: &[u8]) -> String {
    let Ok(json) = serde_json::from_slice::<Value>(body) else {
        return FALLBACK_MESSAGE.to_string();
    };

    let message = json
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| json.get("error").and_then(Value::as_str))
        .or_else(|| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .map(str::trim)
        .filter(|m| !m.is_empty());

    match message {
        Some(m) => m.to_string(),
        None => FALLBACK_MESSAGE.to_string(),
    }
}
