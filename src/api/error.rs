//! Gateway error classification and message normalization.

use serde_json::Value;
use thiserror::Error;

/// Longest plain-text error body surfaced to the user as-is.
const MAX_TEXT_MESSAGE_LEN: usize = 200;

/// Errors that can occur during gateway calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// Failed to reach the backend or read its response
    #[error("Connection failed to '{url}': {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded total timeout
    #[error("Request timeout after {duration}s")]
    RequestTimeout { duration: u64 },

    /// Backend answered with a non-success status
    #[error("Backend error: {status}{}", .message.as_deref().map(|m| format!(" - {}", m)).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    /// Backend answered 2xx without the body the call expects
    #[error("Empty response body for '{path}'")]
    EmptyBody { path: String },

    /// Request or response body is not the expected JSON
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Message the backend attached to the failure, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Message shown to the user: the backend's message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Accepts `{"message": ".."}`, `{"error": ".."}`, `{"error": {"message": ".."}}`
/// or a short plain-text body.
pub fn extract_message(body: &[u8]) -> Option<String> {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return json_message(&value);
    }

    let text = std::str::from_utf8(body).ok()?.trim();
    if text.is_empty() || text.len() > MAX_TEXT_MESSAGE_LEN || text.starts_with('<') {
        return None;
    }
    Some(text.to_string())
}

fn json_message(value: &Value) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    match value {
        Value::String(_) => non_empty(value),
        Value::Object(map) => map
            .get("message")
            .and_then(non_empty)
            .or_else(|| map.get("error").and_then(json_message)),
        _ => None,
    }
}
