//! Errors returned by a [`Backend`](super::Backend).

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cannot parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Raw response text for HTTP failures, the error itself otherwise.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// The `detail` field of a JSON error body, or [`message`](Self::message)
    /// when the body is not JSON or has no usable detail.
    pub fn detail(&self) -> String {
        if let ApiError::Status { body, .. } = self {
            if let Some(detail) = extract_detail(body) {
                return detail;
            }
        }
        self.message()
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Validation errors come back with `detail` as a list, so anything
/// non-string is rendered as compact JSON.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
