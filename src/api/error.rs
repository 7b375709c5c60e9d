//! Normalized failure type returned by every API call.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered 401; the session has already been cleared.
    #[error("not authenticated")]
    Unauthorized { payload: Value },

    /// Any other non-2xx answer, carrying the backend's error body.
    #[error("backend returned status {status}")]
    Backend { status: u16, payload: Value },

    /// A 2xx body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The call needs a session but none is present.
    #[error("no authentication token found")]
    MissingToken,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Backend { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::MissingToken => None,
        }
    }

    /// Structured error body from the backend, when one was received.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Unauthorized { payload } | Self::Backend { payload, .. } => Some(payload),
            Self::Transport(_) | Self::Decode(_) | Self::MissingToken => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Human-readable message: the backend's `detail`/`message` field when
    /// present, otherwise the error's own description.
    #[must_use]
    pub fn message(&self) -> String {
        self.payload()
            .and_then(payload_message)
            .unwrap_or_else(|| self.to_string())
    }
}

/// Pull a readable message out of a backend error body.
///
/// Checks `detail`, `message` and `massage` (the backend's own spelling on
/// enrollment responses), then falls back to a bare string body.
pub(crate) fn payload_message(payload: &Value) -> Option<String> {
    ["detail", "message", "massage"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .or_else(|| payload.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
