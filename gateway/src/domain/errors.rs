use serde_json::Value;
use std::fmt;

// Raw error payload returned by the backend, kept verbatim for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ErrorBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return ErrorBody::Empty;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    // Backend error bodies carry a human-readable `message` field when they are JSON.
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorBody::Json(value) => value.get("message").and_then(Value::as_str),
            ErrorBody::Text(text) => Some(text.as_str()),
            ErrorBody::Empty => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(message),
            None => f.write_str("<empty body>"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("session storage lock poisoned")]
    Poisoned,
}

// Everything a gateway call can fail with. Validation of form input happens
// before a call is made and is not represented here.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("malformed response body: {0}")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("authentication rejected ({status}): {body}")]
    AuthRejected { status: u16, body: ErrorBody },
    #[error("backend error {status}: {body}")]
    Backend { status: u16, body: ErrorBody },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored session token is not a valid header value")]
    InvalidToken,
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

impl GatewayError {
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, GatewayError::AuthRejected { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::AuthRejected { status, .. } | GatewayError::Backend { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location capability unavailable")]
    Unavailable,
    #[error("location lookup timed out")]
    Timeout,
}
