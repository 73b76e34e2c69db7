use serde_json::Value;
use thiserror::Error;

/// Message used when the backend replies with an error but no message of its own
pub const GENERIC_BACKEND_MESSAGE: &str = "Something went wrong while processing your request.";

/// Errors reported by the backend client
#[derive(Debug, Error)]
pub enum BackendError {
    /// Non-2xx reply from the backend
    #[error("{message}")]
    Response { status: u16, message: String },

    /// The request never produced a reply (connection refused, reset, DNS...)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx reply whose body could not be decoded
    #[error("Unexpected backend response: {0}")]
    Decode(String),

    /// Authentication succeeded at the transport level but the reply lacks a token or identity
    #[error("Authentication failed: missing {0} in response")]
    IncompleteAuth(&'static str),

    /// A collection name or record id that cannot be used as a URL path segment
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    /// HTTP-like status reported for this error, when one exists
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Response { status, .. } => Some(*status),
            BackendError::Transport(err) => err.status().map(|s| s.as_u16()),
            BackendError::IncompleteAuth(_) => Some(401),
            BackendError::InvalidSegment(_) => Some(400),
            BackendError::Decode(_) | BackendError::InvalidUrl(_) => None,
        }
    }

    /// Build a response error from a status and the raw error body
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_BACKEND_MESSAGE)
            .to_string();

        BackendError::Response { status, message }
    }
}
