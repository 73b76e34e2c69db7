// HTTP error types: JSON errors for the API surface, rendered pages for the browser surface
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::backend::BackendError;
use crate::views;

/// HTTP API error with a status code and a client-facing message.
///
/// Serialized as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    // Body rejected by the JSON extractor (400, 415 or 422)
    InvalidJson { status: u16, message: String },

    // 401 Unauthorized
    Unauthorized(String),

    // 429 Too Many Requests
    TooManyRequests(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // Backend-reported failure, status passed through (500 when absent)
    Backend { status: Option<u16>, message: String },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidJson { status, .. } => *status,
            ApiError::Unauthorized(_) => 401,
            ApiError::TooManyRequests(_) => 429,
            ApiError::InternalServerError(_) => 500,
            ApiError::Backend { status, .. } => status.filter(|s| *s >= 400).unwrap_or(500),
        }
    }

    /// Get client-facing error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidJson { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::TooManyRequests(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::Backend { message, .. } => message,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

// Static constructor methods
impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        ApiError::TooManyRequests(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        ApiError::Backend {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

/// Failure while producing an HTML page, rendered as the error page
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error(transparent)]
    Session(#[from] tower_sessions::session::Error),
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::Status { status, .. } => *status,
            PageError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        let status = self.status();
        (status, views::error_page(&self.to_string())).into_response()
    }
}
