use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::PageError;
use crate::session::SessionAuth;
use crate::views;

/// GET / - Home page, greeting the signed-in user when there is one
pub async fn home(session: Session) -> Result<impl IntoResponse, PageError> {
    let auth = SessionAuth::get(&session).await?;
    let email = auth
        .as_ref()
        .filter(|a| a.is_authenticated())
        .and_then(|a| a.email());

    Ok(views::home_page(email))
}

/// Fallback for every unmatched request
pub async fn not_found(uri: axum::http::Uri) -> impl IntoResponse {
    tracing::warn!(path = %uri, "404 - Route not found");
    (StatusCode::NOT_FOUND, views::not_found_page())
}

/// Turn a handler panic into the rendered error page
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "Handler panicked");

    PageError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Internal Server Error".to_string(),
    }
    .into_response()
}
