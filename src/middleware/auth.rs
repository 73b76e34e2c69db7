use axum::{
    extract::Request,
    http::{header::LOCATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::ApiError;
use crate::session::SessionAuth;

/// Where unauthenticated clients are sent
pub const LOGIN_PATH: &str = "/login";

/// Session gate for protected routes.
///
/// Admits the request only when the session holds a non-empty backend token,
/// and hands the [`SessionAuth`] to handlers through request extensions.
/// Everything else gets 401 with a redirect to the login page.
pub async fn require_session(session: Session, mut request: Request, next: Next) -> Response {
    let auth = match SessionAuth::get(&session).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read session, treating request as anonymous");
            None
        }
    };

    match auth {
        Some(auth) if auth.is_authenticated() => {
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        _ => {
            tracing::debug!(path = %request.uri().path(), "Rejected request without a session token");
            unauthorized_redirect()
        }
    }
}

fn unauthorized_redirect() -> Response {
    let mut response = ApiError::unauthorized("Authentication required").into_response();
    response
        .headers_mut()
        .insert(LOCATION, HeaderValue::from_static(LOGIN_PATH));
    response
}
