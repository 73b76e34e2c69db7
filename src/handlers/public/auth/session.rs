use axum::{
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{ApiError, PageError};
use crate::middleware::{found, LOGIN_PATH};
use crate::session::SessionAuth;
use crate::state::AppState;
use crate::views;

/// Credentials submitted to POST /login, as a form or as JSON
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// GET /login - Render the login form
pub async fn login_form() -> impl IntoResponse {
    views::login_page(views::LOGIN_PROMPT)
}

/// POST /login - Authenticate against the backend and establish the session
///
/// Success writes the token and user into the session and redirects home.
/// Any failure re-renders the form with a generic message and status 401;
/// the backend's error detail only reaches the log.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    request: Request,
) -> Result<Response, PageError> {
    let Some(credentials) = read_credentials(request).await else {
        tracing::warn!("Login attempt with missing or malformed credentials");
        return Ok(invalid_credentials());
    };

    let auth = match state
        .backend
        .authenticate(&credentials.email, &credentials.password)
        .await
    {
        Ok(auth) => auth,
        Err(err) => {
            tracing::error!(email = %credentials.email, status = ?err.status(), error = %err, "Error during login");
            return Ok(invalid_credentials());
        }
    };

    let email = auth.email().unwrap_or(&credentials.email).to_string();
    SessionAuth::insert(&session, auth).await?;

    tracing::info!(email = %email, "User logged in");
    Ok(found("/"))
}

/// POST /logout - Destroy the session
///
/// Success redirects to the login page; a store failure answers 500 JSON.
pub async fn logout(session: Session) -> Response {
    match SessionAuth::destroy(&session).await {
        Ok(()) => {
            tracing::info!("User logged out");
            found(LOGIN_PATH)
        }
        Err(err) => {
            tracing::error!(error = %err, "Error during logout");
            ApiError::internal_server_error("Logout failed").into_response()
        }
    }
}

fn invalid_credentials() -> Response {
    (StatusCode::UNAUTHORIZED, views::login_page(views::INVALID_CREDENTIALS)).into_response()
}

/// Parse credentials from a JSON or form body; None when absent or blank
async fn read_credentials(request: Request) -> Option<Credentials> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);

    let credentials = if is_json {
        Json::<Credentials>::from_request(request, &())
            .await
            .ok()
            .map(|Json(c)| c)
    } else {
        Form::<Credentials>::from_request(request, &())
            .await
            .ok()
            .map(|Form(c)| c)
    };

    credentials.filter(|c| !c.email.trim().is_empty() && !c.password.is_empty())
}
