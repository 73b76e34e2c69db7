//! Server-side session state for logged-in users.
//!
//! The session layer (`tower-sessions`) resolves the opaque session id from the
//! cookie; this module owns the one value stored under it. Only login writes it
//! and only logout destroys it.

pub mod layer;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::backend::{AuthSession, Record};

pub use layer::session_layer;

/// Session key holding the authenticated token and identity
pub const SESSION_AUTH_KEY: &str = "pocket:auth";

/// Authenticated state kept in the session: backend token plus the user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAuth {
    pub token: String,
    pub user: Record,
}

impl SessionAuth {
    /// True when the session may pass the auth gate
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn email(&self) -> Option<&str> {
        self.user.get("email").and_then(serde_json::Value::as_str)
    }

    /// Write the authenticated state into the session.
    ///
    /// The session id is cycled first so an id issued before login never
    /// carries authenticated state.
    pub async fn insert(session: &Session, auth: AuthSession) -> Result<(), tower_sessions::session::Error> {
        session.cycle_id().await?;
        session
            .insert(
                SESSION_AUTH_KEY,
                SessionAuth {
                    token: auth.token,
                    user: auth.user,
                },
            )
            .await
    }

    /// Read the authenticated state, if any
    pub async fn get(session: &Session) -> Result<Option<SessionAuth>, tower_sessions::session::Error> {
        session.get::<SessionAuth>(SESSION_AUTH_KEY).await
    }

    /// Destroy the whole session, waiting for the store to delete it
    pub async fn destroy(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.flush().await
    }
}
