use sha2::{Digest, Sha512};
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    Expiry, SessionManagerLayer, SessionStore,
};

use crate::config::SessionConfig;

/// Upper bound for the inactivity window, keeps cookie expiry dates representable
pub const MAX_INACTIVITY_HOURS: u64 = 24 * 365 * 10;

/// Derive the 64-byte cookie signing key from the configured secret
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Inactivity window for the configured hours, clamped to [`MAX_INACTIVITY_HOURS`]
pub fn inactivity_timeout(hours: u64) -> Duration {
    let hours = i64::try_from(hours.min(MAX_INACTIVITY_HOURS)).unwrap_or(MAX_INACTIVITY_HOURS as i64);
    Duration::hours(hours)
}

/// Configure the session middleware over the given store
pub fn session_layer<Store>(store: Store, config: &SessionConfig) -> SessionManagerLayer<Store, SignedCookie>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(inactivity_timeout(config.inactivity_hours)))
        .with_signed(signing_key(&config.secret))
}
