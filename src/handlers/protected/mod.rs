// Protected handlers: every route here sits behind `middleware::require_session`
// and receives the caller's `SessionAuth` through request extensions.
pub mod data;
