pub mod auth;
pub mod rate_limit;
pub mod response;

pub use auth::{require_session, LOGIN_PATH};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
pub use response::{found, ApiResponse, ApiResult};
