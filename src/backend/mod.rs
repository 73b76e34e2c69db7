pub mod error;
pub mod pocketbase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use error::{BackendError, BackendResult};
pub use pocketbase::PocketBaseClient;

/// A backend record: field name to value, shape owned by the backend schema
pub type Record = Map<String, Value>;

/// Result of a successful password authentication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: Record,
}

impl AuthSession {
    /// Email of the authenticated identity, if the backend returned one
    pub fn email(&self) -> Option<&str> {
        self.user.get("email").and_then(Value::as_str)
    }
}

/// Uniform call surface over the remote record-storage and auth service.
///
/// Every method is a single passthrough to the backend: no retries, no
/// batching, no caching. Collection calls carry the caller's session token.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch every record of a collection
    async fn list_all(&self, token: &str, collection: &str) -> BackendResult<Vec<Record>>;

    /// Create a record and return it as stored by the backend
    async fn create(&self, token: &str, collection: &str, payload: &Value) -> BackendResult<Record>;

    /// Update a record by id and return the updated record
    async fn update(&self, token: &str, collection: &str, id: &str, payload: &Value) -> BackendResult<Record>;

    /// Delete a record by id
    async fn delete(&self, token: &str, collection: &str, id: &str) -> BackendResult<()>;

    /// Password authentication against the auth collection
    async fn authenticate(&self, email: &str, password: &str) -> BackendResult<AuthSession>;

    /// Liveness probe of the backend service
    async fn health_check(&self) -> BackendResult<()>;
}
