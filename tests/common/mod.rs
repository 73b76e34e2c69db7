#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_sessions::{
    session::{Id, Record as SessionRecord},
    session_store, MemoryStore, SessionStore,
};

use pocket_gateway::backend::{AuthSession, Backend, BackendError, BackendResult, Record};
use pocket_gateway::config::AppConfig;
use pocket_gateway::{app, AppState};

/// One call observed by the fake backend
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListAll { token: String, collection: String },
    Create { token: String, collection: String, payload: Value },
    Update { token: String, collection: String, id: String, payload: Value },
    Delete { token: String, collection: String, id: String },
    Authenticate { email: String },
}

/// How the fake answers authenticate()
#[derive(Debug, Clone)]
pub enum AuthBehavior {
    Accept { token: String },
    Reject { status: u16, message: String },
    Incomplete,
}

/// In-process stand-in for the backend service
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<Option<u16>>>,
    auth: Mutex<AuthBehavior>,
    healthy: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            auth: Mutex::new(AuthBehavior::Accept {
                token: "backend-token".to_string(),
            }),
            healthy: AtomicBool::new(true),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Collection calls made so far (authenticate excluded)
    pub fn collection_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Authenticate { .. }))
            .collect()
    }

    /// Make every collection call fail; `Some(status)` mimics a backend reply, `None` a status-less failure
    pub fn fail_with(&self, status: Option<u16>) {
        *self.failure.lock().unwrap() = Some(status);
    }

    pub fn set_auth(&self, behavior: AuthBehavior) {
        *self.auth.lock().unwrap() = behavior;
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn injected_failure(&self) -> BackendResult<()> {
        match *self.failure.lock().unwrap() {
            Some(Some(status)) => Err(BackendError::from_response(
                status,
                json!({"code": status, "message": "Injected backend failure", "data": {}})
                    .to_string()
                    .as_bytes(),
            )),
            Some(None) => Err(BackendError::Decode("injected decode failure".to_string())),
            None => Ok(()),
        }
    }
}

fn object(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_all(&self, token: &str, collection: &str) -> BackendResult<Vec<Record>> {
        if collection == "panic" {
            panic!("fake backend asked to panic");
        }
        self.record(Call::ListAll {
            token: token.to_string(),
            collection: collection.to_string(),
        });
        self.injected_failure()?;
        Ok(vec![
            object(json!({"id": "r1", "title": "first"})),
            object(json!({"id": "r2", "title": "second"})),
        ])
    }

    async fn create(&self, token: &str, collection: &str, payload: &Value) -> BackendResult<Record> {
        self.record(Call::Create {
            token: token.to_string(),
            collection: collection.to_string(),
            payload: payload.clone(),
        });
        self.injected_failure()?;
        let mut record = object(payload.clone());
        record.insert("id".to_string(), json!("generated-id"));
        record.insert("collectionName".to_string(), json!(collection));
        Ok(record)
    }

    async fn update(&self, token: &str, collection: &str, id: &str, payload: &Value) -> BackendResult<Record> {
        self.record(Call::Update {
            token: token.to_string(),
            collection: collection.to_string(),
            id: id.to_string(),
            payload: payload.clone(),
        });
        self.injected_failure()?;
        let mut record = object(payload.clone());
        record.insert("id".to_string(), json!(id));
        Ok(record)
    }

    async fn delete(&self, token: &str, collection: &str, id: &str) -> BackendResult<()> {
        self.record(Call::Delete {
            token: token.to_string(),
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self.injected_failure()
    }

    async fn authenticate(&self, email: &str, _password: &str) -> BackendResult<AuthSession> {
        self.record(Call::Authenticate {
            email: email.to_string(),
        });
        match self.auth.lock().unwrap().clone() {
            AuthBehavior::Accept { token } => Ok(AuthSession {
                token,
                user: object(json!({"id": "user-1", "email": email})),
            }),
            AuthBehavior::Reject { status, message } => Err(BackendError::from_response(
                status,
                json!({"message": message}).to_string().as_bytes(),
            )),
            AuthBehavior::Incomplete => Err(BackendError::IncompleteAuth("user")),
        }
    }

    async fn health_check(&self) -> BackendResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::from_response(503, br#"{"message":"backend down"}"#))
        }
    }
}

/// Session store whose deletes can be switched to fail
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_deletes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStore for FlakyStore {
    async fn create(&self, record: &mut SessionRecord) -> session_store::Result<()> {
        self.inner.create(record).await
    }

    async fn save(&self, record: &SessionRecord) -> session_store::Result<()> {
        self.inner.save(record).await
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<SessionRecord>> {
        self.inner.load(session_id).await
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(session_store::Error::Backend("delete refused".to_string()));
        }
        self.inner.delete(session_id).await
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.session.secret = "integration-test-secret".to_string();
    config.server.static_dir = "tests/no-static-dir".to_string();
    config.api.enable_request_logging = false;
    config.api.enable_rate_limiting = false;
    config
}

pub fn router(backend: Arc<FakeBackend>) -> Router {
    router_with(backend, test_config(), MemoryStore::default())
}

pub fn router_with<Store>(backend: Arc<FakeBackend>, config: AppConfig, store: Store) -> Router
where
    Store: SessionStore + Clone,
{
    app(AppState::new(backend, config), store)
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    with_cookie(Request::builder().method("GET").uri(uri), cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
    with_cookie(Request::builder().method("DELETE").uri(uri), cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    with_cookie(Request::builder().method(method).uri(uri), cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    with_cookie(Request::builder().method("POST").uri(uri), cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn with_cookie(builder: axum::http::request::Builder, cookie: Option<&str>) -> axum::http::request::Builder {
    match cookie {
        Some(cookie) => builder.header(header::COOKIE, cookie),
        None => builder,
    }
}

/// `name=value` part of the session cookie set by a response
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let name = format!("{}=", test_config().session.cookie_name);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&name))
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in through POST /login and return the session cookie
pub async fn login(router: &Router) -> String {
    let response = send(router, form_request("/login", "email=user%40example.com&password=secret", None)).await;
    assert_eq!(response.status(), 302, "login should redirect");
    session_cookie(&response).expect("login should set a session cookie")
}
