use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use url::Url;

use super::{AuthSession, Backend, BackendError, BackendResult, Record};
use crate::config::BackendConfig;

/// HTTP client for a PocketBase-compatible record and auth API
#[derive(Clone, Debug)]
pub struct PocketBaseClient {
    http: reqwest::Client,
    base_url: Url,
    auth_collection: String,
    page_size: u32,
}

/// One page of a record listing
#[derive(Debug, Deserialize)]
struct ListPage {
    /// Page size the backend applied, which may be lower than the one requested
    #[serde(rename = "perPage")]
    per_page: Option<u32>,
    items: Vec<Record>,
}

/// Raw auth-with-password reply, before the token/identity check
#[derive(Debug, Deserialize)]
struct AuthReply {
    token: Option<String>,
    #[serde(alias = "user")]
    record: Option<Record>,
}

impl PocketBaseClient {
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            auth_collection: config.auth_collection.clone(),
            page_size: config.page_size.max(1),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> BackendResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// `/api/collections/{collection}/records[/{id}]`
    fn records_url(&self, collection: &str, id: Option<&str>) -> BackendResult<Url> {
        validate_segment(collection)?;
        match id {
            Some(id) => {
                validate_segment(id)?;
                self.endpoint(&["api", "collections", collection, "records", id])
            }
            None => self.endpoint(&["api", "collections", collection, "records"]),
        }
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        if token.is_empty() {
            request
        } else {
            request.header(AUTHORIZATION, token)
        }
    }

    /// Send a request and decode a JSON reply, mapping non-2xx replies to errors
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(BackendError::from_response(status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Send a request whose successful reply carries no meaningful body
    async fn send_empty(&self, request: RequestBuilder) -> BackendResult<()> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(BackendError::from_response(status.as_u16(), &body));
        }

        Ok(())
    }
}

#[async_trait]
impl Backend for PocketBaseClient {
    async fn list_all(&self, token: &str, collection: &str) -> BackendResult<Vec<Record>> {
        let per_page = self.page_size.to_string();
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut url = self.records_url(collection, None)?;
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("perPage", &per_page)
                .append_pair("skipTotal", "1");

            let list: ListPage = self
                .send_json(self.authorized(self.http.get(url), token))
                .await?;

            let applied = list.per_page.filter(|p| *p > 0).unwrap_or(self.page_size) as usize;
            let fetched = list.items.len();
            records.extend(list.items);

            if fetched == 0 || fetched < applied {
                break;
            }
            page += 1;
        }

        tracing::debug!(collection, count = records.len(), pages = page, "Fetched full record list");
        Ok(records)
    }

    async fn create(&self, token: &str, collection: &str, payload: &Value) -> BackendResult<Record> {
        let url = self.records_url(collection, None)?;
        self.send_json(self.authorized(self.http.post(url), token).json(payload))
            .await
    }

    async fn update(&self, token: &str, collection: &str, id: &str, payload: &Value) -> BackendResult<Record> {
        let url = self.records_url(collection, Some(id))?;
        self.send_json(self.authorized(self.http.patch(url), token).json(payload))
            .await
    }

    async fn delete(&self, token: &str, collection: &str, id: &str) -> BackendResult<()> {
        let url = self.records_url(collection, Some(id))?;
        self.send_empty(self.authorized(self.http.delete(url), token))
            .await
    }

    async fn authenticate(&self, email: &str, password: &str) -> BackendResult<AuthSession> {
        let url = self.endpoint(&["api", "collections", &self.auth_collection, "auth-with-password"])?;
        let reply: AuthReply = self
            .send_json(self.http.post(url).json(&json!({
                "identity": email,
                "password": password,
            })))
            .await?;

        into_auth_session(reply)
    }

    async fn health_check(&self) -> BackendResult<()> {
        let url = self.endpoint(&["api", "health"])?;
        self.send_empty(self.http.get(url)).await
    }
}

/// A success reply must carry both a token and the authenticated identity
fn into_auth_session(reply: AuthReply) -> BackendResult<AuthSession> {
    let token = reply
        .token
        .filter(|t| !t.is_empty())
        .ok_or(BackendError::IncompleteAuth("token"))?;
    let user = reply.record.ok_or(BackendError::IncompleteAuth("user"))?;

    Ok(AuthSession { token, user })
}

/// Reject values that cannot travel as a single URL path segment
fn validate_segment(segment: &str) -> BackendResult<()> {
    match segment {
        "" | "." | ".." => Err(BackendError::InvalidSegment(segment.to_string())),
        _ => Ok(()),
    }
}
