use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use serde_json::Value;

use crate::backend::Record;
use crate::middleware::{ApiResponse, ApiResult};
use crate::session::SessionAuth;
use crate::state::AppState;

/// GET /api/:collection - List every record in a collection
pub async fn get(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Extension(auth): Extension<SessionAuth>,
) -> ApiResult<Vec<Record>> {
    let records = state
        .backend
        .list_all(&auth.token, &collection)
        .await
        .map_err(|err| {
            tracing::error!(collection = %collection, status = ?err.status(), error = %err, "Error fetching records from backend");
            err
        })?;

    tracing::info!(collection = %collection, count = records.len(), "Fetched records");
    Ok(ApiResponse::success(records))
}

/// POST /api/:collection - Create a record from the JSON body
pub async fn post(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Extension(auth): Extension<SessionAuth>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::error!(collection = %collection, error = %rejection.body_text(), "Rejected create request body");
        rejection
    })?;

    let record = state
        .backend
        .create(&auth.token, &collection, &payload)
        .await
        .map_err(|err| {
            tracing::error!(collection = %collection, status = ?err.status(), error = %err, "Error posting record to backend");
            err
        })?;

    tracing::info!(collection = %collection, id = ?record.get("id"), "Created record");
    Ok(ApiResponse::created(record))
}
