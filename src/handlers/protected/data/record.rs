use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::backend::Record;
use crate::middleware::{ApiResponse, ApiResult};
use crate::session::SessionAuth;
use crate::state::AppState;

/// PUT /api/:collection/:id - Update a record from the JSON body
pub async fn put(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Extension(auth): Extension<SessionAuth>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::error!(collection = %collection, id = %id, error = %rejection.body_text(), "Rejected update request body");
        rejection
    })?;

    let record = state
        .backend
        .update(&auth.token, &collection, &id, &payload)
        .await
        .map_err(|err| {
            tracing::error!(collection = %collection, id = %id, status = ?err.status(), error = %err, "Error updating record in backend");
            err
        })?;

    tracing::info!(collection = %collection, id = %id, "Updated record");
    Ok(ApiResponse::success(record))
}

/// DELETE /api/:collection/:id - Delete a record
pub async fn delete(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Extension(auth): Extension<SessionAuth>,
) -> ApiResult<Value> {
    state
        .backend
        .delete(&auth.token, &collection, &id)
        .await
        .map_err(|err| {
            tracing::error!(collection = %collection, id = %id, status = ?err.status(), error = %err, "Error deleting record from backend");
            err
        })?;

    tracing::info!(collection = %collection, id = %id, "Deleted record");
    Ok(ApiResponse::success(json!({ "message": "Record deleted successfully." })))
}
