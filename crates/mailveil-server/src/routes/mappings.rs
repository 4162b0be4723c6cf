//! Stored mapping routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiResult;
use crate::state::AppState;
use mailveil_core::DocumentId;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/mappings", get(list_mappings))
        .route("/mappings/{id}", get(get_mapping).delete(delete_mapping))
        .route("/mappings/{id}/table", get(mapping_table))
}

/// GET /api/mappings
async fn list_mappings(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let backend = state.store().backend_name();
    let ids = tokio::task::spawn_blocking(move || state.store().list_ids()).await??;
    Ok(Json(serde_json::json!({
        "ids": ids,
        "count": ids.len(),
        "backend": backend,
    })))
}

/// GET /api/mappings/{id}
async fn get_mapping(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = DocumentId::new(id)?;
    let (id, map) = tokio::task::spawn_blocking(move || {
        let map = state.store().load(&id)?;
        Ok::<_, mailveil_core::Error>((id, map))
    })
    .await??;
    Ok(Json(serde_json::json!({
        "document_id": id,
        "entity_map": map,
        "count": map.len(),
    })))
}

/// DELETE /api/mappings/{id}
async fn delete_mapping(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = DocumentId::new(id)?;
    let (id, deleted) = tokio::task::spawn_blocking(move || {
        let deleted = state.store().delete(&id)?;
        Ok::<_, mailveil_core::Error>((id, deleted))
    })
    .await??;
    Ok(Json(serde_json::json!({ "deleted": deleted, "document_id": id })))
}

/// GET /api/mappings/{id}/table: placeholder, type, value, length rows.
async fn mapping_table(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = DocumentId::new(id)?;
    let (id, rows) = tokio::task::spawn_blocking(move || {
        let rows = state.store().load(&id)?.rows();
        Ok::<_, mailveil_core::Error>((id, rows))
    })
    .await??;
    Ok(Json(serde_json::json!({ "document_id": id, "rows": rows })))
}
