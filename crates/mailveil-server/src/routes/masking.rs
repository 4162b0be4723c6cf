//! Mask, unmask, batch and preview routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;
use mailveil_core::EntityMap;
use mailveil_engine::{MaskOutcome, Preview, UnmaskOutcome};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/mask", post(mask))
        .route("/unmask", post(unmask))
        .route("/batch", post(batch))
        .route("/preview", post(preview))
}

#[derive(Deserialize)]
struct MaskBody {
    text: String,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Deserialize)]
struct UnmaskBody {
    text: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    entity_map: Option<EntityMap>,
}

#[derive(Deserialize)]
struct BatchBody {
    documents: Vec<String>,
}

#[derive(Deserialize)]
struct PreviewBody {
    text: String,
}

/// POST /api/mask: mask a document and store its mapping.
async fn mask(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MaskBody>,
) -> ApiResult<Json<MaskOutcome>> {
    let outcome = tokio::task::spawn_blocking(move || {
        state.engine.mask(&body.text, body.id.as_deref())
    })
    .await??;
    Ok(Json(outcome))
}

/// POST /api/unmask: restore text from a supplied or stored mapping.
async fn unmask(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UnmaskBody>,
) -> ApiResult<Json<UnmaskOutcome>> {
    let outcome = tokio::task::spawn_blocking(move || {
        state
            .engine
            .unmask(&body.text, body.id.as_deref(), body.entity_map)
    })
    .await??;
    Ok(Json(outcome))
}

/// POST /api/batch: mask and unmask each document, reporting round trips.
async fn batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let items = tokio::task::spawn_blocking(move || {
        state.engine.batch_mask_unmask(&body.documents)
    })
    .await??;
    let all_ok = items.iter().all(|i| i.round_trip_ok);
    Ok(Json(serde_json::json!({
        "results": items,
        "count": items.len(),
        "all_round_trip_ok": all_ok,
    })))
}

/// POST /api/preview: detected spans without masking.
async fn preview(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PreviewBody>,
) -> ApiResult<Json<Preview>> {
    let preview = tokio::task::spawn_blocking(move || state.engine.preview(&body.text)).await??;
    Ok(Json(preview))
}
