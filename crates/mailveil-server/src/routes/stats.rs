//! Label and server info routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/labels", get(get_labels))
        .route("/server-info", get(get_server_info))
}

/// GET /api/labels: known labels and whether each is masked.
async fn get_labels(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let registry = state.engine.registry();
    let labels: Vec<_> = registry
        .labels()
        .iter()
        .map(|l| serde_json::json!({ "label": l, "enabled": registry.is_enabled(l) }))
        .collect();
    Json(serde_json::json!({ "labels": labels, "count": labels.len() }))
}

/// GET /api/server-info
async fn get_server_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "mailveil",
        "version": env!("CARGO_PKG_VERSION"),
        "port": state.config.port,
        "store": state.store().backend_name(),
        "rewrite_mode": state.engine.rewrite_mode(),
        "parallel_detection": state.config.parallel_detection,
        "started_at": state.started_at,
        "platform": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
    }))
}
