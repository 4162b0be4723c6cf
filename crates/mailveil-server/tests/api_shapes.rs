//! Response shapes and status codes of the HTTP API, driven through the
//! router without binding a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use mailveil_core::MailveilConfig;
use mailveil_server::{build_router, AppState};
use mailveil_store::MemoryStore;

fn app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = MailveilConfig::with_defaults(dir.path()).unwrap();
    let state = Arc::new(AppState::new(config, Arc::new(MemoryStore::new())));
    (build_router(state), dir)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_mask_response_shape() {
    let (app, _dir) = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/mask",
        Some(json!({ "text": "Contact John Smith at john.smith@example.com.", "id": "email_1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_id"], "email_1");
    assert_eq!(body["masked_text"], "Contact [PERSON_1] at [EMAIL_ADDRESS_2].");
    assert_eq!(body["entity_map"]["[PERSON_1]"], "John Smith");
    assert!(body["stats"]["masking_percentage"].is_number());
    assert_eq!(body["stats"]["total_entities_masked"], 2);
    assert_eq!(body["stats"]["entity_counts"]["PERSON"], 1);
    assert!(body["rejected"].is_array());
}

#[tokio::test]
async fn test_unmask_by_id_and_by_map() {
    let (app, _dir) = app();
    call(
        &app,
        Method::POST,
        "/api/mask",
        Some(json!({ "text": "Contact John Smith today.", "id": "doc" })),
    )
    .await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/unmask",
        Some(json!({ "text": "Hi [PERSON_1]", "id": "doc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original_text"], "Hi John Smith");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/unmask",
        Some(json!({ "text": "Hi [PERSON_1]", "entity_map": { "[PERSON_1]": "Jane Roe" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original_text"], "Hi Jane Roe");
}

#[tokio::test]
async fn test_unmask_error_statuses() {
    let (app, _dir) = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/unmask",
        Some(json!({ "text": "x", "id": "never_saved" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("never_saved"));

    let (status, _) = call(&app, Method::POST, "/api/unmask", Some(json!({ "text": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/unmask",
        Some(json!({ "text": "x", "id": "a/b" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collision_is_unprocessable() {
    let (app, _dir) = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/mask",
        Some(json!({ "text": "Contact John Smith about [PERSON_1]." })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_batch_shape() {
    let (app, _dir) = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/batch",
        Some(json!({ "documents": ["Dear Manisha,\nthanks", "Mail a.b@c.io"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["all_round_trip_ok"], true);
    assert_eq!(body["results"][0]["document_id"], "email_1");
    assert_eq!(body["results"][1]["document_id"], "email_2");
    assert!(body["results"][1]["round_trip_ok"].is_boolean());
    assert!(body["results"][1]["stats"].is_object());
}

#[tokio::test]
async fn test_preview_shape() {
    let (app, _dir) = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/preview",
        Some(json!({ "text": "Best Regards,\nJohn Doe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["protected"], json!(["Best Regards"]));
    let accepted = body["accepted"].as_array().unwrap();
    assert!(accepted.iter().any(|s| s["text"] == "John Doe" && s["label"] == "PERSON"));
    assert!(body["rejected"].is_array());
}

#[tokio::test]
async fn test_mapping_routes() {
    let (app, _dir) = app();
    call(
        &app,
        Method::POST,
        "/api/mask",
        Some(json!({ "text": "Contact John Smith today.", "id": "m1" })),
    )
    .await;

    let (status, body) = call(&app, Method::GET, "/api/mappings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ids"], json!(["m1"]));
    assert_eq!(body["backend"], "memory");

    let (status, body) = call(&app, Method::GET, "/api/mappings/m1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity_map"]["[PERSON_1]"], "John Smith");

    let (status, body) = call(&app, Method::GET, "/api/mappings/m1/table", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["rows"][0],
        json!({
            "placeholder": "[PERSON_1]",
            "entity_type": "PERSON",
            "original_value": "John Smith",
            "length": 10,
        })
    );

    let (status, body) = call(&app, Method::DELETE, "/api/mappings/m1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _) = call(&app, Method::GET, "/api/mappings/m1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_labels_and_server_info() {
    let (app, _dir) = app();
    let (status, body) = call(&app, Method::GET, "/api/labels", None).await;
    assert_eq!(status, StatusCode::OK);
    let labels = body["labels"].as_array().unwrap();
    assert!(labels
        .iter()
        .any(|l| l["label"] == "EMAIL_ADDRESS" && l["enabled"] == true));

    let (status, body) = call(&app, Method::GET, "/api/server-info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["port"], 3004);
    assert_eq!(body["store"], "memory");
    assert_eq!(body["rewrite_mode"], "substring_identity");
}
