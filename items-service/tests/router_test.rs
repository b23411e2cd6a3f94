mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::test_config;
use http_body_util::BodyExt;
use items_service::services::InMemoryStore;
use items_service::startup::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn router(store: Arc<InMemoryStore>) -> Router {
    build_router(AppState {
        config: test_config(),
        store,
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn post_creates_item_without_a_listener() {
    let store = Arc::new(InMemoryStore::new());

    let response = router(store.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/items")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title":"buy milk"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(StatusCode::CREATED, response.status());
    let body = json_body(response).await;
    assert_eq!(body["message"], "Item created!");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn unsupported_method_returns_405() {
    let response = router(Arc::new(InMemoryStore::new()))
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/items")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(StatusCode::METHOD_NOT_ALLOWED, response.status());
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let response = router(Arc::new(InMemoryStore::new()))
        .oneshot(
            Request::builder()
                .uri("/api/widgets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(StatusCode::NOT_FOUND, response.status());
}

#[tokio::test]
async fn error_envelope_is_json() {
    let response = router(Arc::new(InMemoryStore::new()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/items")
                .body(Body::from("null"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body = json_body(response).await;
    assert_eq!(body, serde_json::json!({"error": "Empty body"}));
}
