//! Integration tests for the history document endpoint

use axum::http::StatusCode;
use serde_json::json;

#[path = "test_utils/mod.rs"]
mod test_utils;

use test_utils::{TestApp, body_json, get, json_request};

#[tokio::test]
async fn get_before_any_post_returns_empty_array() {
    let app = TestApp::new().await.unwrap();

    let response = app.send(get("/api/history")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn post_then_get_returns_the_document() {
    let app = TestApp::new().await.unwrap();

    let response = app
        .send(json_request("POST", "/api/history", None, &json!({"a": 1})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"success": true}));

    let response = app.send(get("/api/history")).await;
    assert_eq!(body_json(response).await, json!({"a": 1}));

    let raw = std::fs::read_to_string(&app.config.history_file).unwrap();
    assert_eq!(raw, "{\n  \"a\": 1\n}");
}

#[tokio::test]
async fn invalid_json_body_is_rejected() {
    let app = TestApp::new().await.unwrap();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/history")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(app.send(get("/api/history")).await).await,
        json!([])
    );
}
