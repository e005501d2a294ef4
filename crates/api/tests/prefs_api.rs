mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, delete, get, harness, put_json};

#[tokio::test]
async fn put_then_get_roundtrips() {
    let harness = harness().await;

    let response = put_json(
        harness.app.clone(),
        "/api/v1/prefs/last_bulk_tag",
        json!({"tag": "env", "value": "prod"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], json!({"tag": "env", "value": "prod"}));

    let body = body_json(get(harness.app, "/api/v1/prefs/last_bulk_tag").await).await;
    assert_eq!(body["data"], json!({"tag": "env", "value": "prod"}));
}

#[tokio::test]
async fn list_returns_every_key() {
    let harness = harness().await;

    put_json(harness.app.clone(), "/api/v1/prefs/per_page", json!(50)).await;
    put_json(harness.app.clone(), "/api/v1/prefs/theme", json!("dark")).await;

    let body = body_json(get(harness.app, "/api/v1/prefs").await).await;
    assert_eq!(body["data"], json!({"per_page": 50, "theme": "dark"}));
}

#[tokio::test]
async fn overwriting_a_key_replaces_the_value() {
    let harness = harness().await;

    put_json(harness.app.clone(), "/api/v1/prefs/theme", json!("dark")).await;
    put_json(harness.app.clone(), "/api/v1/prefs/theme", json!("light")).await;

    let body = body_json(get(harness.app, "/api/v1/prefs/theme").await).await;
    assert_eq!(body["data"], "light");
}

#[tokio::test]
async fn get_of_missing_key_is_404() {
    let harness = harness().await;

    let response = get(harness.app, "/api/v1/prefs/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "Preference 'nope' not found");
}

#[tokio::test]
async fn delete_removes_the_key() {
    let harness = harness().await;

    put_json(harness.app.clone(), "/api/v1/prefs/theme", json!("dark")).await;

    let response = delete(harness.app.clone(), "/api/v1/prefs/theme").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(harness.app, "/api/v1/prefs/theme").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_missing_key_is_404() {
    let harness = harness().await;

    let response = delete(harness.app, "/api/v1/prefs/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_key_is_rejected() {
    let harness = harness().await;

    let response = put_json(harness.app, "/api/v1/prefs/%20", json!("x")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Preference key cannot be empty");
}
