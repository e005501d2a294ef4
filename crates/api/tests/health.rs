mod common;

use axum::body::Body;
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use axum::http::{Method, Request, StatusCode};
use tower::ServiceExt;

use common::{body_json, get, harness};

#[tokio::test]
async fn health_reports_ok_with_zabbix_version() {
    let harness = harness().await;

    let response = get(harness.app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["zabbix_healthy"], true);
    assert_eq!(body["zabbix_version"], "7.0.0");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let harness = harness().await;

    let response = get(harness.app, "/api/v1/nope/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let harness = harness().await;

    let response = get(harness.app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .expect("header is ascii");
    // UUIDs are 36 characters with hyphens.
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let harness = harness().await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/hosts")
        .header(ORIGIN, "http://localhost:5173")
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .expect("build request");
    let response = harness.app.oneshot(request).await.expect("send request");

    assert_eq!(
        response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("allow-origin header"),
        "http://localhost:5173"
    );
}
