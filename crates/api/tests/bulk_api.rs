mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, get, harness, item_fixture, post_json};

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_add_updates_every_host() {
    let harness = harness().await;

    let response = post_json(
        harness.app.clone(),
        "/api/v1/hosts/tags/bulk",
        json!({"operation": "add", "host_ids": [1, 2], "tag": "canary", "value": "on"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Tag added to 2 hosts");
    assert_eq!(body["details"]["success_count"], 2);
    assert_eq!(body["details"]["failed_count"], 0);

    assert_eq!(harness.zabbix.calls_for("host.update").len(), 2);

    // The submitted inputs are remembered for the next session.
    let body = body_json(get(harness.app, "/api/v1/prefs/bulk_tag_name").await).await;
    assert_eq!(body["data"], "canary");
}

#[tokio::test]
async fn bulk_add_counts_per_host_failures() {
    let harness = harness().await;
    harness.zabbix.fail_update(3);

    let response = post_json(
        harness.app,
        "/api/v1/hosts/tags/bulk",
        json!({"operation": "add", "host_ids": [1, 2, 3], "tag": "canary", "value": "on"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Tag added to 2 hosts (1 failed - likely discovered/read-only)"
    );
    assert_eq!(body["details"]["success_count"], 2);
    assert_eq!(body["details"]["failed_count"], 1);
    assert_eq!(body["details"]["failed_items"], json!([3]));
}

#[tokio::test]
async fn bulk_remove_skips_hosts_without_the_tag() {
    let harness = harness().await;

    let response = post_json(
        harness.app,
        "/api/v1/hosts/tags/bulk",
        json!({"operation": "remove", "host_ids": [1, 3], "tag": "env"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Tag removed from 1 host (1 failed - likely discovered/read-only)"
    );
    assert_eq!(body["details"]["failed_items"], json!([3]));

    // Only the host that carried the tag was written.
    assert_eq!(harness.zabbix.calls_for("host.update").len(), 1);
}

#[tokio::test]
async fn grouped_item_ids_are_split_and_deduplicated() {
    let harness = harness().await;
    harness.zabbix.seed(
        "item",
        vec![
            item_fixture(11, "CPU load", "system.cpu.load", (1, "web-01"), &[]),
            item_fixture(12, "CPU load", "system.cpu.load", (2, "web-02"), &[]),
        ],
    );

    let response = post_json(
        harness.app,
        "/api/v1/items/tags/bulk",
        json!({"operation": "add", "item_ids": ["11,12", "12"], "tag": "perf"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Tag added to 2 items");
    assert_eq!(harness.zabbix.calls_for("item.update").len(), 2);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_without_a_tag_is_rejected() {
    let harness = harness().await;

    let response = post_json(
        harness.app.clone(),
        "/api/v1/hosts/tags/bulk",
        json!({"operation": "add", "host_ids": [1]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Tag name cannot be empty");

    assert!(harness.zabbix.calls_for("host.update").is_empty());
}

#[tokio::test]
async fn bulk_with_no_selection_is_rejected() {
    let harness = harness().await;

    let response = post_json(
        harness.app,
        "/api/v1/hosts/tags/bulk",
        json!({"operation": "add", "tag": "env"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No hosts selected");
}

#[tokio::test]
async fn bulk_with_unknown_operation_is_rejected() {
    let harness = harness().await;

    let response = post_json(
        harness.app,
        "/api/v1/hosts/tags/bulk",
        json!({"operation": "rename", "host_ids": [1], "tag": "env"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid operation 'rename'. Must be 'add' or 'remove'");
}
