use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the Zabbix API answered the version probe.
    pub zabbix_healthy: bool,
    /// Remote Zabbix version, when reachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zabbix_version: Option<String>,
}

/// GET /health -- returns service and Zabbix reachability.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let zabbix_version = match state.zabbix.ping().await {
        Ok(version) => Some(version),
        Err(error) => {
            tracing::warn!(%error, "Zabbix version probe failed");
            None
        }
    };

    let zabbix_healthy = zabbix_version.is_some();
    let status = if zabbix_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        zabbix_healthy,
        zabbix_version,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
