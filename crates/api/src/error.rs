use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tagsweep_core::error::CoreError;
use tagsweep_zabbix::ZabbixError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ZabbixError`] for upstream
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tagsweep_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure from the Zabbix client layer.
    #[error(transparent)]
    Zabbix(#[from] ZabbixError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource identified by something other than a numeric id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Zabbix(err) => classify_zabbix_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(error: &CoreError) -> (StatusCode, &'static str, String) {
    match error {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Map Zabbix client failures onto HTTP responses. Transport and protocol
/// failures surface as 502; remote API error text passes through unchanged.
fn classify_zabbix_error(error: &ZabbixError) -> (StatusCode, &'static str, String) {
    match error {
        ZabbixError::Request(err) => {
            tracing::warn!(error = %err, "Zabbix unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "ZABBIX_UNREACHABLE",
                "Cannot connect to Zabbix API".to_string(),
            )
        }
        ZabbixError::Http { status, .. } => (
            StatusCode::BAD_GATEWAY,
            "ZABBIX_HTTP_ERROR",
            format!("Zabbix returned HTTP {status}"),
        ),
        ZabbixError::Api { message, .. } => (
            StatusCode::BAD_GATEWAY,
            "ZABBIX_API_ERROR",
            message.clone(),
        ),
        ZabbixError::Malformed(msg) => {
            tracing::error!(error = %msg, "Malformed Zabbix response");
            (
                StatusCode::BAD_GATEWAY,
                "ZABBIX_BAD_RESPONSE",
                "Zabbix returned an unexpected response".to_string(),
            )
        }
        ZabbixError::TagNotFound { name, .. } => (
            StatusCode::NOT_FOUND,
            "TAG_NOT_FOUND",
            format!("Tag '{name}' does not exist"),
        ),
        ZabbixError::Core(core) => classify_core_error(core),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn validation_maps_to_400() {
        let error = AppError::Core(CoreError::Validation("Tag name cannot be empty".into()));
        assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let error = AppError::Core(CoreError::NotFound {
            entity: "Host",
            id: 7,
        });
        assert_eq!(status_of(error), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_tag_maps_to_404() {
        let error = AppError::Zabbix(ZabbixError::TagNotFound {
            kind: "host",
            name: "env".into(),
            id: 7,
        });
        assert_eq!(status_of(error), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_api_error_maps_to_502() {
        let error = AppError::Zabbix(ZabbixError::Api {
            code: -32500,
            message: "No permissions".into(),
        });
        assert_eq!(status_of(error), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn nested_core_error_keeps_its_status() {
        let error = AppError::Zabbix(ZabbixError::Core(CoreError::NotFound {
            entity: "Item",
            id: 3,
        }));
        assert_eq!(status_of(error), StatusCode::NOT_FOUND);
    }
}
