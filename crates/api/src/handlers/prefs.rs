//! Handlers for the preference store.
//!
//! Small key/value knobs the UI persists between sessions, like the last
//! bulk tag name and value.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tagsweep_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/prefs
///
/// Every stored preference as one object.
pub async fn list_prefs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let values: BTreeMap<String, serde_json::Value> = state
        .prefs
        .keys()
        .into_iter()
        .filter_map(|key| state.prefs.get(&key).map(|value| (key, value)))
        .collect();

    Ok(Json(DataResponse { data: values }))
}

/// GET /api/v1/prefs/{key}
pub async fn get_pref(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let value = state
        .prefs
        .get(&key)
        .ok_or_else(|| AppError::NotFound(format!("Preference '{key}' not found")))?;

    Ok(Json(DataResponse { data: value }))
}

/// PUT /api/v1/prefs/{key}
///
/// Store one preference value. The body is the raw JSON value.
pub async fn put_pref(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    if key.trim().is_empty() {
        return Err(CoreError::Validation("Preference key cannot be empty".to_string()).into());
    }

    state.prefs.set(&key, value.clone())?;
    tracing::debug!(key = %key, "Preference stored");

    Ok(Json(DataResponse { data: value }))
}

/// DELETE /api/v1/prefs/{key}
pub async fn delete_pref(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let removed = state.prefs.remove(&key)?;
    if !removed {
        return Err(AppError::NotFound(format!("Preference '{key}' not found")));
    }
    tracing::debug!(key = %key, "Preference removed");

    Ok(StatusCode::NO_CONTENT)
}
