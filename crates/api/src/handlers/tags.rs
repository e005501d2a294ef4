//! Handlers for tag reads and mutations.
//!
//! Single-entity mutations answer with `{success, message}`; the bulk
//! endpoint answers with the full accounting envelope the chunked
//! submission clients consume.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tagsweep_core::bulk::{summary_message, BulkCounts, BulkKind, BulkRequestBody, BulkResponse};
use tagsweep_core::entity::EntityKind;
use tagsweep_core::prefs;
use tagsweep_core::types::EntityId;
use tagsweep_zabbix::tags;

use crate::error::AppResult;
use crate::response::{DataResponse, MutationResponse};
use crate::state::AppState;

/// Body of a single-tag add.
#[derive(Debug, Deserialize)]
pub struct TagBody {
    pub tag: String,
    #[serde(default)]
    pub value: String,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/{kind}/tags
///
/// Distinct tag names across every entity of the kind, sorted.
pub async fn list_tag_names(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<impl IntoResponse> {
    let kind = EntityKind::from_plural(&kind)?;
    let names = tags::all_tag_names(&state.zabbix, kind).await?;

    Ok(Json(DataResponse { data: names }))
}

/// GET /api/v1/{kind}/{id}/tags
///
/// The current tags of one entity.
pub async fn get_entity_tags(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let kind = EntityKind::from_plural(&kind)?;
    let entity_tags = tags::get_tags(&state.zabbix, kind, id).await?;

    Ok(Json(DataResponse { data: entity_tags }))
}

// ---------------------------------------------------------------------------
// Single-entity mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/{kind}/{id}/tags
///
/// Add a tag to one entity. An existing tag with the same name has its
/// value overwritten.
pub async fn add_entity_tag(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, EntityId)>,
    Json(input): Json<TagBody>,
) -> AppResult<impl IntoResponse> {
    let kind = EntityKind::from_plural(&kind)?;
    let name = input.tag.trim();
    let value = input.value.trim();

    tags::add_tag(&state.zabbix, kind, id, name, value).await?;
    tracing::info!(kind = kind.noun(), id, tag = name, "Tag added");

    Ok(Json(MutationResponse::ok("Tag has been added")))
}

/// DELETE /api/v1/{kind}/{id}/tags/{name}
///
/// Remove a tag by name. Naming a tag the entity does not carry is a 404.
pub async fn remove_entity_tag(
    State(state): State<AppState>,
    Path((kind, id, name)): Path<(String, EntityId, String)>,
) -> AppResult<impl IntoResponse> {
    let kind = EntityKind::from_plural(&kind)?;

    tags::remove_tag(&state.zabbix, kind, id, &name).await?;
    tracing::info!(kind = kind.noun(), id, tag = %name, "Tag removed");

    Ok(Json(MutationResponse::ok("Tag has been removed")))
}

// ---------------------------------------------------------------------------
// Bulk mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/{kind}/tags/bulk
///
/// Add or remove one tag across many entities in a single sequential
/// pass. Individual failures (discovered or read-only entities) are
/// counted and reported in `details`, not raised.
pub async fn bulk_mutate(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<BulkRequestBody>,
) -> AppResult<impl IntoResponse> {
    let kind = EntityKind::from_plural(&kind)?;
    let request = body.into_request(kind)?;
    tracing::info!(
        kind = kind.noun(),
        operation = request.operation.as_str(),
        ids = request.ids.len(),
        tag = %request.tag,
        "Bulk operation requested"
    );

    let outcome = match request.operation {
        BulkKind::Add => {
            tags::bulk_add(
                &state.zabbix,
                kind,
                &request.ids,
                &request.tag,
                &request.value,
            )
            .await
        }
        BulkKind::Remove => tags::bulk_remove(&state.zabbix, kind, &request.ids, &request.tag).await,
    };

    // Remember the submitted inputs so the next session restores them. The
    // run itself already happened; a store failure only warns.
    if let Err(error) = prefs::remember_bulk_tag(&state.prefs, &request.tag, &request.value) {
        tracing::warn!(error = %error, "Failed to store bulk tag inputs");
    }

    let counts = BulkCounts {
        succeeded: outcome.succeeded,
        failed: outcome.failed,
    };
    let message = summary_message(request.operation, kind, counts, request.ids.len(), false);
    tracing::info!(
        kind = kind.noun(),
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        "Bulk operation finished"
    );

    Ok(Json(BulkResponse {
        success: true,
        message: Some(message),
        details: Some(outcome.into()),
    }))
}
