//! Handlers for the entity list pages.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tagsweep_core::entity::{Entity, EntityKind};
use tagsweep_core::pagination::DEFAULT_PER_PAGE;
use tagsweep_zabbix::grouping::{self, ItemGroup};
use tagsweep_zabbix::models::HostRef;

use crate::error::AppResult;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// List payload: the rows plus what a client needs to page them.
#[derive(Serialize)]
pub struct EntityList {
    pub entities: Vec<Entity>,
    pub total: usize,
    pub per_page: usize,
}

/// Grouped item payload, one row per item key.
#[derive(Serialize)]
pub struct GroupedItemList {
    pub items: Vec<ItemGroup>,
    /// Every host seen across the items, for the host filter dropdown.
    pub all_hosts: Vec<HostRef>,
    pub total: usize,
    pub per_page: usize,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// GET /api/v1/{kind}
///
/// List all entities of one kind with their tags.
pub async fn list_entities(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let kind = EntityKind::from_plural(&kind)?;
    let entities = state
        .zabbix
        .fetch_entities(kind, params.limit, params.offset)
        .await?;

    let total = entities.len();
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);
    Ok(Json(DataResponse {
        data: EntityList {
            entities,
            total,
            per_page,
        },
    }))
}

/// GET /api/v1/{kind}/count
///
/// Count entities of one kind without fetching rows.
pub async fn count_entities(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<impl IntoResponse> {
    let kind = EntityKind::from_plural(&kind)?;
    let count = state.zabbix.fetch_count(kind).await?;

    Ok(Json(DataResponse {
        data: CountResponse { count },
    }))
}

/// GET /api/v1/items/grouped
///
/// Monitored items grouped by key: one row per key with the member item
/// ids kept alongside, plus the host roster for the filter dropdown.
pub async fn grouped_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let items = state.zabbix.fetch_items(params.limit, params.offset).await?;
    let raw_count = items.len();
    let grouped = grouping::group_items(items);
    tracing::debug!(
        raw = raw_count,
        grouped = grouped.groups.len(),
        "Grouped items by key"
    );

    let total = grouped.groups.len();
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);
    Ok(Json(DataResponse {
        data: GroupedItemList {
            items: grouped.groups,
            all_hosts: grouped.all_hosts,
            total,
            per_page,
        },
    }))
}
