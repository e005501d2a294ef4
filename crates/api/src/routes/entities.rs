//! Route definitions for entity lists and tag operations.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{entities, tags};
use crate::state::AppState;

/// Entity routes mounted at the `/api/v1` root.
///
/// `{kind}` is one of `hosts`, `triggers`, `items`; handlers validate the
/// segment. The static `/items/grouped` route wins over the `{kind}`
/// captures.
///
/// ```text
/// GET    /items/grouped            -> grouped_items
/// GET    /{kind}                   -> list_entities
/// GET    /{kind}/count             -> count_entities
/// GET    /{kind}/tags              -> list_tag_names
/// POST   /{kind}/tags/bulk         -> bulk_mutate
/// GET    /{kind}/{id}/tags         -> get_entity_tags
/// POST   /{kind}/{id}/tags         -> add_entity_tag
/// DELETE /{kind}/{id}/tags/{name}  -> remove_entity_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items/grouped", get(entities::grouped_items))
        .route("/{kind}", get(entities::list_entities))
        .route("/{kind}/count", get(entities::count_entities))
        .route("/{kind}/tags", get(tags::list_tag_names))
        .route("/{kind}/tags/bulk", post(tags::bulk_mutate))
        .route(
            "/{kind}/{id}/tags",
            get(tags::get_entity_tags).post(tags::add_entity_tag),
        )
        .route("/{kind}/{id}/tags/{name}", delete(tags::remove_entity_tag))
}
