pub mod entities;
pub mod health;
pub mod prefs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /{kind}                      GET    list entities (hosts | triggers | items)
/// /{kind}/count                GET    entity count
/// /{kind}/tags                 GET    distinct tag names
/// /{kind}/tags/bulk            POST   bulk add/remove one tag
/// /{kind}/{id}/tags            GET    one entity's tags
/// /{kind}/{id}/tags            POST   add a tag to one entity
/// /{kind}/{id}/tags/{name}     DELETE remove a tag from one entity
///
/// /items/grouped               GET    items grouped by key, with host roster
///
/// /prefs                       GET    all stored preferences
/// /prefs/{key}                 GET, PUT, DELETE one preference
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Entity lists and tag operations, keyed by kind.
        .merge(entities::router())
        // Persisted UI preferences.
        .nest("/prefs", prefs::router())
}
