//! Route definitions for the preference store.

use axum::routing::get;
use axum::Router;

use crate::handlers::prefs;
use crate::state::AppState;

/// Preference routes mounted at `/prefs`.
///
/// ```text
/// GET    /        -> list_prefs
/// GET    /{key}   -> get_pref
/// PUT    /{key}   -> put_pref
/// DELETE /{key}   -> delete_pref
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(prefs::list_prefs)).route(
        "/{key}",
        get(prefs::get_pref)
            .put(prefs::put_pref)
            .delete(prefs::delete_pref),
    )
}
