//! Domain model for the monitoring tag manager.
//!
//! Pure, dependency-injected state for entity list views (filtering,
//! selection, pagination), bulk tag-operation primitives, and the small
//! file-backed preference store:
//!
//! - [`Entity`] / [`Tag`] / [`EntityKind`]: the monitored-object model.
//! - [`ListView`]: composed per-page state with eager derivations.
//! - [`bulk`]: wire shapes, id parsing, and outcome accounting for bulk
//!   tag operations.
//! - [`prefs::PrefStore`]: namespaced key/value persistence for UI inputs.
//!
//! Nothing in this crate performs network I/O; the client, engine, and
//! server crates build on these types.

pub mod bulk;
pub mod entity;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod prefs;
pub mod selection;
pub mod types;
pub mod view;

pub use entity::{Entity, EntityKind, Tag};
pub use error::CoreError;
pub use types::EntityId;
pub use view::ListView;
