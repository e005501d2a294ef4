//! Chunked bulk-mutation engine.
//!
//! Drives one bulk tag operation against a bulk endpoint: the id list is
//! split into fixed-size chunks, chunks are submitted sequentially with a
//! pause between them, progress fans out over a broadcast bus, and a
//! cancellation token can stop the run at any chunk boundary. Work already
//! submitted stays submitted; cancellation never rolls anything back.

pub mod endpoint;
pub mod error;
pub mod events;
pub mod policy;
pub mod runner;

pub use endpoint::{BulkEndpoint, HttpBulkEndpoint};
pub use error::EngineError;
pub use events::{BulkEvent, ProgressBus};
pub use policy::ChunkPolicy;
pub use runner::{BulkPlan, BulkRunner, BulkSummary};
