//! Error type for the bulk engine.

use tagsweep_core::error::CoreError;

/// Errors surfaced by [`crate::BulkRunner`] and the endpoints it drives.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A run was requested while another run on the same runner was still
    /// in progress.
    #[error("A bulk operation is already in progress")]
    OperationInFlight,

    /// The HTTP request to the bulk endpoint failed outright.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The bulk endpoint answered with a non-success HTTP status.
    #[error("Bulk endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Validation or parsing failure before any chunk was submitted.
    #[error(transparent)]
    Core(#[from] CoreError),
}
