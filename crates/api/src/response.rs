//! Shared response envelope types for API handlers.
//!
//! Resource reads use a `{ "data": ... }` envelope via [`DataResponse`].
//! Mutations answer with [`MutationResponse`], whose `{success, message}`
//! shape is what the bulk submission clients consume.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Result envelope for single-tag mutations.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MutationResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
