//! Error type for the remote API layer.

use tagsweep_core::error::CoreError;
use tagsweep_core::types::EntityId;

/// Errors produced while talking to the Zabbix server.
#[derive(Debug, thiserror::Error)]
pub enum ZabbixError {
    /// The HTTP request itself failed (connect, DNS, TLS, timeout).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("Zabbix returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The server answered with a JSON-RPC error object. `message` carries
    /// the error's `data` field when present, which is where Zabbix puts
    /// the useful text.
    #[error("Zabbix API error {code}: {message}")]
    Api { code: i64, message: String },

    /// A 200 response whose body does not match the JSON-RPC envelope.
    #[error("Malformed Zabbix response: {0}")]
    Malformed(String),

    /// A tag removal that named a tag the entity does not carry.
    #[error("Tag '{name}' not found on {kind} {id}")]
    TagNotFound {
        kind: &'static str,
        name: String,
        id: EntityId,
    },

    /// A domain-level failure raised before or after the wire call.
    #[error(transparent)]
    Core(#[from] CoreError),
}
