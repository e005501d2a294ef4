//! JSON-RPC client for a Zabbix monitoring server.
//!
//! Everything the tag manager needs from the remote API lives here:
//!
//! - `client`: the JSON-RPC 2.0 transport and typed entity fetches
//! - `models`: wire-shaped rows as the server returns them
//! - `tags`: single-entity tag mutations and the sequential bulk loops
//! - `grouping`: collapsing template-derived items into one row per key

pub mod client;
pub mod error;
pub mod grouping;
pub mod models;
pub mod tags;

pub use client::{ZabbixClient, ZabbixConfig};
pub use error::ZabbixError;
pub use tags::MutationOutcome;
