//! Bulk tag-operation primitives.
//!
//! Wire shapes for the bulk endpoint, id-list parsing, per-chunk outcome
//! accounting, and the user-facing confirmation/summary text. The engine
//! crate drives these over HTTP; the API crate validates and serves them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entity::{tag_label, validate_tag_input, EntityKind};
use crate::error::CoreError;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Hard cap on ids accepted by one bulk operation (server-side guard).
pub const MAX_BULK_IDS: usize = 1000;

// ---------------------------------------------------------------------------
// Operation kind
// ---------------------------------------------------------------------------

/// Direction of a bulk tag operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkKind {
    Add,
    Remove,
}

impl BulkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(CoreError::Validation(format!(
                "Invalid operation '{other}'. Must be 'add' or 'remove'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Id-list parsing
// ---------------------------------------------------------------------------

/// Parse a wire id list into entity ids.
///
/// Accepts JSON numbers and strings; string entries may be comma-joined
/// groups, which is how grouped item rows submit their member ids.
/// Duplicates keep their first occurrence, preserving order.
pub fn parse_id_list(raw: &[serde_json::Value]) -> Result<Vec<EntityId>, CoreError> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for value in raw {
        match value {
            serde_json::Value::Number(n) => {
                let id = n
                    .as_i64()
                    .ok_or_else(|| CoreError::Validation(format!("Invalid id '{n}'")))?;
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            serde_json::Value::String(s) => {
                for part in s.split(',') {
                    let part = part.trim();
                    if part.is_empty() {
                        continue;
                    }
                    let id: EntityId = part
                        .parse()
                        .map_err(|_| CoreError::Validation(format!("Invalid id '{part}'")))?;
                    if seen.insert(id) {
                        ids.push(id);
                    }
                }
            }
            other => {
                return Err(CoreError::Validation(format!("Invalid id value: {other}")));
            }
        }
    }

    Ok(ids)
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Bulk request body as carried on the wire.
///
/// The id-list field name varies by kind (`host_ids`, `trigger_ids`,
/// `item_ids`); exactly one of them is expected to be populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkRequestBody {
    pub operation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_ids: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger_ids: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_ids: Vec<serde_json::Value>,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub value: String,
}

impl BulkRequestBody {
    /// Build a body for one kind with the ids in that kind's field.
    pub fn new(
        kind: EntityKind,
        operation: BulkKind,
        ids: &[EntityId],
        tag: &str,
        value: &str,
    ) -> Self {
        let raw: Vec<serde_json::Value> =
            ids.iter().map(|&id| serde_json::Value::from(id)).collect();
        let mut body = Self {
            operation: operation.as_str().to_string(),
            tag: tag.to_string(),
            value: value.to_string(),
            ..Self::default()
        };
        match kind {
            EntityKind::Host => body.host_ids = raw,
            EntityKind::Trigger => body.trigger_ids = raw,
            EntityKind::Item => body.item_ids = raw,
        }
        body
    }

    /// The raw id list for `kind`.
    pub fn ids_for(&self, kind: EntityKind) -> &[serde_json::Value] {
        match kind {
            EntityKind::Host => &self.host_ids,
            EntityKind::Trigger => &self.trigger_ids,
            EntityKind::Item => &self.item_ids,
        }
    }

    /// Validate and normalise into a typed request: operation and tag rules
    /// are checked, ids parsed and de-duplicated, and both text inputs
    /// trimmed. An empty id list is rejected before any network use.
    pub fn into_request(self, kind: EntityKind) -> Result<BulkRequest, CoreError> {
        let operation = BulkKind::parse(&self.operation)?;
        let tag = self.tag.trim().to_string();
        let value = self.value.trim().to_string();
        validate_tag_input(&tag, &value)?;

        let ids = parse_id_list(self.ids_for(kind))?;
        if ids.is_empty() {
            return Err(CoreError::Validation(format!(
                "No {} selected",
                kind.noun_plural()
            )));
        }

        Ok(BulkRequest {
            kind,
            operation,
            ids,
            tag,
            value,
        })
    }
}

/// A validated bulk request ready for chunking.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    pub kind: EntityKind,
    pub operation: BulkKind,
    pub ids: Vec<EntityId>,
    pub tag: String,
    pub value: String,
}

impl BulkRequest {
    /// Wire body for one chunk of the ids.
    pub fn chunk_body(&self, chunk: &[EntityId]) -> BulkRequestBody {
        BulkRequestBody::new(self.kind, self.operation, chunk, &self.tag, &self.value)
    }
}

/// Per-operation counts reported by the bulk endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkDetails {
    pub success_count: usize,
    pub failed_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_items: Vec<EntityId>,
}

/// Bulk endpoint response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BulkDetails>,
}

// ---------------------------------------------------------------------------
// Outcome accounting
// ---------------------------------------------------------------------------

/// Running success/failure tally across chunks.
///
/// `processed() == succeeded + failed` at every observation point, and the
/// counts only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkCounts {
    pub succeeded: usize,
    pub failed: usize,
}

impl BulkCounts {
    /// Rows with a recorded outcome so far.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Fold one chunk's response into the tally. Detailed counts win when
    /// present and are trusted even if they do not sum to the chunk size;
    /// otherwise the top-level flag decides the whole chunk.
    pub fn record_response(&mut self, chunk_len: usize, response: &BulkResponse) {
        match &response.details {
            Some(details) => {
                self.succeeded += details.success_count;
                self.failed += details.failed_count;
            }
            None if response.success => self.succeeded += chunk_len,
            None => self.failed += chunk_len,
        }
    }

    /// Fold a transport-level failure (network error or malformed body):
    /// the whole chunk counts as failed.
    pub fn record_transport_failure(&mut self, chunk_len: usize) {
        self.failed += chunk_len;
    }
}

/// Number of requests needed for `total` ids at `chunk_size` per request.
pub fn chunk_count(total: usize, chunk_size: usize) -> usize {
    total.div_ceil(chunk_size.max(1))
}

// ---------------------------------------------------------------------------
// User-facing text
// ---------------------------------------------------------------------------

fn counted_noun(kind: EntityKind, count: usize) -> String {
    if count == 1 {
        format!("1 {}", kind.noun())
    } else {
        format!("{count} {}", kind.noun_plural())
    }
}

/// Confirmation prompt shown before a bulk run starts.
pub fn confirmation_message(
    operation: BulkKind,
    kind: EntityKind,
    tag: &str,
    value: &str,
    count: usize,
) -> String {
    match operation {
        BulkKind::Add => format!(
            "Are you sure you want to add tag \"{}\" to {}?",
            tag_label(tag, value),
            counted_noun(kind, count)
        ),
        BulkKind::Remove => format!(
            "Are you sure you want to remove tag \"{tag}\" from {}?",
            counted_noun(kind, count)
        ),
    }
}

/// Result line for a finished or cancelled run.
pub fn summary_message(
    operation: BulkKind,
    kind: EntityKind,
    counts: BulkCounts,
    total: usize,
    cancelled: bool,
) -> String {
    if cancelled {
        return format!(
            "Operation cancelled after {} of {}: {} succeeded, {} failed",
            counts.processed(),
            counted_noun(kind, total),
            counts.succeeded,
            counts.failed
        );
    }

    let verb = match operation {
        BulkKind::Add => "added to",
        BulkKind::Remove => "removed from",
    };
    let mut message = format!("Tag {verb} {}", counted_noun(kind, counts.succeeded));
    if counts.failed > 0 {
        message.push_str(&format!(
            " ({} failed - likely discovered/read-only)",
            counts.failed
        ));
    }
    message
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
