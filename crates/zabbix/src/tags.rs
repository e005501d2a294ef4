//! Tag mutations: single-entity add/remove and the sequential bulk loops.
//!
//! Mutations follow the server's update model: fetch the entity's current
//! tag list, rewrite it locally, push the whole list back through the
//! kind's update method. Tags serialise as bare `{tag, value}` pairs, so
//! read-only fields the server attaches (like `automatic`) never travel
//! back.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::json;
use tagsweep_core::bulk::{BulkDetails, MAX_BULK_IDS};
use tagsweep_core::entity::{validate_tag_input, EntityKind, Tag};
use tagsweep_core::error::CoreError;
use tagsweep_core::types::EntityId;

use crate::client::ZabbixClient;
use crate::error::ZabbixError;
use crate::models::TaggedObject;

// ---------------------------------------------------------------------------
// Single-entity mutations
// ---------------------------------------------------------------------------

/// Fetch the current tags of one entity.
pub async fn get_tags(
    client: &ZabbixClient,
    kind: EntityKind,
    id: EntityId,
) -> Result<Vec<Tag>, ZabbixError> {
    let mut params = json!({
        "output": [kind.id_field()],
        "selectTags": "extend",
    });
    params[kind.ids_param()] = json!([id]);

    let objects: Vec<TaggedObject> = client.call(kind.get_method(), params).await?;
    let object = objects.into_iter().next().ok_or(CoreError::NotFound {
        entity: kind.entity_name(),
        id,
    })?;
    Ok(object.tags)
}

/// Add a tag to one entity. A tag whose name already exists has its value
/// overwritten instead of producing a duplicate.
pub async fn add_tag(
    client: &ZabbixClient,
    kind: EntityKind,
    id: EntityId,
    name: &str,
    value: &str,
) -> Result<(), ZabbixError> {
    validate_tag_input(name, value)?;

    let mut tags = get_tags(client, kind, id).await?;
    match tags.iter_mut().find(|tag| tag.name == name) {
        Some(existing) => existing.value = value.to_string(),
        None => tags.push(Tag::new(name, value)),
    }
    push_tags(client, kind, id, &tags).await?;
    tracing::debug!(kind = kind.noun(), id, tag = name, "Tag added");
    Ok(())
}

/// Remove a tag by name. Naming a tag the entity does not carry is an
/// error and nothing is written.
pub async fn remove_tag(
    client: &ZabbixClient,
    kind: EntityKind,
    id: EntityId,
    name: &str,
) -> Result<(), ZabbixError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Tag name cannot be empty".to_string()).into());
    }

    let tags = get_tags(client, kind, id).await?;
    let remaining: Vec<Tag> = tags.iter().filter(|tag| tag.name != name).cloned().collect();
    if remaining.len() == tags.len() {
        return Err(ZabbixError::TagNotFound {
            kind: kind.noun(),
            name: name.to_string(),
            id,
        });
    }
    push_tags(client, kind, id, &remaining).await?;
    tracing::debug!(kind = kind.noun(), id, tag = name, "Tag removed");
    Ok(())
}

/// Push a full tag list back to the server.
async fn push_tags(
    client: &ZabbixClient,
    kind: EntityKind,
    id: EntityId,
    tags: &[Tag],
) -> Result<(), ZabbixError> {
    let mut params = json!({ "tags": tags });
    params[kind.id_field()] = json!(id);
    let _: serde_json::Value = client.call(kind.update_method(), params).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Bulk loops
// ---------------------------------------------------------------------------

/// Per-id outcome of one bulk loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MutationOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub failed_ids: Vec<EntityId>,
}

impl MutationOutcome {
    fn record(&mut self, id: EntityId, result: Result<(), ZabbixError>, action: &str) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(error) => {
                tracing::debug!(id, %error, "Bulk {action} failed for one entity");
                self.failed += 1;
                self.failed_ids.push(id);
            }
        }
    }
}

impl From<MutationOutcome> for BulkDetails {
    fn from(outcome: MutationOutcome) -> Self {
        BulkDetails {
            success_count: outcome.succeeded,
            failed_count: outcome.failed,
            failed_items: outcome.failed_ids,
        }
    }
}

/// Add a tag to every id in turn. Failures (usually discovered or
/// read-only entities) are recorded per id and the loop runs to
/// completion. Lists over [`MAX_BULK_IDS`] are truncated.
pub async fn bulk_add(
    client: &ZabbixClient,
    kind: EntityKind,
    ids: &[EntityId],
    name: &str,
    value: &str,
) -> MutationOutcome {
    let mut outcome = MutationOutcome::default();
    for &id in cap_bulk_ids(kind, ids) {
        let result = add_tag(client, kind, id, name, value).await;
        outcome.record(id, result, "add");
    }
    outcome
}

/// Remove a tag from every id in turn, with the same accounting and
/// truncation as [`bulk_add`].
pub async fn bulk_remove(
    client: &ZabbixClient,
    kind: EntityKind,
    ids: &[EntityId],
    name: &str,
) -> MutationOutcome {
    let mut outcome = MutationOutcome::default();
    for &id in cap_bulk_ids(kind, ids) {
        let result = remove_tag(client, kind, id, name).await;
        outcome.record(id, result, "remove");
    }
    outcome
}

fn cap_bulk_ids(kind: EntityKind, ids: &[EntityId]) -> &[EntityId] {
    if ids.len() > MAX_BULK_IDS {
        tracing::warn!(
            kind = kind.noun(),
            requested = ids.len(),
            limit = MAX_BULK_IDS,
            "Bulk id list truncated"
        );
        &ids[..MAX_BULK_IDS]
    } else {
        ids
    }
}

// ---------------------------------------------------------------------------
// Tag roster
// ---------------------------------------------------------------------------

/// Distinct tag names across every entity of one kind, sorted. Feeds the
/// tag filter dropdown.
pub async fn all_tag_names(
    client: &ZabbixClient,
    kind: EntityKind,
) -> Result<Vec<String>, ZabbixError> {
    let entities = client.fetch_entities(kind, None, None).await?;
    let names: BTreeSet<String> = entities
        .into_iter()
        .flat_map(|entity| entity.tags.into_iter().map(|tag| tag.name))
        .collect();
    Ok(names.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
