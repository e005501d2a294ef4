//! Wire-shaped rows as the server returns them.
//!
//! Zabbix serialises ids and flags as strings on current versions and as
//! numbers on some older ones, so id fields go through [`de_id`]. The
//! `into_entity` conversions produce the display rows the rest of the
//! workspace operates on.

use serde::{Deserialize, Serialize};
use tagsweep_core::entity::{is_discovered, Entity, EntityKind, Tag};
use tagsweep_core::types::EntityId;

/// Deserialise an id that may arrive as a JSON string or number.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<EntityId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(EntityId),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(id) => Ok(id),
        Repr::Text(text) => text
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid id '{text}'"))),
    }
}

/// Host reference attached to triggers and items via `selectHosts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRef {
    #[serde(deserialize_with = "de_id")]
    pub hostid: EntityId,
    pub name: String,
}

/// One row from `host.get`.
#[derive(Debug, Clone, Deserialize)]
pub struct Host {
    #[serde(deserialize_with = "de_id")]
    pub hostid: EntityId,
    /// Technical host name, distinct from the visible `name`.
    #[serde(default)]
    pub host: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub flags: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Host {
    pub fn into_entity(self) -> Entity {
        let discovered = is_discovered(self.flags.as_deref());
        let detail = if self.host.is_empty() || self.host == self.name {
            None
        } else {
            Some(self.host)
        };
        Entity {
            id: self.hostid,
            kind: EntityKind::Host,
            name: self.name,
            detail,
            tags: self.tags,
            discovered,
        }
    }
}

/// One row from `trigger.get`, with the description already expanded.
#[derive(Debug, Clone, Deserialize)]
pub struct Trigger {
    #[serde(deserialize_with = "de_id")]
    pub triggerid: EntityId,
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub flags: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
}

impl Trigger {
    pub fn into_entity(self) -> Entity {
        let discovered = is_discovered(self.flags.as_deref());
        Entity {
            id: self.triggerid,
            kind: EntityKind::Trigger,
            name: self.description,
            detail: host_names(&self.hosts),
            tags: self.tags,
            discovered,
        }
    }
}

/// One row from `item.get`, restricted to monitored items.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "de_id")]
    pub itemid: EntityId,
    pub name: String,
    /// The item key, shared across hosts for template-derived items.
    #[serde(rename = "key_")]
    pub key: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub flags: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
}

impl Item {
    pub fn into_entity(self) -> Entity {
        let discovered = is_discovered(self.flags.as_deref());
        Entity {
            id: self.itemid,
            kind: EntityKind::Item,
            name: self.name,
            detail: host_names(&self.hosts),
            tags: self.tags,
            discovered,
        }
    }
}

/// Minimal projection used by tag mutations: only the current tag list,
/// the id having been supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct TaggedObject {
    #[serde(default)]
    pub tags: Vec<Tag>,
}

fn host_names(hosts: &[HostRef]) -> Option<String> {
    if hosts.is_empty() {
        return None;
    }
    let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
    Some(names.join(", "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
