//! Collapsing template-derived items into one row per item key.
//!
//! The same template item exists once per host, each copy with its own
//! item id. The list page shows one row per key with the member ids kept
//! alongside, so a bulk operation on the row can reach every copy.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tagsweep_core::entity::{is_discovered, Tag};
use tagsweep_core::types::EntityId;

use crate::models::{HostRef, Item};

/// One aggregated row: every item sharing a key, across hosts.
#[derive(Debug, Clone, Serialize)]
pub struct ItemGroup {
    /// The shared item key.
    pub key: String,
    /// Display name, taken from the first member seen.
    pub name: String,
    /// Member item ids in first-seen order.
    pub item_ids: Vec<EntityId>,
    /// Member item id to its host id.
    pub host_by_item: BTreeMap<EntityId, EntityId>,
    /// Member item id to a lowercased `name:value` search string of its
    /// own tags.
    pub search_text_by_item: BTreeMap<EntityId, String>,
    /// Member item id to whether that copy is discovery-created.
    pub discovered_by_item: BTreeMap<EntityId, bool>,
    /// Whether any member is discovery-created.
    pub has_discovered: bool,
    /// Union of tags across all members, sorted by name then value.
    pub tags: Vec<Tag>,
    /// Hosts carrying this item, in first-seen order.
    pub hosts: Vec<HostRef>,
    pub host_count: usize,
}

/// Grouping output: the rows plus the sorted host roster for the host
/// filter dropdown.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedItems {
    pub groups: Vec<ItemGroup>,
    pub all_hosts: Vec<HostRef>,
}

/// Group items by key, preserving the order keys first appear in (the
/// input arrives name-sorted from the server).
pub fn group_items(items: Vec<Item>) -> GroupedItems {
    let mut groups: Vec<ItemGroup> = Vec::new();
    let mut tag_unions: Vec<BTreeSet<(String, String)>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut roster: BTreeMap<EntityId, HostRef> = BTreeMap::new();

    for item in items {
        let position = match index.get(&item.key) {
            Some(&position) => position,
            None => {
                index.insert(item.key.clone(), groups.len());
                groups.push(ItemGroup {
                    key: item.key.clone(),
                    name: item.name.clone(),
                    item_ids: Vec::new(),
                    host_by_item: BTreeMap::new(),
                    search_text_by_item: BTreeMap::new(),
                    discovered_by_item: BTreeMap::new(),
                    has_discovered: false,
                    tags: Vec::new(),
                    hosts: Vec::new(),
                    host_count: 0,
                });
                tag_unions.push(BTreeSet::new());
                groups.len() - 1
            }
        };
        let group = &mut groups[position];
        let union = &mut tag_unions[position];

        group.item_ids.push(item.itemid);
        if let Some(host) = item.hosts.last() {
            group.host_by_item.insert(item.itemid, host.hostid);
        }
        group
            .search_text_by_item
            .insert(item.itemid, tag_search_text(&item.tags));

        let discovered = is_discovered(item.flags.as_deref());
        group.discovered_by_item.insert(item.itemid, discovered);
        if discovered {
            group.has_discovered = true;
        }

        for tag in &item.tags {
            union.insert((tag.name.clone(), tag.value.clone()));
        }
        for host in item.hosts {
            if !group.hosts.iter().any(|h| h.hostid == host.hostid) {
                group.hosts.push(host.clone());
            }
            roster.insert(host.hostid, host);
        }
    }

    for (group, union) in groups.iter_mut().zip(tag_unions) {
        group.host_count = group.hosts.len();
        group.tags = union
            .into_iter()
            .map(|(name, value)| Tag::new(name, value))
            .collect();
    }

    let mut all_hosts: Vec<HostRef> = roster.into_values().collect();
    all_hosts.sort_by_key(|host| host.name.to_lowercase());
    GroupedItems { groups, all_hosts }
}

fn tag_search_text(tags: &[Tag]) -> String {
    let parts: Vec<String> = tags
        .iter()
        .map(|tag| format!("{}:{}", tag.name.to_lowercase(), tag.value.to_lowercase()))
        .collect();
    parts.join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
