//! Monitored-entity model: hosts, triggers, and items with their tags.
//!
//! [`EntityKind`] carries the per-kind remote method and field names so the
//! client and API layers never branch on string kind names themselves.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for tag names and values (remote API limit).
pub const MAX_TAG_LENGTH: usize = 255;

/// `flags` value the remote API uses for discovery-created objects.
pub const DISCOVERED_FLAG: &str = "4";

/// Valid plural kind segments accepted in API paths.
pub const VALID_KINDS: &[&str] = &["hosts", "triggers", "items"];

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The family of monitored object a row belongs to.
///
/// Each kind maps to its own remote read/write methods and wire field
/// names; everything else about list handling is kind-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Host,
    Trigger,
    Item,
}

impl EntityKind {
    /// Parse a plural path segment (`"hosts"`, `"triggers"`, `"items"`).
    pub fn from_plural(segment: &str) -> Result<Self, CoreError> {
        match segment {
            "hosts" => Ok(Self::Host),
            "triggers" => Ok(Self::Trigger),
            "items" => Ok(Self::Item),
            other => Err(CoreError::Validation(format!(
                "Unknown entity kind '{other}'. Must be one of: {VALID_KINDS:?}"
            ))),
        }
    }

    /// Singular noun for messages ("host").
    pub fn noun(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Trigger => "trigger",
            Self::Item => "item",
        }
    }

    /// Plural noun for messages and route segments ("hosts").
    pub fn noun_plural(self) -> &'static str {
        match self {
            Self::Host => "hosts",
            Self::Trigger => "triggers",
            Self::Item => "items",
        }
    }

    /// Capitalised entity name for error payloads ("Host").
    pub fn entity_name(self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Trigger => "Trigger",
            Self::Item => "Item",
        }
    }

    /// Remote read method ("host.get").
    pub fn get_method(self) -> &'static str {
        match self {
            Self::Host => "host.get",
            Self::Trigger => "trigger.get",
            Self::Item => "item.get",
        }
    }

    /// Remote write method ("host.update").
    pub fn update_method(self) -> &'static str {
        match self {
            Self::Host => "host.update",
            Self::Trigger => "trigger.update",
            Self::Item => "item.update",
        }
    }

    /// Id property name on fetched objects ("hostid").
    pub fn id_field(self) -> &'static str {
        match self {
            Self::Host => "hostid",
            Self::Trigger => "triggerid",
            Self::Item => "itemid",
        }
    }

    /// Plural id parameter for targeted get requests ("hostids").
    pub fn ids_param(self) -> &'static str {
        match self {
            Self::Host => "hostids",
            Self::Trigger => "triggerids",
            Self::Item => "itemids",
        }
    }

    /// Id list field name in bulk request bodies ("host_ids").
    pub fn bulk_ids_field(self) -> &'static str {
        match self {
            Self::Host => "host_ids",
            Self::Trigger => "trigger_ids",
            Self::Item => "item_ids",
        }
    }

    /// Remote sort field giving a stable listing order.
    pub fn sort_field(self) -> &'static str {
        match self {
            Self::Host | Self::Item => "name",
            Self::Trigger => "description",
        }
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// A single `name: value` tag on an entity.
///
/// Serialises with the remote field names (`tag`, `value`) so fetched tags
/// round-trip straight into update calls. Remote bookkeeping fields such as
/// `automatic` are dropped on deserialisation, which is exactly the
/// cleaning an update payload requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "tag")]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Display form: `name: value`, or just `name` when the value is empty.
    pub fn label(&self) -> String {
        if self.value.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.value)
        }
    }
}

/// Format a name/value pair the way [`Tag::label`] does without
/// constructing a `Tag`.
pub fn tag_label(name: &str, value: &str) -> String {
    if value.is_empty() {
        name.to_string()
    } else {
        format!("{name}: {value}")
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One row in a list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Primary display name (trigger rows carry the expanded description).
    pub name: String,
    /// Additional searchable row text, e.g. host names on trigger and item
    /// rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Created by low-level discovery; tag writes are rejected remotely.
    #[serde(default)]
    pub discovered: bool,
}

impl Entity {
    /// All tag labels joined for substring matching.
    pub fn tag_text(&self) -> String {
        self.tags
            .iter()
            .map(Tag::label)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The full searchable text of the row: name, detail, and tags.
    pub fn search_text(&self) -> String {
        let mut text = self.name.clone();
        if let Some(detail) = &self.detail {
            text.push(' ');
            text.push_str(detail);
        }
        let tags = self.tag_text();
        if !tags.is_empty() {
            text.push(' ');
            text.push_str(&tags);
        }
        text
    }

    /// Whether a tag with this exact name is present.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }
}

/// Whether a remote `flags` property marks the object as discovered.
pub fn is_discovered(flags: Option<&str>) -> bool {
    flags == Some(DISCOVERED_FLAG)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a tag name/value pair against remote limits.
///
/// The name must be non-empty after trimming; both fields are capped at
/// [`MAX_TAG_LENGTH`] characters.
pub fn validate_tag_input(name: &str, value: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Tag name cannot be empty".into()));
    }
    if name.chars().count() > MAX_TAG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tag name too long (max {MAX_TAG_LENGTH} characters)"
        )));
    }
    if value.chars().count() > MAX_TAG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tag value too long (max {MAX_TAG_LENGTH} characters)"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_with_tags(tags: Vec<Tag>) -> Entity {
        Entity {
            id: 1,
            kind: EntityKind::Host,
            name: "web-01".into(),
            detail: None,
            tags,
            discovered: false,
        }
    }

    // -- EntityKind ----------------------------------------------------------

    #[test]
    fn from_plural_accepts_valid_kinds() {
        assert_eq!(EntityKind::from_plural("hosts").unwrap(), EntityKind::Host);
        assert_eq!(
            EntityKind::from_plural("triggers").unwrap(),
            EntityKind::Trigger
        );
        assert_eq!(EntityKind::from_plural("items").unwrap(), EntityKind::Item);
    }

    #[test]
    fn from_plural_rejects_unknown() {
        assert!(EntityKind::from_plural("host").is_err());
        assert!(EntityKind::from_plural("graphs").is_err());
        assert!(EntityKind::from_plural("").is_err());
    }

    #[test]
    fn kind_method_names() {
        assert_eq!(EntityKind::Host.get_method(), "host.get");
        assert_eq!(EntityKind::Trigger.update_method(), "trigger.update");
        assert_eq!(EntityKind::Item.id_field(), "itemid");
        assert_eq!(EntityKind::Host.ids_param(), "hostids");
        assert_eq!(EntityKind::Trigger.bulk_ids_field(), "trigger_ids");
    }

    #[test]
    fn trigger_sorts_by_description() {
        assert_eq!(EntityKind::Trigger.sort_field(), "description");
        assert_eq!(EntityKind::Host.sort_field(), "name");
    }

    // -- Tag -----------------------------------------------------------------

    #[test]
    fn tag_label_with_value() {
        assert_eq!(Tag::new("env", "prod").label(), "env: prod");
    }

    #[test]
    fn tag_label_without_value() {
        assert_eq!(Tag::new("standalone", "").label(), "standalone");
    }

    #[test]
    fn tag_serialises_with_remote_field_names() {
        let json = serde_json::to_value(Tag::new("env", "prod")).unwrap();
        assert_eq!(json, serde_json::json!({ "tag": "env", "value": "prod" }));
    }

    #[test]
    fn tag_deserialisation_drops_extra_fields() {
        let tag: Tag = serde_json::from_value(serde_json::json!({
            "tag": "env",
            "value": "prod",
            "automatic": "1",
        }))
        .unwrap();
        assert_eq!(tag, Tag::new("env", "prod"));
    }

    // -- Entity --------------------------------------------------------------

    #[test]
    fn search_text_includes_name_detail_and_tags() {
        let mut entity = entity_with_tags(vec![Tag::new("env", "prod")]);
        entity.detail = Some("db-cluster".into());
        let text = entity.search_text();
        assert!(text.contains("web-01"));
        assert!(text.contains("db-cluster"));
        assert!(text.contains("env: prod"));
    }

    #[test]
    fn has_tag_is_exact_match() {
        let entity = entity_with_tags(vec![Tag::new("env", "prod")]);
        assert!(entity.has_tag("env"));
        assert!(!entity.has_tag("Env"));
        assert!(!entity.has_tag("environment"));
    }

    // -- is_discovered -------------------------------------------------------

    #[test]
    fn discovered_flag_detection() {
        assert!(is_discovered(Some("4")));
        assert!(!is_discovered(Some("0")));
        assert!(!is_discovered(None));
    }

    // -- validate_tag_input --------------------------------------------------

    #[test]
    fn validate_accepts_normal_tag() {
        assert!(validate_tag_input("env", "prod").is_ok());
        assert!(validate_tag_input("env", "").is_ok());
    }

    #[test]
    fn validate_rejects_empty_name() {
        assert!(validate_tag_input("", "prod").is_err());
        assert!(validate_tag_input("   ", "prod").is_err());
    }

    #[test]
    fn validate_rejects_overlong_name() {
        let long = "x".repeat(MAX_TAG_LENGTH + 1);
        assert!(validate_tag_input(&long, "").is_err());
        let max = "x".repeat(MAX_TAG_LENGTH);
        assert!(validate_tag_input(&max, "").is_ok());
    }

    #[test]
    fn validate_rejects_overlong_value() {
        let long = "x".repeat(MAX_TAG_LENGTH + 1);
        assert!(validate_tag_input("env", &long).is_err());
    }
}
