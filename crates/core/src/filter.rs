//! Row filtering for entity list views.
//!
//! All predicates are pure functions over [`Entity`] so the same logic
//! drives interactive filtering, the API layer, and tests. Matching is
//! case-insensitive substring throughout.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Category restriction over the discovered flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    /// No restriction.
    #[default]
    All,
    /// Only manually created (tag-editable) entities.
    Editable,
    /// Only discovery-created (read-only) entities.
    Discovered,
}

/// User-adjustable filter inputs for one list view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text search over the whole row.
    #[serde(default)]
    pub search: String,
    /// Free-text search restricted to tag labels.
    #[serde(default)]
    pub tag_filter: String,
    /// Discovered/editable restriction.
    #[serde(default)]
    pub category: CategoryFilter,
}

impl FilterState {
    /// Whether any predicate deviates from the neutral default.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.tag_filter.trim().is_empty()
            || self.category != CategoryFilter::All
    }

    /// Human-readable description of each active predicate, in a fixed
    /// order, for the `filtered by …` status suffix.
    pub fn active_descriptions(&self) -> Vec<String> {
        let mut parts = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            parts.push(format!("search \"{search}\""));
        }
        let tag = self.tag_filter.trim();
        if !tag.is_empty() {
            parts.push(format!("tag \"{tag}\""));
        }
        match self.category {
            CategoryFilter::All => {}
            CategoryFilter::Editable => parts.push("editable only".to_string()),
            CategoryFilter::Discovered => parts.push("discovered only".to_string()),
        }
        parts
    }

    /// Reset every predicate to neutral.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Case-insensitive substring match over the full row text.
fn matches_search(entity: &Entity, search: &str) -> bool {
    let term = search.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    entity.search_text().to_lowercase().contains(&term)
}

/// Case-insensitive substring match over tag labels only.
fn matches_tag_filter(entity: &Entity, tag_filter: &str) -> bool {
    let term = tag_filter.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    entity.tag_text().to_lowercase().contains(&term)
}

fn matches_category(entity: &Entity, category: CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Editable => !entity.discovered,
        CategoryFilter::Discovered => entity.discovered,
    }
}

/// Conjunction of every configured predicate for one row.
pub fn row_matches(entity: &Entity, state: &FilterState) -> bool {
    matches_search(entity, &state.search)
        && matches_tag_filter(entity, &state.tag_filter)
        && matches_category(entity, state.category)
}

// ---------------------------------------------------------------------------
// Filter outcome
// ---------------------------------------------------------------------------

/// Summary of a filter pass, for rendering the list header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    /// Rows that passed every predicate.
    pub visible: usize,
    /// All rows in the view.
    pub total: usize,
    /// Header line, e.g. `Showing 12 of 40 hosts filtered by search "web"`.
    pub status: String,
    /// Whether the clear-filters control should be offered.
    pub show_clear: bool,
}

impl FilterOutcome {
    pub fn new(
        visible: usize,
        total: usize,
        kind: EntityKind,
        state: &FilterState,
        custom_active: bool,
    ) -> Self {
        let mut parts = state.active_descriptions();
        if custom_active {
            parts.push("custom filter".to_string());
        }

        let mut status = format!("Showing {visible} of {total} {}", kind.noun_plural());
        if !parts.is_empty() {
            status.push_str(" filtered by ");
            status.push_str(&parts.join(", "));
        }

        Self {
            visible,
            total,
            status,
            show_clear: !parts.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
