//! Selection tracking for entity list views.
//!
//! Selection is always a subset of the currently visible rows; the owning
//! view prunes ids whenever visibility changes, so hidden rows can never
//! keep a stale checkmark.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Select-all control state
// ---------------------------------------------------------------------------

/// Aggregate state of the header select-all control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectAllState {
    /// No visible rows, or none of them selected.
    Unchecked,
    /// Some but not all visible rows selected.
    Indeterminate,
    /// Every visible row selected.
    Checked,
}

impl SelectAllState {
    /// Derive the control state from selected/visible counts.
    pub fn from_counts(selected: usize, visible: usize) -> Self {
        if visible == 0 || selected == 0 {
            Self::Unchecked
        } else if selected >= visible {
            Self::Checked
        } else {
            Self::Indeterminate
        }
    }
}

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// Selected-row counts for the toolbar, split by editability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionCounts {
    /// All selected rows.
    pub total: usize,
    /// Selected rows created by discovery; remote tag writes on these are
    /// expected to fail.
    pub discovered: usize,
}

/// The set of selected row ids.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    ids: HashSet<EntityId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    /// Mark a row selected. Returns whether it was newly added.
    pub fn insert(&mut self, id: EntityId) -> bool {
        self.ids.insert(id)
    }

    /// Unmark a row. Returns whether it was present.
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.ids.remove(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop every id not in `visible`. Returns how many were dropped.
    pub fn retain_visible(&mut self, visible: &HashSet<EntityId>) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| visible.contains(id));
        before - self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- SelectAllState ------------------------------------------------------

    #[test]
    fn no_visible_rows_is_unchecked() {
        assert_eq!(SelectAllState::from_counts(0, 0), SelectAllState::Unchecked);
    }

    #[test]
    fn none_selected_is_unchecked() {
        assert_eq!(SelectAllState::from_counts(0, 5), SelectAllState::Unchecked);
    }

    #[test]
    fn some_selected_is_indeterminate() {
        assert_eq!(
            SelectAllState::from_counts(2, 5),
            SelectAllState::Indeterminate
        );
    }

    #[test]
    fn all_selected_is_checked() {
        assert_eq!(SelectAllState::from_counts(5, 5), SelectAllState::Checked);
    }

    // -- SelectionState ------------------------------------------------------

    #[test]
    fn insert_and_remove() {
        let mut sel = SelectionState::new();
        assert!(sel.insert(1));
        assert!(!sel.insert(1));
        assert!(sel.contains(1));
        assert!(sel.remove(1));
        assert!(!sel.remove(1));
        assert!(sel.is_empty());
    }

    #[test]
    fn retain_visible_drops_hidden_ids() {
        let mut sel = SelectionState::new();
        sel.insert(1);
        sel.insert(2);
        sel.insert(3);

        let visible: HashSet<EntityId> = [1, 3].into_iter().collect();
        let dropped = sel.retain_visible(&visible);

        assert_eq!(dropped, 1);
        assert!(sel.contains(1));
        assert!(!sel.contains(2));
        assert!(sel.contains(3));
    }

    #[test]
    fn clear_empties_the_selection() {
        let mut sel = SelectionState::new();
        sel.insert(1);
        sel.insert(2);
        sel.clear();
        assert!(sel.is_empty());
    }
}
