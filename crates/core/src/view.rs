//! Composed list-view state: rows, filtering, selection, and pagination.
//!
//! [`ListView`] owns everything one list page needs between data reloads.
//! Every mutation eagerly recomputes the visible set, prunes the selection
//! of hidden rows, and re-clamps the current page, so observers always read
//! consistent state.

use std::collections::HashSet;

use crate::entity::{Entity, EntityKind};
use crate::error::CoreError;
use crate::filter::{row_matches, CategoryFilter, FilterOutcome, FilterState};
use crate::pagination::{build_controls, PageState, PaginationControls};
use crate::selection::{SelectAllState, SelectionCounts, SelectionState};
use crate::types::EntityId;

/// Caller-supplied extra row predicate, ANDed with the standard filters.
pub type RowPredicate = dyn Fn(&Entity) -> bool + Send + Sync;

/// In-memory state for one entity list page.
pub struct ListView {
    kind: EntityKind,
    entities: Vec<Entity>,
    filter: FilterState,
    custom_filter: Option<Box<RowPredicate>>,
    selection: SelectionState,
    page: PageState,
    /// Positions into `entities` of rows passing the filters, in display
    /// order.
    visible: Vec<usize>,
}

impl ListView {
    /// Build a view over `entities` with the default page size. All rows
    /// start visible and unselected.
    pub fn new(kind: EntityKind, entities: Vec<Entity>) -> Self {
        Self::with_page_state(kind, entities, PageState::default())
    }

    /// Build a view with an explicit page size.
    pub fn with_per_page(kind: EntityKind, entities: Vec<Entity>, per_page: usize) -> Self {
        Self::with_page_state(kind, entities, PageState::new(per_page))
    }

    fn with_page_state(kind: EntityKind, entities: Vec<Entity>, page: PageState) -> Self {
        let mut view = Self {
            kind,
            entities,
            filter: FilterState::default(),
            custom_filter: None,
            selection: SelectionState::new(),
            page,
            visible: Vec::new(),
        };
        view.refresh();
        view
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn total_count(&self) -> usize {
        self.entities.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Ids of visible rows in display order.
    pub fn visible_ids(&self) -> Vec<EntityId> {
        self.visible.iter().map(|&i| self.entities[i].id).collect()
    }

    /// Current filter summary.
    pub fn outcome(&self) -> FilterOutcome {
        FilterOutcome::new(
            self.visible.len(),
            self.entities.len(),
            self.kind,
            &self.filter,
            self.custom_filter.is_some(),
        )
    }

    // -----------------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------------

    pub fn set_search(&mut self, search: impl Into<String>) -> FilterOutcome {
        self.filter.search = search.into();
        self.refresh_outcome()
    }

    pub fn set_tag_filter(&mut self, tag_filter: impl Into<String>) -> FilterOutcome {
        self.filter.tag_filter = tag_filter.into();
        self.refresh_outcome()
    }

    pub fn set_category(&mut self, category: CategoryFilter) -> FilterOutcome {
        self.filter.category = category;
        self.refresh_outcome()
    }

    /// Install (or clear) the extra row predicate.
    pub fn set_custom_filter(&mut self, predicate: Option<Box<RowPredicate>>) -> FilterOutcome {
        self.custom_filter = predicate;
        self.refresh_outcome()
    }

    /// Reset every filter criterion, including the custom predicate, and
    /// re-show all rows.
    pub fn clear_filters(&mut self) -> FilterOutcome {
        self.filter.clear();
        self.custom_filter = None;
        self.refresh_outcome()
    }

    /// Recompute visibility, prune the selection, and clamp the page.
    fn refresh(&mut self) {
        let filter = &self.filter;
        let custom = self.custom_filter.as_deref();
        self.visible = self
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| row_matches(e, filter) && custom.map_or(true, |p| p(e)))
            .map(|(i, _)| i)
            .collect();

        let visible_ids: HashSet<EntityId> =
            self.visible.iter().map(|&i| self.entities[i].id).collect();
        self.selection.retain_visible(&visible_ids);
        self.page.clamp(self.visible.len());
    }

    fn refresh_outcome(&mut self) -> FilterOutcome {
        self.refresh();
        self.outcome()
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Set one row's checkbox. Unknown ids are rejected, and hidden rows
    /// cannot be selected.
    pub fn set_row_selected(
        &mut self,
        id: EntityId,
        selected: bool,
    ) -> Result<SelectAllState, CoreError> {
        if !self.entities.iter().any(|e| e.id == id) {
            return Err(CoreError::NotFound {
                entity: self.kind.entity_name(),
                id,
            });
        }
        if !self.visible.iter().any(|&i| self.entities[i].id == id) {
            return Err(CoreError::Validation(format!(
                "Row {id} is hidden by the current filters"
            )));
        }
        if selected {
            self.selection.insert(id);
        } else {
            self.selection.remove(id);
        }
        Ok(self.select_all_state())
    }

    /// Select every visible row.
    pub fn select_all_visible(&mut self) {
        for &i in &self.visible {
            self.selection.insert(self.entities[i].id);
        }
    }

    /// Clear the selection entirely.
    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Propagate a select-all toggle: a fully checked control clears the
    /// selection, anything else selects every visible row.
    pub fn toggle_select_all(&mut self) -> SelectAllState {
        match self.select_all_state() {
            SelectAllState::Checked => self.deselect_all(),
            _ => self.select_all_visible(),
        }
        self.select_all_state()
    }

    pub fn select_all_state(&self) -> SelectAllState {
        SelectAllState::from_counts(self.selection.len(), self.visible.len())
    }

    /// Selected-row counts split by editability.
    pub fn selected_counts(&self) -> SelectionCounts {
        let discovered = self
            .entities
            .iter()
            .filter(|e| e.discovered && self.selection.contains(e.id))
            .count();
        SelectionCounts {
            total: self.selection.len(),
            discovered,
        }
    }

    /// Selected ids in display order, for bulk submission.
    pub fn selected_ids(&self) -> Vec<EntityId> {
        self.visible
            .iter()
            .map(|&i| self.entities[i].id)
            .filter(|&id| self.selection.contains(id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Pagination
    // -----------------------------------------------------------------------

    pub fn current_page(&self) -> usize {
        self.page.current_page()
    }

    pub fn per_page(&self) -> usize {
        self.page.per_page()
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.visible.len())
    }

    /// Navigate to `page` (clamped).
    pub fn set_page(&mut self, page: usize) {
        self.page.set_page(page, self.visible.len());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.current_page() + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.current_page().saturating_sub(1));
    }

    /// Change the page size and reset to the first page. Callers treat
    /// this as a navigation and reload the list data with the new size.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.page.set_per_page(per_page);
        self.page.clamp(self.visible.len());
    }

    /// The visible rows on the current page, in display order.
    pub fn page_rows(&self) -> Vec<&Entity> {
        let range = self.page.page_range(self.visible.len());
        self.visible[range].iter().map(|&i| &self.entities[i]).collect()
    }

    /// Page-link strip model, or `None` when everything fits on one page.
    pub fn pagination(&self) -> Option<PaginationControls> {
        build_controls(self.page.current_page(), self.total_pages())
    }

    // -----------------------------------------------------------------------
    // Reload
    // -----------------------------------------------------------------------

    /// Replace the backing rows after a data reload. Filters and page size
    /// are kept; selection survives only for ids still visible.
    pub fn replace_entities(&mut self, entities: Vec<Entity>) -> FilterOutcome {
        self.entities = entities;
        self.refresh_outcome()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
