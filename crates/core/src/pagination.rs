//! Client-side pagination over the filtered row set.
//!
//! [`PageState`] keeps the current page clamped against the visible row
//! count; [`build_controls`] produces the rendered page-link strip with
//! ellipsis compression.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default page size for list views.
pub const DEFAULT_PER_PAGE: usize = 100;

/// Page links shown on each side of the current page.
const PAGE_WINDOW: usize = 2;

// ---------------------------------------------------------------------------
// Page state
// ---------------------------------------------------------------------------

/// Current page and page size for one list view.
///
/// The current page is always within `[1, max(total_pages, 1)]`; every
/// mutation re-clamps against the row count it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageState {
    /// Start on page 1 with the given page size (floored at 1).
    pub fn new(per_page: usize) -> Self {
        Self {
            current_page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of pages needed for `visible` rows.
    pub fn total_pages(&self, visible: usize) -> usize {
        visible.div_ceil(self.per_page)
    }

    /// Clamp the current page into `[1, max(total_pages, 1)]`.
    pub fn clamp(&mut self, visible: usize) {
        let max_page = self.total_pages(visible).max(1);
        self.current_page = self.current_page.clamp(1, max_page);
    }

    /// Navigate to `page`, clamped against the current row count.
    pub fn set_page(&mut self, page: usize, visible: usize) {
        self.current_page = page.max(1);
        self.clamp(visible);
    }

    /// Change the page size and reset to page 1. Callers treat this as a
    /// navigation: the new size is persisted in the list URL and the data
    /// reloaded.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.current_page = 1;
    }

    /// Index range of the current page within the visible row sequence.
    pub fn page_range(&self, visible: usize) -> std::ops::Range<usize> {
        let start = ((self.current_page - 1) * self.per_page).min(visible);
        let end = (start + self.per_page).min(visible);
        start..end
    }
}

// ---------------------------------------------------------------------------
// Pagination controls
// ---------------------------------------------------------------------------

/// One entry in the rendered page-link strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "lowercase")]
pub enum PageLink {
    /// A navigable page number.
    Page(usize),
    /// A run of two or more omitted pages.
    Ellipsis,
}

/// Data model for the pagination strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationControls {
    pub current_page: usize,
    pub total_pages: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub links: Vec<PageLink>,
}

/// Build the page-link strip: the first page, a window around the current
/// page, and the last page, with larger gaps compressed to ellipses. A gap
/// of exactly one page is rendered as that page, never as an ellipsis.
///
/// Returns `None` (nothing rendered) when the rows fit on a single page.
pub fn build_controls(current_page: usize, total_pages: usize) -> Option<PaginationControls> {
    if total_pages <= 1 {
        return None;
    }
    let current = current_page.clamp(1, total_pages);

    let mut shown: Vec<usize> = Vec::new();
    shown.push(1);
    let window_start = current.saturating_sub(PAGE_WINDOW).max(1);
    let window_end = (current + PAGE_WINDOW).min(total_pages);
    shown.extend(window_start..=window_end);
    shown.push(total_pages);
    shown.sort_unstable();
    shown.dedup();

    let mut links = Vec::new();
    let mut prev: Option<usize> = None;
    for &page in &shown {
        if let Some(p) = prev {
            match page - p {
                1 => {}
                2 => links.push(PageLink::Page(p + 1)),
                _ => links.push(PageLink::Ellipsis),
            }
        }
        links.push(PageLink::Page(page));
        prev = Some(page);
    }

    Some(PaginationControls {
        current_page: current,
        total_pages,
        prev_enabled: current > 1,
        next_enabled: current < total_pages,
        links,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
