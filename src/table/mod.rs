//! Lazy table component with elastic cross-page selection.
//!
//! This module exposes a generic `Model<R: Record>` that manages a view onto
//! a remote, paginated listing: the visible page of rows, the pagination
//! state, and a selection that can span pages the user has never visited.
//!
//! ## Architecture Overview
//!
//! The component follows the Elm architecture. All state mutation happens in
//! [`Model::update`]; anything that needs the network returns a `Cmd` whose
//! future performs the fetches and resolves to one of the messages in
//! [`types`]. Because the runtime feeds messages back one at a time, state
//! transitions are atomic with respect to each other even though several
//! fetch chains may be in flight.
//!
//! Two kinds of fetch exist and never mix:
//! - **Foreground** fetches ([`Model::reload`], [`Model::goto_page`],
//!   [`Model::set_per_page`]) replace the visible rows and total, and report
//!   the new position to the [`NavigationMirror`].
//! - **Background** fetches (the bulk-select walk and elastic fill runs)
//!   only ever produce records for the selection. They leave the visible
//!   page, the reported total, and the mirror untouched.
//!
//! ## Elastic selection
//!
//! [`Model::select_first`] walks forward from the current page and selects
//! the first N records, then remembers N as the *elastic target*. While a
//! target is set, deselecting records arms a background fill that searches
//! forward pages for replacements until the selection is back at the target
//! or the search bounds are hit. Manually growing the selection, or clearing
//! it entirely, is taken as the user overriding the mechanism and cancels
//! the target. See [`reconcile`] for the exact rules.
//!
//! ## Integration
//!
//! ```rust
//! use bubbletea_lazytable::prelude::*;
//! use std::sync::Arc;
//!
//! let records: Vec<DefaultRecord> = (1..=100)
//!     .map(|i| DefaultRecord::new(i, format!("record {i}")))
//!     .collect();
//!
//! let mut table: LazyTable<DefaultRecord> =
//!     LazyTable::new(Arc::new(VecFetcher::new(records)), 1, 12);
//!
//! // Issue the initial foreground load from your init()/update().
//! let _cmd = table.reload();
//! ```

pub mod keys;
pub mod reconcile;
pub mod style;
pub mod types;

mod bulk;
mod fill;

#[cfg(test)]
mod tests;

pub use fill::DEFAULT_MAX_SEARCH_PAGES;
pub use keys::TableKeyMap;
pub use style::{TableStyles, BULLET, CHECKED, UNCHECKED};
pub use types::{BulkSelectedMsg, FillCompletedMsg, NavigationMirror, PageLoadedMsg};

use crate::fetcher::{PageFetcher, Record, RecordId};
use crate::pagination;
use crate::selection::Selection;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use reconcile::SelectionDelta;
use std::sync::Arc;
use tracing::{debug, warn};
use types::next_id;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A lazily-fetched table with pagination and elastic selection.
///
/// See the [module docs](self) for an overview of how the pieces fit
/// together.
pub struct Model<R: Record> {
    id: i64,
    fetcher: Arc<dyn PageFetcher<R>>,
    pagination: pagination::Model,
    selection: Selection<R>,
    rows: Vec<R>,
    total_records: usize,
    loading: bool,
    elastic_target: Option<usize>,
    filling: bool,
    // Bumped on every selection mutation; lets a completed fill run detect
    // that the selection moved while it was searching.
    selection_tag: u64,
    cursor: usize,
    width: usize,
    max_search_pages: usize,
    mirror: Option<Arc<dyn NavigationMirror>>,
    /// Key bindings.
    pub keymap: TableKeyMap,
    /// Visual styles.
    pub styles: TableStyles,
}

impl<R: Record + Send + Sync + 'static> Model<R> {
    /// Creates a table over the given fetcher, positioned at `page` with
    /// `per_page` rows per page.
    ///
    /// The starting position usually comes from persisted navigation state
    /// (a URL, a session file) or defaults to page 1. Nothing is fetched
    /// until [`reload`](Self::reload) is called.
    pub fn new(fetcher: Arc<dyn PageFetcher<R>>, page: usize, per_page: usize) -> Self {
        let mut pagination = pagination::Model::new();
        pagination.set_page(page, per_page);

        Self {
            id: next_id(),
            fetcher,
            pagination,
            selection: Selection::new(),
            rows: Vec::new(),
            total_records: 0,
            loading: false,
            elastic_target: None,
            filling: false,
            selection_tag: 0,
            cursor: 0,
            width: 0,
            max_search_pages: DEFAULT_MAX_SEARCH_PAGES,
            mirror: None,
            keymap: TableKeyMap::default(),
            styles: TableStyles::default(),
        }
    }

    /// Sets the navigation mirror (builder pattern).
    pub fn with_navigation_mirror(mut self, mirror: Arc<dyn NavigationMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Sets the render width; rows longer than this are truncated with an
    /// ellipsis. Zero (the default) disables truncation.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Sets the per-run page-fetch cap for elastic fill searches (builder
    /// pattern). Values below 1 are clamped to 1.
    pub fn with_max_search_pages(mut self, pages: usize) -> Self {
        self.max_search_pages = pages.max(1);
        self
    }

    /// The table's unique instance id, present on every message it emits.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The rows on the currently visible page.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// The current selection.
    pub fn selection(&self) -> &Selection<R> {
        &self.selection
    }

    /// The current pagination state (read-only).
    pub fn pagination(&self) -> &pagination::Model {
        &self.pagination
    }

    /// Server-reported size of the collection, as of the last successful
    /// foreground load.
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// True while a foreground load or bulk-select walk is running.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// True while an elastic fill run is searching pages.
    pub fn filling(&self) -> bool {
        self.filling
    }

    /// The elastic target, if elastic mode is active.
    pub fn elastic_target(&self) -> Option<usize> {
        self.elastic_target
    }

    /// Index of the cursor row within the visible page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Issues a foreground fetch of the current page.
    ///
    /// Call this once after construction to populate the table. On failure
    /// the listing renders empty with a zero total; the error is logged, not
    /// surfaced.
    pub fn reload(&mut self) -> Cmd {
        self.loading = true;
        let fetcher = Arc::clone(&self.fetcher);
        let id = self.id;
        let page = self.pagination.page;
        let per_page = self.pagination.per_page;

        Box::pin(async move {
            let msg = match fetcher.fetch_page(page, per_page).await {
                Ok(fetched) => PageLoadedMsg {
                    id,
                    page,
                    per_page,
                    items: fetched.items,
                    total: fetched.total,
                    failed: false,
                },
                Err(error) => {
                    warn!(page, %error, "foreground page fetch failed");
                    PageLoadedMsg {
                        id,
                        page,
                        per_page,
                        items: Vec::new(),
                        total: 0,
                        failed: true,
                    }
                }
            };
            Some(Box::new(msg) as Msg)
        })
    }

    /// Navigates to the given 1-based page with a foreground fetch.
    pub fn goto_page(&mut self, page: usize) -> Cmd {
        self.pagination.set_page(page, self.pagination.per_page);
        self.reload()
    }

    /// Changes the page size, keeping the first visible row in view, and
    /// refetches in the foreground.
    pub fn set_per_page(&mut self, per_page: usize) -> Cmd {
        let offset = self.pagination.offset;
        self.pagination.from_offset(offset, per_page);
        self.reload()
    }

    /// Selects the first `n` records walking forward from the current page,
    /// then keeps the selection at size `n` elastically.
    ///
    /// Returns `None` without fetching anything if `n` is not positive; the
    /// rejection is logged. The walk runs in the background and may span
    /// several pages; the visible page is refreshed once it completes. If
    /// the collection holds fewer than `n` reachable records, everything
    /// reachable is selected and elastic mode still engages.
    pub fn select_first(&mut self, n: i64) -> Option<Cmd> {
        if n <= 0 {
            warn!(n, "bulk select target must be positive");
            return None;
        }
        let target = n as usize;
        self.loading = true;
        debug!(
            target,
            page = self.pagination.page,
            "bulk select starting"
        );
        Some(bulk::bulk_select_cmd(
            Arc::clone(&self.fetcher),
            self.id,
            self.pagination.page,
            self.pagination.per_page,
            self.pagination.offset,
            target,
        ))
    }

    /// Adopts a selection produced by the UI layer (a toggle, a header
    /// checkbox, a host-side panel) and reconciles it with elastic mode.
    ///
    /// The sequence replaces the current selection verbatim (deduplicated by
    /// id, first occurrence wins). While elastic mode is active, growing the
    /// selection or clearing it cancels the mode; shrinking it leaves the
    /// mode active and returns the fill command that will close the gap.
    pub fn apply_selection(&mut self, new_selection: Vec<R>) -> Option<Cmd> {
        let previous = self.selection.len();
        self.selection.replace(new_selection);
        self.bump_tag();
        let adopted = self.selection.len();
        let delta = reconcile::classify(previous, adopted);

        if self.elastic_target.is_some() {
            match delta {
                SelectionDelta::Cleared => {
                    debug!("selection cleared by user; leaving elastic mode");
                    self.elastic_target = None;
                }
                SelectionDelta::Grew => {
                    debug!(previous, adopted, "manual selection growth; leaving elastic mode");
                    self.elastic_target = None;
                }
                SelectionDelta::Shrank => {
                    debug!(previous, adopted, "selection shrank below target");
                }
                SelectionDelta::Unchanged => {}
            }
        }

        // An equal-size replacement changes nothing the fill trigger
        // watches.
        if matches!(delta, SelectionDelta::Unchanged) {
            return None;
        }
        self.maybe_fill()
    }

    /// Deselects a single record by id, with elastic reconciliation.
    ///
    /// Equivalent to the UI emitting the current selection minus that
    /// record. Returns `None` if the id was not selected.
    pub fn deselect(&mut self, id: RecordId) -> Option<Cmd> {
        if !self.selection.contains(id) {
            return None;
        }
        let remaining = self
            .selection
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        self.apply_selection(remaining)
    }

    /// Cancels elastic mode, keeping the current selection as-is.
    pub fn cancel_elastic(&mut self) {
        if self.elastic_target.take().is_some() {
            debug!("elastic mode cancelled");
        }
    }

    /// Processes messages and updates the table state.
    ///
    /// Handles the component's own completion messages (routed by instance
    /// id) and key input. Returns the follow-up command, if any.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let msg = match msg.downcast::<PageLoadedMsg<R>>() {
            Ok(loaded) => return self.on_page_loaded(*loaded),
            Err(msg) => msg,
        };
        let msg = match msg.downcast::<BulkSelectedMsg<R>>() {
            Ok(selected) => return self.on_bulk_selected(*selected),
            Err(msg) => msg,
        };
        let msg = match msg.downcast::<FillCompletedMsg<R>>() {
            Ok(filled) => return self.on_fill_completed(*filled),
            Err(msg) => msg,
        };
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.on_key(key_msg);
        }
        None
    }

    /// Renders the visible page, the elastic banner, and a status line.
    pub fn view(&self) -> String {
        let mut out = String::new();

        if let Some(target) = self.elastic_target {
            let banner = format!("elastic selection active: maintaining {target} items");
            out.push_str(&self.styles.banner.render(&banner));
            out.push('\n');
        }

        if self.loading || self.filling {
            out.push_str(&self.styles.placeholder.render("loading…"));
            out.push('\n');
        } else if self.rows.is_empty() {
            out.push_str(&self.styles.placeholder.render("no records"));
            out.push('\n');
        } else {
            for (index, row) in self.rows.iter().enumerate() {
                let selected = self.selection.contains(row.id());
                let marker = if selected { CHECKED } else { UNCHECKED };
                let pointer = if index == self.cursor { ">" } else { " " };
                let line = truncate(&format!("{pointer} {marker} {row}"), self.width);

                let style = if index == self.cursor {
                    &self.styles.cursor_row
                } else if selected {
                    &self.styles.selected_row
                } else {
                    &self.styles.row
                };
                out.push_str(&style.render(&line));
                out.push('\n');
            }
        }

        let pages = self.pagination.page_count(self.total_records).max(1);
        let mut status = format!(
            "page {}/{} {BULLET} {} selected",
            self.pagination.page,
            pages,
            self.selection.len()
        );
        if let Some(target) = self.elastic_target {
            status.push_str(&format!(" {BULLET} target {target}"));
        }
        out.push_str(&self.styles.status_bar.render(&status));

        out
    }

    fn on_page_loaded(&mut self, msg: PageLoadedMsg<R>) -> Option<Cmd> {
        if msg.id > 0 && msg.id != self.id {
            return None;
        }

        self.rows = msg.items;
        self.total_records = msg.total;
        self.loading = false;
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));

        if !msg.failed {
            if let Some(mirror) = &self.mirror {
                mirror.page_changed(msg.page, msg.per_page);
            }
        }

        // Totals and page size land here, so this is also where fill
        // eligibility gets re-checked after any foreground change.
        self.maybe_fill()
    }

    fn on_bulk_selected(&mut self, msg: BulkSelectedMsg<R>) -> Option<Cmd> {
        if msg.id > 0 && msg.id != self.id {
            return None;
        }

        debug!(
            selected = msg.items.len(),
            target = msg.target,
            "bulk select finished"
        );
        if msg.items.len() < msg.target {
            debug!(
                shortfall = msg.target - msg.items.len(),
                "collection held fewer records than requested"
            );
        }

        self.selection.replace(msg.items);
        self.bump_tag();
        self.elastic_target = Some(msg.target);

        // The walk itself never touches visible pagination, but the user may
        // have navigated while it ran; the recorded state wins either way.
        if self.pagination.page != msg.original_page
            || self.pagination.offset != msg.original_offset
        {
            self.pagination
                .set_page(msg.original_page, self.pagination.per_page);
        }

        // The visible page always gets a foreground refresh, even when the
        // position never moved.
        Some(self.reload())
    }

    fn on_fill_completed(&mut self, msg: FillCompletedMsg<R>) -> Option<Cmd> {
        if msg.id > 0 && msg.id != self.id {
            return None;
        }

        self.filling = false;
        let moved_mid_run = msg.tag != self.selection_tag;

        if !msg.items.is_empty() {
            debug!(added = msg.items.len(), "fill run added records");
            self.selection.add_all(msg.items);
            self.bump_tag();
            return self.maybe_fill();
        }

        if moved_mid_run {
            // The selection changed while the run searched; re-check.
            return self.maybe_fill();
        }

        if msg.shortfall > 0 {
            warn!(
                shortfall = msg.shortfall,
                "elastic target could not be met from available pages"
            );
        }
        None
    }

    fn on_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if self.keymap.cursor_up.matches(key_msg) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if self.keymap.cursor_down.matches(key_msg) {
            if self.cursor + 1 < self.rows.len() {
                self.cursor += 1;
            }
        } else if self.keymap.prev_page.matches(key_msg) {
            if !self.pagination.on_first_page() {
                return Some(self.goto_page(self.pagination.page - 1));
            }
        } else if self.keymap.next_page.matches(key_msg) {
            if !self.pagination.on_last_page(self.total_records) {
                return Some(self.goto_page(self.pagination.page + 1));
            }
        } else if self.keymap.toggle_row.matches(key_msg) {
            return self.toggle_cursor_row();
        } else if self.keymap.cancel_elastic.matches(key_msg) {
            self.cancel_elastic();
        }
        None
    }

    fn toggle_cursor_row(&mut self) -> Option<Cmd> {
        let row = self.rows.get(self.cursor)?.clone();
        let new_selection = if self.selection.contains(row.id()) {
            self.selection
                .iter()
                .filter(|item| item.id() != row.id())
                .cloned()
                .collect()
        } else {
            let mut grown = self.selection.to_vec();
            grown.push(row);
            grown
        };
        self.apply_selection(new_selection)
    }

    /// Launches a fill run if elastic mode wants one and none is running.
    fn maybe_fill(&mut self) -> Option<Cmd> {
        let target = self.elastic_target?;
        if self.filling || self.selection.len() >= target {
            return None;
        }

        let needed = target - self.selection.len();
        let last_page = self.pagination.page_count(self.total_records);
        self.filling = true;
        debug!(
            needed,
            target,
            last_page,
            "elastic fill activated"
        );
        Some(fill::fill_cmd(
            Arc::clone(&self.fetcher),
            self.id,
            self.selection_tag,
            self.pagination.page + 1,
            self.pagination.per_page,
            last_page,
            needed,
            self.selection.id_set(),
            self.max_search_pages,
        ))
    }

    fn bump_tag(&mut self) {
        self.selection_tag = self.selection_tag.wrapping_add(1);
    }
}

/// Unicode-width-aware truncation with an ellipsis. A `max_width` of zero
/// disables truncation.
fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 || UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw + 1 > max_width {
            result.push('\u{2026}');
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}
