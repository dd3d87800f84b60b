//! Messages and collaborator traits for the lazy table component.
//!
//! Every asynchronous operation the table starts resolves to one of the
//! message types here. Messages carry the originating model's instance id so
//! that applications embedding several tables can route completions to the
//! right one.

use std::sync::atomic::{AtomicI64, Ordering};

// Internal ID management for table instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generates the next unique ID for table instances.
pub(crate) fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Result of a foreground page fetch.
///
/// Foreground loads are the only fetches that touch visible state: on
/// receipt the table swaps in the rows, adopts the reported total, and
/// notifies the navigation mirror. A failed load carries an empty page and a
/// zero total, which renders as an empty listing.
#[derive(Debug, Clone)]
pub struct PageLoadedMsg<R> {
    /// Instance id of the table that issued the fetch.
    pub id: i64,
    /// The 1-based page that was requested.
    pub page: usize,
    /// The page size the fetch was issued with.
    pub per_page: usize,
    /// Records on the page, in server order. Empty on failure.
    pub items: Vec<R>,
    /// Server-reported collection size. Zero on failure.
    pub total: usize,
    /// True if the fetch failed and this message carries the degraded
    /// empty-listing state.
    pub failed: bool,
}

/// Result of a bulk-select walk.
///
/// The walk itself runs in background mode; visible state is only touched
/// when this message is applied, which also restores the pagination state
/// recorded at invocation time.
#[derive(Debug, Clone)]
pub struct BulkSelectedMsg<R> {
    /// Instance id of the table that issued the walk.
    pub id: i64,
    /// The accumulated records, at most `target` of them.
    pub items: Vec<R>,
    /// The requested selection size; becomes the elastic target.
    pub target: usize,
    /// Page in effect when the walk started.
    pub original_page: usize,
    /// First-row offset in effect when the walk started.
    pub original_offset: usize,
}

/// Result of one elastic fill run.
#[derive(Debug, Clone)]
pub struct FillCompletedMsg<R> {
    /// Instance id of the table that issued the run.
    pub id: i64,
    /// Selection revision the run was launched against. A mismatch on
    /// receipt means the selection changed mid-run and the trigger must be
    /// re-evaluated.
    pub tag: u64,
    /// Newly found records, not previously selected.
    pub items: Vec<R>,
    /// How many records the run still needed when it stopped.
    pub shortfall: usize,
}

/// Sink for shareable navigation state.
///
/// The table reports `(page, per_page)` here after every successful
/// foreground page change so the application can mirror it into a URL,
/// breadcrumb, or other bookmarkable state. Background fetches never report.
pub trait NavigationMirror: Send + Sync {
    /// Called with the page and page size now visible to the user.
    fn page_changed(&self, page: usize, per_page: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_ids_are_unique() {
        let first = next_id();
        let second = next_id();
        assert_ne!(first, second);
        assert!(second > 0);
    }
}
