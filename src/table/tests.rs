//! Integration tests for the lazy table: bulk selection walks, elastic
//! refills, reconciliation of user edits, and the fetch bounds.
//!
//! Commands are driven the way the runtime would: each returned `Cmd` is
//! awaited and the resulting message fed back into `update()` until the
//! model goes quiet.

use super::*;
use crate::fetcher::{DefaultRecord, FetchError, FetchFuture, Page, PageFetcher, Record};
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::strip_ansi;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory fetcher that counts calls and can be told to start failing
/// from a given call number (1-based).
struct CountingFetcher {
    records: Vec<DefaultRecord>,
    calls: AtomicUsize,
    fail_from_call: Option<usize>,
}

impl CountingFetcher {
    fn new(record_count: usize) -> Self {
        Self {
            records: (1..=record_count as i64)
                .map(|i| DefaultRecord::new(i, format!("record {i}")))
                .collect(),
            calls: AtomicUsize::new(0),
            fail_from_call: None,
        }
    }

    fn failing_from(record_count: usize, call: usize) -> Self {
        let mut fetcher = Self::new(record_count);
        fetcher.fail_from_call = Some(call);
        fetcher
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageFetcher<DefaultRecord> for CountingFetcher {
    fn fetch_page(&self, page: usize, per_page: usize) -> FetchFuture<'_, DefaultRecord> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(from) = self.fail_from_call {
            if call >= from {
                return Box::pin(async { Err(FetchError::Transport("connection reset".into())) });
            }
        }

        let total = self.records.len();
        let start = page.saturating_sub(1) * per_page;
        let items = if start >= total {
            Vec::new()
        } else {
            self.records[start..(start + per_page).min(total)].to_vec()
        };
        Box::pin(async move { Ok(Page { items, total }) })
    }
}

#[derive(Default)]
struct RecordingMirror {
    pages: Mutex<Vec<(usize, usize)>>,
}

impl NavigationMirror for RecordingMirror {
    fn page_changed(&self, page: usize, per_page: usize) {
        self.pages.lock().unwrap().push((page, per_page));
    }
}

/// Awaits commands and feeds the resulting messages back into the model
/// until no follow-up command is produced.
async fn drain(table: &mut Model<DefaultRecord>, mut cmd: Option<Cmd>) {
    while let Some(pending) = cmd {
        let Some(msg) = pending.await else { break };
        cmd = table.update(msg);
    }
}

fn selected_ids(table: &Model<DefaultRecord>) -> Vec<i64> {
    table.selection().iter().map(Record::id).collect()
}

fn key(code: KeyCode) -> Msg {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    }) as Msg
}

async fn loaded_table(
    fetcher: Arc<CountingFetcher>,
    page: usize,
    per_page: usize,
) -> Model<DefaultRecord> {
    let mut table = Model::new(fetcher, page, per_page);
    let init = table.reload();
    drain(&mut table, Some(init)).await;
    table
}

#[tokio::test]
async fn test_bulk_select_exact_count() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;

    assert_eq!(table.selection().len(), 25);
    assert_eq!(selected_ids(&table), (1..=25).collect::<Vec<i64>>());
    assert_eq!(table.elastic_target(), Some(25));
    assert_eq!(table.pagination().page, 1);
    assert_eq!(table.pagination().offset, 0);
    assert!(!table.loading());
    assert!(!table.filling());
}

#[tokio::test]
async fn test_bulk_select_restores_page_after_navigation() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    // Start the walk, then navigate away before its result lands.
    let bulk = table.select_first(5);
    let nav = table.goto_page(3);
    drain(&mut table, Some(nav)).await;
    assert_eq!(table.pagination().page, 3);

    drain(&mut table, bulk).await;

    assert_eq!(table.pagination().page, 1);
    assert_eq!(table.pagination().offset, 0);
    assert_eq!(table.rows()[0].id(), 1);
    assert_eq!(selected_ids(&table), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_bulk_select_exhausts_collection() {
    let fetcher = Arc::new(CountingFetcher::new(10));
    let mut table = loaded_table(fetcher.clone(), 1, 4).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;

    // Everything reachable is selected and elastic mode still engages.
    assert_eq!(table.selection().len(), 10);
    assert_eq!(table.elastic_target(), Some(25));
    assert!(!table.filling());

    // init 1 + walk 4 (three full/partial pages, one empty terminal page)
    // + post-walk refresh 1 + one bounded fill pass over pages 2..=3.
    assert_eq!(fetcher.calls(), 8);
}

#[tokio::test]
async fn test_bulk_select_is_idempotent() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;
    let first_ids = selected_ids(&table);

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;

    assert_eq!(selected_ids(&table), first_ids);
    assert_eq!(table.elastic_target(), Some(25));
}

#[tokio::test]
async fn test_invalid_target_is_rejected_before_any_fetch() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher.clone(), 1, 12).await;
    let calls_before = fetcher.calls();

    assert!(table.select_first(0).is_none());
    assert!(table.select_first(-5).is_none());

    assert_eq!(fetcher.calls(), calls_before);
    assert!(table.selection().is_empty());
    assert_eq!(table.elastic_target(), None);
}

#[tokio::test]
async fn test_elastic_refill_after_deselect() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;
    let before_removal = selected_ids(&table);

    let cmd = table.deselect(1);
    drain(&mut table, cmd).await;

    // Back at the target, with a record that was never selected before.
    assert_eq!(table.selection().len(), 25);
    assert!(!table.selection().contains(1));
    assert!(table.selection().contains(26));
    assert!(!before_removal.contains(&26));
    assert_eq!(table.elastic_target(), Some(25));

    // The refill ran in the background; the visible page never moved.
    assert_eq!(table.pagination().page, 1);
    assert_eq!(table.rows()[0].id(), 1);
}

#[tokio::test]
async fn test_refill_respects_search_cap() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher.clone(), 1, 10).await;

    let cmd = table.select_first(100);
    drain(&mut table, cmd).await;
    assert_eq!(table.selection().len(), 100);

    let calls_before = fetcher.calls();
    let cmd = table.deselect(5);
    drain(&mut table, cmd).await;

    // Every forward page is already fully selected, so the search gives up
    // at the per-run cap instead of scanning all 10 pages.
    assert_eq!(fetcher.calls() - calls_before, DEFAULT_MAX_SEARCH_PAGES);
    assert_eq!(table.selection().len(), 99);
    assert_eq!(table.elastic_target(), Some(100));
    assert!(!table.filling());
}

#[tokio::test]
async fn test_refill_respects_last_known_page() {
    let fetcher = Arc::new(CountingFetcher::new(30));
    let mut table = loaded_table(fetcher.clone(), 1, 10).await;

    let cmd = table.select_first(30);
    drain(&mut table, cmd).await;

    let calls_before = fetcher.calls();
    let cmd = table.deselect(1);
    drain(&mut table, cmd).await;

    // Only pages 2 and 3 exist beyond the visible one; the cap of 5 never
    // comes into play.
    assert_eq!(fetcher.calls() - calls_before, 2);
    assert_eq!(table.selection().len(), 29);
}

#[tokio::test]
async fn test_manual_growth_cancels_elastic() {
    let fetcher = Arc::new(CountingFetcher::new(20));
    let mut table = loaded_table(fetcher.clone(), 1, 12).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;
    assert_eq!(table.selection().len(), 20);
    assert_eq!(table.elastic_target(), Some(25));

    // Adding a record by hand while below target takes over from the
    // mechanism entirely.
    let mut grown = table.selection().to_vec();
    grown.push(DefaultRecord::new(999, "added by hand"));
    let cmd = table.apply_selection(grown);

    assert!(cmd.is_none());
    assert_eq!(table.elastic_target(), None);
    assert_eq!(table.selection().len(), 21);

    // With the target gone, a later deselect no longer refills.
    let calls_before = fetcher.calls();
    let cmd = table.deselect(999);
    assert!(cmd.is_none());
    assert_eq!(fetcher.calls(), calls_before);
    assert_eq!(table.selection().len(), 20);
}

#[tokio::test]
async fn test_clearing_selection_cancels_elastic() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;

    let cmd = table.apply_selection(Vec::new());

    assert!(cmd.is_none());
    assert!(table.selection().is_empty());
    assert_eq!(table.elastic_target(), None);
}

#[tokio::test]
async fn test_equal_size_replacement_keeps_mode_and_stays_quiet() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher.clone(), 1, 12).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;

    // Swap record 1 for record 99 in a single event: the size is unchanged,
    // so the mode stays on and nothing is fetched.
    let mut swapped: Vec<DefaultRecord> =
        table.selection().iter().skip(1).cloned().collect();
    swapped.push(DefaultRecord::new(99, "record 99"));
    let calls_before = fetcher.calls();

    let cmd = table.apply_selection(swapped);

    assert!(cmd.is_none());
    assert_eq!(table.elastic_target(), Some(25));
    assert_eq!(table.selection().len(), 25);
    assert!(table.selection().contains(99));
    assert!(!table.selection().contains(1));
    assert_eq!(fetcher.calls(), calls_before);
}

#[tokio::test]
async fn test_selection_edits_without_elastic_mode_never_fetch() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher.clone(), 1, 12).await;
    let calls_before = fetcher.calls();

    let first_two: Vec<DefaultRecord> = table.rows()[..2].to_vec();
    assert!(table.apply_selection(first_two).is_none());
    assert_eq!(table.selection().len(), 2);

    let first_one: Vec<DefaultRecord> = table.rows()[..1].to_vec();
    assert!(table.apply_selection(first_one).is_none());
    assert_eq!(table.selection().len(), 1);

    assert_eq!(fetcher.calls(), calls_before);
}

#[tokio::test]
async fn test_foreground_failure_renders_empty_listing() {
    let fetcher = Arc::new(CountingFetcher::failing_from(100, 1));
    let mirror = Arc::new(RecordingMirror::default());
    let mut table =
        Model::new(fetcher, 1, 12).with_navigation_mirror(mirror.clone());

    let init = table.reload();
    drain(&mut table, Some(init)).await;

    assert!(table.rows().is_empty());
    assert_eq!(table.total_records(), 0);
    assert!(!table.loading());
    assert!(mirror.pages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_background_failure_keeps_partial_progress() {
    // First call (initial load) and second call (first walk page) succeed,
    // everything after that fails.
    let fetcher = Arc::new(CountingFetcher::failing_from(100, 3));
    let mut table = loaded_table(fetcher, 1, 12).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;

    assert_eq!(selected_ids(&table), (1..=12).collect::<Vec<i64>>());
    assert_eq!(table.elastic_target(), Some(25));
    assert!(!table.filling());
}

#[tokio::test]
async fn test_navigation_mirror_sees_foreground_fetches_only() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mirror = Arc::new(RecordingMirror::default());
    let mut table =
        Model::new(fetcher, 1, 12).with_navigation_mirror(mirror.clone());

    let init = table.reload();
    drain(&mut table, Some(init)).await;

    let cmd = table.select_first(30);
    drain(&mut table, cmd).await;

    let cmd = table.goto_page(2);
    drain(&mut table, Some(cmd)).await;

    // Initial load, post-walk refresh, explicit navigation; the walk's
    // background fetches reported nothing.
    let pages = mirror.pages.lock().unwrap();
    assert_eq!(*pages, vec![(1, 12), (1, 12), (2, 12)]);
}

#[tokio::test]
async fn test_set_per_page_keeps_first_visible_row() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 3, 12).await;
    assert_eq!(table.pagination().offset, 24);

    let cmd = table.set_per_page(6);
    drain(&mut table, Some(cmd)).await;

    assert_eq!(table.pagination().page, 5);
    assert_eq!(table.rows()[0].id(), 25);
}

#[tokio::test]
async fn test_toggle_key_routes_through_reconciler() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    assert!(table.update(key(KeyCode::Char(' '))).is_none());
    assert_eq!(selected_ids(&table), vec![1]);

    assert!(table.update(key(KeyCode::Char(' '))).is_none());
    assert!(table.selection().is_empty());
}

#[tokio::test]
async fn test_cursor_and_page_keys() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    table.update(key(KeyCode::Down));
    table.update(key(KeyCode::Down));
    assert_eq!(table.cursor(), 2);
    table.update(key(KeyCode::Up));
    assert_eq!(table.cursor(), 1);

    // Already on the first page; prev is a no-op.
    assert!(table.update(key(KeyCode::Left)).is_none());

    let cmd = table.update(key(KeyCode::Right));
    assert!(cmd.is_some());
    drain(&mut table, cmd).await;
    assert_eq!(table.pagination().page, 2);
    assert_eq!(table.rows()[0].id(), 13);

    let cmd = table.update(key(KeyCode::Left));
    drain(&mut table, cmd).await;
    assert_eq!(table.pagination().page, 1);
}

#[tokio::test]
async fn test_escape_cancels_elastic_mode() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    let cmd = table.select_first(5);
    drain(&mut table, cmd).await;
    assert_eq!(table.elastic_target(), Some(5));

    assert!(table.update(key(KeyCode::Esc)).is_none());
    assert_eq!(table.elastic_target(), None);
    assert_eq!(table.selection().len(), 5);
}

#[tokio::test]
async fn test_messages_for_other_instances_are_ignored() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    let foreign = Box::new(PageLoadedMsg::<DefaultRecord> {
        id: table.id() + 1,
        page: 9,
        per_page: 12,
        items: Vec::new(),
        total: 0,
        failed: false,
    }) as Msg;

    assert!(table.update(foreign).is_none());
    assert_eq!(table.pagination().page, 1);
    assert_eq!(table.total_records(), 100);
    assert!(!table.rows().is_empty());
}

#[tokio::test]
async fn test_view_reflects_selection_and_elastic_state() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table = loaded_table(fetcher, 1, 12).await;

    let cmd = table.select_first(25);
    drain(&mut table, cmd).await;

    let view = strip_ansi(&table.view());
    assert!(view.contains("elastic selection active: maintaining 25 items"));
    assert!(view.contains("[x] record 1"));
    assert!(view.contains("page 1/9"));
    assert!(view.contains("25 selected"));
    assert!(view.contains("target 25"));

    table.cancel_elastic();
    let view = strip_ansi(&table.view());
    assert!(!view.contains("elastic selection active"));
    assert!(!view.contains("target"));
}

#[tokio::test]
async fn test_view_shows_placeholder_while_loading() {
    let fetcher = Arc::new(CountingFetcher::new(100));
    let mut table: Model<DefaultRecord> = Model::new(fetcher, 1, 12);

    let _cmd = table.reload();
    let view = strip_ansi(&table.view());
    assert!(view.contains("loading…"));
}
