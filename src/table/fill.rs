//! The elastic fill run: search forward pages for records that are not yet
//! selected.
//!
//! A run is launched when the selection drops below the elastic target. It
//! scans pages after the currently visible one, skipping already-selected
//! ids, and resolves to a [`FillCompletedMsg`] with whatever it found. Two
//! independent limits bound a run: the last page the server reports existing,
//! and [`DEFAULT_MAX_SEARCH_PAGES`] fetches per run.

use crate::fetcher::{PageFetcher, Record, RecordId};
use crate::table::types::FillCompletedMsg;
use bubbletea_rs::{Cmd, Msg};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default cap on page fetches in a single fill run.
///
/// Without a cap, a target exceeding the number of reachable unselected
/// records would make every deselect click scan the entire remaining
/// collection. Tune per table with
/// [`with_max_search_pages`](crate::table::Model::with_max_search_pages).
pub const DEFAULT_MAX_SEARCH_PAGES: usize = 5;

#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_cmd<R>(
    fetcher: Arc<dyn PageFetcher<R>>,
    id: i64,
    tag: u64,
    start_page: usize,
    per_page: usize,
    last_page: usize,
    needed: usize,
    mut exclude: HashSet<RecordId>,
    max_search_pages: usize,
) -> Cmd
where
    R: Record + Sync + 'static,
{
    Box::pin(async move {
        let mut found: Vec<R> = Vec::new();
        let mut remaining = needed;
        let mut page = start_page;
        let mut searched = 0usize;

        while remaining > 0 && page <= last_page && searched < max_search_pages {
            debug!(page, remaining, "fill run searching page");
            let fetched = match fetcher.fetch_page(page, per_page).await {
                Ok(result) => result.items,
                Err(error) => {
                    warn!(page, %error, "fill run ended early");
                    break;
                }
            };
            searched += 1;
            if fetched.is_empty() {
                debug!(page, "no further records; fill run exhausted the collection");
                break;
            }

            for item in fetched {
                if remaining == 0 {
                    break;
                }
                if exclude.insert(item.id()) {
                    remaining -= 1;
                    found.push(item);
                }
            }
            page += 1;
        }

        debug!(
            found = found.len(),
            shortfall = remaining,
            searched,
            "fill run finished"
        );
        Some(Box::new(FillCompletedMsg {
            id,
            tag,
            items: found,
            shortfall: remaining,
        }) as Msg)
    })
}
