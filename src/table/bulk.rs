//! The bulk-select walk: accumulate the first N records forward from the
//! current page.
//!
//! The walk runs entirely inside a command future. It fetches pages in
//! background mode (nothing visible changes while it runs) and resolves to a
//! [`BulkSelectedMsg`] carrying the accumulated records together with the
//! pagination state to restore.

use crate::fetcher::{PageFetcher, Record};
use crate::table::types::BulkSelectedMsg;
use bubbletea_rs::{Cmd, Msg};
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) fn bulk_select_cmd<R>(
    fetcher: Arc<dyn PageFetcher<R>>,
    id: i64,
    start_page: usize,
    per_page: usize,
    original_offset: usize,
    target: usize,
) -> Cmd
where
    R: Record + Sync + 'static,
{
    Box::pin(async move {
        let mut picked: Vec<R> = Vec::with_capacity(target);
        let mut page = start_page;

        while picked.len() < target {
            let fetched = match fetcher.fetch_page(page, per_page).await {
                Ok(result) => result.items,
                Err(error) => {
                    // Partial progress is kept; the walk just stops here.
                    warn!(page, %error, "bulk select walk ended early");
                    break;
                }
            };
            if fetched.is_empty() {
                debug!(page, "no further records; bulk select walk exhausted the collection");
                break;
            }

            debug!(
                page,
                fetched = fetched.len(),
                picked = picked.len(),
                target,
                "bulk select walk processing page"
            );
            for item in fetched {
                picked.push(item);
                if picked.len() == target {
                    break;
                }
            }
            page += 1;
        }

        Some(Box::new(BulkSelectedMsg {
            id,
            items: picked,
            target,
            original_page: start_page,
            original_offset,
        }) as Msg)
    })
}
