#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-lazytable/")]

//! # bubbletea-lazytable
//!
//! Lazy pagination and elastic cross-page selection components for building
//! terminal applications with [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! Most table widgets hold all of their rows in memory. This crate is for
//! the other case: a collection that lives behind a remote, paginated
//! listing API and is only ever seen one page at a time. The centerpiece is
//! [`LazyTable`], a component that fetches pages on demand and maintains a
//! selection that can span pages the user has never visited:
//!
//! - **Bulk select**: "select the first 25 records" walks forward from the
//!   current page in the background, selecting across page boundaries, then
//!   puts the user back exactly where they were.
//! - **Elastic selection**: after a bulk select, the requested count becomes
//!   a target. Deselect a record and the table quietly searches subsequent
//!   pages for a replacement, keeping the selection at the target size. The
//!   search is bounded, deduplicated by record id, and never disturbs the
//!   visible page.
//! - **User intent wins**: manually selecting more records, or clearing the
//!   selection, drops the elastic target on the spot.
//!
//! Components follow the Elm Architecture pattern with `update()` and
//! `view()` methods; network work happens inside commands, so everything
//! composes with the bubbletea-rs runtime in the usual way.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`LazyTable`] | Paginated table model with elastic selection |
//! | [`Pagination`] | 1-based page / page-size / offset state |
//! | [`Selection`] | Ordered selection, unique by record id |
//! | [`PageFetcher`] | Trait connecting the table to your listing API |
//! | [`VecFetcher`] | In-memory fetcher for tests and local data |
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_lazytable::prelude::*;
//! use std::sync::Arc;
//!
//! // Rows normally come from an HTTP client implementing PageFetcher;
//! // VecFetcher serves the same contract from a Vec.
//! let records: Vec<DefaultRecord> = (1..=100)
//!     .map(|i| DefaultRecord::new(i, format!("record {i}")))
//!     .collect();
//!
//! let mut table: LazyTable<DefaultRecord> =
//!     LazyTable::new(Arc::new(VecFetcher::new(records)), 1, 12);
//!
//! // From your model's init(): populate the first page.
//! let init_cmd = table.reload();
//!
//! // From your update(): ask for 25 records, then forward the resulting
//! // messages back into table.update(msg).
//! let bulk_cmd = table.select_first(25);
//! assert!(bulk_cmd.is_some());
//! ```
//!
//! The fetches themselves are driven by the bubbletea-rs runtime executing
//! the returned commands; forward every message your application receives
//! to [`LazyTable::update`] and render [`LazyTable::view`].

pub mod fetcher;
pub mod key;
pub mod pagination;
pub mod selection;
pub mod table;

pub use fetcher::{
    DefaultRecord, FetchError, FetchFuture, Page, PageFetcher, Record, RecordId, VecFetcher,
};
pub use key::{Binding, KeyMap};
pub use pagination::Model as Pagination;
pub use selection::Selection;
pub use table::{
    BulkSelectedMsg, FillCompletedMsg, Model as LazyTable, NavigationMirror, PageLoadedMsg,
    TableKeyMap, TableStyles, DEFAULT_MAX_SEARCH_PAGES,
};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use bubbletea_lazytable::prelude::*;
/// ```
pub mod prelude {
    pub use crate::fetcher::{
        DefaultRecord, FetchError, FetchFuture, Page, PageFetcher, Record, RecordId, VecFetcher,
    };
    pub use crate::key::{Binding, KeyMap};
    pub use crate::pagination::Model as Pagination;
    pub use crate::selection::Selection;
    pub use crate::table::{
        BulkSelectedMsg, FillCompletedMsg, Model as LazyTable, NavigationMirror, PageLoadedMsg,
        TableKeyMap, TableStyles, DEFAULT_MAX_SEARCH_PAGES,
    };
}
