//! The page-fetching contract between the table component and a remote,
//! paginated listing API.
//!
//! The table never talks to a network directly. It asks a [`PageFetcher`] for
//! one page at a time and reacts to the result. Implement the trait over your
//! HTTP client (or anything else that can produce pages); the component takes
//! care of when to fetch and what to do with the items.
//!
//! A successful fetch that returns zero items is a legitimate terminal
//! signal: it means no further pages exist. It is not an error.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Stable unique identity of a record.
///
/// Identity is the only attribute the selection and fill algorithms depend
/// on; everything else on a record is display data.
pub type RecordId = i64;

/// Trait for rows served by a paginated listing API.
///
/// Records must be displayable (for the default row rendering) and cloneable
/// (they move between the fetcher, the visible page, and the selection).
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazytable::fetcher::{Record, RecordId};
/// use std::fmt::Display;
///
/// #[derive(Clone)]
/// struct Artwork {
///     id: i64,
///     title: String,
/// }
///
/// impl Display for Artwork {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{}", self.title)
///     }
/// }
///
/// impl Record for Artwork {
///     fn id(&self) -> RecordId {
///         self.id
///     }
/// }
/// ```
pub trait Record: Display + Clone + Send {
    /// Returns the record's stable unique identity.
    fn id(&self) -> RecordId;
}

/// One page of results plus the server-reported collection size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<R> {
    /// Records on this page, in server order.
    pub items: Vec<R>,
    /// Total number of records in the collection, as reported by the server.
    pub total: usize,
}

/// Failure modes of a page fetch.
///
/// Fetch failures never escape the table component as panics or poisoned
/// state: a foreground failure renders as an empty listing, a background
/// failure ends the walk early and keeps whatever was already accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status code.
    #[error("listing request returned status {status}")]
    Status {
        /// The HTTP-like status code reported by the backend.
        status: u16,
    },
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Boxed future returned by [`PageFetcher::fetch_page`].
pub type FetchFuture<'a, R> =
    Pin<Box<dyn Future<Output = Result<Page<R>, FetchError>> + Send + 'a>>;

/// One-page-at-a-time access to a remote listing.
///
/// `page` is 1-based. Implementations are pure request/response: they know
/// nothing about selection state or which fetches are foreground vs
/// background.
pub trait PageFetcher<R>: Send + Sync {
    /// Fetches one page of up to `per_page` records.
    fn fetch_page(&self, page: usize, per_page: usize) -> FetchFuture<'_, R>;
}

/// A ready-to-use record with an id and a title.
///
/// Handy for demos and tests, and for applications whose rows are simple
/// labeled entries.
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazytable::fetcher::{DefaultRecord, Record};
///
/// let record = DefaultRecord::new(7, "Composition in Red");
/// assert_eq!(record.id(), 7);
/// assert_eq!(record.to_string(), "Composition in Red");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRecord {
    id: RecordId,
    title: String,
}

impl DefaultRecord {
    /// Creates a record with the given identity and title.
    pub fn new(id: RecordId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Returns the record's title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Display for DefaultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl Record for DefaultRecord {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// In-memory [`PageFetcher`] backed by a `Vec`.
///
/// Slices the vector into pages and reports its length as the total. Useful
/// for demos, tests, and small collections that are already local.
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazytable::fetcher::{DefaultRecord, VecFetcher};
///
/// let records: Vec<DefaultRecord> = (1..=30)
///     .map(|i| DefaultRecord::new(i, format!("record {i}")))
///     .collect();
/// let fetcher = VecFetcher::new(records);
/// ```
#[derive(Debug, Clone)]
pub struct VecFetcher<R> {
    records: Vec<R>,
}

impl<R> VecFetcher<R> {
    /// Creates a fetcher serving pages out of the given records.
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R: Record + Sync> PageFetcher<R> for VecFetcher<R> {
    fn fetch_page(&self, page: usize, per_page: usize) -> FetchFuture<'_, R> {
        let total = self.records.len();
        let start = page.saturating_sub(1).saturating_mul(per_page);
        let items = if start >= total {
            Vec::new()
        } else {
            self.records[start..(start + per_page).min(total)].to_vec()
        };
        Box::pin(async move { Ok(Page { items, total }) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<DefaultRecord> {
        (1..=n as i64)
            .map(|i| DefaultRecord::new(i, format!("record {i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_vec_fetcher_slices_pages() {
        let fetcher = VecFetcher::new(records(25));

        let first = fetcher.fetch_page(1, 10).await.unwrap();
        assert_eq!(first.total, 25);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].id(), 1);

        let last = fetcher.fetch_page(3, 10).await.unwrap();
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[0].id(), 21);
    }

    #[tokio::test]
    async fn test_vec_fetcher_past_end_is_empty() {
        let fetcher = VecFetcher::new(records(25));

        let page = fetcher.fetch_page(4, 10).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 25);
    }

    #[test]
    fn test_fetch_error_display() {
        let status = FetchError::Status { status: 503 };
        assert_eq!(status.to_string(), "listing request returned status 503");

        let transport = FetchError::Transport("connection reset".into());
        assert_eq!(transport.to_string(), "transport failure: connection reset");
    }
}
