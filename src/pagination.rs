//! Pagination state for lazily-fetched listings.
//!
//! Unlike an in-memory paginator, this model does not hold items; it is the
//! single source of truth for *where the user is* in a remote collection:
//! the 1-based page index, the page size, and the offset of the first row on
//! the page. The invariant `page == offset / per_page + 1` is maintained by
//! every mutator.

/// Pagination state: current page, page size, and first-row offset.
///
/// Pages are 1-based to match the usual `?page=&limit=` request shape of
/// listing APIs.
///
/// # Examples
///
/// ```rust
/// use bubbletea_lazytable::pagination::Model;
///
/// let mut pagination = Model::new().with_per_page(12);
/// assert_eq!(pagination.page, 1);
/// assert_eq!(pagination.offset, 0);
///
/// pagination.set_page(3, 12);
/// assert_eq!(pagination.offset, 24);
///
/// // 100 records at 12 per page span 9 pages.
/// assert_eq!(pagination.page_count(100), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model {
    /// The current page, 1-based.
    pub page: usize,
    /// The number of items per page.
    pub per_page: usize,
    /// Offset of the first row on the current page.
    pub offset: usize,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 1,
            offset: 0,
        }
    }
}

impl Model {
    /// Creates pagination state at page 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current page (builder pattern).
    pub fn with_page(mut self, page: usize) -> Self {
        self.set_page(page, self.per_page);
        self
    }

    /// Sets the page size (builder pattern). Values below 1 are clamped to 1.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.set_page(self.page, per_page);
        self
    }

    /// Moves to the given page at the given page size, recomputing the
    /// offset. `page` is clamped to at least 1, `per_page` to at least 1.
    pub fn set_page(&mut self, page: usize, per_page: usize) {
        self.page = page.max(1);
        self.per_page = per_page.max(1);
        self.offset = (self.page - 1) * self.per_page;
    }

    /// Derives the page index from a first-row offset, as persisted
    /// navigation state usually stores it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_lazytable::pagination::Model;
    ///
    /// let mut pagination = Model::new();
    /// pagination.from_offset(24, 12);
    /// assert_eq!(pagination.page, 3);
    /// ```
    pub fn from_offset(&mut self, offset: usize, per_page: usize) {
        self.per_page = per_page.max(1);
        self.offset = offset;
        self.page = offset / self.per_page + 1;
    }

    /// Number of pages needed for `total_items` records at the current page
    /// size. Returns 0 for an empty collection.
    pub fn page_count(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.per_page)
    }

    /// Returns true if the current page is the first one.
    pub fn on_first_page(&self) -> bool {
        self.page == 1
    }

    /// Returns true if the current page is at or past the last page for
    /// `total_items` records.
    pub fn on_last_page(&self, total_items: usize) -> bool {
        self.page >= self.page_count(total_items).max(1)
    }
}
