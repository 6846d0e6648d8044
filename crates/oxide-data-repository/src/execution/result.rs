//! Shapes of query results.

/// A chunk of results that knows whether more rows follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice<R> {
    /// Rows of this slice.
    pub content: Vec<R>,
    /// Zero-based page number.
    pub number: u64,
    /// Requested page size.
    pub size: u64,
    /// Whether a following slice has rows.
    pub has_next: bool,
}

impl<R> Slice<R> {
    /// Returns whether a previous slice exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 0
    }
}

/// A chunk of results with the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<R> {
    /// Rows of this page.
    pub content: Vec<R>,
    /// Zero-based page number.
    pub number: u64,
    /// Requested page size.
    pub size: u64,
    /// Total number of rows across all pages.
    pub total: u64,
}

impl<R> Page<R> {
    /// Number of pages. A page size of zero gives a single page.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.size == 0 {
            1
        } else {
            self.total.div_ceil(self.size)
        }
    }

    /// Returns whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages()
    }
}

/// Result of executing a repository query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult<R> {
    /// Zero or one row.
    One(Option<R>),
    /// All matching rows.
    Many(Vec<R>),
    /// A slice.
    Slice(Slice<R>),
    /// A page.
    Page(Page<R>),
    /// A row count.
    Count(u64),
    /// Whether any row matched.
    Exists(bool),
    /// Number of deleted rows.
    Deleted(u64),
}

impl<R> QueryResult<R> {
    /// Returns the rows, whatever the shape. Empty for scalar results.
    #[must_use]
    pub fn into_rows(self) -> Vec<R> {
        match self {
            Self::One(row) => row.into_iter().collect(),
            Self::Many(rows) => rows,
            Self::Slice(slice) => slice.content,
            Self::Page(page) => page.content,
            Self::Count(_) | Self::Exists(_) | Self::Deleted(_) => Vec::new(),
        }
    }
}
