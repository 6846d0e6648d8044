//! Pagination clauses.

/// Where the renderer places the limit fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitPosition {
    /// Directly after the WHERE clause, before ORDER BY.
    AfterWhere,
    /// After the ORDER BY clause.
    AfterOrderBy,
    /// The dialect cannot limit result sets.
    None,
}

/// Pagination strategy of a dialect.
///
/// Every fragment is a complete clause. Limit and offset are interpolated as
/// literals and never become bind parameters, so two statements that differ
/// only in their page have different SQL text.
#[derive(Debug, Clone, Copy)]
pub struct LimitClause {
    limit: fn(u64) -> String,
    offset: fn(u64) -> String,
    limit_offset: fn(u64, u64) -> String,
    position: LimitPosition,
    synthetic_order_by: Option<&'static str>,
}

impl LimitClause {
    /// A dialect without any limiting support.
    pub const UNSUPPORTED: Self = Self {
        limit: no_limit,
        offset: no_limit,
        limit_offset: no_limit_offset,
        position: LimitPosition::None,
        synthetic_order_by: None,
    };

    /// Creates a limit clause from its three fragment functions.
    #[must_use]
    pub const fn new(
        limit: fn(u64) -> String,
        offset: fn(u64) -> String,
        limit_offset: fn(u64, u64) -> String,
        position: LimitPosition,
    ) -> Self {
        Self {
            limit,
            offset,
            limit_offset,
            position,
            synthetic_order_by: None,
        }
    }

    /// Declares an ORDER BY the dialect needs before it accepts a limit.
    #[must_use]
    pub const fn with_synthetic_order_by(mut self, order_by: &'static str) -> Self {
        self.synthetic_order_by = Some(order_by);
        self
    }

    /// Fragment limiting the result to `limit` rows.
    #[must_use]
    pub fn limit(&self, limit: u64) -> String {
        (self.limit)(limit)
    }

    /// Fragment skipping `offset` rows.
    #[must_use]
    pub fn offset(&self, offset: u64) -> String {
        (self.offset)(offset)
    }

    /// Fragment combining both.
    ///
    /// This is not necessarily `offset` followed by `limit`; several vendors
    /// use different keywords when both are present.
    #[must_use]
    pub fn limit_offset(&self, limit: u64, offset: u64) -> String {
        (self.limit_offset)(limit, offset)
    }

    /// Where the fragment goes.
    #[must_use]
    pub const fn position(&self) -> LimitPosition {
        self.position
    }

    /// ORDER BY clause to emit when paginating an unsorted query.
    #[must_use]
    pub const fn synthetic_order_by(&self) -> Option<&'static str> {
        self.synthetic_order_by
    }

    /// Picks the fragment for the requested combination.
    ///
    /// Returns `None` when neither a limit nor an offset is requested.
    #[must_use]
    pub fn fragment(&self, limit: Option<u64>, offset: Option<u64>) -> Option<String> {
        match (limit, offset) {
            (Some(limit), Some(offset)) => Some(self.limit_offset(limit, offset)),
            (Some(limit), None) => Some(self.limit(limit)),
            (None, Some(offset)) => Some(self.offset(offset)),
            (None, None) => None,
        }
    }
}

fn no_limit(_: u64) -> String {
    String::new()
}

fn no_limit_offset(_: u64, _: u64) -> String {
    String::new()
}
