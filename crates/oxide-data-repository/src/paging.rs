//! Sorting and pagination requests.

use serde::{Deserialize, Serialize};

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (ASC)
    #[default]
    Asc,
    /// Descending order (DESC)
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Where NULL values sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullHandling {
    /// Whatever the database does.
    #[default]
    Native,
    /// `NULLS FIRST`
    NullsFirst,
    /// `NULLS LAST`
    NullsLast,
}

/// One sort criterion over a property path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Property path, e.g. `last_name` or `address.city`.
    pub property: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: Direction,
    /// NULL placement.
    #[serde(default)]
    pub null_handling: NullHandling,
    /// Compare case-insensitively.
    #[serde(default)]
    pub ignore_case: bool,
}

impl Order {
    /// Creates a new ascending order specification.
    pub fn asc(property: impl Into<String>) -> Self {
        Self::by(property, Direction::Asc)
    }

    /// Creates a new descending order specification.
    pub fn desc(property: impl Into<String>) -> Self {
        Self::by(property, Direction::Desc)
    }

    /// Creates an order in the given direction.
    pub fn by(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
            null_handling: NullHandling::Native,
            ignore_case: false,
        }
    }

    /// Parses a compact order specification.
    ///
    /// Prefix with `-` for descending order: `"-created_at"`.
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(property) => Self::desc(property),
            None => Self::asc(spec),
        }
    }

    /// Sets the NULL placement.
    #[must_use]
    pub const fn with_null_handling(mut self, null_handling: NullHandling) -> Self {
        self.null_handling = null_handling;
        self
    }

    /// Sorts case-insensitively.
    #[must_use]
    pub const fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

/// An ordered list of sort criteria.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    /// No sorting.
    #[must_use]
    pub const fn unsorted() -> Self {
        Self { orders: Vec::new() }
    }

    /// Sorts by compact specifications, see [`Order::parse`].
    #[must_use]
    pub fn by(specs: &[&str]) -> Self {
        Self {
            orders: specs.iter().map(|spec| Order::parse(spec)).collect(),
        }
    }

    /// Appends an order.
    #[must_use]
    pub fn and(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Returns the orders.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Returns whether no order is set.
    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}

impl FromIterator<Order> for Sort {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        Self {
            orders: iter.into_iter().collect(),
        }
    }
}

/// A page request: zero-based page number, page size and sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    page: u64,
    size: u64,
    #[serde(default)]
    sort: Sort,
}

impl Pageable {
    /// Requests page `page` of `size` elements.
    #[must_use]
    pub const fn of(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    /// Adds a sort to the request.
    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Zero-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Number of rows before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Requested sort.
    #[must_use]
    pub const fn sort(&self) -> &Sort {
        &self.sort
    }
}

/// Maximum number of results, or unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Limit(Option<u64>);

impl Limit {
    /// At most `max` results.
    #[must_use]
    pub const fn of(max: u64) -> Self {
        Self(Some(max))
    }

    /// No limit.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self(None)
    }

    /// The maximum, if limited.
    #[must_use]
    pub const fn max(self) -> Option<u64> {
        self.0
    }
}
