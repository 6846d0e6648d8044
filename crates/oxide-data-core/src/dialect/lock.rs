//! Row locking clauses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Requested pessimistic lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Shared lock: others may read but not write.
    PessimisticRead,
    /// Exclusive lock.
    PessimisticWrite,
}

/// Where the renderer places the lock fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPosition {
    /// Right after the table in the FROM clause (table hints).
    AfterFromTable,
    /// At the end of the statement.
    AfterOrderBy,
}

/// Locking strategy of a dialect.
#[derive(Clone, Copy)]
pub struct LockClause {
    render: fn(LockMode, &str) -> String,
    position: LockPosition,
}

impl LockClause {
    /// A dialect without row locking. Renders an empty fragment.
    pub const NONE: Self = Self::new(no_lock, LockPosition::AfterOrderBy);

    /// Creates a lock clause.
    ///
    /// `render` receives the lock mode and the already rendered table
    /// identifier of the locked table.
    #[must_use]
    pub const fn new(render: fn(LockMode, &str) -> String, position: LockPosition) -> Self {
        Self { render, position }
    }

    /// Fragment for `mode` on `table`. Empty when locking is unsupported.
    #[must_use]
    pub fn lock(&self, mode: LockMode, table: &str) -> String {
        (self.render)(mode, table)
    }

    /// Where the fragment goes.
    #[must_use]
    pub const fn position(&self) -> LockPosition {
        self.position
    }
}

impl fmt::Debug for LockClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockClause")
            .field("read", &self.lock(LockMode::PessimisticRead, "<table>"))
            .field("write", &self.lock(LockMode::PessimisticWrite, "<table>"))
            .field("position", &self.position)
            .finish()
    }
}

fn no_lock(_: LockMode, _: &str) -> String {
    String::new()
}
