//! Error types for derived repository queries.

use oxide_data_core::DialectError;
use thiserror::Error;

/// Repository errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The dialect rejected the statement (arrays, pagination, resolution).
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// A query could not be derived from a method name or path.
    #[error("cannot derive query for `{method}`: {reason}")]
    InvalidDerivation {
        /// Method name or path description.
        method: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Invocation arguments do not fit the derived query.
    #[error("invalid arguments for `{method}`: {reason}")]
    InvalidArguments {
        /// Method name.
        method: String,
        /// What is wrong with them.
        reason: String,
    },

    /// A single-result query matched more than one row.
    #[error("query `{method}` returned more than one result")]
    NonUniqueResult {
        /// Method name.
        method: String,
    },

    /// A count query returned a negative number.
    #[error("count query for `{method}` returned {count}")]
    InvalidCount {
        /// Method name.
        method: String,
        /// The value the database returned.
        count: i64,
    },

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub(crate) fn derivation(method: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDerivation {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn arguments(method: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
