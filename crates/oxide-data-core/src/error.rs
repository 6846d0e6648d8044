//! Error types for dialect handling.

use thiserror::Error;

use crate::dialect::DialectKind;
use crate::types::PropertyType;

/// Errors raised while resolving or applying a dialect.
#[derive(Debug, Error)]
pub enum DialectError {
    /// No registered provider recognised the connection.
    #[error("no dialect found for database `{product}` (version {version})")]
    UnsupportedDialect {
        /// Product name reported by the driver.
        product: String,
        /// Product version reported by the driver.
        version: String,
    },

    /// An array value was bound against a dialect without array columns.
    #[error("dialect {dialect} cannot bind array property `{property}` of type {property_type}")]
    UnsupportedArrayType {
        /// The dialect that rejected the binding.
        dialect: DialectKind,
        /// Property path being bound.
        property: String,
        /// The property's type.
        property_type: PropertyType,
    },

    /// A sequence query was requested from a dialect without sequences.
    #[error("dialect {0} does not support sequences")]
    SequencesUnsupported(DialectKind),

    /// Pagination was requested from a dialect without limit support.
    #[error("dialect {0} does not support limiting result sets")]
    PaginationUnsupported(DialectKind),

    /// The connection metadata could not be read.
    #[error("failed to read connection metadata: {0}")]
    Probe(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;
