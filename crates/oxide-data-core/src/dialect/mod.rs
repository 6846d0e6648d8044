//! SQL Dialect support.
//!
//! Different databases disagree on pagination, locking, array columns,
//! identifier folding and key retrieval. A [`Dialect`] bundles one strategy
//! for each of these concerns. The set of vendors is closed: every dialect
//! is identified by a [`DialectKind`] and built from that vendor's module.
//!
//! Dialects are plain `Copy` values with no interior state. Resolve one per
//! data source and pass it around by value.
//!
//! ```rust
//! use oxide_data_core::dialect::{Dialect, DialectKind};
//!
//! let h2 = Dialect::of(DialectKind::H2);
//! assert_eq!(
//!     h2.limit_clause().limit_offset(10, 20),
//!     "OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY"
//! );
//! ```

mod ansi;
mod array;
mod db2;
mod h2;
mod hsqldb;
mod id_generation;
mod limit;
mod lock;
mod mariadb;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use array::ArrayColumns;
pub use id_generation::IdGeneration;
pub use limit::{LimitClause, LimitPosition};
pub use lock::{LockClause, LockMode, LockPosition};

use crate::bind::BindMarkers;
use crate::error::{DialectError, Result};
use crate::escape::LikeEscaper;
use crate::identifier::IdentifierProcessing;
use crate::types::{PropertyType, VendorType};
use crate::value::{SqlArray, SqlValue};

/// The supported database vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    Ansi,
    H2,
    HsqlDb,
    Postgres,
    MySql,
    MariaDb,
    SqlServer,
    Oracle,
    Db2,
    Sqlite,
}

impl DialectKind {
    /// All vendors, in resolution order of the built-in providers.
    pub const ALL: [Self; 10] = [
        Self::HsqlDb,
        Self::H2,
        Self::MySql,
        Self::MariaDb,
        Self::Postgres,
        Self::SqlServer,
        Self::Db2,
        Self::Oracle,
        Self::Sqlite,
        Self::Ansi,
    ];

    /// Returns the name of the dialect.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ansi => "ansi",
            Self::H2 => "h2",
            Self::HsqlDb => "hsqldb",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::SqlServer => "sqlserver",
            Self::Oracle => "oracle",
            Self::Db2 => "db2",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| format!("unknown dialect `{s}`"))
    }
}

/// Whether `NULLS FIRST` / `NULLS LAST` may be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPrecedence {
    /// Standard `NULLS FIRST` / `NULLS LAST`.
    SqlStandard,
    /// The vendor has no syntax for it; hints are dropped.
    Unsupported,
}

/// Vendor-specific SQL generation rules.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    kind: DialectKind,
    identifier_processing: IdentifierProcessing,
    limit_clause: LimitClause,
    lock_clause: LockClause,
    array_columns: ArrayColumns,
    id_generation: IdGeneration,
    simple_types: &'static [VendorType],
    like_escaper: LikeEscaper,
    bind_markers: BindMarkers,
    null_precedence: NullPrecedence,
}

impl Dialect {
    /// Returns the dialect of a vendor.
    #[must_use]
    pub const fn of(kind: DialectKind) -> Self {
        match kind {
            DialectKind::Ansi => ansi::DIALECT,
            DialectKind::H2 => h2::DIALECT,
            DialectKind::HsqlDb => hsqldb::DIALECT,
            DialectKind::Postgres => postgres::DIALECT,
            DialectKind::MySql => mysql::DIALECT,
            DialectKind::MariaDb => mariadb::DIALECT,
            DialectKind::SqlServer => sqlserver::DIALECT,
            DialectKind::Oracle => oracle::DIALECT,
            DialectKind::Db2 => db2::DIALECT,
            DialectKind::Sqlite => sqlite::DIALECT,
        }
    }

    /// Returns the vendor.
    #[must_use]
    pub const fn kind(&self) -> DialectKind {
        self.kind
    }

    /// Returns the name of the dialect.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns the identifier quoting and casing rules.
    #[must_use]
    pub const fn identifier_processing(&self) -> IdentifierProcessing {
        self.identifier_processing
    }

    /// Returns the pagination strategy.
    #[must_use]
    pub const fn limit_clause(&self) -> &LimitClause {
        &self.limit_clause
    }

    /// Returns the locking strategy.
    #[must_use]
    pub const fn lock_clause(&self) -> &LockClause {
        &self.lock_clause
    }

    /// Returns the array column strategy.
    #[must_use]
    pub const fn array_support(&self) -> &ArrayColumns {
        &self.array_columns
    }

    /// Returns the key retrieval strategy.
    #[must_use]
    pub const fn id_generation(&self) -> &IdGeneration {
        &self.id_generation
    }

    /// Vendor types this dialect stores in a single column.
    #[must_use]
    pub const fn simple_types(&self) -> &'static [VendorType] {
        self.simple_types
    }

    /// Returns the LIKE escaper.
    #[must_use]
    pub const fn like_escaper(&self) -> &LikeEscaper {
        &self.like_escaper
    }

    /// Returns the bind marker style.
    #[must_use]
    pub const fn bind_markers(&self) -> BindMarkers {
        self.bind_markers
    }

    /// Returns whether null ordering hints can be rendered.
    #[must_use]
    pub const fn null_precedence(&self) -> NullPrecedence {
        self.null_precedence
    }

    /// Replaces the identifier processing, e.g. with rules read from the
    /// connection metadata.
    #[must_use]
    pub const fn with_identifier_processing(mut self, processing: IdentifierProcessing) -> Self {
        self.identifier_processing = processing;
        self
    }

    /// Replaces the pagination strategy.
    #[must_use]
    pub const fn with_limit_clause(mut self, limit_clause: LimitClause) -> Self {
        self.limit_clause = limit_clause;
        self
    }

    /// Returns whether a property of type `ty` maps to a single column.
    #[must_use]
    pub fn is_simple_type(&self, ty: &PropertyType) -> bool {
        match ty {
            PropertyType::Vendor(vendor) => self.simple_types.contains(vendor),
            PropertyType::Array(element) => self.is_simple_type(element),
            other => other.is_standard_store_type(),
        }
    }

    /// Converts `values` into an array parameter for `property`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnsupportedArrayType`] when the dialect has no
    /// array columns or no array of the element type.
    pub fn bind_array(
        &self,
        property: &str,
        property_type: &PropertyType,
        values: Vec<SqlValue>,
    ) -> Result<SqlValue> {
        let element = match property_type {
            PropertyType::Array(element) => element.as_ref(),
            other => other,
        };
        let element_type = self
            .array_columns
            .resolve_element_type(element)
            .ok_or_else(|| DialectError::UnsupportedArrayType {
                dialect: self.kind,
                property: property.to_string(),
                property_type: property_type.clone(),
            })?;
        Ok(SqlValue::Array(SqlArray {
            element_type,
            values,
        }))
    }

    /// Query returning the next value of `sequence`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::SequencesUnsupported`] for dialects without
    /// sequences.
    pub fn create_sequence_query(&self, sequence: &str) -> Result<String> {
        self.id_generation
            .sequence_query(sequence)
            .ok_or(DialectError::SequencesUnsupported(self.kind))
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::of(DialectKind::Ansi)
    }
}
