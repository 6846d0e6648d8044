//! # oxide-data-core
//!
//! SQL dialect strategies for a relational aggregate mapping layer.
//!
//! This crate provides:
//! - [`Dialect`]: per-vendor bundles of pagination, locking, array column,
//!   key generation and identifier rules for ANSI, H2, HSQLDB, Postgres,
//!   MySQL, MariaDB, SQL Server, Oracle, DB2 and SQLite
//! - [`DialectResolver`]: picks the dialect of a live data source from its
//!   driver metadata, first registered provider first
//! - [`SqlValue`]: bind parameters of rendered statements
//!
//! ## Pagination
//!
//! Fragments are complete clauses with the values inlined:
//!
//! ```rust
//! use oxide_data_core::{Dialect, DialectKind, LimitPosition};
//!
//! let postgres = Dialect::of(DialectKind::Postgres);
//! assert_eq!(postgres.limit_clause().limit_offset(10, 20), "LIMIT 10 OFFSET 20");
//! assert_eq!(postgres.limit_clause().position(), LimitPosition::AfterOrderBy);
//!
//! let mysql = Dialect::of(DialectKind::MySql);
//! assert_eq!(mysql.limit_clause().limit_offset(10, 20), "LIMIT 20, 10");
//! ```
//!
//! ## Resolution
//!
//! ```rust
//! use oxide_data_core::{ConnectionMetadata, DialectKind, DialectResolver};
//!
//! let resolver = DialectResolver::new();
//! let dialect = resolver
//!     .resolve_metadata(&ConnectionMetadata::new("H2", "2.2.224"))
//!     .unwrap();
//! assert_eq!(dialect.kind(), DialectKind::H2);
//! ```

pub mod bind;
pub mod config;
pub mod dialect;
pub mod error;
pub mod escape;
pub mod identifier;
pub mod resolver;
pub mod types;
pub mod value;

pub use bind::BindMarkers;
pub use config::DataConfig;
pub use dialect::{
    ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition, LockClause,
    LockMode, LockPosition, NullPrecedence,
};
pub use error::{DialectError, Result};
pub use escape::LikeEscaper;
pub use identifier::{IdentifierProcessing, LetterCasing, Quoting};
pub use resolver::{
    ConnectionMetadata, DialectProvider, DialectResolver, MetadataSource, ProductNameProvider,
};
pub use types::{PropertyType, VendorType};
pub use value::{SqlArray, SqlValue, ToSqlValue};
