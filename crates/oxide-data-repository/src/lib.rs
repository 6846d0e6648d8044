//! # oxide-data-repository
//!
//! Derived repository queries for aggregate roots, rendered per SQL dialect.
//!
//! This crate provides:
//! - [`mapping`]: how an aggregate maps onto its table
//! - [`method`]: query method metadata and invocation arguments
//! - [`query`]: derivation of predicate trees from method names or paths
//! - [`render`]: statement rendering for a [`Dialect`]
//! - [`execution`]: single, list, slice, page, count, exists and delete
//!   execution over a [`StatementExecutor`](execution::StatementExecutor)
//! - [`sqlite`]: the sqlx SQLite executor and metadata probe
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_data_repository::mapping::{EntityMetadata, PersistentProperty};
//! use oxide_data_repository::method::{Argument, QueryMethod, ReturnKind};
//! use oxide_data_repository::{DataConfig, Dialect, DialectKind, PropertyType, RepositoryQuery};
//!
//! let person = EntityMetadata::new("Person", "person")
//!     .with_property(PersistentProperty::simple("id", PropertyType::Int64).id())
//!     .with_property(PersistentProperty::simple("last_name", PropertyType::Text));
//!
//! let method = QueryMethod::new("findByLastNameContaining", ReturnKind::Many).param("part");
//! let query = RepositoryQuery::new(
//!     &method,
//!     &person,
//!     Dialect::of(DialectKind::Postgres),
//!     &DataConfig::default(),
//! )
//! .unwrap();
//!
//! let statement = query.statement(&[Argument::value("o")]).unwrap();
//! assert_eq!(
//!     statement.sql,
//!     "SELECT \"person\".\"id\", \"person\".\"last_name\" FROM \"person\" \
//!      WHERE \"person\".\"last_name\" LIKE $1"
//! );
//! ```
//!
//! ## Aggregates
//!
//! ```ignore
//! use oxide_data_repository::Aggregate;
//!
//! #[derive(Aggregate)]
//! #[aggregate(table = "person")]
//! struct Person {
//!     #[property(id)]
//!     id: i64,
//!     last_name: String,
//!     #[property(embedded, prefix = "addr_")]
//!     address: Address,
//! }
//! ```

mod error;
pub mod execution;
pub mod mapping;
pub mod method;
pub mod paging;
pub mod query;
pub mod render;
pub mod sqlite;

pub use error::{RepositoryError, Result};
pub use execution::{Page, QueryResult, RepositoryQuery, Slice, StatementExecutor};
pub use render::{RenderedStatement, StatementRenderer};

// Re-export commonly used types from oxide-data-core
pub use oxide_data_core::{
    DataConfig, Dialect, DialectKind, DialectResolver, LockMode, PropertyType, SqlValue,
    ToSqlValue, VendorType,
};
pub use oxide_data_derive::Aggregate;
