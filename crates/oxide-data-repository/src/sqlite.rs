//! SQLite execution through sqlx.

use oxide_data_core::{
    ConnectionMetadata, DialectError, LetterCasing, MetadataSource, SqlValue,
};
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Row, Sqlite};
use tracing::debug;

use crate::error::{RepositoryError, Result};
use crate::execution::StatementExecutor;
use crate::render::RenderedStatement;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Runs statements on a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Creates an executor over `pool`.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl StatementExecutor for SqliteExecutor {
    type Row = SqliteRow;

    async fn query(&self, statement: &RenderedStatement) -> Result<Vec<SqliteRow>> {
        let rows = bind(statement)?.fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), "fetched rows");
        Ok(rows)
    }

    async fn query_scalar(&self, statement: &RenderedStatement) -> Result<i64> {
        let row = bind(statement)?.fetch_one(&self.pool).await?;
        Ok(row.try_get(0)?)
    }

    async fn update(&self, statement: &RenderedStatement) -> Result<u64> {
        let result = bind(statement)?.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn bind(statement: &RenderedStatement) -> Result<SqliteQuery<'_>> {
    let mut query = sqlx::query(&statement.sql);
    for value in &statement.parameters {
        query = bind_value(query, value).ok_or_else(|| {
            RepositoryError::arguments(&statement.sql, "SQLite cannot bind array values")
        })?;
    }
    Ok(query)
}

/// Binds a value. Returns `None` for arrays, which SQLite has no type for.
fn bind_value<'q>(query: SqliteQuery<'q>, value: &SqlValue) -> Option<SqliteQuery<'q>> {
    Some(match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Int(i) => query.bind(*i),
        SqlValue::Float(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Blob(b) => query.bind(b.clone()),
        SqlValue::Date(d) => query.bind(*d),
        SqlValue::Time(t) => query.bind(*t),
        SqlValue::Timestamp(ts) => query.bind(*ts),
        SqlValue::Array(_) => return None,
    })
}

/// Reads connection metadata from a SQLite pool.
///
/// A connection is acquired for the probe only and returned to the pool
/// before the call completes.
#[derive(Debug, Clone)]
pub struct SqliteMetadataSource {
    pool: SqlitePool,
}

impl SqliteMetadataSource {
    /// Creates a source over `pool`.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MetadataSource for SqliteMetadataSource {
    async fn metadata(&self) -> oxide_data_core::Result<ConnectionMetadata> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| DialectError::Probe(Box::new(e)))?;
        let version: String = sqlx::query_scalar("SELECT sqlite_version()")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| DialectError::Probe(Box::new(e)))?;
        drop(conn);
        debug!(version = %version, "probed SQLite metadata");
        Ok(ConnectionMetadata::new("SQLite", version)
            .with_identifier_quote("\"")
            .with_identifier_casing(LetterCasing::AsIs))
    }
}
