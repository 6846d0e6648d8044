//! Executing derived queries.
//!
//! A [`RepositoryQuery`] is derived once and then executed any number of
//! times through a [`StatementExecutor`]. Execution honours the query's
//! [`Cardinality`]: single results probe for a second row, slices fetch one
//! extra row, pages count their total only when it cannot be inferred.

mod result;

pub use result::{Page, QueryResult, Slice};

use oxide_data_core::{DataConfig, Dialect};
use tracing::{debug, info};

use crate::error::{RepositoryError, Result};
use crate::mapping::EntityMetadata;
use crate::method::{Argument, Cardinality, ParameterKind, QueryMethod};
use crate::paging::Pageable;
use crate::query::{DerivedQuery, PathQuery, QueryDeriver};
use crate::render::{RenderedStatement, StatementRenderer, Window};

/// Runs rendered statements against a database.
#[allow(async_fn_in_trait)]
pub trait StatementExecutor {
    /// Row type handed back to the caller untouched.
    type Row;

    /// Runs a query and returns all rows.
    async fn query(&self, statement: &RenderedStatement) -> Result<Vec<Self::Row>>;

    /// Runs a query returning a single integer.
    async fn query_scalar(&self, statement: &RenderedStatement) -> Result<i64>;

    /// Runs a modifying statement and returns the affected row count.
    async fn update(&self, statement: &RenderedStatement) -> Result<u64>;
}

/// A derived query bound to an aggregate and a dialect.
#[derive(Debug, Clone)]
pub struct RepositoryQuery<'a> {
    entity: &'a EntityMetadata,
    dialect: Dialect,
    force_quote: bool,
    query: DerivedQuery,
}

impl<'a> RepositoryQuery<'a> {
    /// Derives the query of `method`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidDerivation`] when the method cannot
    /// be turned into a query.
    pub fn new(
        method: &QueryMethod,
        entity: &'a EntityMetadata,
        dialect: Dialect,
        config: &DataConfig,
    ) -> Result<Self> {
        let query = QueryDeriver::new(entity, dialect).derive(method)?;
        Ok(Self::from_derived(query, entity, dialect, config))
    }

    /// Derives a query from explicit property paths.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidDerivation`] when the paths cannot
    /// be turned into a query.
    pub fn from_path(
        path: &PathQuery,
        entity: &'a EntityMetadata,
        dialect: Dialect,
        config: &DataConfig,
    ) -> Result<Self> {
        let query = QueryDeriver::new(entity, dialect).derive_path(path)?;
        Ok(Self::from_derived(query, entity, dialect, config))
    }

    fn from_derived(
        query: DerivedQuery,
        entity: &'a EntityMetadata,
        dialect: Dialect,
        config: &DataConfig,
    ) -> Self {
        info!(
            method = %query.name,
            entity = %entity.name,
            dialect = dialect.name(),
            "created repository query"
        );
        Self {
            entity,
            dialect,
            force_quote: config.force_quote,
            query,
        }
    }

    /// The derived query.
    #[must_use]
    pub const fn derived(&self) -> &DerivedQuery {
        &self.query
    }

    /// The dialect statements are rendered for.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    const fn renderer(&self) -> StatementRenderer<'a> {
        StatementRenderer::new(self.entity, self.dialect).with_force_quote(self.force_quote)
    }

    /// Renders the statement for one invocation without running it.
    ///
    /// # Errors
    ///
    /// See [`StatementRenderer::render`].
    pub fn statement(&self, args: &[Argument]) -> Result<RenderedStatement> {
        self.renderer().render(&self.query, args)
    }

    /// Rows skipped and fetched for one invocation.
    ///
    /// # Errors
    ///
    /// See [`StatementRenderer::window`].
    pub fn window(&self, args: &[Argument]) -> Result<Window> {
        self.renderer().window(&self.query, args)
    }

    /// Renders and runs the query.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NonUniqueResult`] when a single-result
    /// query matches several rows, [`RepositoryError::InvalidCount`] when a
    /// count comes back negative, and any rendering or executor error.
    pub async fn execute<E: StatementExecutor>(
        &self,
        executor: &E,
        args: &[Argument],
    ) -> Result<QueryResult<E::Row>> {
        let renderer = self.renderer();
        let statement = renderer.render(&self.query, args)?;
        debug!(method = %self.query.name, sql = %statement.sql, "executing");

        let result = match self.query.cardinality {
            Cardinality::Single => {
                let rows = executor.query(&statement).await?;
                if rows.len() > 1 {
                    return Err(RepositoryError::NonUniqueResult {
                        method: self.query.name.clone(),
                    });
                }
                QueryResult::One(rows.into_iter().next())
            }
            Cardinality::Multiple => QueryResult::Many(executor.query(&statement).await?),
            Cardinality::Slice => {
                let window = renderer.window(&self.query, args)?;
                let mut rows = executor.query(&statement).await?;
                let size = window.size.unwrap_or_default();
                let has_next = window.probe && to_u64(rows.len()) > size;
                rows.truncate(to_usize(size));
                let pageable = self.pageable(args);
                QueryResult::Slice(Slice {
                    content: rows,
                    number: pageable.map_or(0, Pageable::page),
                    size: pageable.map_or(size, Pageable::size),
                    has_next,
                })
            }
            Cardinality::Page => {
                let window = renderer.window(&self.query, args)?;
                let rows = executor.query(&statement).await?;
                let total = match infer_total(window, rows.len()) {
                    Some(total) => total,
                    None => {
                        let count = renderer.render_count(&self.query, args)?;
                        let total = self.count(executor.query_scalar(&count).await?)?;
                        self.query.max_results.map_or(total, |cap| total.min(cap))
                    }
                };
                let pageable = self.pageable(args);
                QueryResult::Page(Page {
                    content: rows,
                    number: pageable.map_or(0, Pageable::page),
                    size: pageable.map_or(0, Pageable::size),
                    total,
                })
            }
            Cardinality::Count => {
                QueryResult::Count(self.count(executor.query_scalar(&statement).await?)?)
            }
            Cardinality::Exists => QueryResult::Exists(!executor.query(&statement).await?.is_empty()),
            Cardinality::RowsAffected => QueryResult::Deleted(executor.update(&statement).await?),
        };
        Ok(result)
    }

    fn count(&self, count: i64) -> Result<u64> {
        u64::try_from(count).map_err(|_| RepositoryError::InvalidCount {
            method: self.query.name.clone(),
            count,
        })
    }

    fn pageable<'r>(&self, args: &'r [Argument]) -> Option<&'r Pageable> {
        self.query
            .index_of(ParameterKind::Pageable)
            .and_then(|i| match args.get(i) {
                Some(Argument::Pageable(pageable)) => Some(pageable),
                _ => None,
            })
    }
}

/// Total of a page when the content alone determines it: a first page that
/// is not full, or any non-empty page that is not full.
fn infer_total(window: Window, fetched: usize) -> Option<u64> {
    let offset = window.offset.unwrap_or_default();
    let size = window.size?;
    let fetched = to_u64(fetched);
    if fetched >= size {
        return None;
    }
    if offset == 0 || fetched > 0 {
        return Some(offset + fetched);
    }
    None
}

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}
