//! Rendering derived queries into SQL text and ordered parameters.

use oxide_data_core::{
    Dialect, DialectError, LimitPosition, LockPosition, NullPrecedence, SqlValue,
};
use tracing::debug;

use crate::error::{RepositoryError, Result};
use crate::mapping::EntityMetadata;
use crate::method::{Argument, Cardinality, ParameterKind};
use crate::paging::{NullHandling, Pageable, Sort};
use crate::query::{
    Criterion, DerivedQuery, Operator, Predicate, PropertyResolver, QueryKind, ResolvedOrder,
};

/// SQL text plus the values for its bind markers, in marker order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStatement {
    /// The statement.
    pub sql: String,
    /// Bind values.
    pub parameters: Vec<SqlValue>,
}

/// Rows a select statement skips and fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// Rows skipped.
    pub offset: Option<u64>,
    /// Rows fetched, including a probe row.
    pub fetch: Option<u64>,
    /// Rows the caller asked for.
    pub size: Option<u64>,
    /// One row more than `size` is fetched to detect further data.
    pub probe: bool,
}

impl Window {
    /// Whether the statement needs a limit clause.
    #[must_use]
    pub const fn is_limited(&self) -> bool {
        self.offset.is_some() || self.fetch.is_some()
    }
}

/// Renders derived queries of one aggregate for one dialect.
///
/// Rendering is deterministic: the same query, dialect and arguments always
/// produce the same text and parameter order.
#[derive(Debug, Clone, Copy)]
pub struct StatementRenderer<'a> {
    entity: &'a EntityMetadata,
    dialect: Dialect,
    force_quote: bool,
}

impl<'a> StatementRenderer<'a> {
    /// Creates a renderer that quotes every identifier.
    #[must_use]
    pub const fn new(entity: &'a EntityMetadata, dialect: Dialect) -> Self {
        Self {
            entity,
            dialect,
            force_quote: true,
        }
    }

    /// Enables or disables identifier quoting.
    #[must_use]
    pub const fn with_force_quote(mut self, force_quote: bool) -> Self {
        self.force_quote = force_quote;
        self
    }

    /// Renders the statement for one invocation.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::InvalidArguments`] when `args` do not match the
    ///   declared parameters.
    /// - [`RepositoryError::InvalidDerivation`] when a dynamic sort names an
    ///   unusable property.
    /// - [`RepositoryError::Dialect`] for array arguments the dialect cannot
    ///   bind or pagination it cannot express.
    pub fn render(&self, query: &DerivedQuery, args: &[Argument]) -> Result<RenderedStatement> {
        check_arguments(query, args)?;
        let table = self.identifier(&self.entity.table);
        let mut parameters = Vec::new();
        let condition = query
            .predicate
            .as_ref()
            .map(|predicate| self.predicate(query, predicate, args, &mut parameters, false))
            .transpose()?;

        let sql = match query.kind {
            QueryKind::Select => {
                let window = self.window(query, args)?;
                let orders = self.orders(query, args)?;
                let columns = self.columns(&table);
                let distinct = if query.distinct { "DISTINCT " } else { "" };
                let head = format!("SELECT {distinct}{columns} FROM {table}");
                self.assemble(head, &table, condition, &orders, window, query)?
            }
            QueryKind::Exists => {
                let window = Window {
                    fetch: Some(1),
                    size: Some(1),
                    ..Window::default()
                };
                let head = format!("SELECT 1 FROM {table}");
                self.assemble(head, &table, condition, &[], window, query)?
            }
            QueryKind::Count => where_clause(format!("SELECT COUNT(*) FROM {table}"), condition),
            QueryKind::Delete => where_clause(format!("DELETE FROM {table}"), condition),
        };

        debug!(
            method = %query.name,
            dialect = self.dialect.name(),
            sql = %sql,
            parameters = parameters.len(),
            "rendered statement"
        );
        Ok(RenderedStatement { sql, parameters })
    }

    /// Renders the count query for the total of a paged select.
    ///
    /// Pagination, sorting and locking are left out. Distinct selects are
    /// counted over a derived table.
    ///
    /// # Errors
    ///
    /// Same as [`Self::render`].
    pub fn render_count(&self, query: &DerivedQuery, args: &[Argument]) -> Result<RenderedStatement> {
        check_arguments(query, args)?;
        let table = self.identifier(&self.entity.table);
        let mut parameters = Vec::new();
        let condition = query
            .predicate
            .as_ref()
            .map(|predicate| self.predicate(query, predicate, args, &mut parameters, false))
            .transpose()?;
        let sql = if query.distinct {
            let inner = where_clause(
                format!("SELECT DISTINCT {} FROM {table}", self.columns(&table)),
                condition,
            );
            format!("SELECT COUNT(*) FROM ({inner}) distinct_rows")
        } else {
            where_clause(format!("SELECT COUNT(*) FROM {table}"), condition)
        };
        debug!(method = %query.name, sql = %sql, "rendered count statement");
        Ok(RenderedStatement { sql, parameters })
    }

    /// Key columns to name when asking the driver for generated keys.
    ///
    /// Empty when the dialect's driver returns generated keys on its own.
    /// Names are case-folded but never quoted.
    #[must_use]
    pub fn key_columns(&self) -> Vec<String> {
        let generation = self.dialect.id_generation();
        if !generation.driver_requires_key_column_names() {
            return Vec::new();
        }
        let processing = self.dialect.identifier_processing();
        self.entity
            .id_property()
            .map(|id| generation.key_column_name(id.column_name(), &processing))
            .into_iter()
            .collect()
    }

    /// Computes the rows a select skips and fetches for one invocation.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidArguments`] when `args` do not match
    /// the declared parameters.
    pub fn window(&self, query: &DerivedQuery, args: &[Argument]) -> Result<Window> {
        check_arguments(query, args)?;
        match query.kind {
            QueryKind::Exists => {
                return Ok(Window {
                    fetch: Some(1),
                    size: Some(1),
                    ..Window::default()
                })
            }
            QueryKind::Count | QueryKind::Delete => return Ok(Window::default()),
            QueryKind::Select => {}
        }

        let dynamic = query
            .index_of(ParameterKind::Limit)
            .and_then(|i| match &args[i] {
                Argument::Limit(limit) => limit.max(),
                _ => None,
            });
        let cap = match (query.max_results, dynamic) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        if let Some(pageable) = pageable(query, args) {
            let offset = pageable.offset();
            let (size, capped) = match cap {
                Some(cap) => {
                    let remaining = cap.saturating_sub(offset);
                    (pageable.size().min(remaining), remaining <= pageable.size())
                }
                None => (pageable.size(), false),
            };
            let probe = query.cardinality == Cardinality::Slice && !capped;
            return Ok(Window {
                offset: Some(offset),
                fetch: Some(if probe { size + 1 } else { size }),
                size: Some(size),
                probe,
            });
        }

        if query.cardinality == Cardinality::Single {
            let fetch = cap.map_or(2, |cap| cap.min(2));
            return Ok(Window {
                offset: None,
                fetch: Some(fetch),
                size: Some(1),
                probe: false,
            });
        }
        Ok(Window {
            offset: None,
            fetch: cap,
            size: cap,
            probe: false,
        })
    }

    fn identifier(&self, name: &str) -> String {
        self.dialect
            .identifier_processing()
            .render(name, self.force_quote)
    }

    fn column(&self, table: &str, column: &str) -> String {
        format!("{table}.{}", self.identifier(column))
    }

    fn columns(&self, table: &str) -> String {
        self.entity
            .columns()
            .iter()
            .map(|column| self.column(table, column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Places WHERE, ORDER BY, limit and lock fragments around `head`.
    fn assemble(
        &self,
        head: String,
        table: &str,
        condition: Option<String>,
        orders: &[String],
        window: Window,
        query: &DerivedQuery,
    ) -> Result<String> {
        let limit_clause = self.dialect.limit_clause();
        let lock_clause = self.dialect.lock_clause();
        let lock = query
            .lock_mode
            .map(|mode| lock_clause.lock(mode, table))
            .filter(|fragment| !fragment.is_empty());

        let limit = if window.is_limited() {
            if limit_clause.position() == LimitPosition::None {
                return Err(DialectError::PaginationUnsupported(self.dialect.kind()).into());
            }
            limit_clause.fragment(window.fetch, window.offset)
        } else {
            None
        };

        let mut parts = vec![head];
        if let Some(lock) = &lock {
            if lock_clause.position() == LockPosition::AfterFromTable {
                parts.push(lock.clone());
            }
        }
        if let Some(condition) = condition {
            parts.push(format!("WHERE {condition}"));
        }
        if let Some(limit) = &limit {
            if limit_clause.position() == LimitPosition::AfterWhere {
                parts.push(limit.clone());
            }
        }
        if !orders.is_empty() {
            parts.push(format!("ORDER BY {}", orders.join(", ")));
        } else if limit.is_some() {
            if let Some(synthetic) = limit_clause.synthetic_order_by() {
                parts.push(synthetic.to_string());
            }
        }
        if let Some(limit) = limit {
            if limit_clause.position() == LimitPosition::AfterOrderBy {
                parts.push(limit);
            }
        }
        if let Some(lock) = lock {
            if lock_clause.position() == LockPosition::AfterOrderBy {
                parts.push(lock);
            }
        }
        Ok(parts.join(" "))
    }

    /// Static sort, then the page request's sort, then a dynamic sort.
    fn orders(&self, query: &DerivedQuery, args: &[Argument]) -> Result<Vec<String>> {
        let resolver = PropertyResolver::new(self.entity, self.dialect);
        let mut orders = query.sort.clone();
        let dynamic: Vec<&Sort> = [
            pageable(query, args).map(Pageable::sort),
            query.index_of(ParameterKind::Sort).and_then(|i| match &args[i] {
                Argument::Sort(sort) => Some(sort),
                _ => None,
            }),
        ]
        .into_iter()
        .flatten()
        .collect();
        for sort in dynamic {
            for order in sort.orders() {
                let resolved = resolver
                    .resolve_order(order)
                    .map_err(|reason| RepositoryError::derivation(&query.name, reason))?;
                if query.distinct && resolved.ignore_case {
                    return Err(RepositoryError::derivation(
                        &query.name,
                        format!(
                            "distinct query cannot order `{}` ignoring case",
                            resolved.property.path
                        ),
                    ));
                }
                orders.push(resolved);
            }
        }
        let table = self.identifier(&self.entity.table);
        Ok(orders
            .iter()
            .map(|order| self.order(&table, order))
            .collect())
    }

    fn order(&self, table: &str, order: &ResolvedOrder) -> String {
        let column = self.column(table, &order.property.column);
        let column = if order.ignore_case {
            format!("UPPER({column})")
        } else {
            column
        };
        let direction = order.direction.as_sql();
        let nulls = match (order.null_handling, self.dialect.null_precedence()) {
            (NullHandling::NullsFirst, NullPrecedence::SqlStandard) => " NULLS FIRST",
            (NullHandling::NullsLast, NullPrecedence::SqlStandard) => " NULLS LAST",
            (NullHandling::Native, _) => "",
            (_, NullPrecedence::Unsupported) => {
                debug!(
                    property = %order.property.path,
                    dialect = self.dialect.name(),
                    "dropping null ordering hint"
                );
                ""
            }
        };
        format!("{column} {direction}{nulls}")
    }

    fn predicate(
        &self,
        query: &DerivedQuery,
        predicate: &Predicate,
        args: &[Argument],
        parameters: &mut Vec<SqlValue>,
        nested: bool,
    ) -> Result<String> {
        let (children, separator) = match predicate {
            Predicate::Leaf(criterion) => {
                return self.criterion(query, criterion, args, parameters);
            }
            Predicate::And(children) => (children, " AND "),
            Predicate::Or(children) => (children, " OR "),
        };
        let rendered = children
            .iter()
            .map(|child| self.predicate(query, child, args, parameters, true))
            .collect::<Result<Vec<_>>>()?
            .join(separator);
        Ok(if nested {
            format!("({rendered})")
        } else {
            rendered
        })
    }

    fn criterion(
        &self,
        query: &DerivedQuery,
        criterion: &Criterion,
        args: &[Argument],
        parameters: &mut Vec<SqlValue>,
    ) -> Result<String> {
        let table = self.identifier(&self.entity.table);
        let column = self.column(&table, &criterion.property.column);
        let operand = |slot: usize| &args[query.bindable[criterion.parameters[slot]]];
        let upper = |sql: String| {
            if criterion.ignore_case {
                format!("UPPER({sql})")
            } else {
                sql
            }
        };
        let lhs = upper(column.clone());
        let bind = |value: SqlValue, parameters: &mut Vec<SqlValue>| {
            let marker = self.dialect.bind_markers().marker(parameters.len());
            parameters.push(value);
            upper(marker)
        };

        let sql = match criterion.operator {
            Operator::IsNull => format!("{column} IS NULL"),
            Operator::IsNotNull => format!("{column} IS NOT NULL"),
            Operator::True => format!("{column} = {}", bind(SqlValue::Bool(true), parameters)),
            Operator::False => format!("{column} = {}", bind(SqlValue::Bool(false), parameters)),
            Operator::Equals | Operator::NotEquals => {
                let value = self.scalar(query, criterion, operand(0))?;
                let negated = criterion.operator == Operator::NotEquals;
                match value {
                    SqlValue::Null if negated => format!("{column} IS NOT NULL"),
                    SqlValue::Null => format!("{column} IS NULL"),
                    value => {
                        let op = if negated { "<>" } else { "=" };
                        format!("{lhs} {op} {}", bind(value, parameters))
                    }
                }
            }
            Operator::Between | Operator::NotBetween => {
                let low = self.scalar(query, criterion, operand(0))?;
                let high = self.scalar(query, criterion, operand(1))?;
                let not = if criterion.operator == Operator::NotBetween {
                    "NOT "
                } else {
                    ""
                };
                let low = bind(low, parameters);
                let high = bind(high, parameters);
                format!("{lhs} {not}BETWEEN {low} AND {high}")
            }
            Operator::In | Operator::NotIn => {
                let Argument::List(values) = operand(0) else {
                    return Err(RepositoryError::arguments(
                        &query.name,
                        format!(
                            "`{}` expects a list for `{}`",
                            criterion.operator, criterion.property.path
                        ),
                    ));
                };
                let negated = criterion.operator == Operator::NotIn;
                if values.is_empty() {
                    String::from(if negated { "1 = 1" } else { "1 = 0" })
                } else {
                    let markers = values
                        .iter()
                        .map(|value| bind(value.clone(), parameters))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let op = if negated { "NOT IN" } else { "IN" };
                    format!("{lhs} {op} ({markers})")
                }
            }
            Operator::Like | Operator::NotLike => {
                let value = self.scalar(query, criterion, operand(0))?;
                let op = if criterion.operator == Operator::NotLike {
                    "NOT LIKE"
                } else {
                    "LIKE"
                };
                format!("{lhs} {op} {}", bind(value, parameters))
            }
            Operator::StartingWith
            | Operator::EndingWith
            | Operator::Containing
            | Operator::NotContaining => {
                let value = self.scalar(query, criterion, operand(0))?;
                let Some(text) = value.as_text() else {
                    return Err(RepositoryError::arguments(
                        &query.name,
                        format!(
                            "`{}` on `{}` expects a text value",
                            criterion.operator, criterion.property.path
                        ),
                    ));
                };
                let escaper = self.dialect.like_escaper();
                let escaped = escaper.escape(text);
                let pattern = match criterion.operator {
                    Operator::StartingWith => format!("{escaped}%"),
                    Operator::EndingWith => format!("%{escaped}"),
                    _ => format!("%{escaped}%"),
                };
                let op = if criterion.operator == Operator::NotContaining {
                    "NOT LIKE"
                } else {
                    "LIKE"
                };
                let escape = escaper.escape_clause().unwrap_or_default();
                format!(
                    "{lhs} {op} {}{escape}",
                    bind(SqlValue::Text(pattern), parameters)
                )
            }
            Operator::GreaterThan
            | Operator::GreaterThanEqual
            | Operator::LessThan
            | Operator::LessThanEqual
            | Operator::After
            | Operator::Before => {
                let value = self.scalar(query, criterion, operand(0))?;
                let op = match criterion.operator {
                    Operator::GreaterThan | Operator::After => ">",
                    Operator::GreaterThanEqual => ">=",
                    Operator::LessThan | Operator::Before => "<",
                    _ => "<=",
                };
                format!("{lhs} {op} {}", bind(value, parameters))
            }
        };
        Ok(sql)
    }

    /// A single bind value. Lists and prebuilt arrays are only accepted for
    /// array properties and are rebound as the dialect's native array.
    fn scalar(
        &self,
        query: &DerivedQuery,
        criterion: &Criterion,
        argument: &Argument,
    ) -> Result<SqlValue> {
        let property = &criterion.property;
        match argument {
            Argument::Value(SqlValue::Array(array)) if property.property_type.is_array() => {
                Ok(self.dialect.bind_array(
                    &property.path,
                    &property.property_type,
                    array.values.clone(),
                )?)
            }
            Argument::Value(SqlValue::Array(_)) => Err(RepositoryError::arguments(
                &query.name,
                format!("`{}` is not an array property", property.path),
            )),
            Argument::Value(value) => Ok(value.clone()),
            Argument::List(values) if property.property_type.is_array() => Ok(self
                .dialect
                .bind_array(&property.path, &property.property_type, values.clone())?),
            other => Err(RepositoryError::arguments(
                &query.name,
                format!(
                    "`{}` expects a single value, got {}",
                    criterion.property.path,
                    other.describe()
                ),
            )),
        }
    }
}

fn where_clause(head: String, condition: Option<String>) -> String {
    match condition {
        Some(condition) => format!("{head} WHERE {condition}"),
        None => head,
    }
}

fn pageable<'a>(query: &DerivedQuery, args: &'a [Argument]) -> Option<&'a Pageable> {
    query
        .index_of(ParameterKind::Pageable)
        .and_then(|i| match &args[i] {
            Argument::Pageable(pageable) => Some(pageable),
            _ => None,
        })
}

/// Checks that every argument has the shape its parameter declares.
fn check_arguments(query: &DerivedQuery, args: &[Argument]) -> Result<()> {
    if args.len() != query.parameters.len() {
        return Err(RepositoryError::arguments(
            &query.name,
            format!(
                "expected {} argument(s), got {}",
                query.parameters.len(),
                args.len()
            ),
        ));
    }
    for (parameter, argument) in query.parameters.iter().zip(args) {
        let fits = matches!(
            (parameter.kind, argument),
            (ParameterKind::Bindable, Argument::Value(_) | Argument::List(_))
                | (ParameterKind::Pageable, Argument::Pageable(_))
                | (ParameterKind::Sort, Argument::Sort(_))
                | (ParameterKind::Limit, Argument::Limit(_))
        );
        if !fits {
            return Err(RepositoryError::arguments(
                &query.name,
                format!(
                    "parameter `{}` cannot take {}",
                    parameter.name,
                    argument.describe()
                ),
            ));
        }
        if matches!(argument, Argument::Pageable(pageable) if pageable.size() == 0) {
            return Err(RepositoryError::arguments(&query.name, "page size must be at least 1"));
        }
    }
    Ok(())
}
