//! Query method metadata and invocation arguments.
//!
//! A [`QueryMethod`] is what the repository layer knows about a method
//! before the first call: its name, its parameter list and what it returns.
//! [`Argument`]s are the values of one invocation.

use oxide_data_core::{LockMode, SqlValue, ToSqlValue};
use serde::{Deserialize, Serialize};

use crate::paging::{Limit, Pageable, Sort};

/// Role of a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Bound to criteria, in declaration order.
    #[default]
    Bindable,
    /// A [`Pageable`] page request.
    Pageable,
    /// A dynamic [`Sort`].
    Sort,
    /// A dynamic [`Limit`].
    Limit,
}

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParameter {
    /// Parameter name, for messages.
    pub name: String,
    /// Role.
    #[serde(default)]
    pub kind: ParameterKind,
}

impl MethodParameter {
    /// Creates a parameter.
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Returns whether criteria bind to this parameter.
    #[must_use]
    pub const fn is_bindable(&self) -> bool {
        matches!(self.kind, ParameterKind::Bindable)
    }
}

/// Declared return type of a query method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// At most one aggregate.
    One,
    /// A list of aggregates.
    Many,
    /// A stream of aggregates.
    Stream,
    /// A slice: content plus whether more rows exist.
    Slice,
    /// A page: content plus the total number of rows.
    Page,
    /// A row count.
    Count,
    /// Whether any row matches.
    Exists,
    /// Number of deleted rows.
    Deleted,
}

/// How many results execution produces and how it fetches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one row; more is an error.
    Single,
    /// All matching rows.
    Multiple,
    /// Fetch one row more than requested to detect further data.
    Slice,
    /// Fetch the page and count the total when it cannot be inferred.
    Page,
    /// A single count.
    Count,
    /// A single flag.
    Exists,
    /// Affected row count of a modifying statement.
    RowsAffected,
}

impl From<ReturnKind> for Cardinality {
    fn from(kind: ReturnKind) -> Self {
        match kind {
            ReturnKind::One => Self::Single,
            ReturnKind::Many | ReturnKind::Stream => Self::Multiple,
            ReturnKind::Slice => Self::Slice,
            ReturnKind::Page => Self::Page,
            ReturnKind::Count => Self::Count,
            ReturnKind::Exists => Self::Exists,
            ReturnKind::Deleted => Self::RowsAffected,
        }
    }
}

/// A repository query method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMethod {
    /// Method name, e.g. `findByLastNameOrderByAgeDesc`.
    pub name: String,
    /// Declared parameters in order.
    #[serde(default)]
    pub parameters: Vec<MethodParameter>,
    /// Declared return type.
    pub return_kind: ReturnKind,
    /// Pessimistic lock to take on selected rows.
    #[serde(default)]
    pub lock_mode: Option<LockMode>,
}

impl QueryMethod {
    /// Creates a method without parameters.
    pub fn new(name: impl Into<String>, return_kind: ReturnKind) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_kind,
            lock_mode: None,
        }
    }

    /// Appends a bindable parameter.
    #[must_use]
    pub fn param(self, name: impl Into<String>) -> Self {
        self.with_parameter(MethodParameter::new(name, ParameterKind::Bindable))
    }

    /// Appends a [`Pageable`] parameter.
    #[must_use]
    pub fn pageable(self) -> Self {
        self.with_parameter(MethodParameter::new("pageable", ParameterKind::Pageable))
    }

    /// Appends a [`Sort`] parameter.
    #[must_use]
    pub fn sort(self) -> Self {
        self.with_parameter(MethodParameter::new("sort", ParameterKind::Sort))
    }

    /// Appends a [`Limit`] parameter.
    #[must_use]
    pub fn limit(self) -> Self {
        self.with_parameter(MethodParameter::new("limit", ParameterKind::Limit))
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: MethodParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Locks selected rows.
    #[must_use]
    pub const fn with_lock(mut self, mode: LockMode) -> Self {
        self.lock_mode = Some(mode);
        self
    }
}

/// One invocation argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A scalar value.
    Value(SqlValue),
    /// A collection, for `In` criteria and array properties.
    List(Vec<SqlValue>),
    /// A page request.
    Pageable(Pageable),
    /// A dynamic sort.
    Sort(Sort),
    /// A dynamic limit.
    Limit(Limit),
}

impl Argument {
    /// A scalar argument.
    pub fn value<V: ToSqlValue>(value: V) -> Self {
        Self::Value(value.to_sql_value())
    }

    /// A collection argument.
    pub fn list<V: ToSqlValue>(values: impl IntoIterator<Item = V>) -> Self {
        Self::List(values.into_iter().map(ToSqlValue::to_sql_value).collect())
    }

    pub(crate) const fn describe(&self) -> &'static str {
        match self {
            Self::Value(_) => "a value",
            Self::List(_) => "a list",
            Self::Pageable(_) => "a page request",
            Self::Sort(_) => "a sort",
            Self::Limit(_) => "a limit",
        }
    }
}

impl From<Pageable> for Argument {
    fn from(pageable: Pageable) -> Self {
        Self::Pageable(pageable)
    }
}

impl From<Sort> for Argument {
    fn from(sort: Sort) -> Self {
        Self::Sort(sort)
    }
}

impl From<Limit> for Argument {
    fn from(limit: Limit) -> Self {
        Self::Limit(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_parameters_are_not_bindable() {
        let method = QueryMethod::new("findByLastName", ReturnKind::Page)
            .param("last_name")
            .pageable()
            .param("age");
        let bindable: Vec<bool> = method
            .parameters
            .iter()
            .map(MethodParameter::is_bindable)
            .collect();
        assert_eq!(bindable, vec![true, false, true]);
        assert_eq!(method.parameters[1].kind, ParameterKind::Pageable);
    }

    #[test]
    fn test_cardinality() {
        assert_eq!(Cardinality::from(ReturnKind::Stream), Cardinality::Multiple);
        assert_eq!(Cardinality::from(ReturnKind::Deleted), Cardinality::RowsAffected);
    }

    #[test]
    fn test_arguments() {
        assert_eq!(Argument::value("x"), Argument::Value(SqlValue::Text(String::from("x"))));
        assert_eq!(
            Argument::list([1_i64, 2]),
            Argument::List(vec![SqlValue::Int(1), SqlValue::Int(2)])
        );
    }
}
