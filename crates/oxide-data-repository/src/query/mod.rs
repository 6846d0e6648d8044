//! Query derivation.
//!
//! A method name such as `findDistinctTop3ByLastNameAndAgeBetweenOrderByAgeDesc`
//! or an explicit [`PathQuery`] is turned into a [`DerivedQuery`]: the query
//! kind, a [`Predicate`] tree over resolved columns, a static sort and the
//! cardinality execution must honour.
//!
//! Derivation happens once, when a repository query is created. Every
//! structural problem (unknown keywords or properties, paths that would need
//! a join, parameter arity) is reported then, never at call time.

mod lexer;
mod operator;
mod parser;
mod path;
mod predicate;
mod resolve;

pub use lexer::Token;
pub use operator::Operator;
pub use parser::QueryDeriver;
pub use path::PathQuery;
pub use predicate::{Criterion, Predicate};
pub use resolve::{PropertyResolver, ResolvedOrder, ResolvedProperty};

use oxide_data_core::LockMode;
use serde::{Deserialize, Serialize};

use crate::method::{Cardinality, MethodParameter, ParameterKind};

/// Statement family of a derived query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// `find…`, `read…`, `get…`, `query…`, `search…`, `stream…`
    Select,
    /// `count…`
    Count,
    /// `exists…`
    Exists,
    /// `delete…`, `remove…`
    Delete,
}

/// A fully derived query, ready for rendering against any arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedQuery {
    /// Method name or path description, for messages.
    pub name: String,
    /// Statement family.
    pub kind: QueryKind,
    /// Select distinct rows.
    pub distinct: bool,
    /// `First<n>` / `Top<n>` cap on the number of results.
    pub max_results: Option<u64>,
    /// Criteria, if any.
    pub predicate: Option<Predicate>,
    /// Sort declared in the method name.
    pub sort: Vec<ResolvedOrder>,
    /// Expected result shape.
    pub cardinality: Cardinality,
    /// Pessimistic lock taken on selected rows.
    pub lock_mode: Option<LockMode>,
    /// Declared parameters.
    pub parameters: Vec<MethodParameter>,
    /// Indices of the bindable parameters. Criterion slots index into this.
    pub bindable: Vec<usize>,
}

impl DerivedQuery {
    /// Index of the first parameter of `kind`.
    #[must_use]
    pub fn index_of(&self, kind: ParameterKind) -> Option<usize> {
        self.parameters.iter().position(|p| p.kind == kind)
    }

    /// Returns whether the query has a page request parameter.
    #[must_use]
    pub fn is_paged(&self) -> bool {
        self.index_of(ParameterKind::Pageable).is_some()
    }
}
