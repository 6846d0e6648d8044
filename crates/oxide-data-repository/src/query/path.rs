//! Queries built from explicit property paths instead of method names.

use oxide_data_core::LockMode;

use super::lexer::Token;
use super::operator::Operator;
use super::parser::Parts;
use super::QueryKind;
use crate::method::{MethodParameter, ParameterKind, ReturnKind};
use crate::paging::Order;

/// An explicit query: property paths, operators and combinators in order.
///
/// Goes through the same grammar, resolution and validation as method
/// names.
///
/// ```rust
/// use oxide_data_repository::method::ReturnKind;
/// use oxide_data_repository::paging::Order;
/// use oxide_data_repository::query::{Operator, PathQuery};
///
/// let query = PathQuery::select(ReturnKind::Many)
///     .criterion("address.city", Operator::Equals)
///     .and()
///     .criterion("age", Operator::GreaterThan)
///     .order_by(Order::desc("age"))
///     .param("city")
///     .param("min_age");
/// assert_eq!(query.tokens().len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    name: Option<String>,
    kind: QueryKind,
    return_kind: ReturnKind,
    distinct: bool,
    max_results: Option<u64>,
    tokens: Vec<Token>,
    all_ignore_case: bool,
    orders: Vec<Order>,
    parameters: Vec<MethodParameter>,
    lock_mode: Option<LockMode>,
}

impl PathQuery {
    fn new(kind: QueryKind, return_kind: ReturnKind) -> Self {
        Self {
            name: None,
            kind,
            return_kind,
            distinct: false,
            max_results: None,
            tokens: Vec::new(),
            all_ignore_case: false,
            orders: Vec::new(),
            parameters: Vec::new(),
            lock_mode: None,
        }
    }

    /// A select query returning `return_kind`.
    #[must_use]
    pub fn select(return_kind: ReturnKind) -> Self {
        Self::new(QueryKind::Select, return_kind)
    }

    /// A count query.
    #[must_use]
    pub fn count() -> Self {
        Self::new(QueryKind::Count, ReturnKind::Count)
    }

    /// An existence query.
    #[must_use]
    pub fn exists() -> Self {
        Self::new(QueryKind::Exists, ReturnKind::Exists)
    }

    /// A delete query.
    #[must_use]
    pub fn delete() -> Self {
        Self::new(QueryKind::Delete, ReturnKind::Deleted)
    }

    /// Names the query in error messages and logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a criterion on a property path.
    #[must_use]
    pub fn criterion(self, path: impl Into<String>, operator: Operator) -> Self {
        self.token(Token::Property(path.into()))
            .token(Token::Operator(operator))
    }

    /// Compares the last criterion case-insensitively.
    #[must_use]
    pub fn ignore_case(self) -> Self {
        self.token(Token::IgnoreCase)
    }

    /// Conjunction with the next criterion.
    #[must_use]
    pub fn and(self) -> Self {
        self.token(Token::And)
    }

    /// Disjunction with the next criterion.
    #[must_use]
    pub fn or(self) -> Self {
        self.token(Token::Or)
    }

    /// Appends a raw token.
    #[must_use]
    pub fn token(mut self, token: Token) -> Self {
        self.tokens.push(token);
        self
    }

    /// Compares every text criterion case-insensitively.
    #[must_use]
    pub const fn all_ignore_case(mut self) -> Self {
        self.all_ignore_case = true;
        self
    }

    /// Selects distinct rows.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Returns at most `n` results.
    #[must_use]
    pub const fn first(mut self, n: u64) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Appends a static sort criterion.
    #[must_use]
    pub fn order_by(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Appends a bindable parameter.
    #[must_use]
    pub fn param(self, name: impl Into<String>) -> Self {
        self.parameter(MethodParameter::new(name, ParameterKind::Bindable))
    }

    /// Appends a page request parameter.
    #[must_use]
    pub fn pageable(self) -> Self {
        self.parameter(MethodParameter::new("pageable", ParameterKind::Pageable))
    }

    /// Appends a dynamic sort parameter.
    #[must_use]
    pub fn sort(self) -> Self {
        self.parameter(MethodParameter::new("sort", ParameterKind::Sort))
    }

    /// Appends a dynamic limit parameter.
    #[must_use]
    pub fn limit(self) -> Self {
        self.parameter(MethodParameter::new("limit", ParameterKind::Limit))
    }

    fn parameter(mut self, parameter: MethodParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Locks selected rows.
    #[must_use]
    pub const fn with_lock(mut self, mode: LockMode) -> Self {
        self.lock_mode = Some(mode);
        self
    }

    /// Tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Name used in messages: the explicit name, or the criteria spelled out.
    #[must_use]
    pub fn name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let criteria: Vec<String> = self
            .tokens
            .iter()
            .map(|token| match token {
                Token::Property(path) => path.clone(),
                Token::Operator(operator) => operator.to_string(),
                Token::IgnoreCase => String::from("IgnoreCase"),
                Token::And => String::from("and"),
                Token::Or => String::from("or"),
            })
            .collect();
        if criteria.is_empty() {
            format!("{:?}", self.kind).to_lowercase()
        } else {
            format!("{:?} where {}", self.kind, criteria.join(" ")).to_lowercase()
        }
    }

    pub(super) fn parts(&self) -> Parts {
        Parts {
            name: self.name(),
            kind: self.kind,
            return_kind: self.return_kind,
            distinct: self.distinct,
            max_results: self.max_results,
            tokens: self.tokens.clone(),
            all_ignore_case: self.all_ignore_case,
            orders: self.orders.clone(),
            parameters: self.parameters.clone(),
            lock_mode: self.lock_mode,
        }
    }
}
