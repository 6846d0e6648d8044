//! Turning tokens into predicate trees and validating the result.

use oxide_data_core::{Dialect, LockMode};
use tracing::debug;

use super::lexer::{self, Token};
use super::operator::Operator;
use super::path::PathQuery;
use super::predicate::{Criterion, Predicate};
use super::resolve::{PropertyResolver, ResolvedProperty};
use super::{DerivedQuery, QueryKind};
use crate::error::{RepositoryError, Result};
use crate::mapping::EntityMetadata;
use crate::method::{Cardinality, MethodParameter, ParameterKind, QueryMethod, ReturnKind};
use crate::paging::Order;

/// Derives queries for one aggregate on one dialect.
///
/// ```rust
/// use oxide_data_core::{Dialect, DialectKind, PropertyType};
/// use oxide_data_repository::mapping::{EntityMetadata, PersistentProperty};
/// use oxide_data_repository::method::{QueryMethod, ReturnKind};
/// use oxide_data_repository::query::{Operator, QueryDeriver};
///
/// let person = EntityMetadata::new("Person", "person")
///     .with_property(PersistentProperty::simple("age", PropertyType::Int32));
/// let deriver = QueryDeriver::new(&person, Dialect::of(DialectKind::Postgres));
///
/// let method = QueryMethod::new("findByAgeBetween", ReturnKind::Many)
///     .param("from")
///     .param("to");
/// let query = deriver.derive(&method).unwrap();
/// let criteria = query.predicate.as_ref().unwrap().criteria();
/// assert_eq!(criteria[0].operator, Operator::Between);
/// assert_eq!(criteria[0].parameters, vec![0, 1]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryDeriver<'a> {
    entity: &'a EntityMetadata,
    dialect: Dialect,
}

/// Everything needed to build a [`DerivedQuery`], from either source.
pub(super) struct Parts {
    pub name: String,
    pub kind: QueryKind,
    pub return_kind: ReturnKind,
    pub distinct: bool,
    pub max_results: Option<u64>,
    pub tokens: Vec<Token>,
    pub all_ignore_case: bool,
    pub orders: Vec<Order>,
    pub parameters: Vec<MethodParameter>,
    pub lock_mode: Option<LockMode>,
}

impl<'a> QueryDeriver<'a> {
    /// Creates a deriver.
    #[must_use]
    pub const fn new(entity: &'a EntityMetadata, dialect: Dialect) -> Self {
        Self { entity, dialect }
    }

    /// Derives a query from a method name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidDerivation`] when the name cannot be
    /// parsed, names unknown or join-requiring properties, or does not fit
    /// the declared parameters and return type.
    pub fn derive(&self, method: &QueryMethod) -> Result<DerivedQuery> {
        let name = &method.name;
        let split = lexer::split_method_name(name)
            .map_err(|reason| RepositoryError::derivation(name, reason))?;
        let resolver = self.resolver();
        let tokens = lexer::tokenize(split.criteria, |p| resolver.is_property(p));
        debug!(method = %name, tokens = tokens.len(), "tokenized method name");
        self.build(Parts {
            name: name.clone(),
            kind: split.subject.kind,
            return_kind: method.return_kind,
            distinct: split.subject.distinct,
            max_results: split.subject.max_results,
            tokens,
            all_ignore_case: split.all_ignore_case,
            orders: split.orders,
            parameters: method.parameters.clone(),
            lock_mode: method.lock_mode,
        })
    }

    /// Derives a query from explicit property paths.
    ///
    /// # Errors
    ///
    /// Same as [`Self::derive`].
    pub fn derive_path(&self, query: &PathQuery) -> Result<DerivedQuery> {
        self.build(query.parts())
    }

    const fn resolver(&self) -> PropertyResolver<'a> {
        PropertyResolver::new(self.entity, self.dialect)
    }

    fn build(&self, parts: Parts) -> Result<DerivedQuery> {
        let name = parts.name.as_str();
        let fail = |reason: String| RepositoryError::derivation(name, reason);

        validate_subject(&parts).map_err(fail)?;
        let special = validate_parameters(&parts).map_err(fail)?;

        let resolver = self.resolver();
        let bindable: Vec<usize> = parts
            .parameters
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_bindable())
            .map(|(i, _)| i)
            .collect();

        let mut parser = Parser::new(resolver, parts.all_ignore_case);
        for token in &parts.tokens {
            parser.accept(token).map_err(fail)?;
        }
        let (predicate, consumed) = parser.finish().map_err(fail)?;
        if consumed != bindable.len() {
            return Err(fail(format!(
                "criteria take {consumed} parameter(s) but {} bindable parameter(s) are declared",
                bindable.len()
            )));
        }

        let sort = parts
            .orders
            .iter()
            .map(|order| resolver.resolve_order(order))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(fail)?;
        if parts.distinct {
            if let Some(order) = sort.iter().find(|order| order.ignore_case) {
                return Err(fail(format!(
                    "distinct query cannot order `{}` ignoring case",
                    order.property.path
                )));
            }
        }

        let derived = DerivedQuery {
            name: parts.name.clone(),
            kind: parts.kind,
            distinct: parts.distinct,
            max_results: parts.max_results,
            predicate,
            sort,
            cardinality: Cardinality::from(parts.return_kind),
            lock_mode: parts.lock_mode,
            parameters: parts.parameters,
            bindable,
        };
        debug!(
            method = %derived.name,
            kind = ?derived.kind,
            criteria = derived.predicate.as_ref().map_or(0, |p| p.criteria().len()),
            special = special,
            "derived query"
        );
        Ok(derived)
    }
}

fn validate_subject(parts: &Parts) -> std::result::Result<(), String> {
    let compatible = match parts.kind {
        QueryKind::Select => matches!(
            parts.return_kind,
            ReturnKind::One
                | ReturnKind::Many
                | ReturnKind::Stream
                | ReturnKind::Slice
                | ReturnKind::Page
        ),
        QueryKind::Count => parts.return_kind == ReturnKind::Count,
        QueryKind::Exists => parts.return_kind == ReturnKind::Exists,
        QueryKind::Delete => parts.return_kind == ReturnKind::Deleted,
    };
    if !compatible {
        return Err(format!(
            "{:?} query cannot return {:?}",
            parts.kind, parts.return_kind
        ));
    }
    if parts.kind == QueryKind::Select {
        if parts.max_results == Some(0) {
            return Err(String::from("result limit must be at least 1"));
        }
        if parts.distinct && parts.lock_mode.is_some() {
            return Err(String::from("distinct query cannot take a lock"));
        }
        return Ok(());
    }
    if parts.max_results.is_some() {
        return Err(format!(
            "result limiting is only supported on select queries, not {:?}",
            parts.kind
        ));
    }
    if parts.distinct {
        return Err(format!("{:?} query cannot be distinct", parts.kind));
    }
    if !parts.orders.is_empty() {
        return Err(format!("{:?} query cannot be ordered", parts.kind));
    }
    if parts.lock_mode.is_some() {
        return Err(format!("{:?} query cannot take a lock", parts.kind));
    }
    Ok(())
}

/// Checks the special parameters and returns how many there are.
fn validate_parameters(parts: &Parts) -> std::result::Result<usize, String> {
    let count = |kind: ParameterKind| parts.parameters.iter().filter(|p| p.kind == kind).count();
    let pageables = count(ParameterKind::Pageable);
    let sorts = count(ParameterKind::Sort);
    let limits = count(ParameterKind::Limit);

    for (kind, n) in [("page request", pageables), ("sort", sorts), ("limit", limits)] {
        if n > 1 {
            return Err(format!("at most one {kind} parameter is allowed"));
        }
    }
    if pageables > 0 && (sorts > 0 || limits > 0) {
        return Err(String::from(
            "a page request cannot be combined with a sort or limit parameter; sort the page request instead",
        ));
    }
    let special = pageables + sorts + limits;
    if special > 0 && parts.kind != QueryKind::Select {
        return Err(format!(
            "{:?} query cannot take page, sort or limit parameters",
            parts.kind
        ));
    }
    if matches!(parts.return_kind, ReturnKind::Slice | ReturnKind::Page) && pageables == 0 {
        return Err(format!(
            "returning {:?} requires a page request parameter",
            parts.return_kind
        ));
    }
    Ok(special)
}

/// A criterion whose operator and flags are still being read.
#[derive(Debug)]
struct Pending {
    property: ResolvedProperty,
    operator: Option<Operator>,
    ignore_case: bool,
}

#[derive(Debug)]
enum State {
    /// At the start or after a criterion. `after` is the combinator just
    /// read, if any.
    ExpectPropertyOrCombinator { after: Option<Token> },
    /// A property was read; an operator, `IgnoreCase` or a combinator may
    /// follow. No operator means equality.
    ExpectOperatorOrImplicitEquals(Pending),
}

struct Parser<'a> {
    resolver: PropertyResolver<'a>,
    all_ignore_case: bool,
    state: State,
    next_parameter: usize,
    current: Vec<Predicate>,
    groups: Vec<Predicate>,
}

impl<'a> Parser<'a> {
    const fn new(resolver: PropertyResolver<'a>, all_ignore_case: bool) -> Self {
        Self {
            resolver,
            all_ignore_case,
            state: State::ExpectPropertyOrCombinator { after: None },
            next_parameter: 0,
            current: Vec::new(),
            groups: Vec::new(),
        }
    }

    fn accept(&mut self, token: &Token) -> std::result::Result<(), String> {
        let state = std::mem::replace(
            &mut self.state,
            State::ExpectPropertyOrCombinator { after: None },
        );
        self.state = match (state, token) {
            (State::ExpectPropertyOrCombinator { .. }, Token::Property(name)) => {
                State::ExpectOperatorOrImplicitEquals(Pending {
                    property: self.resolver.resolve(name)?,
                    operator: None,
                    ignore_case: false,
                })
            }
            (State::ExpectPropertyOrCombinator { after }, Token::And | Token::Or) => {
                return Err(match after {
                    Some(previous) => format!("{} directly follows {}", name_of(token), name_of(&previous)),
                    None => format!("criteria cannot start with {}", name_of(token)),
                });
            }
            (State::ExpectPropertyOrCombinator { .. }, Token::Operator(operator)) => {
                return Err(format!("operator `{operator}` has no property"));
            }
            (State::ExpectPropertyOrCombinator { .. }, Token::IgnoreCase) => {
                return Err(String::from("`IgnoreCase` has no property"));
            }
            (State::ExpectOperatorOrImplicitEquals(mut pending), Token::Operator(operator)) => {
                if let Some(previous) = pending.operator {
                    return Err(format!(
                        "property `{}` has two operators, `{previous}` and `{operator}`",
                        pending.property.path
                    ));
                }
                pending.operator = Some(*operator);
                State::ExpectOperatorOrImplicitEquals(pending)
            }
            (State::ExpectOperatorOrImplicitEquals(mut pending), Token::IgnoreCase) => {
                pending.ignore_case = true;
                State::ExpectOperatorOrImplicitEquals(pending)
            }
            (State::ExpectOperatorOrImplicitEquals(pending), Token::Property(name)) => {
                return Err(format!(
                    "missing `And` or `Or` between `{}` and `{name}`",
                    pending.property.path
                ));
            }
            (State::ExpectOperatorOrImplicitEquals(pending), Token::And | Token::Or) => {
                let criterion = self.complete(pending)?;
                self.current.push(Predicate::Leaf(criterion));
                if *token == Token::Or {
                    let group = std::mem::take(&mut self.current);
                    self.groups.push(Predicate::all(group));
                }
                State::ExpectPropertyOrCombinator {
                    after: Some(token.clone()),
                }
            }
        };
        Ok(())
    }

    /// Binds parameter slots and checks operator and type compatibility.
    fn complete(&mut self, pending: Pending) -> std::result::Result<Criterion, String> {
        let Pending {
            property,
            operator,
            ignore_case,
        } = pending;
        let operator = operator.unwrap_or(Operator::Equals);
        let ty = &property.property_type;
        if operator.requires_text() && !ty.is_text() {
            return Err(format!(
                "`{operator}` requires a text property, `{}` is {ty}",
                property.path
            ));
        }
        if operator.requires_bool() && !ty.is_bool() {
            return Err(format!(
                "`{operator}` requires a boolean property, `{}` is {ty}",
                property.path
            ));
        }
        if ignore_case && !ty.is_text() {
            return Err(format!(
                "`IgnoreCase` requires a text property, `{}` is {ty}",
                property.path
            ));
        }
        let ignore_case = ignore_case || (self.all_ignore_case && ty.is_text());
        let arity = operator.arity();
        let parameters = (self.next_parameter..self.next_parameter + arity).collect();
        self.next_parameter += arity;
        Ok(Criterion {
            property,
            operator,
            ignore_case,
            parameters,
        })
    }

    /// Returns the predicate and the number of parameter slots used.
    fn finish(mut self) -> std::result::Result<(Option<Predicate>, usize), String> {
        let state = std::mem::replace(
            &mut self.state,
            State::ExpectPropertyOrCombinator { after: None },
        );
        match state {
            State::ExpectPropertyOrCombinator { after: Some(token) } => {
                return Err(format!("criteria end with a dangling {}", name_of(&token)));
            }
            State::ExpectPropertyOrCombinator { after: None } => {}
            State::ExpectOperatorOrImplicitEquals(pending) => {
                let criterion = self.complete(pending)?;
                self.current.push(Predicate::Leaf(criterion));
            }
        }
        if !self.current.is_empty() {
            let group = std::mem::take(&mut self.current);
            self.groups.push(Predicate::all(group));
        }
        let predicate = (!self.groups.is_empty()).then(|| Predicate::any(self.groups));
        Ok((predicate, self.next_parameter))
    }
}

const fn name_of(token: &Token) -> &'static str {
    match token {
        Token::And => "`And`",
        Token::Or => "`Or`",
        Token::IgnoreCase => "`IgnoreCase`",
        Token::Property(_) => "a property",
        Token::Operator(_) => "an operator",
    }
}
