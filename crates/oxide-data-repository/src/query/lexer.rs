//! Splitting method names into a subject and criteria tokens.

use serde::{Deserialize, Serialize};

use super::operator::Operator;
use super::QueryKind;
use crate::paging::{Direction, Order};

/// A token of the criteria grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// A property name or path.
    Property(String),
    /// An explicit operator following a property.
    Operator(Operator),
    /// Case-insensitive comparison of the preceding criterion.
    IgnoreCase,
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}

const PREFIXES: &[(&str, QueryKind)] = &[
    ("find", QueryKind::Select),
    ("read", QueryKind::Select),
    ("get", QueryKind::Select),
    ("query", QueryKind::Select),
    ("search", QueryKind::Select),
    ("stream", QueryKind::Select),
    ("count", QueryKind::Count),
    ("exists", QueryKind::Exists),
    ("delete", QueryKind::Delete),
    ("remove", QueryKind::Delete),
];

const IGNORE_CASE: &[&str] = &["IgnoreCase", "IgnoringCase"];
const ALL_IGNORE_CASE: &[&str] = &["AllIgnoreCase", "AllIgnoringCase"];

/// Everything in a method name before `By`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subject {
    pub kind: QueryKind,
    pub distinct: bool,
    pub max_results: Option<u64>,
}

/// A method name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MethodName<'a> {
    pub subject: Subject,
    pub criteria: &'a str,
    pub all_ignore_case: bool,
    pub orders: Vec<Order>,
}

pub(crate) fn split_method_name(name: &str) -> Result<MethodName<'_>, String> {
    let (kind, rest) = PREFIXES
        .iter()
        .find_map(|(prefix, kind)| {
            name.strip_prefix(prefix)
                .filter(|rest| starts_upper_or_empty(rest))
                .map(|rest| (*kind, rest))
        })
        .ok_or_else(|| {
            String::from("method name must start with find, read, get, query, search, stream, count, exists, delete or remove")
        })?;

    let (subject, predicate) = match find_keyword(rest, "By") {
        Some(at) => (&rest[..at], Some(&rest[at + 2..])),
        None => (rest, None),
    };
    let subject = parse_subject(kind, subject)?;

    let Some(predicate) = predicate else {
        return Ok(MethodName {
            subject,
            criteria: "",
            all_ignore_case: false,
            orders: Vec::new(),
        });
    };
    if predicate.is_empty() {
        return Err(String::from("missing criteria after `By`"));
    }

    let (criteria, orders) = match find_keyword(predicate, "OrderBy") {
        Some(at) => (&predicate[..at], parse_orders(&predicate[at + 7..])?),
        None => (predicate, Vec::new()),
    };
    let (criteria, all_ignore_case) = strip_any_suffix(criteria, ALL_IGNORE_CASE);

    Ok(MethodName {
        subject,
        criteria,
        all_ignore_case,
        orders,
    })
}

fn parse_subject(kind: QueryKind, subject: &str) -> Result<Subject, String> {
    let distinct = find_keyword(subject, "Distinct").is_some();
    let mut max_results = None;
    for keyword in ["First", "Top"] {
        let Some(at) = find_keyword_followed_by_digit(subject, keyword) else {
            continue;
        };
        let digits: String = subject[at + keyword.len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        max_results = Some(if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| format!("invalid result limit `{keyword}{digits}`"))?
        });
        break;
    }
    Ok(Subject {
        kind,
        distinct,
        max_results,
    })
}

fn parse_orders(source: &str) -> Result<Vec<Order>, String> {
    if source.is_empty() {
        return Err(String::from("missing property after `OrderBy`"));
    }
    let mut orders = Vec::new();
    let mut rest = source;
    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .find_map(|end| {
                let head = &rest[..end];
                let boundary = starts_upper_or_empty(&rest[end..]);
                [("Desc", Direction::Desc), ("Asc", Direction::Asc)]
                    .into_iter()
                    .find(|(suffix, _)| {
                        boundary && head.len() > suffix.len() && head.ends_with(suffix)
                    })
                    .map(|(suffix, direction)| (end, &head[..head.len() - suffix.len()], direction))
            });
        match split {
            Some((end, property, direction)) => {
                let (property, ignore_case) = strip_any_suffix(property, IGNORE_CASE);
                let mut order = Order::by(property, direction);
                order.ignore_case = ignore_case;
                orders.push(order);
                rest = &rest[end..];
            }
            None => {
                orders.push(Order::asc(rest));
                rest = "";
            }
        }
    }
    Ok(orders)
}

/// Splits the criteria part of a method name into tokens.
///
/// `is_property` decides between competing keyword splits: `Login` ends in
/// the `In` keyword, but is kept whole when `log` is not a property.
pub(crate) fn tokenize(criteria: &str, is_property: impl Fn(&str) -> bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (i, or_part) in split_on(criteria, "Or").into_iter().enumerate() {
        if i > 0 {
            tokens.push(Token::Or);
        }
        for (j, part) in split_on(or_part, "And").into_iter().enumerate() {
            if j > 0 {
                tokens.push(Token::And);
            }
            tokenize_part(part, &is_property, &mut tokens);
        }
    }
    tokens
}

fn tokenize_part(part: &str, is_property: &impl Fn(&str) -> bool, tokens: &mut Vec<Token>) {
    if part.is_empty() {
        return;
    }
    let (part, ignore_case) = strip_any_suffix(part, IGNORE_CASE);
    let candidates = Operator::candidates(part);
    let (property, operator) = candidates
        .iter()
        .find(|(property, _)| is_property(property))
        .or_else(|| candidates.first())
        .copied()
        .unwrap_or((part, None));
    tokens.push(Token::Property(property.to_string()));
    if let Some(operator) = operator {
        tokens.push(Token::Operator(operator));
    }
    if ignore_case {
        tokens.push(Token::IgnoreCase);
    }
}

/// Splits on `keyword` wherever it is followed by an upper case letter.
fn split_on<'a>(source: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut rest = source;
    while let Some(at) = find_keyword(rest, keyword) {
        if at + keyword.len() == rest.len() {
            break;
        }
        parts.push(&rest[..at]);
        rest = &rest[at + keyword.len()..];
    }
    parts.push(rest);
    parts
}

/// Position of the first `keyword` followed by an upper case letter or the
/// end of input.
fn find_keyword(source: &str, keyword: &str) -> Option<usize> {
    source
        .match_indices(keyword)
        .map(|(at, _)| at)
        .find(|at| starts_upper_or_empty(&source[at + keyword.len()..]))
}

fn find_keyword_followed_by_digit(source: &str, keyword: &str) -> Option<usize> {
    source.match_indices(keyword).map(|(at, _)| at).find(|at| {
        let rest = &source[at + keyword.len()..];
        starts_upper_or_empty(rest) || rest.starts_with(|c: char| c.is_ascii_digit())
    })
}

fn starts_upper_or_empty(source: &str) -> bool {
    source.chars().next().map_or(true, char::is_uppercase)
}

fn strip_any_suffix<'a>(source: &'a str, suffixes: &[&str]) -> (&'a str, bool) {
    suffixes
        .iter()
        .find_map(|suffix| {
            source
                .strip_suffix(suffix)
                .filter(|rest| !rest.is_empty())
        })
        .map_or((source, false), |rest| (rest, true))
}
