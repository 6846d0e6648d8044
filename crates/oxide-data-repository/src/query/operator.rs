//! Criterion operators and their method name keywords.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison applied by a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Between,
    NotBetween,
    In,
    NotIn,
    Like,
    NotLike,
    StartingWith,
    EndingWith,
    Containing,
    NotContaining,
    IsNull,
    IsNotNull,
    True,
    False,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    After,
    Before,
}

/// Method name keywords. A part may end in any of them; the longest
/// matching keyword is tried first.
const KEYWORDS: &[(&str, Operator)] = &[
    ("Is", Operator::Equals),
    ("Equals", Operator::Equals),
    ("IsNot", Operator::NotEquals),
    ("Not", Operator::NotEquals),
    ("IsBetween", Operator::Between),
    ("Between", Operator::Between),
    ("IsNotBetween", Operator::NotBetween),
    ("NotBetween", Operator::NotBetween),
    ("IsIn", Operator::In),
    ("In", Operator::In),
    ("IsNotIn", Operator::NotIn),
    ("NotIn", Operator::NotIn),
    ("IsLike", Operator::Like),
    ("Like", Operator::Like),
    ("IsNotLike", Operator::NotLike),
    ("NotLike", Operator::NotLike),
    ("IsStartingWith", Operator::StartingWith),
    ("StartingWith", Operator::StartingWith),
    ("StartsWith", Operator::StartingWith),
    ("IsEndingWith", Operator::EndingWith),
    ("EndingWith", Operator::EndingWith),
    ("EndsWith", Operator::EndingWith),
    ("IsContaining", Operator::Containing),
    ("Containing", Operator::Containing),
    ("Contains", Operator::Containing),
    ("IsNotContaining", Operator::NotContaining),
    ("NotContaining", Operator::NotContaining),
    ("NotContains", Operator::NotContaining),
    ("IsNull", Operator::IsNull),
    ("Null", Operator::IsNull),
    ("IsNotNull", Operator::IsNotNull),
    ("NotNull", Operator::IsNotNull),
    ("IsTrue", Operator::True),
    ("True", Operator::True),
    ("IsFalse", Operator::False),
    ("False", Operator::False),
    ("IsGreaterThan", Operator::GreaterThan),
    ("GreaterThan", Operator::GreaterThan),
    ("IsGreaterThanEqual", Operator::GreaterThanEqual),
    ("GreaterThanEqual", Operator::GreaterThanEqual),
    ("IsLessThan", Operator::LessThan),
    ("LessThan", Operator::LessThan),
    ("IsLessThanEqual", Operator::LessThanEqual),
    ("LessThanEqual", Operator::LessThanEqual),
    ("IsAfter", Operator::After),
    ("After", Operator::After),
    ("IsBefore", Operator::Before),
    ("Before", Operator::Before),
];

impl Operator {
    /// Number of parameters the operator consumes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::IsNull | Self::IsNotNull | Self::True | Self::False => 0,
            Self::Between | Self::NotBetween => 2,
            _ => 1,
        }
    }

    /// Returns whether the operator only applies to character properties.
    #[must_use]
    pub const fn requires_text(self) -> bool {
        matches!(
            self,
            Self::Like
                | Self::NotLike
                | Self::StartingWith
                | Self::EndingWith
                | Self::Containing
                | Self::NotContaining
        )
    }

    /// Returns whether the operator only applies to boolean properties.
    #[must_use]
    pub const fn requires_bool(self) -> bool {
        matches!(self, Self::True | Self::False)
    }

    /// Returns whether the operator takes a collection argument.
    #[must_use]
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Ways to split a method name part into property and operator.
    ///
    /// Candidates are ordered by keyword length, longest first, and always
    /// end with the whole part compared for equality. A keyword only counts
    /// when a non-empty property name precedes it.
    #[must_use]
    pub fn candidates(part: &str) -> Vec<(&str, Option<Self>)> {
        let mut matches: Vec<(&str, Self)> = KEYWORDS
            .iter()
            .filter(|(keyword, _)| part.len() > keyword.len() && part.ends_with(keyword))
            .map(|(keyword, operator)| (&part[..part.len() - keyword.len()], *operator))
            .collect();
        matches.sort_by_key(|(property, _)| property.len());
        matches
            .into_iter()
            .map(|(property, operator)| (property, Some(operator)))
            .chain(std::iter::once((part, None)))
            .collect()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
