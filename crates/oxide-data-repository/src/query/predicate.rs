//! Predicate trees produced by query derivation.

use serde::Serialize;

use super::operator::Operator;
use super::resolve::ResolvedProperty;

/// One comparison of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Criterion {
    /// Compared column.
    pub property: ResolvedProperty,
    /// Comparison.
    pub operator: Operator,
    /// Compare with `UPPER` on both sides.
    pub ignore_case: bool,
    /// Positions in the list of bindable arguments, one per operand.
    pub parameters: Vec<usize>,
}

/// A WHERE clause as a tree of criteria.
///
/// Children are kept in declaration order so rendering is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// A single criterion.
    Leaf(Criterion),
    /// All children hold.
    And(Vec<Predicate>),
    /// Any child holds.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Criteria in rendering order.
    #[must_use]
    pub fn criteria(&self) -> Vec<&Criterion> {
        let mut criteria = Vec::new();
        self.collect(&mut criteria);
        criteria
    }

    /// Number of bindable arguments consumed by all criteria.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.criteria().iter().map(|c| c.parameters.len()).sum()
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Criterion>) {
        match self {
            Self::Leaf(criterion) => out.push(criterion),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect(out);
                }
            }
        }
    }

    /// Folds a list into a single node: one child stays as is.
    pub(crate) fn all(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Self::And(children)
        }
    }

    pub(crate) fn any(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Self::Or(children)
        }
    }
}
