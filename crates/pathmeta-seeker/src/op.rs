//! Comparison operators for query predicates.
//!
//! The operator set is closed: every predicate is dispatched through [`Op`],
//! never through string evaluation.

use std::cmp::Ordering;

/// Comparison operator for a predicate.
///
/// Operators are grouped by the operand they take:
/// - **Value**: `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte`
/// - **List**: `In`, `NotIn`
/// - **Absence marker**: `Is`, `IsNot` (operand must be `None`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Value operators
    /// Equal (exact string match).
    Eq,
    /// Not equal.
    Ne,
    /// Greater than, in natural order.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,

    // List operators
    /// Value is one of the given list.
    In,
    /// Value is none of the given list.
    NotIn,

    // Presence operators
    /// `is None`: the key is absent.
    Is,
    /// `is not None`: the key is present.
    IsNot,
}

impl Op {
    /// All operators, single-word forms first.
    pub const ALL: [Op; 10] = [
        Op::Eq,
        Op::Ne,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::In,
        Op::NotIn,
        Op::Is,
        Op::IsNot,
    ];

    /// Parses an operator keyword such as `>=` or `not in`.
    pub fn from_keyword(keyword: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.as_str() == keyword)
    }

    /// Returns `true` for operators whose keyword spans two words.
    pub fn is_two_words(self) -> bool {
        matches!(self, Op::NotIn | Op::IsNot)
    }

    /// Returns `true` if this operator compares by ordering.
    pub fn is_ordering_op(self) -> bool {
        matches!(self, Op::Gt | Op::Gte | Op::Lt | Op::Lte)
    }

    /// Returns `true` if this operator takes a bracketed list.
    pub fn is_list_op(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    /// Returns `true` if this operator takes the `None` marker.
    pub fn is_presence_op(self) -> bool {
        matches!(self, Op::Is | Op::IsNot)
    }

    /// Evaluates a comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the keyword of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => "in",
            Op::NotIn => "not in",
            Op::Is => "is",
            Op::IsNot => "is not",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
