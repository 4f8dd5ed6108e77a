//! Comparison operators for filter criteria.
//!
//! The [`Operator`] enum is closed: every category of field type accepts a
//! subset of it, checked when a predicate is built.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::Category;

/// Comparison operator for a filter.
///
/// Operators are grouped by the categories they support:
/// - **Universal**: `Equal`, `NotEqual`
/// - **Ordered** (numeric, date/time): `LessThan`, `LessThanOrEqual`,
///   `GreaterThan`, `GreaterThanOrEqual`
/// - **Text**: `Contains`, `NotContains`
///
/// Operators deserialize from their variant name or from a short alias
/// (`eq`, `ne`, `lt`, `lte`, `gt`, `gte`, `contains`, `notcontains`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equal. Case-insensitive for text, day-bucketed for dates.
    #[serde(alias = "eq")]
    Equal,
    /// Not equal. Always the negation of `Equal`.
    #[serde(alias = "ne")]
    NotEqual,
    /// Less than.
    #[serde(alias = "lt")]
    LessThan,
    /// Less than or equal.
    #[serde(alias = "lte")]
    LessThanOrEqual,
    /// Greater than.
    #[serde(alias = "gt")]
    GreaterThan,
    /// Greater than or equal.
    #[serde(alias = "gte")]
    GreaterThanOrEqual,
    /// Text contains substring.
    #[serde(alias = "contains")]
    Contains,
    /// Text does not contain substring.
    #[serde(alias = "notcontains", alias = "not_contains")]
    NotContains,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 8] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::Contains,
        Operator::NotContains,
    ];

    /// Returns `true` if this operator is valid for text comparisons.
    pub fn is_text_op(self) -> bool {
        matches!(
            self,
            Operator::Equal | Operator::NotEqual | Operator::Contains | Operator::NotContains
        )
    }

    /// Returns `true` if this operator is valid for numeric comparisons.
    pub fn is_number_op(self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::LessThan
                | Operator::LessThanOrEqual
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqual
        )
    }

    /// Returns `true` if this operator is valid for date/time comparisons.
    pub fn is_datetime_op(self) -> bool {
        self.is_number_op()
    }

    /// Returns `true` if this operator is valid for boolean comparisons.
    pub fn is_bool_op(self) -> bool {
        matches!(self, Operator::Equal | Operator::NotEqual)
    }

    /// Returns `true` if this operator is valid for the given category.
    pub fn supports(self, category: Category) -> bool {
        match category {
            Category::Text => self.is_text_op(),
            Category::Numeric => self.is_number_op(),
            Category::Boolean => self.is_bool_op(),
            Category::DateTime => self.is_datetime_op(),
        }
    }

    /// Returns `true` for operators defined as the negation of another.
    pub fn is_negated(self) -> bool {
        matches!(self, Operator::NotEqual | Operator::NotContains)
    }

    /// Maps negated operators to the operator they negate.
    ///
    /// - `NotEqual` -> `Equal`
    /// - `NotContains` -> `Contains`
    /// - Others unchanged
    pub fn positive(self) -> Operator {
        match self {
            Operator::NotEqual => Operator::Equal,
            Operator::NotContains => Operator::Contains,
            other => other,
        }
    }

    /// Evaluates a comparison given an ordering result.
    ///
    /// Used for numeric and exact date/time comparisons.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqual => ordering != Ordering::Greater,
            Operator::Contains | Operator::NotContains => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "Equal",
            Operator::NotEqual => "NotEqual",
            Operator::LessThan => "LessThan",
            Operator::LessThanOrEqual => "LessThanOrEqual",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanOrEqual => "GreaterThanOrEqual",
            Operator::Contains => "Contains",
            Operator::NotContains => "NotContains",
        }
    }

    /// Returns the short alias of this operator.
    pub fn alias(self) -> &'static str {
        match self {
            Operator::Equal => "eq",
            Operator::NotEqual => "ne",
            Operator::LessThan => "lt",
            Operator::LessThanOrEqual => "lte",
            Operator::GreaterThan => "gt",
            Operator::GreaterThanOrEqual => "gte",
            Operator::Contains => "contains",
            Operator::NotContains => "notcontains",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown operator name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator '{0}'")]
pub struct ParseOperatorError(pub String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    /// Parses a variant name or alias, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| s.eq_ignore_ascii_case(op.as_str()) || s.eq_ignore_ascii_case(op.alias()))
            .ok_or_else(|| ParseOperatorError(s.to_string()))
    }
}
