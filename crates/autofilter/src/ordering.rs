//! Ordering types for query result sorting.
//!
//! Provides [`Direction`] and [`Sort`] for runtime sort criteria, and
//! [`OrderingStep`] for a resolved sort key appended to a query.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::registry::Field;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending order (smallest first).
    #[default]
    #[serde(alias = "asc", alias = "ASC")]
    Asc,
    /// Descending order (largest first).
    #[serde(alias = "desc", alias = "DESC")]
    Desc,
}

impl Direction {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Direction::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Direction::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Parses `asc`/`desc` (or `ascending`/`descending`), ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") || s.eq_ignore_ascii_case("ascending") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") || s.eq_ignore_ascii_case("descending") {
            Ok(Direction::Desc)
        } else {
            Err(ParseDirectionError(s.to_string()))
        }
    }
}

/// A runtime sort criterion: a field name and a direction.
///
/// The field name resolves without regard to case, but text values sort
/// ordinally and case-sensitively, so `"Zeta"` comes before `"alpha"`. See
/// [`compare_values`].
///
/// ```
/// use autofilter::{Direction, Sort};
///
/// let sort = Sort::desc("Number");
/// assert_eq!(sort.field(), "Number");
/// assert_eq!(sort.direction(), Direction::Desc);
///
/// let sort: Sort = serde_json::from_str(r#"{"field": "type"}"#).unwrap();
/// assert_eq!(sort, Sort::asc("type"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    field: String,
    #[serde(default, alias = "dir")]
    direction: Direction,
}

impl Sort {
    /// Creates a new ascending sort for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Sort::new(field, Direction::Asc)
    }

    /// Creates a new descending sort for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        Sort::new(field, Direction::Desc)
    }

    /// Creates a new sort with the given direction.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Sort {
            field: field.into(),
            direction,
        }
    }

    /// Returns the field name, as supplied.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// A resolved sort key appended to a query.
///
/// The primary step of a query decides the order; every later step only
/// breaks ties left by the steps before it.
pub struct OrderingStep<T> {
    field: Field<T>,
    direction: Direction,
    primary: bool,
}

impl<T> OrderingStep<T> {
    /// Builds an ordering step.
    ///
    /// `prior_ordering` must be `true` when the query already holds an
    /// ordering step since its latest projection.
    pub fn build(field: Field<T>, direction: Direction, prior_ordering: bool) -> Self {
        OrderingStep {
            field,
            direction,
            primary: !prior_ordering,
        }
    }

    /// Returns the key field.
    pub fn field(&self) -> Field<T> {
        self.field
    }

    /// Returns the direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `true` for a primary key, `false` for a tie-breaker.
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// Compares two records by this step's key.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let base = compare_values(&self.field.get(a), &self.field.get(b));
        self.direction.apply(base)
    }
}

impl<T> Clone for OrderingStep<T> {
    fn clone(&self) -> Self {
        OrderingStep {
            field: self.field,
            direction: self.direction,
            primary: self.primary,
        }
    }
}

impl<T> fmt::Debug for OrderingStep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderingStep")
            .field("field", &self.field.name())
            .field("direction", &self.direction)
            .field("primary", &self.primary)
            .finish()
    }
}

/// Compares two field values.
///
/// Text compares ordinally by code point. This is case-sensitive, unlike text
/// filtering: every uppercase ASCII letter sorts before every lowercase one.
/// Numbers compare exactly (NaN sorts after every other number) and `false`
/// comes before `true`. Null sorts before any value. Values of different
/// categories compare equal.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .compare(*b)
            .unwrap_or_else(|| a.to_f64().total_cmp(&b.to_f64())),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),

        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,

        _ => Ordering::Equal,
    }
}

/// Compares two records using a list of ordering steps.
///
/// The first step is the primary key, the second breaks its ties, etc.
/// If all steps compare equal, returns `Equal`.
pub fn compare_by_orderings<T>(a: &T, b: &T, orderings: &[OrderingStep<T>]) -> Ordering {
    orderings
        .iter()
        .map(|step| step.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
