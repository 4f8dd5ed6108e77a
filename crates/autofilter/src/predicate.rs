//! Predicate builder: typed boolean tests over a record.
//!
//! [`Predicate::build`] combines a resolved [`Field`], an [`Operator`] and a
//! coerced [`TypedValue`] into a closed [`Test`] that any executor can either
//! evaluate directly ([`Predicate::matches`]) or translate into its own
//! query language.
//!
//! Negated operators (`NotEqual`, `NotContains`) are stored as the test of
//! their positive form plus a negation flag, so a record always satisfies
//! exactly one of `Equal v` and `NotEqual v`.

use std::fmt;

use chrono::{Days, NaiveDateTime, NaiveTime};

use crate::coerce::{Literal, TypedValue};
use crate::engine::DateMatching;
use crate::error::{AutoFilterError, Result};
use crate::op::Operator;
use crate::registry::Field;
use crate::value::{Category, Number, Value};

/// The positive test a predicate performs on a field value.
///
/// A null field value fails every test except [`Test::IsNull`].
#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    /// Case-insensitive text equality, or containment when `contains` is set.
    /// The needle is stored lowercased.
    Text { needle: String, contains: bool },
    /// Exact ordered comparison `field <op> rhs`.
    Number { op: Operator, rhs: Number },
    /// Boolean equality.
    Bool(bool),
    /// Comparison against the half-open day `[start, end)`.
    ///
    /// - `Equal`: `start <= f < end`
    /// - `GreaterThan`: `f >= end`
    /// - `GreaterThanOrEqual`: `f >= start`
    /// - `LessThan`: `f < start`
    /// - `LessThanOrEqual`: `f < end`
    DateRange {
        op: Operator,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Exact comparison `field <op> at`.
    Instant { op: Operator, at: NaiveDateTime },
    /// The field value is null.
    IsNull,
}

impl Test {
    /// Evaluates the test against a field value.
    pub fn eval(&self, value: &Value<'_>) -> bool {
        match (self, value) {
            (Test::IsNull, value) => value.is_null(),
            (_, Value::Null) => false,

            (Test::Text { needle, contains }, Value::Text(s)) => {
                let folded = s.to_lowercase();
                if *contains {
                    folded.contains(needle.as_str())
                } else {
                    folded == *needle
                }
            }

            (Test::Number { op, rhs }, Value::Number(n)) => n
                .compare(*rhs)
                .map(|ordering| op.eval_ordering(ordering))
                .unwrap_or(false),

            (Test::Bool(expected), Value::Bool(b)) => b == expected,

            (Test::DateRange { op, start, end }, Value::DateTime(dt)) => match op {
                Operator::Equal => start <= dt && dt < end,
                Operator::GreaterThan => dt >= end,
                Operator::GreaterThanOrEqual => dt >= start,
                Operator::LessThan => dt < start,
                Operator::LessThanOrEqual => dt < end,
                _ => false,
            },

            (Test::Instant { op, at }, Value::DateTime(dt)) => op.eval_ordering(dt.cmp(at)),

            // Accessor returned a value of another category
            _ => false,
        }
    }
}

/// A boolean predicate over records of type `T`.
pub struct Predicate<T> {
    field: Field<T>,
    operator: Operator,
    test: Test,
    negated: bool,
}

impl<T> Predicate<T> {
    /// Builds a predicate for a resolved field.
    ///
    /// Fails with [`AutoFilterError::UnsupportedOperator`] when the operator
    /// is not valid for the field's type category, or when a null value is
    /// combined with anything but `Equal`/`NotEqual`.
    pub fn build(
        field: Field<T>,
        operator: Operator,
        value: &TypedValue,
        dates: DateMatching,
    ) -> Result<Self> {
        let ty = field.field_type();
        let unsupported = || AutoFilterError::UnsupportedOperator { op: operator, ty };

        if !operator.supports(ty.category()) {
            return Err(unsupported());
        }

        let positive = operator.positive();
        let test = match (value.literal(), ty.category()) {
            (Literal::Null, _) if positive == Operator::Equal => Test::IsNull,
            (Literal::Null, _) => return Err(unsupported()),

            (Literal::Text(s), Category::Text) => Test::Text {
                needle: s.to_lowercase(),
                contains: positive == Operator::Contains,
            },

            (Literal::Number(n), Category::Numeric) => Test::Number {
                op: positive,
                rhs: *n,
            },

            (Literal::Bool(b), Category::Boolean) => Test::Bool(*b),

            (Literal::DateTime(at), Category::DateTime) => {
                if dates == DateMatching::ExactWhenTimed && at.time() != NaiveTime::MIN {
                    Test::Instant {
                        op: positive,
                        at: *at,
                    }
                } else {
                    let (start, end) = day_bounds(*at).ok_or_else(|| {
                        AutoFilterError::ValueFormat {
                            field: field.name().to_string(),
                            value: value.literal().to_string(),
                            ty,
                            reason: "date is out of range".into(),
                        }
                    })?;
                    Test::DateRange {
                        op: positive,
                        start,
                        end,
                    }
                }
            }

            (literal, _) => {
                return Err(AutoFilterError::ValueFormat {
                    field: field.name().to_string(),
                    value: literal.to_string(),
                    ty,
                    reason: format!("value was coerced as {}", value.field_type()),
                })
            }
        };

        Ok(Predicate {
            field,
            operator,
            test,
            negated: operator.is_negated(),
        })
    }

    /// Returns `true` if the record satisfies the predicate.
    pub fn matches(&self, record: &T) -> bool {
        self.test.eval(&self.field.get(record)) != self.negated
    }

    /// Returns the field the predicate reads.
    pub fn field(&self) -> Field<T> {
        self.field
    }

    /// Returns the operator the predicate was built from.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the positive test.
    pub fn test(&self) -> &Test {
        &self.test
    }

    /// Returns `true` if the result of [`Predicate::test`] is inverted.
    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Predicate {
            field: self.field,
            operator: self.operator,
            test: self.test.clone(),
            negated: self.negated,
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("field", &self.field.name())
            .field("operator", &self.operator)
            .field("test", &self.test)
            .field("negated", &self.negated)
            .finish()
    }
}

/// Returns the half-open day containing `at`: midnight to the next midnight.
pub fn day_bounds(at: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = at.date().and_time(NaiveTime::MIN);
    let end = start.checked_add_days(Days::new(1))?;
    Some((start, end))
}
