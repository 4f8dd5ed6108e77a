//! Filter criteria supplied at runtime.
//!
//! A [`Filter`] names a field, an operator and a string-encoded value. It is
//! plain data: nothing is resolved or coerced until it is applied to a query.

use serde::{Deserialize, Serialize};

use crate::op::Operator;

/// A single filter criterion.
///
/// A filter consists of:
/// - A field name, matched case-insensitively against the record shape
/// - An operator (how to compare)
/// - A raw value, coerced to the field's type when applied. `None` is the
///   null value and is only legal for nullable fields.
///
/// # Example
///
/// ```
/// use autofilter::{Filter, Operator};
///
/// let filter = Filter::new("DueDate", Operator::GreaterThanOrEqual, "2025-10-02 15:00");
/// assert_eq!(filter.field(), "DueDate");
/// assert_eq!(filter.value(), Some("2025-10-02 15:00"));
///
/// let filter: Filter = serde_json::from_str(r#"{"field": "total", "op": "lt", "value": "0"}"#).unwrap();
/// assert_eq!(filter, Filter::lt("total", "0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    field: String,
    #[serde(alias = "op")]
    operator: Operator,
    #[serde(default)]
    value: Option<String>,
}

impl Filter {
    /// Creates a new filter with a non-null value.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Filter {
            field: field.into(),
            operator,
            value: Some(value.into()),
        }
    }

    /// Creates a filter comparing the field with null.
    pub fn null(field: impl Into<String>, operator: Operator) -> Self {
        Filter {
            field: field.into(),
            operator,
            value: None,
        }
    }

    /// Creates an `Equal` filter.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::Equal, value)
    }

    /// Creates a `NotEqual` filter.
    pub fn ne(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::NotEqual, value)
    }

    /// Creates a `LessThan` filter.
    pub fn lt(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::LessThan, value)
    }

    /// Creates a `LessThanOrEqual` filter.
    pub fn lte(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::LessThanOrEqual, value)
    }

    /// Creates a `GreaterThan` filter.
    pub fn gt(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::GreaterThan, value)
    }

    /// Creates a `GreaterThanOrEqual` filter.
    pub fn gte(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::GreaterThanOrEqual, value)
    }

    /// Creates a `Contains` filter.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::Contains, value)
    }

    /// Creates a `NotContains` filter.
    pub fn not_contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::NotContains, value)
    }

    /// Returns the field name, as supplied.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the raw value, or `None` for null.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
