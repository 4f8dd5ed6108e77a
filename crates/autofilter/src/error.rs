//! Error types for the autofilter crate.

use thiserror::Error;

use crate::op::Operator;
use crate::value::FieldType;

/// Errors raised while applying a filter or sort to a query.
///
/// Every error is raised synchronously by the `apply_*` call that received
/// the offending criterion; the input query is never modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutoFilterError {
    /// The field name is empty or whitespace only (strict mode).
    #[error("filter field name cannot be empty")]
    EmptyField,

    /// The field name matches no member of the projected record shape.
    #[error("unknown field '{field}' on {shape}")]
    UnknownField { field: String, shape: &'static str },

    /// A filter or sort was applied before the query was projected.
    #[error("the query must be projected before applying a {step}")]
    MissingProjection { step: &'static str },

    /// The raw value cannot be converted to the field's type.
    #[error("invalid value '{value}' for field '{field}' of type {ty}: {reason}")]
    ValueFormat {
        field: String,
        value: String,
        ty: FieldType,
        reason: String,
    },

    /// A null value was supplied for a field that cannot hold one.
    #[error("null value is not allowed for field '{field}' of type {ty}")]
    NullValue { field: String, ty: FieldType },

    /// The operator is not valid for the field's type category.
    #[error("invalid operator [{op}] provided for value type [{ty}]")]
    UnsupportedOperator { op: Operator, ty: FieldType },
}

/// Payload-free classification of an [`AutoFilterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyField,
    UnknownField,
    MissingProjection,
    ValueFormat,
    NullValue,
    UnsupportedOperator,
}

impl AutoFilterError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AutoFilterError::EmptyField => ErrorKind::EmptyField,
            AutoFilterError::UnknownField { .. } => ErrorKind::UnknownField,
            AutoFilterError::MissingProjection { .. } => ErrorKind::MissingProjection,
            AutoFilterError::ValueFormat { .. } => ErrorKind::ValueFormat,
            AutoFilterError::NullValue { .. } => ErrorKind::NullValue,
            AutoFilterError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
        }
    }
}

/// Result type for autofilter operations.
pub type Result<T> = std::result::Result<T, AutoFilterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldKind;

    #[test]
    fn messages_name_the_offender() {
        let err = AutoFilterError::UnsupportedOperator {
            op: Operator::Contains,
            ty: FieldType::new(FieldKind::Decimal),
        };
        assert_eq!(
            err.to_string(),
            "invalid operator [Contains] provided for value type [decimal]"
        );

        let err = AutoFilterError::UnknownField {
            field: "gibberish".into(),
            shape: "Invoice",
        };
        assert_eq!(err.to_string(), "unknown field 'gibberish' on Invoice");
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(AutoFilterError::EmptyField.kind(), ErrorKind::EmptyField);
        assert_eq!(
            AutoFilterError::MissingProjection { step: "filter" }.kind(),
            ErrorKind::MissingProjection
        );
        assert_eq!(
            AutoFilterError::NullValue {
                field: "total".into(),
                ty: FieldType::new(FieldKind::Decimal),
            }
            .kind(),
            ErrorKind::NullValue
        );
    }
}
