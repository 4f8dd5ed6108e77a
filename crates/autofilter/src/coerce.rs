//! Value coercion: raw criteria strings into typed values.
//!
//! [`coerce`] converts the string carried by a [`Filter`](crate::Filter)
//! into a [`TypedValue`] of the resolved field's type. Coercion runs against
//! the underlying type of nullable fields and re-tags the result as nullable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::error::AutoFilterError;
use crate::value::{FieldKind, FieldType, Number};

/// Accepted date-and-time layouts, tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Accepted date-only layouts; the time of day is midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Owned value for storage in a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Text, exactly as supplied.
    Text(String),
    /// Numeric value in the precision of the target kind.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Date and time of day.
    DateTime(NaiveDateTime),
    /// Typed null, only produced for nullable targets.
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => f.write_str(s),
            Literal::Number(Number::I64(n)) => write!(f, "{n}"),
            Literal::Number(Number::U64(n)) => write!(f, "{n}"),
            Literal::Number(Number::F64(n)) => write!(f, "{n}"),
            Literal::Number(Number::Decimal(d)) => write!(f, "{d}"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// A coerced value tagged with the declared type it was coerced to.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    ty: FieldType,
    literal: Literal,
}

impl TypedValue {
    /// Returns the declared type, including nullability.
    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    /// Returns the coerced value.
    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Returns `true` for a typed null.
    pub fn is_null(&self) -> bool {
        matches!(self.literal, Literal::Null)
    }
}

/// Reason a raw value could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// A null value for a type that cannot hold one.
    #[error("null value for a non-nullable type")]
    Null,
    /// The string is not a valid value of the target type.
    #[error("{0}")]
    Format(String),
}

impl CoerceError {
    /// Attaches the field context.
    pub(crate) fn for_field(self, field: &str, raw: Option<&str>, ty: FieldType) -> AutoFilterError {
        match self {
            CoerceError::Null => AutoFilterError::NullValue {
                field: field.to_string(),
                ty,
            },
            CoerceError::Format(reason) => AutoFilterError::ValueFormat {
                field: field.to_string(),
                value: raw.unwrap_or_default().to_string(),
                ty,
                reason,
            },
        }
    }
}

/// Coerces a raw value into a value of the target type.
///
/// - `None` is only accepted for nullable targets and yields a typed null.
/// - Numbers accept either `.` or `,` as the decimal separator.
/// - Booleans accept `true`/`false` in any case.
/// - Dates accept RFC 3339, `YYYY-MM-DD[ HH:MM[:SS[.fff]]]` (with `T` or a
///   space as separator) and the same layouts with `/`.
/// - Text is used as-is.
///
/// ```
/// use autofilter::{coerce, FieldKind, FieldType, Literal, Number};
/// use rust_decimal::Decimal;
///
/// let total = FieldType::new(FieldKind::Decimal);
/// let a = coerce(Some("-9.6"), total).unwrap();
/// let b = coerce(Some("-9,6"), total).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.literal(), &Literal::Number(Number::Decimal(Decimal::new(-96, 1))));
///
/// assert!(coerce(None, total).is_err());
/// assert!(coerce(None, total.nullable()).unwrap().is_null());
/// ```
pub fn coerce(raw: Option<&str>, ty: FieldType) -> Result<TypedValue, CoerceError> {
    let Some(raw) = raw else {
        return if ty.is_nullable() {
            Ok(TypedValue {
                ty,
                literal: Literal::Null,
            })
        } else {
            Err(CoerceError::Null)
        };
    };

    let literal = match ty.kind() {
        FieldKind::Text => Literal::Text(raw.to_string()),
        FieldKind::Integer | FieldKind::Unsigned => Literal::Number(parse_integer(raw, ty)?),
        FieldKind::Float => {
            let value: f32 = parse_float(raw)?;
            Literal::Number(Number::F64(value as f64))
        }
        FieldKind::Double => Literal::Number(Number::F64(parse_float(raw)?)),
        FieldKind::Decimal => Literal::Number(Number::Decimal(parse_decimal(raw)?)),
        FieldKind::Bool => Literal::Bool(parse_bool(raw)?),
        FieldKind::DateTime => Literal::DateTime(parse_datetime(raw)?),
    };

    tracing::trace!(raw, %ty, ?literal, "coerced value");

    Ok(TypedValue { ty, literal })
}

/// Parses an integer and checks it against the range of the declared width.
fn parse_integer(raw: &str, ty: FieldType) -> Result<Number, CoerceError> {
    let value: i128 = raw
        .trim()
        .parse()
        .map_err(|_| CoerceError::Format("not a valid integer".into()))?;

    let (min, max) = ty.bounds().unwrap_or((i64::MIN as i128, u64::MAX as i128));
    let out_of_range = || CoerceError::Format(format!("out of range {min}..={max}"));
    if !(min..=max).contains(&value) {
        return Err(out_of_range());
    }

    match ty.kind() {
        FieldKind::Unsigned => u64::try_from(value)
            .map(Number::U64)
            .map_err(|_| out_of_range()),
        _ => i64::try_from(value)
            .map(Number::I64)
            .map_err(|_| out_of_range()),
    }
}

fn parse_float<N>(raw: &str) -> Result<N, CoerceError>
where
    N: FromStr + Into<f64> + Copy,
{
    let value: N = normalize_separator(raw)?
        .parse()
        .map_err(|_| CoerceError::Format("not a valid number".into()))?;

    // Rust accepts "inf" and "NaN"; neither is a usable filter value
    if !value.into().is_finite() {
        return Err(CoerceError::Format("not a finite number".into()));
    }
    Ok(value)
}

fn parse_decimal(raw: &str) -> Result<Decimal, CoerceError> {
    Decimal::from_str(&normalize_separator(raw)?)
        .map_err(|_| CoerceError::Format("not a valid decimal number".into()))
}

/// Trims the value and rewrites a `,` decimal separator to `.`.
fn normalize_separator(raw: &str) -> Result<String, CoerceError> {
    let trimmed = raw.trim();
    let separators = trimmed.chars().filter(|c| matches!(c, '.' | ',')).count();
    if separators > 1 {
        return Err(CoerceError::Format(
            "more than one decimal separator".into(),
        ));
    }
    Ok(trimmed.replace(',', "."))
}

fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(CoerceError::Format("expected 'true' or 'false'".into()))
    }
}

/// Parses a date/time, permissive about layout but strict about the calendar.
///
/// Values carrying a UTC offset are converted to UTC.
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, CoerceError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Ok(dt);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| CoerceError::Format("not a valid date/time".into()))
}
