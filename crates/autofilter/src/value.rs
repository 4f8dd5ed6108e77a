//! Runtime value and type descriptors for record fields.
//!
//! The [`Value`] enum is what a field accessor returns for one record, and
//! [`FieldType`] describes the declared type of a field so that raw criteria
//! values can be coerced before comparison.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Runtime value for comparison, borrowed from the source record.
///
/// # Example
///
/// ```
/// use autofilter::{Number, Value};
///
/// struct Invoice {
///     number: String,
///     total: f64,
/// }
///
/// fn total<'a>(invoice: &'a Invoice) -> Value<'a> {
///     Value::Number(Number::F64(invoice.total))
/// }
///
/// fn number<'a>(invoice: &'a Invoice) -> Value<'a> {
///     Value::Text(&invoice.number)
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text value (borrowed).
    Text(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Calendar date and time of day, without a timezone.
    DateTime(NaiveDateTime),
    /// Absent value of a nullable field.
    Null,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extracts the text value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the date-time value, if present.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

/// Numeric value supporting integers, floats and fixed-point decimals.
///
/// Each variant keeps the precision of its source type. Comparisons between
/// values of the same variant are exact; mixed comparisons fall back to the
/// widest common representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point. `f32` values are widened into this variant.
    F64(f64),
    /// Fixed-point decimal.
    Decimal(Decimal),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::Decimal(a), Number::Decimal(b)) => Some(a.cmp(&b)),

            // Integers of different signedness never need a float detour
            (Number::I64(a), Number::U64(b)) => Some(if a < 0 {
                Ordering::Less
            } else {
                (a as u64).cmp(&b)
            }),
            (Number::U64(_), Number::I64(_)) => other.compare(self).map(Ordering::reverse),

            (Number::Decimal(a), other) => match other.to_decimal() {
                Some(b) => Some(a.cmp(&b)),
                None => self.to_f64().partial_cmp(&other.to_f64()),
            },
            (_, Number::Decimal(_)) => other.compare(self).map(Ordering::reverse),

            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    fn to_decimal(self) -> Option<Decimal> {
        match self {
            Number::I64(n) => Some(Decimal::from(n)),
            Number::U64(n) => Some(Decimal::from(n)),
            Number::F64(n) => Decimal::from_f64(n),
            Number::Decimal(d) => Some(d),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        Number::Decimal(d)
    }
}

/// Underlying kind of a field, after any nullable wrapper is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// UTF-8 text.
    Text,
    /// Signed integer of any width.
    Integer,
    /// Unsigned integer of any width.
    Unsigned,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Fixed-point decimal.
    Decimal,
    /// Boolean.
    Bool,
    /// Date and time of day.
    DateTime,
}

/// Comparison category of a field kind.
///
/// Each category supports its own operator subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Text,
    Numeric,
    Boolean,
    DateTime,
}

impl FieldKind {
    /// Returns the comparison category of this kind.
    pub fn category(self) -> Category {
        match self {
            FieldKind::Text => Category::Text,
            FieldKind::Integer
            | FieldKind::Unsigned
            | FieldKind::Float
            | FieldKind::Double
            | FieldKind::Decimal => Category::Numeric,
            FieldKind::Bool => Category::Boolean,
            FieldKind::DateTime => Category::DateTime,
        }
    }

    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Unsigned => "unsigned",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::Decimal => "decimal",
            FieldKind::Bool => "bool",
            FieldKind::DateTime => "datetime",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared type of a record field: an underlying kind plus nullability.
///
/// Integer types also carry the value range of their Rust width.
///
/// ```
/// use autofilter::{FieldKind, FieldType};
///
/// let due = FieldType::new(FieldKind::DateTime);
/// let sent = due.nullable();
///
/// assert!(!due.is_nullable());
/// assert!(sent.is_nullable());
/// assert_eq!(sent.kind(), FieldKind::DateTime);
/// assert_eq!(sent.to_string(), "datetime?");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    kind: FieldKind,
    nullable: bool,
    // Inclusive value range of integer kinds; zero for every other kind
    min: i128,
    max: i128,
}

impl FieldType {
    /// Creates a non-nullable field type.
    ///
    /// Integer kinds get the full 64-bit range; narrow them with
    /// [`bounded`](Self::bounded).
    pub const fn new(kind: FieldKind) -> Self {
        let (min, max) = match kind {
            FieldKind::Integer => (i64::MIN as i128, i64::MAX as i128),
            FieldKind::Unsigned => (0, u64::MAX as i128),
            _ => (0, 0),
        };
        FieldType {
            kind,
            nullable: false,
            min,
            max,
        }
    }

    /// Returns the nullable form of this type.
    pub const fn nullable(self) -> Self {
        FieldType {
            nullable: true,
            ..self
        }
    }

    /// Restricts an integer type to the inclusive range `min..=max`.
    ///
    /// The range is clamped to what the kind can hold. Non-integer kinds are
    /// returned unchanged.
    ///
    /// ```
    /// use autofilter::{FieldKind, FieldType};
    ///
    /// let level = FieldType::new(FieldKind::Unsigned).bounded(0, 255);
    /// assert_eq!(level.bounds(), Some((0, 255)));
    /// assert_eq!(FieldType::new(FieldKind::Text).bounds(), None);
    /// ```
    pub const fn bounded(self, min: i128, max: i128) -> Self {
        if self.bounds().is_none() {
            return self;
        }
        FieldType {
            min: if min > self.min { min } else { self.min },
            max: if max < self.max { max } else { self.max },
            ..self
        }
    }

    /// Returns the inclusive value range of an integer type.
    pub const fn bounds(self) -> Option<(i128, i128)> {
        match self.kind {
            FieldKind::Integer | FieldKind::Unsigned => Some((self.min, self.max)),
            _ => None,
        }
    }

    /// Returns the underlying kind, with the nullable wrapper removed.
    pub const fn kind(self) -> FieldKind {
        self.kind
    }

    /// Returns `true` if the field may hold a null value.
    pub const fn is_nullable(self) -> bool {
        self.nullable
    }

    /// Returns the comparison category of the underlying kind.
    pub fn category(self) -> Category {
        self.kind.category()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
