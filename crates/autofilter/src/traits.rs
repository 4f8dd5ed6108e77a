//! Traits for record shapes and their field types.
//!
//! A record shape is any struct implementing [`Record`]. It is usually
//! derived with `#[derive(Record)]`, which infers every field's type through
//! [`FieldValue`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::registry::Field;
use crate::value::{FieldKind, FieldType, Number, Value};

/// A record shape whose fields can be filtered and sorted by name.
///
/// # Derive Usage
///
/// ```
/// use autofilter::Record;
///
/// #[derive(Record)]
/// #[filter(rename_all = "PascalCase")]
/// struct InvoiceRow {
///     number: String,
///     total: f64,
///     #[filter(skip)]
///     internal_id: u64,
/// }
///
/// assert_eq!(InvoiceRow::NUMBER, "Number");
/// assert_eq!(InvoiceRow::fields().len(), 2);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use autofilter::{Field, FieldValue, Record, Value};
///
/// struct InvoiceRow {
///     number: String,
///     total: f64,
/// }
///
/// impl Record for InvoiceRow {
///     fn fields() -> Vec<Field<Self>> {
///         vec![
///             Field::new("Number", String::FIELD_TYPE, |r: &Self| Value::Text(&r.number)),
///             Field::new("Total", f64::FIELD_TYPE, |r: &Self| r.total.field_value()),
///         ]
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    /// Returns the descriptors of every filterable field.
    ///
    /// Names are matched case-insensitively, so two fields must not differ
    /// only in case.
    fn fields() -> Vec<Field<Self>>;
}

/// A Rust type usable as a record field.
///
/// Implemented for text, integer, float, decimal, boolean and chrono
/// date/time types, and for `Option<V>` of any of them (the nullable form).
/// Implement it for your own types to make them filterable:
///
/// ```
/// use autofilter::{FieldKind, FieldType, FieldValue, Value};
///
/// enum Status {
///     Draft,
///     Sent,
/// }
///
/// impl FieldValue for Status {
///     const FIELD_TYPE: FieldType = FieldType::new(FieldKind::Text);
///
///     fn field_value(&self) -> Value<'_> {
///         match self {
///             Status::Draft => Value::Text("Draft"),
///             Status::Sent => Value::Text("Sent"),
///         }
///     }
/// }
/// ```
pub trait FieldValue {
    /// The declared type of fields of this Rust type.
    const FIELD_TYPE: FieldType;

    /// Returns the runtime value used for comparison.
    fn field_value(&self) -> Value<'_>;
}

impl FieldValue for String {
    const FIELD_TYPE: FieldType = FieldType::new(FieldKind::Text);

    fn field_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl FieldValue for &'static str {
    const FIELD_TYPE: FieldType = FieldType::new(FieldKind::Text);

    fn field_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

macro_rules! impl_field_value_number {
    (bounded $kind:ident, $variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl FieldValue for $t {
                const FIELD_TYPE: FieldType = FieldType::new(FieldKind::$kind)
                    .bounded(<$t>::MIN as i128, <$t>::MAX as i128);

                fn field_value(&self) -> Value<'_> {
                    Value::Number(Number::$variant(*self as $wide))
                }
            }
        )+
    };
    ($kind:ident, $variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl FieldValue for $t {
                const FIELD_TYPE: FieldType = FieldType::new(FieldKind::$kind);

                fn field_value(&self) -> Value<'_> {
                    Value::Number(Number::$variant(*self as $wide))
                }
            }
        )+
    };
}

impl_field_value_number!(bounded Integer, I64 as i64: i8, i16, i32, i64, isize);
impl_field_value_number!(bounded Unsigned, U64 as u64: u8, u16, u32, u64, usize);
impl_field_value_number!(Float, F64 as f64: f32);
impl_field_value_number!(Double, F64 as f64: f64);

impl FieldValue for Decimal {
    const FIELD_TYPE: FieldType = FieldType::new(FieldKind::Decimal);

    fn field_value(&self) -> Value<'_> {
        Value::Number(Number::Decimal(*self))
    }
}

impl FieldValue for bool {
    const FIELD_TYPE: FieldType = FieldType::new(FieldKind::Bool);

    fn field_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl FieldValue for NaiveDateTime {
    const FIELD_TYPE: FieldType = FieldType::new(FieldKind::DateTime);

    fn field_value(&self) -> Value<'_> {
        Value::DateTime(*self)
    }
}

impl FieldValue for NaiveDate {
    const FIELD_TYPE: FieldType = FieldType::new(FieldKind::DateTime);

    fn field_value(&self) -> Value<'_> {
        Value::DateTime(self.and_time(NaiveTime::MIN))
    }
}

impl FieldValue for DateTime<Utc> {
    const FIELD_TYPE: FieldType = FieldType::new(FieldKind::DateTime);

    fn field_value(&self) -> Value<'_> {
        Value::DateTime(self.naive_utc())
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    const FIELD_TYPE: FieldType = V::FIELD_TYPE.nullable();

    fn field_value(&self) -> Value<'_> {
        match self {
            Some(v) => v.field_value(),
            None => Value::Null,
        }
    }
}
