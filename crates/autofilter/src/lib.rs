//! AutoFilter - Runtime filtering and sorting for strongly-typed records.
//!
//! AutoFilter turns runtime criteria (a field name, an operator and a
//! string-encoded value) into typed predicates and ordering keys over a
//! record shape, without per-field query code. It supports:
//!
//! - Case-insensitive field lookup, generated by `#[derive(Record)]`
//! - Value coercion for text, integer, float, decimal, boolean and date/time
//!   fields, with nullable forms and `.`/`,` decimal separators
//! - Day-bucketed date comparisons
//! - Multi-key stable ordering
//! - A projection guard: criteria only apply to projected queries
//!
//! # Quick Start
//!
//! ```rust
//! use autofilter::{Filter, MemoryQuery, QueryExt, Record, Sort};
//! use chrono::NaiveDateTime;
//! use rust_decimal::Decimal;
//!
//! // Source data
//! #[derive(Clone)]
//! struct Invoice {
//!     number: String,
//!     kind: String,
//!     due_date: NaiveDateTime,
//!     total: Decimal,
//! }
//!
//! // Projected shape, with the field names clients send
//! #[derive(Record)]
//! #[filter(rename_all = "PascalCase")]
//! struct InvoiceRow {
//!     number: String,
//!     #[filter(rename = "Type")]
//!     kind: String,
//!     due_date: NaiveDateTime,
//!     total: Decimal,
//! }
//!
//! let due = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
//! let invoices = vec![
//!     Invoice { number: "INV-1001".into(), kind: "Invoice".into(), due_date: due("2025-10-02 15:00"), total: Decimal::new(24, 0) },
//!     Invoice { number: "CRN-1002".into(), kind: "Credit Note".into(), due_date: due("2025-09-17 09:00"), total: Decimal::new(-96, 1) },
//!     Invoice { number: "INV-1002".into(), kind: "Invoice".into(), due_date: due("2025-09-27 00:00"), total: Decimal::new(12, 0) },
//! ];
//!
//! let rows = MemoryQuery::new(invoices)
//!     .select(|i| InvoiceRow { number: i.number, kind: i.kind, due_date: i.due_date, total: i.total })
//!     .apply_filter(&Filter::eq("type", "INVOICE"))?
//!     .apply_filter(&Filter::gte("duedate", "2025-09-27"))?
//!     .apply_sort(&Sort::desc("Total"))?
//!     .to_vec();
//!
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].number, "INV-1001");
//! # Ok::<(), autofilter::AutoFilterError>(())
//! ```
//!
//! # Operators by Field Type
//!
//! | Category | Operators |
//! |------|-----------|
//! | Text | `Equal`, `NotEqual`, `Contains`, `NotContains` (case-insensitive) |
//! | Numeric | `Equal`, `NotEqual`, `LessThan`, `LessThanOrEqual`, `GreaterThan`, `GreaterThanOrEqual` |
//! | Boolean | `Equal`, `NotEqual` |
//! | Date/Time | `Equal`, `NotEqual`, `LessThan`, `LessThanOrEqual`, `GreaterThan`, `GreaterThanOrEqual` |
//!
//! Date values stand for their whole day by default: `Equal 2025-09-27`
//! matches any time on that day, and `GreaterThan 2025-09-27` starts at the
//! next midnight. See [`DateMatching`] for the alternative.
//!
//! # Executors
//!
//! The engine does not run queries. It extends any [`Queryable`], which
//! exposes its step history and accepts [`Predicate`] and [`OrderingStep`]
//! descriptors. [`MemoryQuery`] is the bundled executor for in-memory data.

extern crate self as autofilter;

mod coerce;
mod engine;
mod error;
mod filter;
mod guard;
mod op;
mod ordering;
mod predicate;
mod query;
mod registry;
mod traits;
mod value;

// Re-export public API
pub use coerce::{coerce, parse_datetime, CoerceError, Literal, TypedValue};
pub use engine::{DateMatching, EmptyFieldPolicy, Engine, Options, QueryExt};
pub use error::{AutoFilterError, ErrorKind, Result};
pub use filter::Filter;
pub use guard::{assert_projected, has_prior_ordering};
pub use op::{Operator, ParseOperatorError};
pub use ordering::{
    compare_by_orderings, compare_values, Direction, OrderingStep, ParseDirectionError, Sort,
};
pub use predicate::{day_bounds, Predicate, Test};
pub use query::{MemoryQuery, Queryable, StepKind};
pub use registry::{Accessor, Field, FieldRegistry};
pub use traits::{FieldValue, Record};
pub use value::{Category, FieldKind, FieldType, Number, Value};

#[cfg(feature = "derive")]
pub use autofilter_macros::Record;
