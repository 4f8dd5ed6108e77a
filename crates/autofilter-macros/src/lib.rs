//! Proc macros for autofilter.
//!
//! # Available Macros
//!
//! - [`Record`] - Generate the field registry of a record shape
//!
//! The macros are re-exported by the `autofilter` crate under its default
//! `derive` feature; depend on `autofilter` rather than on this crate.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for filterable structs.
///
/// Every named field becomes a filterable, sortable field. Its type is taken
/// from the field's Rust type through `FieldValue`, so no type annotation is
/// needed; `Option<T>` fields are nullable.
///
/// # Container Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `rename_all = "PascalCase"` | `due_date` is matched as `DueDate` |
/// | `rename_all = "camelCase"` | `due_date` is matched as `dueDate` |
/// | `rename_all = "snake_case"` | names are used as written (default) |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from filtering and sorting |
/// | `rename = "..."` | Use a custom name, overriding `rename_all` |
///
/// Names are matched case-insensitively, so two fields whose names differ
/// only in case are rejected at compile time.
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `InvoiceRow::DUE_DATE == "DueDate"`)
/// 2. Implementation of `Record::fields()`
///
/// # Example
///
/// ```ignore
/// use autofilter::{Filter, MemoryQuery, QueryExt, Record};
/// use chrono::NaiveDateTime;
///
/// #[derive(Clone, Record)]
/// #[filter(rename_all = "PascalCase")]
/// struct InvoiceRow {
///     number: String,
///     #[filter(rename = "Type")]
///     kind: String,
///     due_date: NaiveDateTime,
///     sent_date: Option<NaiveDateTime>,
///     #[filter(skip)]
///     details: Vec<String>,
/// }
///
/// assert_eq!(InvoiceRow::KIND, "Type");
/// assert_eq!(InvoiceRow::SENT_DATE, "SentDate");
///
/// let query = MemoryQuery::new(rows)
///     .select(|r| r)
///     .apply_filter(&Filter::gte(InvoiceRow::DUE_DATE, "2025-10-01"))?;
/// ```
#[proc_macro_derive(Record, attributes(filter))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
