//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates an implementation of the `Record` trait and field
//! name constants. Field types are not inspected here: each field's type is
//! resolved by the compiler through `FieldValue`, so an unsupported type is
//! reported at the field's span.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_container_attrs, parse_field_attrs};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let container = parse_container_attrs(&input.attrs)?;

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_defs: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let rust_name = field_name.unraw().to_string();
        let query_name = match (attrs.rename, container.rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply(&rust_name),
            (None, None) => rust_name.clone(),
        };

        // Lookups ignore case, so two names differing only in case are ambiguous
        let key = query_name.to_lowercase();
        if let Some(previous) = seen.get(&key) {
            return Err(Error::new(
                field_name.span(),
                format!(
                    "field name '{}' collides with '{}' (names are matched case-insensitively)",
                    query_name, previous
                ),
            ));
        }
        seen.insert(key, query_name.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(&rust_name));
        field_constants.push(quote! {
            /// Field name constant for filter and sort criteria.
            pub const #const_name: &'static str = #query_name;
        });

        let ty = &field.ty;
        field_defs.push(quote_spanned! {ty.span()=>
            ::autofilter::Field::<Self>::new(
                #query_name,
                <#ty as ::autofilter::FieldValue>::FIELD_TYPE,
                |record: &Self| ::autofilter::FieldValue::field_value(&record.#field_name),
            )
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        #[allow(dead_code)]
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::autofilter::Record for #struct_name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::autofilter::Field<Self>> {
                ::std::vec![
                    #(#field_defs),*
                ]
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(input: DeriveInput) -> Result<String> {
        record_derive_impl(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("number"), "NUMBER");
        assert_eq!(to_screaming_snake_case("due_date"), "DUE_DATE");
        assert_eq!(to_screaming_snake_case("dueDate"), "DUE_DATE");
        assert_eq!(to_screaming_snake_case("vat-base"), "VAT_BASE");
    }

    #[test]
    fn test_generates_fields_and_constants() {
        let out = expand(parse_quote! {
            #[filter(rename_all = "PascalCase")]
            struct InvoiceRow {
                number: String,
                due_date: NaiveDateTime,
                #[filter(rename = "Type")]
                kind: String,
                #[filter(skip)]
                details: Vec<String>,
            }
        })
        .unwrap();

        assert!(out.contains("\"Number\""));
        assert!(out.contains("\"DueDate\""));
        assert!(out.contains("\"Type\""));
        assert!(out.contains("DUE_DATE"));
        assert!(out.contains("KIND"));
        assert!(!out.contains("details"));
        assert!(out.contains(":: autofilter :: Record for InvoiceRow"));
    }

    #[test]
    fn test_raw_identifiers_are_unraw() {
        let out = expand(parse_quote! {
            struct Row {
                r#type: String,
            }
        })
        .unwrap();

        assert!(out.contains("pub const TYPE"));
        assert!(out.contains("\"type\""));
    }

    #[test]
    fn test_case_insensitive_collision_rejected() {
        let err = expand(parse_quote! {
            struct Row {
                total: f64,
                #[filter(rename = "TOTAL")]
                gross: f64,
            }
        })
        .unwrap_err();

        assert!(err.to_string().contains("collides with 'total'"));
    }

    #[test]
    fn test_rejects_tuple_structs_and_enums() {
        let err = expand(parse_quote! {
            struct Row(String);
        })
        .unwrap_err();
        assert!(err.to_string().contains("named fields"));

        let err = expand(parse_quote! {
            enum Row { A, B }
        })
        .unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }
}
