//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module generates the field registry of a record shape and its field
//! name constants from struct annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
