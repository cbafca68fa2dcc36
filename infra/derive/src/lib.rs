#![allow(unreachable_pub)]

//! # Derive
//!
//! Procedural macros shared by the c3dp crates.
//!
//! Consumers depend on it like any other workspace crate:
//! ```toml
//! [dependencies]
//! c3dp-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns an enum into a crate error type with context support.
///
/// Every error enum in the workspace has the same shape: struct variants,
/// an optional `context: Option<Cow<'static, str>>` field and, for wrapped
/// errors, a `source` field. This attribute writes the plumbing around it.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]`, unless already derived.
/// * `<Name>Ext<T>` with `.context(..)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant wrapping a `Source`.
/// * `From<Source>` for every such variant.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A private `format_context` helper for the `#[error(..)]` strings.
///
/// # Requirements
///
/// * Only enums with named-field variants are accepted.
/// * A variant with a `source` (or `#[source]` / `#[from]`) field must also
///   have a `context` field and nothing else.
///
/// # Example
///
/// ```rust,ignore
/// use c3dp_derive::c3dp_error;
/// use std::borrow::Cow;
///
/// #[c3dp_error]
/// pub enum CodecError {
///     #[error("Serialization error{}: {source}", format_context(.context))]
///     Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal codec error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn parse(text: &str) -> Result<serde_json::Value, CodecError> {
///     serde_json::from_str(text).context("Parsing flat config")
/// }
/// ```
#[proc_macro_attribute]
pub fn c3dp_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
