//! # configurer_macro
//!
//! Procedural macro implementation for the `configurer` crate.
//!
//! This crate provides `#[derive(Configure)]`, which records each field's
//! lookup key and directive in a static descriptor and generates the
//! per-field binding calls. It is a proc-macro crate and can only export
//! procedural macros.
//!
//! **Note:** Users should depend on the `configurer` crate, not this one
//! directly. `configurer` re-exports this macro along with the runtime.
//!
//! # Module Structure
//!
//! - `parse` - `#[config(...)]` and serde attribute parsing
//! - `expand` - Validation and code generation

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod expand;
mod parse;

/// Derive macro for binding configuration directives.
///
/// The struct must also derive `serde::Deserialize`; this macro only adds
/// the directive pass that runs after deserialization.
///
/// # Field Attributes
///
/// An optional `#[config("...")]` (or `#[config = "..."]`) carries a
/// comma-separated directive:
///
/// | Label | Description |
/// |-------|-------------|
/// | `required` | Fail unless the field is present, non-null and non-empty |
/// | `default=<literal>` | Value used when the field is absent or null |
/// | `env=<VAR>` | Environment variable consulted before `default` |
///
/// Fields without `#[config]` are still visited so nested structs get bound.
///
/// # Serde Attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `#[serde(rename = "...")]` | Field is looked up under the new name |
/// | `#[serde(rename_all = "...")]` | Rule applied to every unrenamed field |
/// | `#[serde(skip)]`, `#[serde(skip_deserializing)]` | Field is not bound |
/// | `#[serde(flatten)]` | Nested struct is bound against the parent's keys |
///
/// # Example
///
/// ```ignore
/// use configurer::Configure;
/// use serde::Deserialize;
///
/// #[derive(Configure, Deserialize, Default)]
/// #[serde(default, rename_all = "kebab-case")]
/// struct Server {
///     #[config("required")]
///     bind_address: String,
///
///     #[config("default=30,env=SERVER_TIMEOUT")]
///     timeout_secs: u64,
///
///     #[serde(flatten)]
///     tls: Tls,
/// }
/// ```
///
/// # Generated Code
///
/// - `impl configurer::Configure` with a static `StructDescriptor`
/// - `impl configurer::FieldValue`, so the struct can itself be a field
///
/// Field types implementing `FieldValue` get the full binder. Any other
/// `DeserializeOwned` type (`Duration`, tuples, types from other crates)
/// binds as a leaf with no impl needed.
///
/// # Errors
///
/// Compile errors are reported for tuple structs, unit structs, enums,
/// unions, a bare `#[config]`, duplicate `#[config]` attributes, unknown
/// `rename_all` rules, and `#[config]` on skipped or flattened fields.
#[proc_macro_derive(Configure, attributes(config))]
pub fn derive_configure(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand::Expander::expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
