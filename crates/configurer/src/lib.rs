//! # configurer
//!
//! Load JSON, TOML or YAML configuration into typed structs, then enforce
//! per-field directives: required fields, default values and
//! environment-variable overrides.
//!
//! Deserialization is plain serde. On top of it, `#[derive(Configure)]`
//! records a compact directive string per field, and the binder applies
//! those directives against a case-insensitive view of the document,
//! recursing into nested structs and sequences of structs.
//!
//! ## Quick Start
//!
//! ```rust
//! use configurer::{Configure, Loader, decoder::JsonDecoder};
//! use serde::Deserialize;
//!
//! #[derive(Configure, Deserialize, Default, Debug)]
//! #[serde(default)]
//! struct Config {
//!     #[config("required")]
//!     name: String,
//!
//!     #[config("default=8080,env=APP_PORT")]
//!     port: u16,
//!
//!     database: Database,
//! }
//!
//! #[derive(Configure, Deserialize, Default, Debug)]
//! #[serde(default)]
//! struct Database {
//!     #[config("default=localhost")]
//!     host: String,
//! }
//!
//! let loader = Loader::with_defaults();
//! let config: Config = loader.load_str(r#"{ "name": "svc" }"#, &JsonDecoder)?;
//!
//! assert_eq!(config.name, "svc");
//! assert_eq!(config.database.host, "localhost");
//! # Ok::<(), configurer::Error>(())
//! ```
//!
//! ## Directives
//!
//! | Label | Meaning |
//! |-------|---------|
//! | `required` | The field must be present, non-null, and not an empty string or sequence |
//! | `default=<literal>` | Applied when the field is absent or null |
//! | `env=<VAR>` | Applied when the field is absent or null; beats `default` |
//!
//! Literals are read in the document's own syntax (`default=9` is a number
//! in all three formats) and fall back to a plain string. Escape `,`, `=`
//! and `\` with a backslash. Struct-valued fields cannot carry `default` or
//! `env`; put those on the nested struct's fields.
//!
//! ## Lookup Names
//!
//! Fields are looked up case-insensitively under their serde name, so
//! `#[serde(rename = "...")]` and `#[serde(rename_all = "...")]` apply. The
//! typed value is read the same way: `{"Port": 80}` fills `port`.
//! `#[serde(skip)]` fields are not bound and `#[serde(flatten)]` structs are
//! bound against their parent's keys.
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `json` | JSON decoder (always compiled) | **Yes** |
//! | `toml` | TOML decoder | **Yes** |
//! | `yaml` | YAML decoder | **Yes** |
//! | `file-all` | All decoders | No |
//! | `http` | `http://` and `https://` source | No |
//! | `global` | Process-wide default loader in [`global`] | No |
//! | `full` | Everything | No |
//!
//! ## Error Handling
//!
//! Every error implements [`miette::Diagnostic`]:
//!
//! ```rust,ignore
//! fn main() -> configurer::Result<()> {
//!     let config: Config = Loader::with_defaults().load_url("file://app.toml")?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// Re-export the derive macro
pub use configurer_macro::Configure;

// ============================================================================
// Re-exported Dependencies
// ============================================================================
// The derive macro generates code that references these via ::configurer::.

/// Re-export miette for error handling.
pub use miette;

/// Re-export serde; generated code names `DeserializeOwned` through it.
pub use serde;

/// Re-export `serde_json`, whose `Value` is the generic document tree.
pub use serde_json;

// ============================================================================
// Core Modules
// ============================================================================

pub mod directive;
pub mod keymap;
pub mod policy;

mod bind;
mod descriptor;
mod error;
mod field;

pub use bind::{Binder, bind};
pub use descriptor::{FieldDescriptor, StructDescriptor};
pub use error::{BindError, Error};
pub use field::{Configure, FieldKind, FieldValue};

/// A Result type that displays errors with miette's fancy formatting.
///
/// Use this as your main function return type for pretty error output.
pub type Result<T> = miette::Result<T>;

// ============================================================================
// Loading
// ============================================================================

pub mod decoder;
pub mod loader;
pub mod source;

pub use loader::Loader;

#[cfg(feature = "global")]
pub mod global;

#[doc(hidden)]
#[path = "private.rs"]
#[allow(missing_docs, clippy::missing_errors_doc, clippy::new_without_default)]
pub mod __private;
