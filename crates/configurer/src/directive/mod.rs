//! The field directive mini-language.
//!
//! A directive is the string attached to a struct field with
//! `#[config("...")]`. It is a comma-separated list of bare labels or
//! `label=value` pairs:
//!
//! ```text
//! required
//! default=8080
//! required,env=APP_HOST,default=localhost
//! default=a\,b\=c          -> default is "a,b=c"
//! ```
//!
//! A backslash escapes the next character. `\=`, `\,` and `\\` produce the
//! literal character; a backslash before any other character is dropped
//! (`\x` is `x`).
//!
//! # Example
//!
//! ```rust
//! use configurer::directive::Directive;
//!
//! let directive: Directive = "required,default=a\\,b".parse()?;
//! assert!(directive.contains("required"));
//! assert_eq!(directive.get("default"), Some("a,b"));
//! # Ok::<(), configurer::directive::DirectiveError>(())
//! ```

mod parser;
mod token;

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use miette::Diagnostic;
use thiserror::Error as ThisError;

/// Syntax errors in a directive string.
///
/// Messages carry no position: directives are short enough that the
/// offending field name (added by the binder) is sufficient.
#[derive(Clone, Debug, Diagnostic, Eq, PartialEq, ThisError)]
pub enum DirectiveError {
    /// A label was required (start of input, after `,` or after `=`).
    #[error("expected a label")]
    #[diagnostic(
        code(configurer::directive::expected_label),
        help("directives look like `required,default=value,env=VAR`; escape literal `=` and `,` with `\\`")
    )]
    ExpectedLabel,

    /// A label was followed by something other than `=`, `,` or the end.
    #[error("expected an assignment or a separator")]
    #[diagnostic(code(configurer::directive::expected_assignment))]
    ExpectedAssignmentOrSeparator,

    /// A value was followed by something other than `,` or the end.
    #[error("expected EOF or a separator")]
    #[diagnostic(
        code(configurer::directive::expected_separator),
        help("escape a literal `=` inside a value as `\\=`")
    )]
    ExpectedEofOrSeparator,
}

/// A parsed directive: the ordered `(label, value)` pairs of one string.
///
/// Lookups follow last-wins semantics, so `env=A,env=B` resolves `env` to
/// `B`. Duplicates are accepted silently.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Directive {
    pairs: Vec<(String, String)>,
}

impl Directive {
    /// Parses a directive string.
    ///
    /// The empty string is a valid, empty directive.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectiveError`] when the string is malformed.
    pub fn parse(input: &str) -> Result<Self, DirectiveError> {
        parser::parse_pairs(input).map(|pairs| Self { pairs })
    }

    /// The pairs in source order, duplicates included.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns `true` if the directive has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns `true` if `label` appears anywhere in the directive.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.pairs.iter().any(|(l, _)| l == label)
    }

    /// The value of the last occurrence of `label`.
    ///
    /// Bare labels have the empty string as value.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Folds the pairs into a mapping; later duplicates overwrite earlier ones.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.pairs.iter().cloned().collect()
    }
}

impl FromStr for Directive {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Re-serializes the directive, escaping `\`, `=` and `,`.
///
/// Parsing the output yields the same pairs.
impl Display for Directive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, (label, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }

            write_escaped(f, label)?;

            if !value.is_empty() {
                f.write_str("=")?;
                write_escaped(f, value)?;
            }
        }

        Ok(())
    }
}

fn write_escaped(f: &mut Formatter<'_>, text: &str) -> fmt::Result {
    for chr in text.chars() {
        if matches!(chr, '\\' | '=' | ',') {
            f.write_str("\\")?;
        }
        write!(f, "{chr}")?;
    }

    Ok(())
}

/// Parses a directive string straight into its folded mapping.
///
/// # Errors
///
/// Returns a [`DirectiveError`] when the string is malformed.
pub fn parse(input: &str) -> Result<BTreeMap<String, String>, DirectiveError> {
    Directive::parse(input).map(|directive| directive.to_map())
}
