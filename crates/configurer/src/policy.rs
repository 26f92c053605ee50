//! Per-field binding policy.
//!
//! A [`FieldPolicy`] is the interpreted form of a field directive: which of
//! the recognized labels (`required`, `default`, `env`) it carries. Unknown
//! labels are ignored.

use crate::directive::{Directive, DirectiveError};

/// Label marking a field as required. Its value, if any, is ignored.
pub const REQUIRED: &str = "required";

/// Label carrying the default literal.
pub const DEFAULT: &str = "default";

/// Label carrying the environment variable name.
pub const ENV: &str = "env";

/// What the binder should do with one field.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldPolicy {
    /// The field must end up present, non-null and non-empty.
    pub required: bool,

    /// Literal applied when the field is absent or null.
    pub default: Option<String>,

    /// Environment variable overriding an absent or null field.
    pub env: Option<String>,
}

impl FieldPolicy {
    /// Parses a raw directive string into a policy.
    ///
    /// `default=` and `env=` with an empty value are not accepted by the
    /// directive grammar, so a present label always carries a value here.
    ///
    /// # Errors
    ///
    /// Returns the [`DirectiveError`] of a malformed directive.
    pub fn parse(raw: &str) -> Result<Self, DirectiveError> {
        Directive::parse(raw).map(|directive| Self::from_directive(&directive))
    }

    /// Interprets an already-parsed directive.
    #[must_use]
    pub fn from_directive(directive: &Directive) -> Self {
        let non_empty = |label: &str| {
            directive
                .get(label)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        Self {
            required: directive.contains(REQUIRED),
            default: non_empty(DEFAULT),
            env: non_empty(ENV),
        }
    }

    /// Returns `true` if the policy does nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.required && self.default.is_none() && self.env.is_none()
    }
}
