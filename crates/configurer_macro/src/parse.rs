//! Attribute parsing for `#[config("...")]` and the serde attributes that
//! change how a field is looked up.
//!
//! The derive owns only the `config` attribute. It also reads, but never
//! rejects, `#[serde(...)]` attributes so the binder looks fields up under
//! the same names serde deserializes them from:
//!
//! | serde attribute | Effect on binding |
//! |-----------------|-------------------|
//! | `rename = "x"`, `rename(deserialize = "x")` | field key is `x` |
//! | `rename_all = "..."` (container) | rule applied to unrenamed fields |
//! | `skip`, `skip_deserializing` | field is not bound |
//! | `flatten` | field is bound against the parent's keys |
//!
//! Every other serde item is skipped over, including its value.
//!
//! # Supported Syntax
//!
//! ```ignore
//! #[config("required")]
//! #[config("default=8080,env=APP_PORT")]
//! #[config = "required,env=APP_HOST"]
//! ```

use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{
    Attribute, DeriveInput, Error as SynError, Expr, ExprLit, Field, Lit, LitStr, Meta,
    Result as SynResult, Token,
};

/// serde's `rename_all` rules, as applied to snake_case field names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    const ALL: [(&'static str, Self); 8] = [
        ("lowercase", Self::Lower),
        ("UPPERCASE", Self::Upper),
        ("PascalCase", Self::Pascal),
        ("camelCase", Self::Camel),
        ("snake_case", Self::Snake),
        ("SCREAMING_SNAKE_CASE", Self::ScreamingSnake),
        ("kebab-case", Self::Kebab),
        ("SCREAMING-KEBAB-CASE", Self::ScreamingKebab),
    ];

    fn from_lit(lit: &LitStr) -> SynResult<Self> {
        let value = lit.value();

        Self::ALL
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, rule)| *rule)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|(name, _)| *name).collect();
                SynError::new_spanned(
                    lit,
                    format!(
                        "unknown rename rule `{value}`, expected one of {}",
                        names.join(", ")
                    ),
                )
            })
    }

    /// Applies the rule to a snake_case field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_string(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => pascal_case(field),
            Self::Camel => {
                let pascal = pascal_case(field);
                let mut chars = pascal.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_ascii_lowercase().to_string() + chars.as_str()
                })
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn pascal_case(field: &str) -> String {
    let mut pascal = String::with_capacity(field.len());
    let mut capitalize = true;

    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            pascal.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            pascal.push(ch);
        }
    }

    pascal
}

/// Struct-level settings.
#[derive(Debug, Default)]
pub struct ContainerAttr {
    /// `#[serde(rename_all = "...")]`, deserialize side.
    pub rename_all: Option<RenameRule>,
}

impl ContainerAttr {
    pub fn parse(input: &DeriveInput) -> SynResult<Self> {
        let mut result = Self::default();

        for attr in serde_attrs(&input.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(lit) = deserialize_side(&meta)? {
                        result.rename_all = Some(RenameRule::from_lit(&lit)?);
                    }
                    Ok(())
                } else {
                    skip_value(&meta)
                }
            })?;
        }

        Ok(result)
    }
}

/// Field-level settings.
#[derive(Debug, Default)]
pub struct FieldAttr {
    /// The raw directive string, if `#[config]` is present.
    pub directive: Option<LitStr>,

    /// `#[serde(rename)]`, deserialize side.
    pub rename: Option<String>,

    /// `#[serde(skip)]` or `#[serde(skip_deserializing)]`.
    pub skip: bool,

    /// `#[serde(flatten)]`.
    pub flatten: bool,
}

impl FieldAttr {
    pub fn parse(field: &Field) -> SynResult<Self> {
        let mut result = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("config") {
                continue;
            }

            if result.directive.is_some() {
                return Err(SynError::new_spanned(
                    attr,
                    "duplicate #[config] attribute; combine directives with `,`",
                ));
            }

            result.directive = Some(parse_directive(attr)?);
        }

        for attr in serde_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(lit) = deserialize_side(&meta)? {
                        result.rename = Some(lit.value());
                    }
                    Ok(())
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                    result.skip = true;
                    Ok(())
                } else if meta.path.is_ident("flatten") {
                    result.flatten = true;
                    Ok(())
                } else {
                    skip_value(&meta)
                }
            })?;
        }

        Ok(result)
    }
}

/// The field's identifier without a raw-identifier prefix.
pub fn field_name(field: &Field) -> SynResult<String> {
    field
        .ident
        .as_ref()
        .map(|ident| ident.unraw().to_string())
        .ok_or_else(|| SynError::new_spanned(field, "Configure requires named fields"))
}

fn serde_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("serde"))
}

/// Reads `#[config("...")]` or `#[config = "..."]`.
fn parse_directive(attr: &Attribute) -> SynResult<LitStr> {
    match &attr.meta {
        Meta::List(list) => list.parse_args::<LitStr>(),

        Meta::NameValue(name_value) => match &name_value.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => Ok(lit.clone()),
            other => Err(SynError::new_spanned(
                other,
                "expected a string literal: #[config = \"required\"]",
            )),
        },

        Meta::Path(path) => Err(SynError::new_spanned(
            path,
            "expected a directive string: #[config(\"required,default=...\")]",
        )),
    }
}

/// Reads `name = "x"` or `name(deserialize = "x", serialize = "y")`.
///
/// Returns `None` when only the serialize side is given.
fn deserialize_side(meta: &ParseNestedMeta) -> SynResult<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }

    let mut found = None;

    meta.parse_nested_meta(|inner| {
        let lit: LitStr = inner.value()?.parse()?;

        if inner.path.is_ident("deserialize") {
            found = Some(lit);
        } else if !inner.path.is_ident("serialize") {
            return Err(inner.error("expected `serialize` or `deserialize`"));
        }

        Ok(())
    })?;

    Ok(found)
}

/// Consumes the value of a serde item this derive does not care about.
fn skip_value(meta: &ParseNestedMeta) -> SynResult<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_value(&inner))?;
    }

    Ok(())
}
