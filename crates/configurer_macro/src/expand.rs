//! Code generation for `#[derive(Configure)]`.
//!
//! The [`Expander`] validates the input, resolves each field's lookup key
//! and directive, and emits two impls:
//!
//! | Impl | Contents |
//! |------|----------|
//! | `Configure` | a static `StructDescriptor` and `bind_fields`, one binding call per bound field |
//! | `FieldValue` | `kind() == FieldKind::Struct`, `canonicalize` and `bind_nested`, so the struct can be nested |
//!
//! Field types are dispatched through `configurer::__private::Probe`: types
//! implementing `FieldValue` get the full binder, any other deserializable
//! type binds as a leaf. Only field types that mention a generic parameter,
//! and flattened fields, are bounded by `FieldValue` in the shared
//! where-clause; the struct itself must be `DeserializeOwned`.

use proc_macro2::{Ident, TokenStream as QuoteStream, TokenTree};
use quote::{ToTokens, quote};
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{
    Data, DeriveInput, Error as SynError, Field, Fields, GenericParam, Result as SynResult,
    WhereClause, parse_quote,
};

use crate::parse::{ContainerAttr, FieldAttr, field_name};

/// One field that takes part in binding.
struct BoundField<'a> {
    field: &'a Field,
    name: String,
    key: String,
    directive: String,
    flatten: bool,
}

impl<'a> BoundField<'a> {
    /// Returns `None` for fields serde never deserializes.
    fn resolve(field: &'a Field, container: &ContainerAttr) -> SynResult<Option<Self>> {
        let attr = FieldAttr::parse(field)?;

        if attr.skip {
            if let Some(directive) = &attr.directive {
                return Err(SynError::new_spanned(
                    directive,
                    "#[config] has no effect on a field serde skips",
                ));
            }
            return Ok(None);
        }

        if let (true, Some(directive)) = (attr.flatten, &attr.directive) {
            return Err(SynError::new_spanned(
                directive,
                "#[config] cannot be used on a #[serde(flatten)] field; \
                 put directives on the flattened struct's fields",
            ));
        }

        let name = field_name(field)?;
        let key = attr.rename.unwrap_or_else(|| {
            container
                .rename_all
                .map_or_else(|| name.clone(), |rule| rule.apply(&name))
        });

        Ok(Some(Self {
            field,
            name,
            key,
            directive: attr.directive.map(|lit| lit.value()).unwrap_or_default(),
            flatten: attr.flatten,
        }))
    }

    fn descriptor(&self) -> QuoteStream {
        let Self {
            name,
            key,
            directive,
            flatten,
            ..
        } = self;

        quote! {
            ::configurer::FieldDescriptor {
                name: #name,
                key: #key,
                directive: #directive,
                flatten: #flatten,
            }
        }
    }

    /// Binds the field at `index` of the descriptor table.
    fn bind(&self, index: usize) -> QuoteStream {
        let ident = &self.field.ident;
        let ty = &self.field.ty;

        if self.flatten {
            quote! {
                binder.bind_field(&fields[#index], &mut self.#ident, keys)?;
            }
        } else {
            quote! {
                (&&::configurer::__private::Probe::<#ty>::new())
                    .bind_slot(binder, &fields[#index], &mut self.#ident, keys)?;
            }
        }
    }

    /// Respells the field's key in the raw document and recurses.
    fn canonicalize(&self, index: usize) -> QuoteStream {
        let ty = &self.field.ty;

        if self.flatten {
            quote! {
                <#ty as ::configurer::FieldValue>::canonicalize(raw);
            }
        } else {
            quote! {
                if let ::core::option::Option::Some(value) =
                    ::configurer::keymap::canonical_entry(raw, fields[#index].key)
                {
                    (&&::configurer::__private::Probe::<#ty>::new()).canonicalize_slot(value);
                }
            }
        }
    }
}

/// The main orchestrator for macro expansion.
pub struct Expander;

impl Expander {
    /// Main entry point for expanding the derive macro.
    pub fn expand(input: &DeriveInput) -> SynResult<QuoteStream> {
        let struct_name = &input.ident;
        let struct_label = struct_name.to_string();

        let container = ContainerAttr::parse(input)?;
        let fields = Self::extract_struct_fields(input)?;

        let bound = fields
            .iter()
            .map(|field| BoundField::resolve(field, &container))
            .collect::<SynResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let descriptors = bound.iter().map(BoundField::descriptor);
        let binds = bound.iter().enumerate().map(|(index, field)| field.bind(index));
        let canonicals = bound
            .iter()
            .enumerate()
            .map(|(index, field)| field.canonicalize(index));

        let where_clause = Self::where_clause(input, &bound);
        let (impl_generics, ty_generics, _) = input.generics.split_for_impl();

        Ok(quote! {
            #[automatically_derived]
            impl #impl_generics ::configurer::Configure for #struct_name #ty_generics #where_clause {
                fn descriptor() -> &'static ::configurer::StructDescriptor {
                    static DESCRIPTOR: ::configurer::StructDescriptor = ::configurer::StructDescriptor {
                        name: #struct_label,
                        fields: &[#(#descriptors),*],
                    };
                    &DESCRIPTOR
                }

                #[allow(unused_variables, unused_imports)]
                fn bind_fields(
                    &mut self,
                    binder: &::configurer::Binder<'_>,
                    keys: &::configurer::keymap::KeyMap,
                ) -> ::core::result::Result<(), ::configurer::BindError> {
                    use ::configurer::__private::{BindLeaf as _, BindValue as _};

                    let fields = <Self as ::configurer::Configure>::descriptor().fields;
                    #(#binds)*
                    ::core::result::Result::Ok(())
                }
            }

            #[automatically_derived]
            impl #impl_generics ::configurer::FieldValue for #struct_name #ty_generics #where_clause {
                fn kind(&self) -> ::configurer::FieldKind {
                    ::configurer::FieldKind::Struct
                }

                #[allow(unused_variables, unused_imports)]
                fn canonicalize(raw: &mut ::configurer::serde_json::Value) {
                    use ::configurer::__private::{BindLeaf as _, BindValue as _};

                    let fields = <Self as ::configurer::Configure>::descriptor().fields;
                    #(#canonicals)*
                }

                fn bind_nested(
                    &mut self,
                    binder: &::configurer::Binder<'_>,
                    keys: &::configurer::keymap::KeyMap,
                ) -> ::core::result::Result<(), ::configurer::BindError> {
                    binder.bind(self, keys)
                }
            }
        })
    }

    /// The input's where-clause plus the bounds binding needs.
    fn where_clause(input: &DeriveInput, bound: &[BoundField<'_>]) -> WhereClause {
        let struct_name = &input.ident;
        let (_, ty_generics, existing) = input.generics.split_for_impl();

        let mut clause = existing.cloned().unwrap_or_else(|| WhereClause {
            where_token: Default::default(),
            predicates: Punctuated::new(),
        });

        clause.predicates.push(parse_quote! {
            #struct_name #ty_generics: ::configurer::serde::de::DeserializeOwned
        });

        let params: Vec<&Ident> = input
            .generics
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(param) => Some(&param.ident),
                GenericParam::Const(param) => Some(&param.ident),
                GenericParam::Lifetime(_) => None,
            })
            .collect();

        // Concrete types are resolved by the probe at the use site.
        for field in bound {
            let ty = &field.field.ty;
            if field.flatten || mentions_any(ty.to_token_stream(), &params) {
                clause
                    .predicates
                    .push(parse_quote! { #ty: ::configurer::FieldValue });
            }
        }

        clause
    }

    /// Extract named fields from the struct, rejecting invalid types.
    fn extract_struct_fields(input: &DeriveInput) -> SynResult<&Punctuated<Field, Comma>> {
        match &input.data {
            Data::Struct(data_struct) => match &data_struct.fields {
                Fields::Named(fields_named) => Ok(&fields_named.named),

                Fields::Unnamed(_) => Err(SynError::new_spanned(
                    input,
                    "Configure does not support tuple structs",
                )),

                Fields::Unit => Err(SynError::new_spanned(
                    input,
                    "Configure does not support unit structs",
                )),
            },

            Data::Enum(_) => Err(SynError::new_spanned(
                input,
                "Configure can only be derived for structs, not enums",
            )),

            Data::Union(_) => Err(SynError::new_spanned(
                input,
                "Configure can only be derived for structs, not unions",
            )),
        }
    }
}

/// Whether `tokens` names any of `params`.
fn mentions_any(tokens: QuoteStream, params: &[&Ident]) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => params.iter().any(|param| **param == ident),
        TokenTree::Group(group) => mentions_any(group.stream(), params),
        TokenTree::Punct(_) | TokenTree::Literal(_) => false,
    })
}
