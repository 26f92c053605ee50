//! Support for code generated by `#[derive(Configure)]`. Not public API.
//!
//! A field type either implements [`FieldValue`] or is bound as a plain
//! deserializable leaf. The derive cannot tell which, so it calls through a
//! [`Probe`] and lets method resolution pick: `(&&Probe::<T>::new())` finds
//! [`BindValue`] on `&Probe<T>` first when `T: FieldValue`, and otherwise
//! auto-derefs to [`BindLeaf`] on `Probe<T>`.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json as SJSON;

use crate::bind::Binder;
use crate::descriptor::FieldDescriptor;
use crate::error::BindError;
use crate::field::FieldValue;
use crate::keymap::KeyMap;

/// Zero-sized stand-in for a field type.
pub struct Probe<T>(PhantomData<fn() -> T>);

impl<T> Probe<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

/// Binding for types that implement [`FieldValue`].
pub trait BindValue {
    type Slot;

    /// # Errors
    ///
    /// See [`Binder::bind_field`].
    fn bind_slot(
        &self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        slot: &mut Self::Slot,
        keys: &KeyMap,
    ) -> Result<(), BindError>;

    fn canonicalize_slot(&self, raw: &mut SJSON::Value);
}

impl<T: FieldValue> BindValue for &Probe<T> {
    type Slot = T;

    fn bind_slot(
        &self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        slot: &mut T,
        keys: &KeyMap,
    ) -> Result<(), BindError> {
        binder.bind_field(field, slot, keys)
    }

    fn canonicalize_slot(&self, raw: &mut SJSON::Value) {
        T::canonicalize(raw);
    }
}

/// Binding for any other deserializable type.
pub trait BindLeaf {
    type Slot;

    /// # Errors
    ///
    /// See [`Binder::bind_leaf`].
    fn bind_slot(
        &self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        slot: &mut Self::Slot,
        keys: &KeyMap,
    ) -> Result<(), BindError>;

    fn canonicalize_slot(&self, raw: &mut SJSON::Value);
}

impl<T: DeserializeOwned> BindLeaf for Probe<T> {
    type Slot = T;

    fn bind_slot(
        &self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        slot: &mut T,
        keys: &KeyMap,
    ) -> Result<(), BindError> {
        binder.bind_leaf(field, slot, keys)
    }

    fn canonicalize_slot(&self, _raw: &mut SJSON::Value) {}
}
