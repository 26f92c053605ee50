//! Traits connecting typed fields to the binder.
//!
//! [`Configure`] is implemented by `#[derive(Configure)]` for configuration
//! structs. [`FieldValue`] is implemented for every type that can appear as a
//! field: the derive implements it for the struct itself, this module covers
//! the standard library, and [`leaf_field!`](crate::leaf_field) covers user
//! scalars such as enums and newtypes.
//!
//! A field type without a [`FieldValue`] impl still binds as long as it is
//! `DeserializeOwned`: the derive falls back to [`Binder::bind_leaf`], so
//! types from other crates (`url::Url`, `chrono` types, tuples) need no impl.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::num::{
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize, NonZeroU8,
    NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize,
};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;
use serde_json as SJSON;

use crate::bind::Binder;
use crate::descriptor::{FieldDescriptor, StructDescriptor};
use crate::error::BindError;
use crate::keymap::{self, KeyMap};

/// A configuration struct the binder can walk.
///
/// Derive it; a manual implementation must visit every field listed in
/// [`Configure::descriptor`] through [`Binder::bind_field`].
pub trait Configure: FieldValue {
    /// The static field metadata of this type.
    fn descriptor() -> &'static StructDescriptor;

    /// Binds each field against `keys`, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] raised by any field.
    fn bind_fields(&mut self, binder: &Binder<'_>, keys: &KeyMap) -> Result<(), BindError>;
}

/// The shape of a field's current value, seen through `Option` and `Box`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    /// A nested configuration struct.
    Struct,

    /// A string-like value of the given length in bytes.
    String {
        /// Byte length.
        len: usize,
    },

    /// A sequence with the given number of elements.
    Sequence {
        /// Element count.
        len: usize,
    },

    /// Anything else, including an empty `Option`.
    Other,
}

impl FieldKind {
    /// Returns `true` for a zero-length string or sequence.
    #[must_use]
    pub fn is_empty(self) -> bool {
        matches!(self, Self::String { len: 0 } | Self::Sequence { len: 0 })
    }
}

/// A type that can be the target of a configuration field.
///
/// The defaults describe a leaf: kind [`FieldKind::Other`], nothing to recurse
/// into.
pub trait FieldValue: DeserializeOwned {
    /// The effective kind of the current value.
    fn kind(&self) -> FieldKind {
        FieldKind::Other
    }

    /// Respells the keys of the raw document value to the names serde
    /// expects, so the typed decode sees what the binder sees.
    ///
    /// Leaves have no keys; structs and containers of structs recurse.
    fn canonicalize(raw: &mut SJSON::Value) {
        let _ = raw;
    }

    /// Binds a nested struct against its sub-map.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested struct's fields.
    fn bind_nested(&mut self, binder: &Binder<'_>, keys: &KeyMap) -> Result<(), BindError> {
        let _ = (binder, keys);
        Ok(())
    }

    /// Binds the struct elements of a sequence against the raw sequence.
    ///
    /// # Errors
    ///
    /// Returns a type error if `raw` is not a sequence, or the first element
    /// error.
    fn bind_elements(
        &mut self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        raw: Option<&SJSON::Value>,
    ) -> Result<(), BindError> {
        let _ = (binder, field, raw);
        Ok(())
    }
}

/// Implements [`FieldValue`] for leaf types with the default behavior.
///
/// A bare field of any deserializable type binds without it. Use it when a
/// local enum or newtype sits inside `Option`, `Box` or `Vec`, so the
/// container keeps its own kind (`required` then sees an empty `Vec<Level>`):
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// #[serde(rename_all = "lowercase")]
/// enum Level {
///     Debug,
///     Info,
/// }
///
/// configurer::leaf_field!(Level);
/// ```
#[macro_export]
macro_rules! leaf_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldValue for $ty {}
        )+
    };
}

leaf_field!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6, Duration, SystemTime,
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize, NonZeroU8,
    NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize, SJSON::Value,
);

/// String-like types: `required` rejects them when empty.
macro_rules! string_field {
    ($($ty:ty => |$value:ident| $len:expr),+ $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn kind(&self) -> FieldKind {
                    let $value = self;
                    FieldKind::String { len: $len }
                }
            }
        )+
    };
}

string_field!(
    Box<str> => |value| value.len(),
    Rc<str> => |value| value.len(),
    Arc<str> => |value| value.len(),
    Cow<'static, str> => |value| value.len(),
    OsString => |value| value.len(),
);

impl FieldValue for String {
    fn kind(&self) -> FieldKind {
        FieldKind::String { len: self.len() }
    }
}

impl FieldValue for PathBuf {
    fn kind(&self) -> FieldKind {
        FieldKind::String {
            len: self.as_os_str().len(),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn kind(&self) -> FieldKind {
        self.as_ref().map_or(FieldKind::Other, FieldValue::kind)
    }

    fn canonicalize(raw: &mut SJSON::Value) {
        T::canonicalize(raw);
    }

    fn bind_nested(&mut self, binder: &Binder<'_>, keys: &KeyMap) -> Result<(), BindError> {
        match self {
            Some(inner) => inner.bind_nested(binder, keys),
            None => Ok(()),
        }
    }

    fn bind_elements(
        &mut self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        raw: Option<&SJSON::Value>,
    ) -> Result<(), BindError> {
        match self {
            Some(inner) => inner.bind_elements(binder, field, raw),
            None => Ok(()),
        }
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn kind(&self) -> FieldKind {
        (**self).kind()
    }

    fn canonicalize(raw: &mut SJSON::Value) {
        T::canonicalize(raw);
    }

    fn bind_nested(&mut self, binder: &Binder<'_>, keys: &KeyMap) -> Result<(), BindError> {
        (**self).bind_nested(binder, keys)
    }

    fn bind_elements(
        &mut self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        raw: Option<&SJSON::Value>,
    ) -> Result<(), BindError> {
        (**self).bind_elements(binder, field, raw)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence { len: self.len() }
    }

    fn canonicalize(raw: &mut SJSON::Value) {
        canonicalize_elements::<T>(raw);
    }

    fn bind_elements(
        &mut self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        raw: Option<&SJSON::Value>,
    ) -> Result<(), BindError> {
        bind_struct_elements(self, binder, field, raw)
    }
}

impl<T: FieldValue> FieldValue for VecDeque<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence { len: self.len() }
    }

    fn canonicalize(raw: &mut SJSON::Value) {
        canonicalize_elements::<T>(raw);
    }

    fn bind_elements(
        &mut self,
        binder: &Binder<'_>,
        field: &'static FieldDescriptor,
        raw: Option<&SJSON::Value>,
    ) -> Result<(), BindError> {
        bind_struct_elements(self.make_contiguous(), binder, field, raw)
    }
}

// Set elements are hashed or ordered by value; they are never bound in place.
impl<T, S> FieldValue for HashSet<T, S>
where
    Self: DeserializeOwned,
{
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence { len: self.len() }
    }
}

impl<T> FieldValue for BTreeSet<T>
where
    Self: DeserializeOwned,
{
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence { len: self.len() }
    }
}

impl<T, const N: usize> FieldValue for [T; N]
where
    Self: DeserializeOwned,
{
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence { len: N }
    }
}

impl<K, V, S> FieldValue for HashMap<K, V, S> where Self: DeserializeOwned {}

impl<K, V> FieldValue for BTreeMap<K, V> where Self: DeserializeOwned {}

fn canonicalize_elements<T: FieldValue>(raw: &mut SJSON::Value) {
    if let SJSON::Value::Array(items) = raw {
        items.iter_mut().for_each(T::canonicalize);
    }
}

/// Binds each struct element of `items` against the element of the same
/// index in `raw`.
///
/// An absent or null raw sequence, and raw elements that are missing or null,
/// bind against an empty map, so required fields of the elements still
/// report.
fn bind_struct_elements<T: FieldValue>(
    items: &mut [T],
    binder: &Binder<'_>,
    field: &'static FieldDescriptor,
    raw: Option<&SJSON::Value>,
) -> Result<(), BindError> {
    if !items.iter().any(|item| item.kind() == FieldKind::Struct) {
        return Ok(());
    }

    let raw_items: &[SJSON::Value] = match raw {
        None | Some(SJSON::Value::Null) => &[],
        Some(SJSON::Value::Array(raw_items)) => raw_items,
        Some(other) => {
            return Err(BindError::Type {
                field: field.name.to_string(),
                expected: "sequence",
                found: keymap::kind_name(other),
            });
        }
    };

    let empty = KeyMap::new();

    for (index, item) in items.iter_mut().enumerate() {
        if item.kind() != FieldKind::Struct {
            continue;
        }

        let keys = match raw_items.get(index) {
            None | Some(SJSON::Value::Null) => &empty,
            Some(SJSON::Value::Object(map)) => map,
            Some(other) => {
                return Err(BindError::Type {
                    field: format!("{}[{index}]", field.name),
                    expected: "mapping",
                    found: keymap::kind_name(other),
                });
            }
        };

        item.bind_nested(binder, keys)
            .map_err(|source| BindError::Element {
                field: field.name,
                index,
                source: Box::new(source),
            })?;
    }

    Ok(())
}
