//! Compile-time field metadata.
//!
//! `#[derive(Configure)]` emits one `static` [`StructDescriptor`] per type.
//! The binder reads it to find each field's directive and lookup key; it is
//! never built at runtime.

/// Metadata for one bindable field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    /// The field's identifier as declared in Rust (raw prefix stripped).
    pub name: &'static str,

    /// The serde-visible name: `#[serde(rename)]`, else the container's
    /// `rename_all` rule applied to `name`, else `name`.
    pub key: &'static str,

    /// The raw directive string from `#[config("...")]`, or `""`.
    pub directive: &'static str,

    /// `#[serde(flatten)]`: bind against the parent's key map.
    pub flatten: bool,
}

impl FieldDescriptor {
    /// A plain field whose key is its name and which has no directive.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            key: name,
            directive: "",
            flatten: false,
        }
    }

    /// Sets the serde-visible key.
    #[must_use]
    pub const fn key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Sets the directive string.
    #[must_use]
    pub const fn directive(mut self, directive: &'static str) -> Self {
        self.directive = directive;
        self
    }

    /// Marks the field as flattened.
    #[must_use]
    pub const fn flatten(mut self) -> Self {
        self.flatten = true;
        self
    }
}

/// Metadata for a configuration struct.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StructDescriptor {
    /// The struct's declared name.
    pub name: &'static str,

    /// Bindable fields in declaration order. Skipped fields are omitted.
    pub fields: &'static [FieldDescriptor],
}

impl StructDescriptor {
    /// Looks a field up by its declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}
