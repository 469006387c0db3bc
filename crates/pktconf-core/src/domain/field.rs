//! Fields: named descriptors owned by one or more handler types.

use std::collections::BTreeSet;
use std::fmt;

use super::layer::LayerType;

/// A packet field together with the handler types that define it.
///
/// Field groups (`resolve`, `noenum`, `emph`) hold fields so that behaviour
/// such as name resolution can be switched on per field and queried per layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Field {
    name: String,
    owners: BTreeSet<LayerType>,
}

impl Field {
    /// Creates a field named `name` owned by every layer in `owners`.
    pub fn new(name: impl Into<String>, owners: impl IntoIterator<Item = LayerType>) -> Self {
        Self {
            name: name.into(),
            owners: owners.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handler types that declare this field.
    pub fn owners(&self) -> &BTreeSet<LayerType> {
        &self.owners
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owners: Vec<&str> = self.owners.iter().map(LayerType::class_name).collect();
        write!(f, "<Field ({}).{}>", owners.join(","), self.name)
    }
}

/// Anything that may be handed to a field group.
///
/// Field groups accept arbitrary candidates and keep only the ones that turn
/// out to be fields; everything else is dropped without an error.
pub trait MaybeField {
    /// Returns the field view of `self`, or `None` when `self` has no owners.
    fn as_field(&self) -> Option<&Field>;
}

impl MaybeField for Field {
    fn as_field(&self) -> Option<&Field> {
        Some(self)
    }
}

impl MaybeField for LayerType {
    fn as_field(&self) -> Option<&Field> {
        None
    }
}

impl MaybeField for &str {
    fn as_field(&self) -> Option<&Field> {
        None
    }
}

impl MaybeField for String {
    fn as_field(&self) -> Option<&Field> {
        None
    }
}
