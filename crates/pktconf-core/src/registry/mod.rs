//! Registries held by the configuration object.

pub mod field_group;
pub mod numeric;
pub mod ordered;

pub use field_group::{FieldGroupKind, FieldGroupRegistry, GroupKey};
pub use numeric::{NumericTypeRegistry, RegistryError, RegistryKey, RegistryValue};
pub use ordered::{CommandsList, LayersList, OrderedRegistry, RegistryEntry};
