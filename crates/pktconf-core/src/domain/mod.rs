//! Domain entities shared by every registry: handler types and fields.
//!
//! Nothing here knows about the configuration object.  Dissectors declare
//! their layers and fields with these types and hand them to the registries in
//! [`crate::registry`].

/// Handler-type identity and the builtin layer set.
pub mod layer;

/// Fields and the permissive [`field::MaybeField`] view used by field groups.
pub mod field;
