//! Field groups: sets of fields plus the handler types that own them.
//!
//! The configuration carries three groups:
//!
//! - `resolve` – fields whose values get name resolution (addresses, ports).
//! - `noenum`  – enum fields that must NOT be converted to their string form.
//! - `emph`    – fields highlighted when packets are displayed.
//!
//! Each group answers two questions: "is this field in the group?" and "does
//! any field of this layer belong to the group?".  The second one is served by
//! a derived owner set which is rebuilt from scratch after every mutation, so
//! removals never leave stale layers behind.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::field::{Field, MaybeField};
use crate::domain::layer::LayerType;

/// Which flavour of group this is; only affects rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroupKind {
    Resolve,
    Emphasize,
}

impl FieldGroupKind {
    fn label(self) -> &'static str {
        match self {
            FieldGroupKind::Resolve => "Resolve",
            FieldGroupKind::Emphasize => "Emphasize",
        }
    }
}

/// Membership query for [`FieldGroupRegistry::contains`].
#[derive(Debug, Clone, Copy)]
pub enum GroupKey<'a> {
    /// Does any member field belong to this layer?
    Layer(&'a LayerType),
    /// Is this exact field a member?
    Field(&'a Field),
}

/// A set of fields and the derived set of their owner layers.
#[derive(Debug, Clone)]
pub struct FieldGroupRegistry {
    kind: FieldGroupKind,
    fields: BTreeSet<Field>,
    layers: BTreeSet<LayerType>,
}

impl FieldGroupRegistry {
    pub fn new(kind: FieldGroupKind) -> Self {
        Self {
            kind,
            fields: BTreeSet::new(),
            layers: BTreeSet::new(),
        }
    }

    pub fn resolve() -> Self {
        Self::new(FieldGroupKind::Resolve)
    }

    pub fn emphasize() -> Self {
        Self::new(FieldGroupKind::Emphasize)
    }

    pub fn kind(&self) -> FieldGroupKind {
        self.kind
    }

    /// Adds every candidate that is a field; other candidates are ignored.
    pub fn add<'a, I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = &'a dyn MaybeField>,
    {
        self.fields
            .extend(candidates.into_iter().filter_map(|c| c.as_field()).cloned());
        self.recalc_layers();
    }

    /// Removes the given fields; candidates that are not members are ignored.
    pub fn remove<'a, I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = &'a dyn MaybeField>,
    {
        for field in candidates.into_iter().filter_map(|c| c.as_field()) {
            self.fields.remove(field);
        }
        self.recalc_layers();
    }

    pub fn contains(&self, key: GroupKey<'_>) -> bool {
        match key {
            GroupKey::Layer(layer) => self.layers.contains(layer),
            GroupKey::Field(field) => self.fields.contains(field),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Owner layers of the current members.
    pub fn layers(&self) -> &BTreeSet<LayerType> {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn recalc_layers(&mut self) {
        self.layers = self
            .fields
            .iter()
            .flat_map(|f| f.owners().iter().copied())
            .collect();
    }
}

impl fmt::Display for FieldGroupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.fields.iter().map(Field::to_string).collect();
        write!(f, "<{} [{}]>", self.kind.label(), members.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layer::builtin::{IP, IPV6, TCP, UDP};

    fn sport() -> Field {
        Field::new("sport", [TCP, UDP])
    }

    fn dst() -> Field {
        Field::new("dst", [IP])
    }

    #[test]
    fn test_add_collects_fields_and_owner_layers() {
        // Arrange
        let mut group = FieldGroupRegistry::resolve();
        let (a, b) = (sport(), dst());

        // Act
        group.add([&a as &dyn MaybeField, &b]);

        // Assert
        assert_eq!(group.len(), 2);
        assert!(group.contains(GroupKey::Field(&a)));
        assert!(group.contains(GroupKey::Layer(&TCP)));
        assert!(group.contains(GroupKey::Layer(&UDP)));
        assert!(group.contains(GroupKey::Layer(&IP)));
        assert!(!group.contains(GroupKey::Layer(&IPV6)));
    }

    #[test]
    fn test_add_drops_candidates_that_are_not_fields() {
        // Arrange
        let mut group = FieldGroupRegistry::resolve();
        let junk = "not a field";

        // Act
        group.add([&junk as &dyn MaybeField, &TCP]);

        // Assert
        assert!(group.is_empty());
        assert!(group.layers().is_empty());
    }

    #[test]
    fn test_add_same_field_twice_keeps_one_member() {
        let mut group = FieldGroupRegistry::emphasize();
        let a = sport();
        group.add([&a as &dyn MaybeField]);
        group.add([&a as &dyn MaybeField]);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_remove_drops_owner_layers_no_longer_covered() {
        // Arrange
        let mut group = FieldGroupRegistry::resolve();
        let (a, b) = (sport(), dst());
        group.add([&a as &dyn MaybeField, &b]);

        // Act
        group.remove([&a as &dyn MaybeField]);

        // Assert
        assert!(!group.contains(GroupKey::Field(&a)));
        assert!(!group.contains(GroupKey::Layer(&TCP)));
        assert!(!group.contains(GroupKey::Layer(&UDP)));
        assert!(group.contains(GroupKey::Layer(&IP)));
    }

    #[test]
    fn test_remove_keeps_layer_shared_with_remaining_member() {
        let mut group = FieldGroupRegistry::resolve();
        let tcp_only = Field::new("seq", [TCP]);
        let a = sport();
        group.add([&a as &dyn MaybeField, &tcp_only]);

        group.remove([&a as &dyn MaybeField]);

        assert!(group.contains(GroupKey::Layer(&TCP)));
        assert!(!group.contains(GroupKey::Layer(&UDP)));
    }

    #[test]
    fn test_derived_layers_match_union_after_mixed_sequence() {
        // Arrange
        let mut group = FieldGroupRegistry::resolve();
        let fields = [
            Field::new("sport", [TCP, UDP]),
            Field::new("dst", [IP]),
            Field::new("src", [IP, IPV6]),
            Field::new("seq", [TCP]),
        ];

        // Act
        group.add(fields.iter().map(|f| f as &dyn MaybeField));
        group.remove([&fields[2] as &dyn MaybeField, &fields[0]]);
        group.add([&fields[0] as &dyn MaybeField]);
        group.remove([&fields[3] as &dyn MaybeField]);

        // Assert
        let expected: BTreeSet<LayerType> = group
            .fields()
            .flat_map(|f| f.owners().iter().copied())
            .collect();
        assert_eq!(group.layers(), &expected);
        assert_eq!(expected, BTreeSet::from([TCP, UDP, IP]));
    }

    #[test]
    fn test_remove_unknown_field_is_a_no_op() {
        let mut group = FieldGroupRegistry::resolve();
        let a = sport();
        group.add([&a as &dyn MaybeField]);
        let other = dst();
        group.remove([&other as &dyn MaybeField, &"junk"]);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_display_names_kind_and_members() {
        let mut group = FieldGroupRegistry::resolve();
        let a = dst();
        group.add([&a as &dyn MaybeField]);
        assert_eq!(group.to_string(), "<Resolve [<Field (IP).dst>]>");
        assert_eq!(FieldGroupRegistry::emphasize().to_string(), "<Emphasize []>");
    }
}
