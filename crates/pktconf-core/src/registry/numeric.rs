//! Bidirectional mapping between wire type codes and handler types.
//!
//! Link-layer types (`l2types`) and layer-3 ethertypes (`l3types`) are small
//! dense integers.  Dissectors look up "which layer decodes code 0x0800?" and
//! builders look up "which code do I write for `IP`?", so the registry keeps
//! both directions.
//!
//! # Overwrite behaviour
//!
//! Registration never checks for conflicts.  Re-registering a code with a
//! different layer updates `code -> layer` and adds `new layer -> code`, but
//! the old layer keeps its reverse entry:
//!
//! ```rust
//! use pktconf_core::domain::layer::builtin::{TCP, UDP};
//! use pktconf_core::registry::numeric::{NumericTypeRegistry, RegistryKey, RegistryValue};
//!
//! let mut reg = NumericTypeRegistry::new();
//! reg.register(6, TCP);
//! reg.register(6, UDP);
//! assert_eq!(reg.lookup(RegistryKey::ByCode(6)), Ok(RegistryValue::Type(UDP)));
//! // TCP still points at 6 even though 6 now decodes as UDP.
//! assert_eq!(reg.lookup(RegistryKey::ByType(TCP)), Ok(RegistryValue::Code(6)));
//! ```

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::domain::layer::LayerType;

/// Key accepted by [`NumericTypeRegistry`] lookups.
///
/// The variant selects the lookup direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    /// Look up the handler type registered for a wire code.
    ByCode(u32),
    /// Look up the wire code registered for a handler type.
    ByType(LayerType),
}

impl From<u32> for RegistryKey {
    fn from(code: u32) -> Self {
        RegistryKey::ByCode(code)
    }
}

impl From<LayerType> for RegistryKey {
    fn from(layer: LayerType) -> Self {
        RegistryKey::ByType(layer)
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKey::ByCode(code) => write!(f, "{code}"),
            RegistryKey::ByType(layer) => write!(f, "{layer}"),
        }
    }
}

/// Result of a lookup: the opposite side of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryValue {
    Code(u32),
    Type(LayerType),
}

/// Errors returned by registry lookups.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// Nothing is registered under the key.
    #[error("key not found: {0}")]
    KeyNotFound(RegistryKey),
}

/// Bidirectional `code <-> handler type` registry.
#[derive(Debug, Clone, Default)]
pub struct NumericTypeRegistry {
    num2layer: HashMap<u32, LayerType>,
    layer2num: HashMap<LayerType, u32>,
}

impl NumericTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `code -> layer` and `layer -> code`, overwriting earlier entries.
    pub fn register(&mut self, code: u32, layer: LayerType) {
        self.register_num2layer(code, layer);
        self.register_layer2num(code, layer);
    }

    /// Records only the `code -> layer` direction.
    pub fn register_num2layer(&mut self, code: u32, layer: LayerType) {
        self.num2layer.insert(code, layer);
    }

    /// Records only the `layer -> code` direction.
    pub fn register_layer2num(&mut self, code: u32, layer: LayerType) {
        self.layer2num.insert(layer, code);
    }

    /// Looks `key` up in the direction its variant selects.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::KeyNotFound`] when nothing is registered for `key`.
    pub fn lookup(&self, key: impl Into<RegistryKey>) -> Result<RegistryValue, RegistryError> {
        let key = key.into();
        let found = match key {
            RegistryKey::ByCode(code) => self.num2layer.get(&code).copied().map(RegistryValue::Type),
            RegistryKey::ByType(layer) => self.layer2num.get(&layer).copied().map(RegistryValue::Code),
        };
        found.ok_or(RegistryError::KeyNotFound(key))
    }

    /// Returns `true` when `key` is registered in the direction its variant selects.
    pub fn contains(&self, key: impl Into<RegistryKey>) -> bool {
        match key.into() {
            RegistryKey::ByCode(code) => self.num2layer.contains_key(&code),
            RegistryKey::ByType(layer) => self.layer2num.contains_key(&layer),
        }
    }

    /// Non-failing [`lookup`](Self::lookup): returns `default` for absent keys.
    pub fn get(&self, key: impl Into<RegistryKey>, default: RegistryValue) -> RegistryValue {
        self.lookup(key).unwrap_or(default)
    }

    /// Typed shortcut for the `code -> layer` direction.
    pub fn layer_for(&self, code: u32) -> Option<LayerType> {
        self.num2layer.get(&code).copied()
    }

    /// Typed shortcut for the `layer -> code` direction.
    pub fn code_for(&self, layer: &LayerType) -> Option<u32> {
        self.layer2num.get(layer).copied()
    }

    /// Registered codes in ascending order.
    pub fn codes(&self) -> Vec<u32> {
        let mut codes: Vec<u32> = self.num2layer.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    pub fn is_empty(&self) -> bool {
        self.num2layer.is_empty() && self.layer2num.is_empty()
    }
}

impl fmt::Display for NumericTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .codes()
            .into_iter()
            .filter_map(|code| self.layer_for(code).map(|l| format!("{code:#06x}:{}", l.class_name())))
            .collect();
        write!(f, "<NumericTypeRegistry [{}]>", entries.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layer::builtin::{ETHER, IP, RAW, TCP, UDP};

    fn tcp_udp_registry() -> NumericTypeRegistry {
        let mut reg = NumericTypeRegistry::new();
        reg.register(6, TCP);
        reg.register(17, UDP);
        reg
    }

    #[test]
    fn test_register_maps_both_directions() {
        // Arrange
        let reg = tcp_udp_registry();

        // Act / Assert
        assert_eq!(reg.lookup(6u32), Ok(RegistryValue::Type(TCP)));
        assert_eq!(reg.lookup(TCP), Ok(RegistryValue::Code(6)));
        assert_eq!(reg.lookup(17u32), Ok(RegistryValue::Type(UDP)));
        assert_eq!(reg.lookup(UDP), Ok(RegistryValue::Code(17)));
    }

    #[test]
    fn test_contains_dispatches_on_key_kind() {
        let reg = tcp_udp_registry();
        assert!(reg.contains(UDP));
        assert!(reg.contains(17u32));
        assert!(!reg.contains(IP));
        assert!(!reg.contains(99u32));
    }

    #[test]
    fn test_lookup_absent_code_returns_key_not_found() {
        let reg = tcp_udp_registry();
        assert_eq!(
            reg.lookup(99u32),
            Err(RegistryError::KeyNotFound(RegistryKey::ByCode(99)))
        );
    }

    #[test]
    fn test_lookup_absent_type_returns_key_not_found() {
        let reg = tcp_udp_registry();
        assert_eq!(
            reg.lookup(ETHER),
            Err(RegistryError::KeyNotFound(RegistryKey::ByType(ETHER)))
        );
    }

    #[test]
    fn test_get_returns_default_for_absent_key() {
        // Arrange
        let reg = tcp_udp_registry();
        let default = RegistryValue::Type(RAW);

        // Act / Assert
        assert_eq!(reg.get(99u32, default), default);
        assert_eq!(reg.get(6u32, default), RegistryValue::Type(TCP));
    }

    #[test]
    fn test_reregistering_code_leaves_old_type_reverse_mapping_stale() {
        // Arrange
        let mut reg = NumericTypeRegistry::new();
        reg.register(6, TCP);

        // Act
        reg.register(6, UDP);

        // Assert – forward mapping follows the last write...
        assert_eq!(reg.layer_for(6), Some(UDP));
        assert_eq!(reg.code_for(&UDP), Some(6));
        // ...but the displaced type still claims the code.
        assert_eq!(reg.code_for(&TCP), Some(6));
        assert!(reg.contains(TCP));
    }

    #[test]
    fn test_reregistering_type_moves_its_code() {
        let mut reg = NumericTypeRegistry::new();
        reg.register(1, ETHER);
        reg.register(2, ETHER);

        assert_eq!(reg.code_for(&ETHER), Some(2));
        assert_eq!(reg.layer_for(1), Some(ETHER), "old code keeps its layer");
        assert_eq!(reg.layer_for(2), Some(ETHER));
    }

    #[test]
    fn test_one_directional_registration() {
        let mut reg = NumericTypeRegistry::new();
        reg.register_num2layer(0x0800, IP);

        assert!(reg.contains(0x0800u32));
        assert!(!reg.contains(IP));

        reg.register_layer2num(0x0800, IP);
        assert!(reg.contains(IP));
    }

    #[test]
    fn test_display_lists_codes_in_order() {
        let reg = tcp_udp_registry();
        assert_eq!(reg.to_string(), "<NumericTypeRegistry [0x0006:TCP 0x0011:UDP]>");
    }

    #[test]
    fn test_key_not_found_message_names_the_key() {
        let err = RegistryError::KeyNotFound(RegistryKey::ByType(TCP));
        assert_eq!(err.to_string(), "key not found: <layer TCP>");
    }
}
