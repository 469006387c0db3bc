//! Handler types: one value per protocol / packet-layer definition.
//!
//! Dissectors elsewhere in the toolkit define the actual layer behaviour.  The
//! configuration only needs a stable identity for each layer so it can map wire
//! type codes to layers and group fields by the layers that own them.

use std::fmt;

/// Identity of a packet-layer definition (a "handler type").
///
/// Two `LayerType` values are the same handler type when both the class name
/// and the long name match.  Values are `Copy` so registries can hold them by
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerType {
    /// Short identifier used in listings, e.g. `"TCP"`.
    class_name: &'static str,
    /// Human-readable layer name, e.g. `"Ethernet"`.
    name: &'static str,
}

impl LayerType {
    /// Declares a handler type.
    pub const fn new(class_name: &'static str, name: &'static str) -> Self {
        Self { class_name, name }
    }

    /// Returns the short class name (`"Ether"`, `"TCP"`, ...).
    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    /// Returns the long, human-readable layer name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<layer {}>", self.class_name)
    }
}

/// Handler types shipped with the toolkit's core dissectors.
pub mod builtin {
    use super::LayerType;

    pub const ETHER: LayerType = LayerType::new("Ether", "Ethernet");
    pub const ARP: LayerType = LayerType::new("ARP", "ARP");
    pub const IP: LayerType = LayerType::new("IP", "IP");
    pub const IPV6: LayerType = LayerType::new("IPv6", "IPv6");
    pub const ICMP: LayerType = LayerType::new("ICMP", "ICMP");
    pub const TCP: LayerType = LayerType::new("TCP", "TCP");
    pub const UDP: LayerType = LayerType::new("UDP", "UDP");
    pub const RAW: LayerType = LayerType::new("Raw", "Raw");

    /// Every builtin handler type, in the order the core dissectors load them.
    pub const ALL: [LayerType; 8] = [ETHER, ARP, IP, IPV6, ICMP, TCP, UDP, RAW];
}
