//! Well-known number tables and the builtin layer bindings.

use std::collections::BTreeMap;

use super::{Conf, ConfError};
use crate::domain::layer::builtin;

/// Link type of Ethernet captures (`DLT_EN10MB`).
pub const DLT_EN10MB: u32 = 1;
pub const ETH_P_IP: u32 = 0x0800;
pub const ETH_P_ARP: u32 = 0x0806;
pub const ETH_P_IPV6: u32 = 0x86DD;

const ETHER_TYPES: &[(u32, &str)] = &[
    (0x0800, "IPv4"),
    (0x0806, "ARP"),
    (0x8035, "RARP"),
    (0x8100, "802_1Q"),
    (0x8137, "IPX"),
    (0x86DD, "IPv6"),
    (0x880B, "PPP"),
    (0x8847, "MPLS"),
    (0x8863, "PPP_DISC"),
    (0x8864, "PPP_SES"),
    (0x888E, "EAPOL"),
    (0x88A8, "802_1AD"),
    (0x88CC, "LLDP"),
];

const IP_PROTOS: &[(u32, &str)] = &[
    (0, "ip"),
    (1, "icmp"),
    (2, "igmp"),
    (4, "ipencap"),
    (6, "tcp"),
    (17, "udp"),
    (41, "ipv6"),
    (47, "gre"),
    (50, "esp"),
    (51, "ah"),
    (58, "ipv6-icmp"),
    (89, "ospf"),
    (132, "sctp"),
];

const TCP_SERVICES: &[(u32, &str)] = &[
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (53, "domain"),
    (80, "http"),
    (110, "pop3"),
    (143, "imap2"),
    (179, "bgp"),
    (443, "https"),
    (993, "imaps"),
    (995, "pop3s"),
];

const UDP_SERVICES: &[(u32, &str)] = &[
    (53, "domain"),
    (67, "bootps"),
    (68, "bootpc"),
    (69, "tftp"),
    (123, "ntp"),
    (161, "snmp"),
    (162, "snmp-trap"),
    (500, "isakmp"),
    (514, "syslog"),
    (1812, "radius"),
];

fn table(entries: &[(u32, &str)]) -> BTreeMap<u32, String> {
    entries.iter().map(|&(n, name)| (n, name.to_string())).collect()
}

pub fn ether_types() -> BTreeMap<u32, String> {
    table(ETHER_TYPES)
}

pub fn ip_protos() -> BTreeMap<u32, String> {
    table(IP_PROTOS)
}

pub fn tcp_services() -> BTreeMap<u32, String> {
    table(TCP_SERVICES)
}

pub fn udp_services() -> BTreeMap<u32, String> {
    table(UDP_SERVICES)
}

/// Loads the builtin layers into `layers` and binds their wire codes in
/// `l2types` / `l3types`.
///
/// # Errors
///
/// Returns [`ConfError::TypeMismatch`] if one of those settings was replaced
/// by something that is not a registry.
pub fn register_builtin_layers(conf: &Conf) -> Result<(), ConfError> {
    {
        let layers = conf.layers()?;
        let mut layers = layers.borrow_mut();
        for layer in builtin::ALL {
            layers.register(layer);
        }
    }
    conf.l2types()?.borrow_mut().register(DLT_EN10MB, builtin::ETHER);

    let l3types = conf.l3types()?;
    let mut l3types = l3types.borrow_mut();
    l3types.register(ETH_P_IP, builtin::IP);
    l3types.register(ETH_P_ARP, builtin::ARP);
    l3types.register(ETH_P_IPV6, builtin::IPV6);
    Ok(())
}
