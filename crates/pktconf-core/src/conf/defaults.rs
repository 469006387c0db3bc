//! Class-level defaults: the value every setting has until an instance
//! overrides it.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::data;
use super::gate::is_pypy;
use super::value::{shared, SettingValue};
use super::{render_settings, ClassAttr, ConfError};
use crate::intercept::log_level::LogLevelControl;
use crate::intercept::prompt::{prompt_changer, NoTheme, DEFAULT_PROMPT};
use crate::intercept::Interceptor;
use crate::registry::{CommandsList, FieldGroupRegistry, LayersList, NumericTypeRegistry};

/// Private key holding the log level on each configuration.
pub const LOG_LEVEL_KEY: &str = "_logLevel";

/// Paths (or names on `PATH`) of the external programs the toolkit launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgPath {
    pub pdfreader: String,
    pub psreader: String,
    pub dot: String,
    pub display: String,
    pub tcpdump: String,
    pub tcpreplay: String,
    pub hexedit: String,
    pub tshark: String,
    pub wireshark: String,
    pub ifconfig: String,
    pub powershell: Option<String>,
}

impl Default for ProgPath {
    fn default() -> Self {
        Self {
            pdfreader: "acroread".into(),
            psreader: "gv".into(),
            dot: "dot".into(),
            display: "display".into(),
            tcpdump: "tcpdump".into(),
            tcpreplay: "tcpreplay".into(),
            hexedit: "hexer".into(),
            tshark: "tshark".into(),
            wireshark: "wireshark".into(),
            ifconfig: "ifconfig".into(),
            powershell: None,
        }
    }
}

impl ProgPath {
    /// Returns the path configured for program `name`.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        let path = match name {
            "pdfreader" => &self.pdfreader,
            "psreader" => &self.psreader,
            "dot" => &self.dot,
            "display" => &self.display,
            "tcpdump" => &self.tcpdump,
            "tcpreplay" => &self.tcpreplay,
            "hexedit" => &self.hexedit,
            "tshark" => &self.tshark,
            "wireshark" => &self.wireshark,
            "ifconfig" => &self.ifconfig,
            "powershell" => return Some(self.powershell.as_deref()),
            _ => return None,
        };
        Some(Some(path.as_str()))
    }

    /// Sets the path of program `name`; `None` marks it unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::UnknownSetting`] for unknown program names, and
    /// [`ConfError::TypeMismatch`] when `None` is given for a program that must
    /// have a path.
    pub fn set(&mut self, name: &str, path: Option<String>) -> Result<(), ConfError> {
        if name == "powershell" {
            self.powershell = path;
            return Ok(());
        }
        let slot = self.required_slot(name)?;
        *slot = path.ok_or_else(|| ConfError::TypeMismatch {
            name: name.to_string(),
            expected: "str",
            found: "none",
        })?;
        Ok(())
    }

    fn required_slot(&mut self, name: &str) -> Result<&mut String, ConfError> {
        Ok(match name {
            "pdfreader" => &mut self.pdfreader,
            "psreader" => &mut self.psreader,
            "dot" => &mut self.dot,
            "display" => &mut self.display,
            "tcpdump" => &mut self.tcpdump,
            "tcpreplay" => &mut self.tcpreplay,
            "hexedit" => &mut self.hexedit,
            "tshark" => &mut self.tshark,
            "wireshark" => &mut self.wireshark,
            "ifconfig" => &mut self.ifconfig,
            other => return Err(ConfError::UnknownSetting(other.to_string())),
        })
    }

    /// `(name, value)` pairs sorted by name.
    fn entries(&self) -> Vec<(&'static str, SettingValue)> {
        vec![
            ("display", self.display.as_str().into()),
            ("dot", self.dot.as_str().into()),
            ("hexedit", self.hexedit.as_str().into()),
            ("ifconfig", self.ifconfig.as_str().into()),
            ("pdfreader", self.pdfreader.as_str().into()),
            ("powershell", self.powershell.as_deref().into()),
            ("psreader", self.psreader.as_str().into()),
            ("tcpdump", self.tcpdump.as_str().into()),
            ("tcpreplay", self.tcpreplay.as_str().into()),
            ("tshark", self.tshark.as_str().into()),
            ("wireshark", self.wireshark.as_str().into()),
        ]
    }
}

impl fmt::Display for ProgPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        f.write_str(&render_settings(
            entries.iter().map(|(name, value)| (*name, value.to_string())),
        ))
    }
}

fn value(v: impl Into<SettingValue>) -> ClassAttr {
    ClassAttr::Value(v.into())
}

fn empty_list() -> ClassAttr {
    ClassAttr::Value(SettingValue::List(Vec::new()))
}

fn empty_map() -> ClassAttr {
    ClassAttr::Value(SettingValue::Map(BTreeMap::new()))
}

/// Builds the class-level table of a fresh configuration class.
pub(crate) fn class_attrs() -> BTreeMap<&'static str, ClassAttr> {
    let none = || ClassAttr::Value(SettingValue::None);
    let mut attrs: BTreeMap<&'static str, ClassAttr> = BTreeMap::new();

    // Identity and session
    attrs.insert("version", value(env!("CARGO_PKG_VERSION")));
    attrs.insert("session", value(""));
    attrs.insert("interactive", value(false));
    attrs.insert("interactive_shell", value(""));
    attrs.insert("stealth", value("not implemented"));
    attrs.insert("histfile", value("/dev/null"));

    // Interfaces and sockets
    attrs.insert("iface", none());
    attrs.insert("iface6", none());
    attrs.insert("L3socket", none());
    attrs.insert("L2socket", none());
    attrs.insert("L2listen", none());
    attrs.insert("BTsocket", none());
    attrs.insert("promisc", value(1));
    attrs.insert("sniff_promisc", value(1));
    attrs.insert("except_filter", value(""));
    attrs.insert("min_pkt_size", value(60));
    attrs.insert("auto_fragment", value(1));
    attrs.insert("ipv6_enabled", value(true));

    // Answer matching
    attrs.insert("checkIPID", value(0));
    attrs.insert("checkIPsrc", value(1));
    attrs.insert("checkIPaddr", value(1));
    attrs.insert("checkIPinIP", value(true));
    attrs.insert("check_TCPerror_seqack", value(0));

    // Output and debugging
    attrs.insert("verb", value(2));
    attrs.insert("padding", value(1));
    attrs.insert("raw_layer", none());
    attrs.insert("raw_summary", value(false));
    attrs.insert("default_l2", none());
    attrs.insert("debug_match", value(0));
    attrs.insert("debug_tls", value(0));
    attrs.insert("debug_dissector", value(0));
    attrs.insert("warning_threshold", value(5));
    attrs.insert("fancy_prompt", value(true));
    attrs.insert("auto_crop_tables", value(true));
    attrs.insert("wepkey", value(""));

    // Registries
    attrs.insert("layers", ClassAttr::Value(SettingValue::Layers(shared(LayersList::new()))));
    attrs.insert("commands", ClassAttr::Value(SettingValue::Commands(shared(CommandsList::new()))));
    attrs.insert("l2types", ClassAttr::Value(SettingValue::NumericRegistry(shared(NumericTypeRegistry::new()))));
    attrs.insert("l3types", ClassAttr::Value(SettingValue::NumericRegistry(shared(NumericTypeRegistry::new()))));
    attrs.insert("resolve", ClassAttr::Value(SettingValue::FieldGroup(shared(FieldGroupRegistry::resolve()))));
    attrs.insert("noenum", ClassAttr::Value(SettingValue::FieldGroup(shared(FieldGroupRegistry::resolve()))));
    attrs.insert("emph", ClassAttr::Value(SettingValue::FieldGroup(shared(FieldGroupRegistry::emphasize()))));
    attrs.insert("prog", ClassAttr::Value(SettingValue::Prog(shared(ProgPath::default()))));

    // Caches and state owned by other subsystems
    attrs.insert("cache_iflist", empty_map());
    attrs.insert("cache_ipaddrs", empty_map());
    attrs.insert("route", none());
    attrs.insert("route6", none());
    attrs.insert("netcache", none());
    attrs.insert("geoip_city", none());
    attrs.insert("manufdb", none());
    attrs.insert("contribs", empty_map());
    attrs.insert("temp_files", empty_list());
    attrs.insert("load_layers", empty_list());
    attrs.insert("stats_classic_protocols", empty_list());
    attrs.insert("stats_dot11_protocols", empty_list());
    attrs.insert("extensions_paths", value("."));

    // Number tables
    attrs.insert("ethertypes", ClassAttr::Value(SettingValue::Table(data::ether_types())));
    attrs.insert("protocols", ClassAttr::Value(SettingValue::Table(data::ip_protos())));
    attrs.insert("services_tcp", ClassAttr::Value(SettingValue::Table(data::tcp_services())));
    attrs.insert("services_udp", ClassAttr::Value(SettingValue::Table(data::udp_services())));

    // Capabilities
    attrs.insert("use_pypy", value(is_pypy()));
    attrs.insert("use_pcap", value(false));
    attrs.insert("use_dnet", value(false));
    attrs.insert("use_bpf", value(false));
    attrs.insert("use_winpcapy", value(false));
    attrs.insert("use_npcap", value(false));
    attrs.insert("crypto_valid", value(false));
    attrs.insert("crypto_valid_advanced", value(false));

    // Intercepted attributes
    attrs.insert(
        "prompt",
        ClassAttr::Intercepted(Interceptor::new("prompt", DEFAULT_PROMPT.into(), prompt_changer)),
    );
    attrs.insert(
        "color_theme",
        ClassAttr::Intercepted(Interceptor::new(
            "color_theme",
            SettingValue::Theme(Rc::new(NoTheme)),
            prompt_changer,
        )),
    );
    attrs.insert("logLevel", ClassAttr::LogLevel(LogLevelControl::new(LOG_LEVEL_KEY)));

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prog_path_defaults() {
        let prog = ProgPath::default();
        assert_eq!(prog.get("tcpdump"), Some(Some("tcpdump")));
        assert_eq!(prog.get("hexedit"), Some(Some("hexer")));
        assert_eq!(prog.get("powershell"), Some(None));
        assert_eq!(prog.get("emacs"), None);
    }

    #[test]
    fn test_prog_path_set_updates_named_program() {
        let mut prog = ProgPath::default();
        prog.set("tcpdump", Some("/usr/sbin/tcpdump".into())).unwrap();
        prog.set("powershell", Some("pwsh".into())).unwrap();
        assert_eq!(prog.tcpdump, "/usr/sbin/tcpdump");
        assert_eq!(prog.powershell.as_deref(), Some("pwsh"));
    }

    #[test]
    fn test_prog_path_set_rejects_unknown_program_and_missing_path() {
        let mut prog = ProgPath::default();
        assert_eq!(
            prog.set("emacs", Some("emacs".into())),
            Err(ConfError::UnknownSetting("emacs".into()))
        );
        assert!(matches!(
            prog.set("dot", None),
            Err(ConfError::TypeMismatch { .. })
        ));
        assert_eq!(prog.dot, "dot");
    }

    #[test]
    fn test_prog_path_display_uses_settings_layout() {
        let dump = ProgPath::default().to_string();
        let first = dump.lines().next().unwrap();
        assert_eq!(first, "display    = 'display'");
        assert!(dump.contains("powershell = None"));
        assert_eq!(dump.lines().count(), 11);
    }

    #[test]
    fn test_class_table_declares_public_names_only() {
        let attrs = class_attrs();
        assert!(attrs.keys().all(|k| !k.starts_with('_')));
        assert!(attrs.contains_key("logLevel"));
        assert!(attrs.len() > 60);
    }
}
