//! The variant type every setting holds.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::conf::defaults::ProgPath;
use crate::domain::layer::LayerType;
use crate::intercept::prompt::ColorTheme;
use crate::registry::{CommandsList, FieldGroupRegistry, LayersList, NumericTypeRegistry};

/// A container shared by every configuration that references it.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps `value` for shared, mutable access.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Value of one setting.
///
/// Cloning is shallow: the registry variants clone the `Rc`, so clones observe
/// each other's mutations.
#[derive(Debug, Clone)]
pub enum SettingValue {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<SettingValue>),
    Map(BTreeMap<String, SettingValue>),
    /// Number-to-name table (ethertypes, protocol numbers, ports).
    Table(BTreeMap<u32, String>),
    Layer(LayerType),
    NumericRegistry(Shared<NumericTypeRegistry>),
    FieldGroup(Shared<FieldGroupRegistry>),
    Layers(Shared<LayersList>),
    Commands(Shared<CommandsList>),
    Prog(Shared<ProgPath>),
    Theme(Rc<dyn ColorTheme>),
}

impl SettingValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SettingValue::None => "none",
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::Str(_) => "str",
            SettingValue::List(_) => "list",
            SettingValue::Map(_) => "map",
            SettingValue::Table(_) => "table",
            SettingValue::Layer(_) => "layer",
            SettingValue::NumericRegistry(_) => "numeric registry",
            SettingValue::FieldGroup(_) => "field group",
            SettingValue::Layers(_) => "layer list",
            SettingValue::Commands(_) => "command list",
            SettingValue::Prog(_) => "program paths",
            SettingValue::Theme(_) => "theme",
        }
    }

    /// Truthiness as the toolkit's option checks understand it: `None`, `false`,
    /// `0` and empty strings or collections are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            SettingValue::None => false,
            SettingValue::Bool(b) => *b,
            SettingValue::Int(n) => *n != 0,
            SettingValue::Str(s) => !s.is_empty(),
            SettingValue::List(items) => !items.is_empty(),
            SettingValue::Map(map) => !map.is_empty(),
            SettingValue::Table(table) => !table.is_empty(),
            _ => true,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SettingValue::None)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(n) => Some(*n),
            SettingValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// `true` for the variants that hold a shared container or a theme.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            SettingValue::NumericRegistry(_)
                | SettingValue::FieldGroup(_)
                | SettingValue::Layers(_)
                | SettingValue::Commands(_)
                | SettingValue::Prog(_)
                | SettingValue::Theme(_)
        )
    }

    /// Parses a literal typed at the command line.
    ///
    /// `None`, `True`/`False` and integers (decimal or `0x` hex) map to their
    /// variants; quoted text loses its quotes; anything else is a string.
    pub fn parse_literal(text: &str) -> SettingValue {
        let trimmed = text.trim();
        match trimmed {
            "None" => return SettingValue::None,
            "True" | "true" => return SettingValue::Bool(true),
            "False" | "false" => return SettingValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return SettingValue::Int(n);
        }
        if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            if let Ok(n) = i64::from_str_radix(hex, 16) {
                return SettingValue::Int(n);
            }
        }
        for quote in ['\'', '"'] {
            if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
                return SettingValue::Str(trimmed[1..trimmed.len() - 1].to_string());
            }
        }
        SettingValue::Str(text.to_string())
    }
}

impl PartialEq for SettingValue {
    fn eq(&self, other: &Self) -> bool {
        use SettingValue as V;
        match (self, other) {
            (V::None, V::None) => true,
            (V::Bool(a), V::Bool(b)) => a == b,
            (V::Int(a), V::Int(b)) => a == b,
            (V::Str(a), V::Str(b)) => a == b,
            (V::List(a), V::List(b)) => a == b,
            (V::Map(a), V::Map(b)) => a == b,
            (V::Table(a), V::Table(b)) => a == b,
            (V::Layer(a), V::Layer(b)) => a == b,
            (V::NumericRegistry(a), V::NumericRegistry(b)) => Rc::ptr_eq(a, b),
            (V::FieldGroup(a), V::FieldGroup(b)) => Rc::ptr_eq(a, b),
            (V::Layers(a), V::Layers(b)) => Rc::ptr_eq(a, b),
            (V::Commands(a), V::Commands(b)) => Rc::ptr_eq(a, b),
            (V::Prog(a), V::Prog(b)) => Rc::ptr_eq(a, b),
            (V::Theme(a), V::Theme(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

/// Renders `s` the way the toolkit's dumps quote strings.
fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        return format!("\"{s}\"");
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\x1b' => out.push_str("\\x1b"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// `Display` is the value's repr, as shown by the configuration dump.
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::None => f.write_str("None"),
            SettingValue::Bool(true) => f.write_str("True"),
            SettingValue::Bool(false) => f.write_str("False"),
            SettingValue::Int(n) => write!(f, "{n}"),
            SettingValue::Str(s) => f.write_str(&quote(s)),
            SettingValue::List(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            SettingValue::Map(map) => {
                let items: Vec<String> = map.iter().map(|(k, v)| format!("{}: {v}", quote(k))).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            SettingValue::Table(table) => {
                let items: Vec<String> = table.iter().map(|(k, v)| format!("{k}: {}", quote(v))).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            SettingValue::Layer(layer) => write!(f, "{layer}"),
            SettingValue::NumericRegistry(reg) => write!(f, "{}", reg.borrow()),
            SettingValue::FieldGroup(group) => write!(f, "{}", group.borrow()),
            SettingValue::Layers(layers) => write!(f, "{}", layers.borrow()),
            SettingValue::Commands(commands) => write!(f, "{}", commands.borrow()),
            SettingValue::Prog(prog) => write!(f, "{}", prog.borrow()),
            SettingValue::Theme(theme) => write!(f, "<{}>", theme.name()),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        SettingValue::Int(n)
    }
}

impl From<i32> for SettingValue {
    fn from(n: i32) -> Self {
        SettingValue::Int(i64::from(n))
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Str(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Str(s)
    }
}

impl From<LayerType> for SettingValue {
    fn from(layer: LayerType) -> Self {
        SettingValue::Layer(layer)
    }
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SettingValue::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layer::builtin::TCP;

    #[test]
    fn test_scalars_render_like_the_toolkit_repr() {
        assert_eq!(SettingValue::None.to_string(), "None");
        assert_eq!(SettingValue::Bool(true).to_string(), "True");
        assert_eq!(SettingValue::Int(-3).to_string(), "-3");
        assert_eq!(SettingValue::from("eth0").to_string(), "'eth0'");
        assert_eq!(SettingValue::from("it's").to_string(), "\"it's\"");
    }

    #[test]
    fn test_collections_render_items_with_repr() {
        let list = SettingValue::List(vec![SettingValue::Int(1), "a".into(), SettingValue::None]);
        assert_eq!(list.to_string(), "[1, 'a', None]");

        let map = SettingValue::Map(BTreeMap::from([("k".to_string(), SettingValue::Bool(false))]));
        assert_eq!(map.to_string(), "{'k': False}");

        let table = SettingValue::Table(BTreeMap::from([(6, "tcp".to_string()), (17, "udp".to_string())]));
        assert_eq!(table.to_string(), "{6: 'tcp', 17: 'udp'}");
    }

    #[test]
    fn test_truthiness() {
        assert!(!SettingValue::None.is_truthy());
        assert!(!SettingValue::Int(0).is_truthy());
        assert!(SettingValue::Int(2).is_truthy());
        assert!(!SettingValue::from("").is_truthy());
        assert!(SettingValue::from(TCP).is_truthy());
        assert!(!SettingValue::List(Vec::new()).is_truthy());
    }

    #[test]
    fn test_shared_containers_compare_by_identity() {
        let a = shared(LayersList::new());
        let same = SettingValue::Layers(Rc::clone(&a));
        assert_eq!(SettingValue::Layers(a), same);
        assert_ne!(same, SettingValue::Layers(shared(LayersList::new())));
    }

    #[test]
    fn test_clone_shares_container_state() {
        let original = SettingValue::Layers(shared(LayersList::new()));
        let copy = original.clone();
        if let SettingValue::Layers(layers) = &original {
            layers.borrow_mut().register(TCP);
        }
        match copy {
            SettingValue::Layers(layers) => assert_eq!(layers.borrow().len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(SettingValue::parse_literal("None"), SettingValue::None);
        assert_eq!(SettingValue::parse_literal("True"), SettingValue::Bool(true));
        assert_eq!(SettingValue::parse_literal("3"), SettingValue::Int(3));
        assert_eq!(SettingValue::parse_literal("0x800"), SettingValue::Int(0x800));
        assert_eq!(SettingValue::parse_literal("'eth0'"), SettingValue::from("eth0"));
        assert_eq!(SettingValue::parse_literal("eth1"), SettingValue::from("eth1"));
    }

    #[test]
    fn test_option_converts_to_none_or_value() {
        assert_eq!(SettingValue::from(None::<&str>), SettingValue::None);
        assert_eq!(SettingValue::from(Some("wlan0")), SettingValue::from("wlan0"));
    }
}
