//! The configuration object.
//!
//! A [`Conf`] pairs a class-level table of defaults ([`ConfClass`], shared by
//! every configuration built from it) with its own instance table.  Reads look
//! at the instance first and fall back to the class default; writes always
//! land on the instance.  Three attributes are intercepted instead of stored
//! plainly:
//!
//! - `prompt` and `color_theme` re-render the prompt on write;
//! - `logLevel` forwards the new threshold to the logging subsystem.
//!
//! ```
//! use pktconf_core::{Conf, SettingValue};
//!
//! let conf = Conf::new();
//! assert_eq!(conf.verb().unwrap(), 2);
//!
//! conf.set("verb", SettingValue::Int(0)).unwrap();
//! assert_eq!(conf.verb().unwrap(), 0);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::intercept::log_level::{
    LevelFilterSink, LogLevelControl, LogLevelError, LogSink, DEFAULT_LOG_LEVEL,
};
use crate::intercept::prompt::{ColorTheme, PromptSink, PromptSlot};
use crate::intercept::{AttributeStore, HookError, Interceptor};
use crate::registry::{CommandsList, FieldGroupRegistry, LayersList, NumericTypeRegistry};

pub mod commands;
pub mod data;
pub mod defaults;
pub mod gate;
pub mod value;

use defaults::ProgPath;
use value::{SettingValue, Shared};

/// Total width of one rendered settings line.
const DUMP_WIDTH: usize = 76;
/// Minimum width of the name column.
const NAME_WIDTH: usize = 10;

/// Errors returned by [`Conf`] reads and writes.
#[derive(Debug, Error, PartialEq)]
pub enum ConfError {
    #[error("no setting named `{0}`")]
    UnknownSetting(String),

    /// A typed accessor found a value of the wrong kind.
    #[error("setting `{name}` holds {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error(transparent)]
    LogLevel(#[from] LogLevelError),
}

/// One entry of the class-level table.
#[derive(Debug)]
pub enum ClassAttr {
    /// Plain default, shadowed by any instance value of the same name.
    Value(SettingValue),
    /// Attribute whose writes run a hook.
    Intercepted(Interceptor<Conf, SettingValue>),
    /// The `logLevel` attribute.
    LogLevel(LogLevelControl),
}

/// Class-level state shared by sibling configurations.
pub struct ConfClass {
    attrs: BTreeMap<&'static str, ClassAttr>,
    log_sink: Rc<dyn LogSink>,
    prompt_sink: Rc<dyn PromptSink>,
}

impl ConfClass {
    fn new(log_sink: Rc<dyn LogSink>, prompt_sink: Rc<dyn PromptSink>) -> Self {
        Self {
            attrs: defaults::class_attrs(),
            log_sink,
            prompt_sink,
        }
    }

    /// Names declared at class level, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attrs.keys().copied()
    }
}

impl fmt::Debug for ConfClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfClass")
            .field("attrs", &self.attrs.len())
            .finish_non_exhaustive()
    }
}

/// Builds a [`Conf`] wired to specific logging and prompt collaborators.
#[derive(Default)]
pub struct ConfBuilder {
    log_sink: Option<Rc<dyn LogSink>>,
    prompt_sink: Option<Rc<dyn PromptSink>>,
}

impl ConfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receives every `logLevel` write.  Defaults to a [`LevelFilterSink`].
    pub fn log_sink(mut self, sink: Rc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Receives the re-rendered prompt.  Defaults to a [`PromptSlot`].
    pub fn prompt_sink(mut self, sink: Rc<dyn PromptSink>) -> Self {
        self.prompt_sink = Some(sink);
        self
    }

    /// Creates the configuration and applies the initial log level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::LogLevel`] if the log sink rejects
    /// [`DEFAULT_LOG_LEVEL`].
    pub fn build(self) -> Result<Conf, ConfError> {
        let log_sink = self
            .log_sink
            .unwrap_or_else(|| Rc::new(LevelFilterSink::default()));
        let prompt_sink = self
            .prompt_sink
            .unwrap_or_else(|| Rc::new(PromptSlot::default()));
        let conf = Conf::from_class(Rc::new(ConfClass::new(log_sink, prompt_sink)));
        conf.set("logLevel", SettingValue::Int(DEFAULT_LOG_LEVEL))?;
        debug!(settings = conf.class.attrs.len(), "configuration built");
        Ok(conf)
    }
}

/// Expands to an accessor returning the shared container held by a setting.
macro_rules! shared_accessor {
    ($(#[$doc:meta])* $fn_name:ident, $setting:literal, $variant:ident, $ty:ty, $expected:literal) => {
        $(#[$doc])*
        pub fn $fn_name(&self) -> Result<Shared<$ty>, ConfError> {
            match self.get($setting)? {
                SettingValue::$variant(inner) => Ok(inner),
                other => Err(mismatch($setting, $expected, &other)),
            }
        }
    };
}

/// Runtime configuration of the toolkit.
///
/// Not thread-safe: shared containers are reference counted without locks.
pub struct Conf {
    class: Rc<ConfClass>,
    instance: RefCell<BTreeMap<String, SettingValue>>,
}

impl Conf {
    /// Configuration with the default collaborators and log level.
    ///
    /// Same as `ConfBuilder::new().build()`. The default sink is a
    /// [`LevelFilterSink`], which maps every integer level to a filter, so the
    /// build cannot fail.
    pub fn new() -> Self {
        match ConfBuilder::new().build() {
            Ok(conf) => conf,
            Err(e) => unreachable!("LevelFilterSink rejected the default level: {e}"),
        }
    }

    fn from_class(class: Rc<ConfClass>) -> Self {
        Self {
            class,
            instance: RefCell::new(BTreeMap::new()),
        }
    }

    /// A new configuration sharing this one's class table and collaborators,
    /// with an empty instance table.
    pub fn sibling(&self) -> Conf {
        Self::from_class(Rc::clone(&self.class))
    }

    pub fn class(&self) -> &ConfClass {
        &self.class
    }

    /// Reads setting `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::UnknownSetting`] if `name` is neither declared at
    /// class level nor set on this instance.
    pub fn get(&self, name: &str) -> Result<SettingValue, ConfError> {
        match self.class.attrs.get(name) {
            Some(ClassAttr::Intercepted(interceptor)) => Ok(interceptor.get(self)),
            Some(ClassAttr::LogLevel(control)) => Ok(control.get(self).unwrap_or(SettingValue::None)),
            Some(ClassAttr::Value(default)) => {
                Ok(self.load(name).unwrap_or_else(|| default.clone()))
            }
            None => self
                .load(name)
                .ok_or_else(|| ConfError::UnknownSetting(name.to_string())),
        }
    }

    /// Writes setting `name`.  Names unknown to the class are accepted and
    /// live on this instance only.
    ///
    /// # Errors
    ///
    /// Intercepted attributes return their hook's error, `logLevel` returns
    /// the log sink's.
    pub fn set(&self, name: &str, value: SettingValue) -> Result<(), ConfError> {
        match self.class.attrs.get(name) {
            Some(ClassAttr::Intercepted(interceptor)) => interceptor.set(self, value)?,
            Some(ClassAttr::LogLevel(control)) => {
                control.set(self, self.class.log_sink.as_ref(), value)?
            }
            _ => self.store(name, value),
        }
        Ok(())
    }

    /// Replaces this configuration's instance table with a shallow copy of
    /// `other`'s.  Containers end up shared between the two.
    pub fn configure(&self, other: &Conf) {
        let copy = other.instance.borrow().clone();
        debug!(settings = copy.len(), "configuration copied");
        *self.instance.borrow_mut() = copy;
    }

    /// Every public setting, one `name = value` line each, sorted by name.
    pub fn dump(&self) -> String {
        let names: BTreeSet<String> = self
            .class
            .names()
            .map(str::to_string)
            .chain(self.instance.borrow().keys().cloned())
            .filter(|name| !name.starts_with('_'))
            .collect();
        let rows: Vec<(&str, String)> = names
            .iter()
            .map(|name| {
                let shown = self.get(name).map(|v| v.to_string()).unwrap_or_default();
                (name.as_str(), shown)
            })
            .collect();
        render_settings(rows)
    }

    pub fn log_sink(&self) -> &dyn LogSink {
        self.class.log_sink.as_ref()
    }

    pub fn prompt_sink(&self) -> &dyn PromptSink {
        self.class.prompt_sink.as_ref()
    }

    /// Verbosity of the toolkit's commands.
    pub fn verb(&self) -> Result<i64, ConfError> {
        let value = self.get("verb")?;
        value.as_int().ok_or_else(|| mismatch("verb", "int", &value))
    }

    /// Default capture interface, if one is chosen.
    pub fn iface(&self) -> Result<Option<String>, ConfError> {
        match self.get("iface")? {
            SettingValue::None => Ok(None),
            SettingValue::Str(name) => Ok(Some(name)),
            other => Err(mismatch("iface", "str", &other)),
        }
    }

    /// Unrendered prompt text.
    pub fn prompt(&self) -> Result<String, ConfError> {
        match self.get("prompt")? {
            SettingValue::Str(text) => Ok(text),
            other => Err(mismatch("prompt", "str", &other)),
        }
    }

    pub fn color_theme(&self) -> Result<Rc<dyn ColorTheme>, ConfError> {
        match self.get("color_theme")? {
            SettingValue::Theme(theme) => Ok(theme),
            other => Err(mismatch("color_theme", "theme", &other)),
        }
    }

    /// Raw stored log level, as last written.
    pub fn log_level(&self) -> SettingValue {
        self.get("logLevel").unwrap_or(SettingValue::None)
    }

    /// Whether the crypto backend is usable.
    pub fn crypto_valid(&self) -> bool {
        self.get("crypto_valid").map_or(false, |v| v.is_truthy())
    }

    shared_accessor!(
        /// Layers loaded by the dissectors.
        layers, "layers", Layers, LayersList, "layer list"
    );
    shared_accessor!(
        /// Interactive commands.
        commands, "commands", Commands, CommandsList, "command list"
    );
    shared_accessor!(
        /// Link-type to layer bindings.
        l2types, "l2types", NumericRegistry, NumericTypeRegistry, "numeric registry"
    );
    shared_accessor!(
        /// Ethertype to layer bindings.
        l3types, "l3types", NumericRegistry, NumericTypeRegistry, "numeric registry"
    );
    shared_accessor!(
        /// Fields whose values are resolved to names when shown.
        resolve, "resolve", FieldGroup, FieldGroupRegistry, "field group"
    );
    shared_accessor!(
        /// Fields never shown as enumeration names.
        noenum, "noenum", FieldGroup, FieldGroupRegistry, "field group"
    );
    shared_accessor!(
        /// Fields highlighted when shown.
        emph, "emph", FieldGroup, FieldGroupRegistry, "field group"
    );
    shared_accessor!(
        /// External program paths.
        prog, "prog", Prog, ProgPath, "program paths"
    );

    fn load(&self, key: &str) -> Option<SettingValue> {
        self.instance.borrow().get(key).cloned()
    }
}

fn mismatch(name: &str, expected: &'static str, found: &SettingValue) -> ConfError {
    ConfError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

impl Default for Conf {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeStore<SettingValue> for Conf {
    fn load(&self, key: &str) -> Option<SettingValue> {
        Conf::load(self, key)
    }

    fn store(&self, key: &str, value: SettingValue) {
        self.instance.borrow_mut().insert(key.to_string(), value);
    }
}

impl fmt::Debug for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conf")
            .field("class", &self.class)
            .field("instance", &self.instance.borrow())
            .finish()
    }
}

impl fmt::Display for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

/// Renders `(name, repr)` rows as `name = repr` lines.
///
/// Names are padded to ten columns.  Each repr has its whitespace collapsed
/// and is cut to fit a 76-column line, ending in `...` when cut.
pub fn render_settings<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    rows.into_iter()
        .map(|(name, repr)| {
            let collapsed = repr.split_whitespace().collect::<Vec<_>>().join(" ");
            let budget = DUMP_WIDTH.saturating_sub(name.chars().count().max(NAME_WIDTH));
            let shown = if collapsed.chars().count() > budget {
                let kept: String = collapsed.chars().take(budget.saturating_sub(3)).collect();
                format!("{kept}...")
            } else {
                collapsed
            };
            format!("{:<width$} = {}", name, shown, width = NAME_WIDTH)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
