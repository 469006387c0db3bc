//! # pktconf-core
//!
//! Runtime configuration for a packet manipulation toolkit: the settings
//! object every subsystem reads, the registries it carries, and the
//! observable attributes that push changes out to logging and the shell
//! prompt.
//!
//! The crate does no I/O of its own.  The logging subsystem and the prompt are
//! reached through the [`LogSink`] and [`PromptSink`] traits, which the
//! application wires in when it builds the configuration.
//!
//! # Architecture overview
//!
//! - **`domain`** – The things settings talk about: layer types (one per
//!   protocol the dissectors know) and fields (named values owned by one or
//!   more layers).
//!
//! - **`registry`** – Containers held by settings: the code-to-layer maps
//!   used by dissectors (`l2types`, `l3types`), field groups that change how
//!   values are displayed (`resolve`, `noenum`, `emph`), and the ordered
//!   lists of loaded layers and interactive commands.
//!
//! - **`intercept`** – Attributes whose writes have side effects.  Setting
//!   `logLevel` moves the logging threshold; setting `prompt` or
//!   `color_theme` re-renders the prompt.
//!
//! - **`conf`** – The [`Conf`] object itself: about seventy named settings
//!   with class-level defaults, per-instance overrides, a formatted dump, and
//!   the crypto gate.
//!
//! There is no global configuration.  Build one with [`Conf::new`] or
//! [`ConfBuilder`] and pass it by reference.

pub mod conf;
pub mod domain;
pub mod intercept;
pub mod registry;

pub use conf::commands::{
    lsc, lsc_stdout, register_builtin_commands, run_command, Command, CommandError, CommandFn,
};
pub use conf::data::register_builtin_layers;
pub use conf::defaults::ProgPath;
pub use conf::gate::{crypto_validator, is_pypy, DependencyError};
pub use conf::value::{shared, SettingValue, Shared};
pub use conf::{render_settings, ClassAttr, Conf, ConfBuilder, ConfClass, ConfError};
pub use domain::field::{Field, MaybeField};
pub use domain::layer::LayerType;
pub use intercept::log_level::{
    level_filter_for, LevelFilterSink, LogLevelControl, LogLevelError, LogSink, DEFAULT_LOG_LEVEL,
};
pub use intercept::prompt::{
    theme_by_name, AnsiTheme, ColorTheme, NoTheme, PromptError, PromptSink, PromptSlot, DEFAULT_PROMPT,
};
pub use intercept::{AttributeStore, HookArgs, HookError, Interceptor};
pub use registry::{
    CommandsList, FieldGroupKind, FieldGroupRegistry, GroupKey, LayersList, NumericTypeRegistry,
    RegistryError, RegistryKey, RegistryValue,
};
