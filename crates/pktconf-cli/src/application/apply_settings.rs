//! Applies the `[settings]` table of the config file to a configuration.
//!
//! Each entry goes through [`Conf::set`], so intercepted settings behave
//! exactly as if a user had typed the assignment: `logLevel` moves the
//! logging threshold and `prompt` / `color_theme` re-render the prompt.
//!
//! TOML values map onto setting values as follows:
//!
//! | TOML       | setting                                  |
//! |------------|------------------------------------------|
//! | boolean    | `Bool`                                   |
//! | integer    | `Int`                                    |
//! | string     | `Str` (`color_theme`: a shipped theme)   |
//! | array      | `List`                                   |
//! | table      | `Map` (`prog`: program paths, see below) |
//! | datetime   | `Str`                                    |
//!
//! Floats have no counterpart and are rejected.  Settings that hold a
//! registry cannot be replaced; the `prog` table instead updates individual
//! program paths in place.

use pktconf_core::{theme_by_name, Conf, ConfError, SettingValue};
use thiserror::Error;
use tracing::{debug, info};

/// Error type for settings overlay application.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The TOML value has no setting counterpart.
    #[error("setting `{name}`: {kind} values are not supported")]
    Unsupported { name: String, kind: &'static str },

    /// The setting holds a registry, which a config file cannot replace.
    #[error("setting `{0}` holds a registry and cannot be replaced from the config file")]
    Container(String),

    #[error("unknown color theme `{0}`")]
    UnknownTheme(String),

    #[error(transparent)]
    Conf(#[from] ConfError),
}

/// Converts one TOML value to a setting value.
///
/// # Errors
///
/// Returns [`SettingsError::Unsupported`] for floats, at any depth.
pub fn to_setting_value(name: &str, value: &toml::Value) -> Result<SettingValue, SettingsError> {
    Ok(match value {
        toml::Value::Boolean(b) => SettingValue::Bool(*b),
        toml::Value::Integer(n) => SettingValue::Int(*n),
        toml::Value::String(s) => SettingValue::Str(s.clone()),
        toml::Value::Datetime(dt) => SettingValue::Str(dt.to_string()),
        toml::Value::Array(items) => SettingValue::List(
            items
                .iter()
                .map(|item| to_setting_value(name, item))
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => SettingValue::Map(
            table
                .iter()
                .map(|(k, v)| Ok((k.clone(), to_setting_value(name, v)?)))
                .collect::<Result<_, SettingsError>>()?,
        ),
        toml::Value::Float(_) => {
            return Err(SettingsError::Unsupported {
                name: name.to_string(),
                kind: value.type_str(),
            })
        }
    })
}

/// Applies every entry of `settings` to `conf` and returns how many were
/// applied.
///
/// Stops at the first failing entry; earlier entries stay applied.
///
/// # Errors
///
/// See [`SettingsError`].  Log sink and hook failures arrive as
/// [`SettingsError::Conf`].
pub fn apply_settings(conf: &Conf, settings: &toml::Table) -> Result<usize, SettingsError> {
    for (name, value) in settings {
        match (name.as_str(), value) {
            ("prog", toml::Value::Table(paths)) => apply_prog_paths(conf, paths)?,
            ("color_theme", toml::Value::String(theme)) => {
                let theme =
                    theme_by_name(theme).ok_or_else(|| SettingsError::UnknownTheme(theme.clone()))?;
                conf.set(name, SettingValue::Theme(theme))?;
            }
            _ => {
                if conf.get(name).is_ok_and(|current| current.is_container()) {
                    return Err(SettingsError::Container(name.clone()));
                }
                conf.set(name, to_setting_value(name, value)?)?;
            }
        }
        debug!(setting = %name, "applied from config file");
    }
    if !settings.is_empty() {
        info!(count = settings.len(), "settings overlay applied");
    }
    Ok(settings.len())
}

fn apply_prog_paths(conf: &Conf, paths: &toml::Table) -> Result<(), SettingsError> {
    let prog = conf.prog()?;
    let mut prog = prog.borrow_mut();
    for (program, path) in paths {
        let toml::Value::String(path) = path else {
            return Err(SettingsError::Unsupported {
                name: format!("prog.{program}"),
                kind: path.type_str(),
            });
        };
        prog.set(program, Some(path.clone()))?;
    }
    Ok(())
}
