//! TOML settings overlay for the command-line front end.
//!
//! Read from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\pktconf\config.toml`
//! - Unix:     `$XDG_CONFIG_HOME/pktconf/config.toml`, else `~/.config/pktconf/config.toml`
//! - macOS:    `~/Library/Application Support/pktconf/config.toml`
//!
//! ```toml
//! [cli]
//! log_filter = "info"
//!
//! [settings]
//! iface = "eth0"
//! verb = 1
//! color_theme = "ansi"
//!
//! [settings.prog]
//! tcpdump = "/usr/sbin/tcpdump"
//! ```
//!
//! Every key under `[settings]` names a configuration setting.  Values are
//! applied in [`crate::application::apply_settings`]; this module only reads
//! the file.
//!
//! # Serde default values
//!
//! Both sections are optional.  A missing file behaves like an empty one, so
//! the tool works on first run without any setup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level file contents.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CliConfig {
    #[serde(default)]
    pub cli: CliSection,
    /// Setting name to value, applied in name order.
    #[serde(default)]
    pub settings: toml::Table,
}

/// Behaviour of the front end itself.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CliSection {
    /// `tracing` filter directive used when `RUST_LOG` is unset.  It caps
    /// what `logLevel` can enable; the default caps nothing.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "trace".to_string()
}

impl Default for CliSection {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the default config file, or the defaults when it does not exist.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<CliConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `path`, returning `CliConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<CliConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CliConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// `<base>/pktconf`, where `<base>` is the per-user configuration directory.
fn platform_config_dir() -> Option<PathBuf> {
    user_config_base().map(|base| base.join("pktconf"))
}

#[cfg(windows)]
fn user_config_base() -> Option<PathBuf> {
    env_path("APPDATA")
}

#[cfg(target_os = "macos")]
fn user_config_base() -> Option<PathBuf> {
    env_path("HOME").map(|home| home.join("Library").join("Application Support"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn user_config_base() -> Option<PathBuf> {
    env_path("XDG_CONFIG_HOME").or_else(|| env_path("HOME").map(|home| home.join(".config")))
}

#[cfg(not(any(windows, unix)))]
fn user_config_base() -> Option<PathBuf> {
    None
}

/// Path held by environment variable `var`; unset and empty both count as absent.
#[cfg_attr(not(any(windows, unix)), allow(dead_code))]
fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
