//! The `logLevel` attribute: a severity threshold forwarded to the logging
//! subsystem.
//!
//! Levels use the toolkit's numeric scale, or the matching names:
//!
//! | value | name       | `tracing` filter |
//! |-------|------------|------------------|
//! | 0     | `NOTSET`   | `TRACE`          |
//! | 10    | `DEBUG`    | `DEBUG`          |
//! | 20    | `INFO`     | `INFO`           |
//! | 30    | `WARNING`  | `WARN`           |
//! | 40    | `ERROR`    | `ERROR`          |
//! | 50    | `CRITICAL` | `ERROR`          |
//!
//! Integers in between round up to the next named level.  Anything above 50
//! silences logging.

use std::cell::Cell;

use thiserror::Error;
use tracing::debug;
use tracing::level_filters::LevelFilter;

use super::AttributeStore;
use crate::conf::value::SettingValue;

/// Level stored right after the configuration is built (`WARNING`).
pub const DEFAULT_LOG_LEVEL: i64 = 30;

/// Errors raised by the logging subsystem when a threshold is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum LogLevelError {
    /// A level name that the logging subsystem does not know.
    #[error("unknown level: {0:?}")]
    UnknownLevel(String),

    /// The value is neither an integer nor a level name.
    #[error("level must be an integer or a level name, not {0}")]
    InvalidType(&'static str),

    /// The subsystem could not apply the new threshold.
    #[error("logging subsystem rejected the level: {0}")]
    Rejected(String),
}

/// The logging subsystem's "set minimum severity" entry point.
#[cfg_attr(test, mockall::automock)]
pub trait LogSink {
    /// Applies `level` as the new threshold.
    fn set_level(&self, level: &SettingValue) -> Result<(), LogLevelError>;
}

/// Maps a toolkit level onto a `tracing` level filter.
///
/// # Errors
///
/// Returns [`LogLevelError::UnknownLevel`] for unknown names and
/// [`LogLevelError::InvalidType`] for values that are not levels at all.
pub fn level_filter_for(level: &SettingValue) -> Result<LevelFilter, LogLevelError> {
    match level {
        SettingValue::Int(n) => Ok(match *n {
            i64::MIN..=0 => LevelFilter::TRACE,
            1..=10 => LevelFilter::DEBUG,
            11..=20 => LevelFilter::INFO,
            21..=30 => LevelFilter::WARN,
            31..=50 => LevelFilter::ERROR,
            _ => LevelFilter::OFF,
        }),
        SettingValue::Str(name) => match name.as_str() {
            "NOTSET" => Ok(LevelFilter::TRACE),
            "DEBUG" => Ok(LevelFilter::DEBUG),
            "INFO" => Ok(LevelFilter::INFO),
            "WARNING" | "WARN" => Ok(LevelFilter::WARN),
            "ERROR" | "CRITICAL" | "FATAL" => Ok(LevelFilter::ERROR),
            other => Err(LogLevelError::UnknownLevel(other.to_string())),
        },
        other => Err(LogLevelError::InvalidType(other.kind())),
    }
}

/// Sink that only remembers the last applied filter.
///
/// Used when no logging subsystem is wired in, and by tests.
#[derive(Debug)]
pub struct LevelFilterSink {
    current: Cell<LevelFilter>,
}

impl LevelFilterSink {
    pub fn new(initial: LevelFilter) -> Self {
        Self {
            current: Cell::new(initial),
        }
    }

    pub fn current(&self) -> LevelFilter {
        self.current.get()
    }
}

impl Default for LevelFilterSink {
    fn default() -> Self {
        Self::new(LevelFilter::WARN)
    }
}

impl LogSink for LevelFilterSink {
    fn set_level(&self, level: &SettingValue) -> Result<(), LogLevelError> {
        let filter = level_filter_for(level)?;
        debug!(%level, %filter, "log threshold updated");
        self.current.set(filter);
        Ok(())
    }
}

/// Descriptor for the log-level attribute.
///
/// Unlike [`super::Interceptor`] there is no lazy default: the configuration
/// stores a level as part of construction.
#[derive(Debug, Clone, Copy)]
pub struct LogLevelControl {
    storage_key: &'static str,
}

impl LogLevelControl {
    pub const fn new(storage_key: &'static str) -> Self {
        Self { storage_key }
    }

    pub fn storage_key(&self) -> &'static str {
        self.storage_key
    }

    /// Returns the raw stored level.
    pub fn get<O: AttributeStore<SettingValue>>(&self, owner: &O) -> Option<SettingValue> {
        owner.load(self.storage_key)
    }

    /// Forwards `level` to `sink`, then stores it on `owner`.
    ///
    /// # Errors
    ///
    /// Returns the sink's error unchanged; nothing is stored in that case.
    pub fn set<O: AttributeStore<SettingValue>>(
        &self,
        owner: &O,
        sink: &dyn LogSink,
        level: SettingValue,
    ) -> Result<(), LogLevelError> {
        sink.set_level(&level)?;
        owner.store(self.storage_key, level);
        Ok(())
    }
}
