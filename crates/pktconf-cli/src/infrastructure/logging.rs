//! Logging subsystem: the global `tracing` subscriber and the sink that lets
//! `logLevel` writes move its threshold at runtime.
//!
//! The subscriber stacks two filters.  The `EnvFilter` comes from `RUST_LOG`
//! (or the config file) and is fixed for the whole run; the threshold sits
//! behind a `reload` layer so [`ReloadLogSink`] can swap it.  An event is
//! printed only when both let it through, so the `EnvFilter` acts as a cap.
//! Its default directive, `trace`, caps nothing and leaves `logLevel` in
//! charge of verbosity.

use pktconf_core::{level_filter_for, LogLevelError, LogSink, SettingValue};
use thiserror::Error;
use tracing::{debug, Subscriber};
use tracing_subscriber::filter::{LevelFilter, ParseError};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Handle to the runtime-adjustable threshold.
pub type ThresholdHandle = reload::Handle<LevelFilter, Registry>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("could not install the log subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Installs the global subscriber, writing to stderr.
///
/// `default_filter` is used when `RUST_LOG` is unset or unparsable.  The
/// threshold starts at `WARN`, the level the configuration applies on build.
///
/// # Errors
///
/// Returns [`LoggingError::Filter`] for a malformed `default_filter` and
/// [`LoggingError::Init`] if a global subscriber is already installed.
pub fn init_logging(default_filter: &str) -> Result<ThresholdHandle, LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    let (subscriber, handle) = build_subscriber(env_filter);
    subscriber.try_init()?;
    Ok(handle)
}

/// Assembles the subscriber stack without installing it.
fn build_subscriber(
    env_filter: EnvFilter,
) -> (impl Subscriber + Send + Sync + 'static, ThresholdHandle) {
    let (threshold, handle) = reload::Layer::new(LevelFilter::WARN);
    let subscriber = tracing_subscriber::registry()
        .with(threshold)
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr));
    (subscriber, handle)
}

/// [`LogSink`] that reloads the subscriber's threshold.
#[derive(Debug, Clone)]
pub struct ReloadLogSink {
    handle: ThresholdHandle,
}

impl ReloadLogSink {
    pub fn new(handle: ThresholdHandle) -> Self {
        Self { handle }
    }
}

impl LogSink for ReloadLogSink {
    fn set_level(&self, level: &SettingValue) -> Result<(), LogLevelError> {
        let filter = level_filter_for(level)?;
        self.handle
            .reload(filter)
            .map_err(|e| LogLevelError::Rejected(e.to_string()))?;
        debug!(%level, %filter, "log threshold reloaded");
        Ok(())
    }
}
