//! `pktconf` entry point.
//!
//! Loads the settings overlay, installs the logging subsystem, builds the
//! configuration and runs one command against it.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config file       -- [cli] and [settings] sections
//!  └─ init_logging()         -- EnvFilter + reloadable threshold
//!  └─ ConfBuilder::build()   -- wired to ReloadLogSink and a PromptSlot
//!       ├─ builtin commands  (conf, get, layers, lsc, set)
//!       ├─ builtin layers    (unless --no-builtin-layers)
//!       └─ apply_settings()
//!  └─ run_command()          -- output on stdout
//! ```

use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use pktconf_cli::application::apply_settings::apply_settings;
use pktconf_cli::infrastructure::logging::{init_logging, ReloadLogSink};
use pktconf_cli::infrastructure::storage::config::{
    load_config, load_config_from, CliConfig, ConfigError,
};
use pktconf_core::{
    register_builtin_commands, register_builtin_layers, run_command, ConfBuilder, PromptSlot,
};

/// Inspect and change the packet toolkit configuration.
#[derive(Debug, Parser)]
#[command(name = "pktconf", version, about)]
struct Cli {
    /// Settings file to load instead of the platform default.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start with empty layer registries.
    #[arg(long)]
    no_builtin_layers: bool,

    /// Command to run (see `lsc`).
    #[arg(default_value = "conf")]
    command: String,

    /// Arguments passed to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn load(cli: &Cli) -> Result<CliConfig, ConfigError> {
    match &cli.config {
        Some(path) => load_config_from(path),
        None => match load_config() {
            Err(ConfigError::NoPlatformConfigDir) => Ok(CliConfig::default()),
            other => other,
        },
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load(&cli).context("loading settings file")?;

    let threshold = init_logging(&config.cli.log_filter)?;
    info!(command = %cli.command, "pktconf starting");

    let conf = ConfBuilder::new()
        .log_sink(Rc::new(ReloadLogSink::new(threshold)))
        .prompt_sink(Rc::new(PromptSlot::default()))
        .build()?;
    register_builtin_commands(&conf)?;
    if !cli.no_builtin_layers {
        register_builtin_layers(&conf)?;
    }
    let applied = apply_settings(&conf, &config.settings).context("applying [settings]")?;
    debug!(applied, "configuration ready");

    let mut out = io::stdout().lock();
    run_command(&conf, &cli.command, &cli.args, &mut out)
        .with_context(|| format!("running `{}`", cli.command))?;
    Ok(())
}
