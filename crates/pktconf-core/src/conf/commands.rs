//! Interactive commands and the builtin ones every shell gets.

use std::fmt;
use std::io::{self, Write};

use thiserror::Error;
use tracing::{debug, info};

use super::value::SettingValue;
use super::{Conf, ConfError};

/// Signature of a command body: configuration, arguments, output.
pub type CommandFn = fn(&Conf, &[String], &mut dyn Write) -> Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Conf(#[from] ConfError),

    #[error("usage: {0}")]
    Usage(String),

    #[error("unknown command `{0}`")]
    Unknown(String),
}

/// A named command, listed by `lsc`.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub doc: Option<&'static str>,
    pub run: CommandFn,
}

impl Command {
    pub const fn new(name: &'static str, doc: Option<&'static str>, run: CommandFn) -> Self {
        Self { name, doc, run }
    }

    /// First line of the documentation, or `--` when there is none.
    pub fn summary(&self) -> &'static str {
        self.doc
            .and_then(|doc| doc.lines().next())
            .filter(|line| !line.trim().is_empty())
            .unwrap_or("--")
    }

    pub fn call(&self, conf: &Conf, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        (self.run)(conf, args, out)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// Writes the command listing to `out`.
pub fn lsc(conf: &Conf, out: &mut dyn Write) -> Result<(), CommandError> {
    let commands = conf.commands()?;
    writeln!(out, "{}", commands.borrow())?;
    Ok(())
}

/// Prints the command listing on standard output.
pub fn lsc_stdout(conf: &Conf) -> Result<(), CommandError> {
    lsc(conf, &mut io::stdout().lock())
}

fn run_lsc(conf: &Conf, _args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
    lsc(conf, out)
}

fn run_conf(conf: &Conf, _args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
    writeln!(out, "{}", conf.dump())?;
    Ok(())
}

fn run_layers(conf: &Conf, _args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
    let layers = conf.layers()?;
    writeln!(out, "{}", layers.borrow())?;
    Ok(())
}

fn run_get(conf: &Conf, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
    let [name] = args else {
        return Err(CommandError::Usage("get <name>".into()));
    };
    writeln!(out, "{}", conf.get(name)?)?;
    Ok(())
}

fn run_set(conf: &Conf, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
    let [name, literal] = args else {
        return Err(CommandError::Usage("set <name> <value>".into()));
    };
    if conf.get(name).is_ok_and(|current| current.is_container()) {
        return Err(CommandError::Usage(format!("`{name}` holds a registry and cannot be set from text")));
    }
    let value = SettingValue::parse_literal(literal);
    info!(setting = %name, %value, "setting updated");
    conf.set(name, value)?;
    writeln!(out, "{name} = {}", conf.get(name)?)?;
    Ok(())
}

const BUILTIN_COMMANDS: [Command; 5] = [
    Command::new("conf", Some("Show every setting and its value"), run_conf),
    Command::new("get", Some("Show one setting: get <name>"), run_get),
    Command::new("layers", Some("List the loaded layers"), run_layers),
    Command::new("lsc", Some("List the available commands"), run_lsc),
    Command::new("set", Some("Change one setting: set <name> <value>"), run_set),
];

/// Registers the builtin commands in `commands`.
pub fn register_builtin_commands(conf: &Conf) -> Result<(), ConfError> {
    let commands = conf.commands()?;
    let mut commands = commands.borrow_mut();
    for command in BUILTIN_COMMANDS {
        commands.register(command);
    }
    Ok(())
}

/// Runs the first command registered under `name`.
pub fn run_command(conf: &Conf, name: &str, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
    let command = conf
        .commands()?
        .borrow()
        .find(name)
        .copied()
        .ok_or_else(|| CommandError::Unknown(name.to_string()))?;
    debug!(command = command.name, args = args.len(), "running command");
    command.call(conf, args, out)
}
