//! Prompt refresh: `prompt` and `color_theme` writes re-render the interactive
//! prompt.
//!
//! The theme engine and the shell that displays the prompt are external
//! collaborators, reached through [`ColorTheme`] and [`PromptSink`].  A failed
//! refresh never fails the write that triggered it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use super::{HookArgs, HookError};
use crate::conf::value::SettingValue;
use crate::conf::Conf;

/// Prompt used until someone sets another one.
pub const DEFAULT_PROMPT: &str = ">>> ";

/// Errors produced while re-rendering the prompt.
#[derive(Debug, Error, PartialEq)]
pub enum PromptError {
    /// The theme could not render the prompt text.
    #[error("theme `{theme}` cannot render the prompt: {reason}")]
    Render { theme: String, reason: String },

    /// `color_theme` holds something that is not a theme.
    #[error("color_theme holds {0}, not a theme")]
    NotATheme(&'static str),

    /// `prompt` holds something that is not text.
    #[error("prompt holds {0}, not text")]
    NotText(&'static str),

    /// The prompt sink refused the rendered prompt.
    #[error("prompt sink unavailable: {0}")]
    Unavailable(String),
}

/// A color theme as seen by the configuration: something that can style the
/// prompt.
pub trait ColorTheme: fmt::Debug {
    fn name(&self) -> &str;

    /// Returns `text` styled for this theme.
    fn prompt(&self, text: &str) -> Result<String, PromptError>;
}

/// Theme that leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTheme;

impl ColorTheme for NoTheme {
    fn name(&self) -> &str {
        "NoTheme"
    }

    fn prompt(&self, text: &str) -> Result<String, PromptError> {
        Ok(text.to_string())
    }
}

/// Theme that wraps the prompt in one ANSI SGR color.
#[derive(Debug, Clone)]
pub struct AnsiTheme {
    name: String,
    sgr: String,
}

impl AnsiTheme {
    /// `sgr` is the parameter list of the escape, e.g. `"1;34"` for bold blue.
    pub fn new(name: impl Into<String>, sgr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sgr: sgr.into(),
        }
    }
}

impl ColorTheme for AnsiTheme {
    fn name(&self) -> &str {
        &self.name
    }

    fn prompt(&self, text: &str) -> Result<String, PromptError> {
        Ok(format!("\x1b[{}m{text}\x1b[0m", self.sgr))
    }
}

/// Looks up a shipped theme by name (case-insensitive).
pub fn theme_by_name(name: &str) -> Option<Rc<dyn ColorTheme>> {
    match name.to_ascii_lowercase().as_str() {
        "none" | "notheme" => Some(Rc::new(NoTheme)),
        "ansi" | "default" => Some(Rc::new(AnsiTheme::new("ansi", "1;34"))),
        _ => None,
    }
}

/// Where the rendered prompt goes (the shell's primary prompt).
#[cfg_attr(test, mockall::automock)]
pub trait PromptSink {
    fn set_prompt(&self, rendered: &str) -> Result<(), PromptError>;
}

/// Sink that keeps the last rendered prompt in memory.
#[derive(Debug, Default)]
pub struct PromptSlot {
    rendered: RefCell<Option<String>>,
}

impl PromptSlot {
    pub fn current(&self) -> Option<String> {
        self.rendered.borrow().clone()
    }
}

impl PromptSink for PromptSlot {
    fn set_prompt(&self, rendered: &str) -> Result<(), PromptError> {
        *self.rendered.borrow_mut() = Some(rendered.to_string());
        Ok(())
    }
}

/// Write hook for `prompt` and `color_theme`.
///
/// Renders the current prompt through the current theme and hands it to the
/// configuration's prompt sink.  Every failure is logged and swallowed.
pub fn prompt_changer(
    conf: &Conf,
    attribute: &str,
    _value: &SettingValue,
    _args: &HookArgs<SettingValue>,
) -> Result<(), HookError> {
    match render_prompt(conf) {
        Ok(rendered) => {
            if let Err(e) = conf.prompt_sink().set_prompt(&rendered) {
                debug!(attribute, error = %e, "prompt sink rejected update");
            }
        }
        Err(e) => debug!(attribute, error = %e, "prompt not re-rendered"),
    }
    Ok(())
}

fn render_prompt(conf: &Conf) -> Result<String, PromptError> {
    let theme = match conf.get("color_theme") {
        Ok(SettingValue::Theme(theme)) => theme,
        Ok(other) => return Err(PromptError::NotATheme(other.kind())),
        Err(e) => return Err(PromptError::Unavailable(e.to_string())),
    };
    match conf.get("prompt") {
        Ok(SettingValue::Str(text)) => theme.prompt(&text),
        Ok(other) => Err(PromptError::NotText(other.kind())),
        Err(e) => Err(PromptError::Unavailable(e.to_string())),
    }
}
