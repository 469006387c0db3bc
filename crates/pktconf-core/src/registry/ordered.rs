//! Append-only registries with a two-column listing: loaded layers and
//! interactive commands.

use std::fmt;

use crate::conf::commands::Command;
use crate::domain::layer::LayerType;

/// Width of the name column in listings.
const NAME_COLUMN: usize = 20;

/// An item that can be shown in a registry listing.
pub trait RegistryEntry {
    /// Left column.
    fn entry_name(&self) -> &str;
    /// Right column.
    fn entry_summary(&self) -> &str;
}

impl RegistryEntry for LayerType {
    fn entry_name(&self) -> &str {
        self.class_name()
    }

    fn entry_summary(&self) -> &str {
        self.name()
    }
}

impl RegistryEntry for Command {
    fn entry_name(&self) -> &str {
        self.name
    }

    fn entry_summary(&self) -> &str {
        self.summary()
    }
}

/// Insertion-ordered list; duplicates are kept and nothing is ever removed.
#[derive(Debug, Clone)]
pub struct OrderedRegistry<T> {
    entries: Vec<T>,
    sort_listing: bool,
}

/// Layers loaded by the dissectors, listed in load order.
pub type LayersList = OrderedRegistry<LayerType>;

/// Interactive commands, listed alphabetically.
pub type CommandsList = OrderedRegistry<Command>;

impl<T> OrderedRegistry<T> {
    fn with_listing_order(sort_listing: bool) -> Self {
        Self {
            entries: Vec::new(),
            sort_listing,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: RegistryEntry> OrderedRegistry<T> {
    /// First entry registered under `name`.
    pub fn find(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.entry_name() == name)
    }
}

impl OrderedRegistry<LayerType> {
    pub fn new() -> Self {
        Self::with_listing_order(false)
    }

    /// Appends `layer`.
    pub fn register(&mut self, layer: LayerType) {
        self.entries.push(layer);
    }
}

impl Default for OrderedRegistry<LayerType> {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedRegistry<Command> {
    pub fn new() -> Self {
        Self::with_listing_order(true)
    }

    /// Appends `command` and hands it back, so a definition can be registered
    /// inline: `let ls = commands.register(Command::new(...));`.
    pub fn register(&mut self, command: Command) -> Command {
        self.entries.push(command);
        command
    }
}

impl Default for OrderedRegistry<Command> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RegistryEntry> fmt::Display for OrderedRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows: Vec<&T> = self.entries.iter().collect();
        if self.sort_listing {
            rows.sort_by(|a, b| a.entry_name().cmp(b.entry_name()));
        }
        let lines: Vec<String> = rows
            .into_iter()
            .map(|e| {
                format!(
                    "{:<width$}: {}",
                    e.entry_name(),
                    e.entry_summary(),
                    width = NAME_COLUMN
                )
            })
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::commands::{CommandError, CommandFn};
    use crate::conf::Conf;
    use crate::domain::layer::builtin::{ETHER, IP, TCP};
    use std::io::Write;

    fn noop(_: &Conf, _: &[String], _: &mut dyn Write) -> Result<(), CommandError> {
        Ok(())
    }

    const NOOP: CommandFn = noop;

    #[test]
    fn test_layers_keep_insertion_order_and_duplicates() {
        // Arrange
        let mut layers = LayersList::new();

        // Act
        layers.register(TCP);
        layers.register(ETHER);
        layers.register(TCP);

        // Assert
        let names: Vec<&str> = layers.iter().map(|l| l.class_name()).collect();
        assert_eq!(names, ["TCP", "Ether", "TCP"]);
    }

    #[test]
    fn test_layers_listing_shows_class_and_long_name_in_load_order() {
        let mut layers = LayersList::new();
        layers.register(IP);
        layers.register(ETHER);

        let expected = format!("{:<20}: IP\n{:<20}: Ethernet", "IP", "Ether");
        assert_eq!(layers.to_string(), expected);
    }

    #[test]
    fn test_command_register_returns_the_command() {
        let mut commands = CommandsList::new();
        let registered = commands.register(Command::new("ls", Some("List layers"), NOOP));
        assert_eq!(registered.name, "ls");
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_commands_listing_is_sorted_and_uses_first_doc_line() {
        // Arrange
        let mut commands = CommandsList::new();
        commands.register(Command::new("sniff", Some("Sniff packets\nmore detail"), NOOP));
        commands.register(Command::new("arping", None, NOOP));

        // Act
        let listing = commands.to_string();

        // Assert
        let expected = format!("{:<20}: --\n{:<20}: Sniff packets", "arping", "sniff");
        assert_eq!(listing, expected);
    }

    #[test]
    fn test_find_returns_first_registration() {
        let mut commands = CommandsList::new();
        commands.register(Command::new("ls", Some("first"), NOOP));
        commands.register(Command::new("ls", Some("second"), NOOP));
        assert_eq!(commands.find("ls").map(Command::summary), Some("first"));
        assert!(commands.find("missing").is_none());
    }

    #[test]
    fn test_empty_listing_is_empty_string() {
        assert_eq!(LayersList::new().to_string(), "");
    }
}
