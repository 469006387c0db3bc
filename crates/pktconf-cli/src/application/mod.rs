//! Application layer of the command-line front end.
//!
//! Use cases here work on an already-built [`pktconf_core::Conf`] and never
//! touch the file system or the global subscriber; those live in
//! [`crate::infrastructure`].
//!
//! - **`apply_settings`** – Applies the `[settings]` table of the config file
//!   to the configuration, through the same write path an interactive user
//!   takes.

pub mod apply_settings;
