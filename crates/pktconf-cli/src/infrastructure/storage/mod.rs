//! Storage infrastructure: the settings overlay file.
//!
//! The `config` sub-module reads the TOML file from the platform-appropriate
//! directory (or an explicit path) and falls back to defaults when it does
//! not exist yet.

pub mod config;
