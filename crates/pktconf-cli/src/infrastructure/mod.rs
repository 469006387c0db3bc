//! Infrastructure layer of the command-line front end.
//!
//! Contains the OS-facing adapters: the config file reader and the global
//! `tracing` subscriber.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pktconf_core`, but MUST NOT be imported by the `application` layer.

pub mod logging;
pub mod storage;
