//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file from the
//! platform-appropriate directory, falls back to defaults on first run, and
//! writes the device address and password back after a successful connect.

pub mod config;
