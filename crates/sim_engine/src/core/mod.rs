//! Core engine services
//!
//! Holds the unified configuration system. Everything here is independent of
//! the worker thread and safe to use from the host side.

pub mod config;

pub use config::{Config, ConfigError, SimConfig, WeaponRanges};
