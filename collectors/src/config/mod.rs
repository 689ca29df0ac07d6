//! Configuration module for the debugbar collectors.
//!
//! This module contains the settings shared by the collectors.

pub mod collector;

pub use collector::{CollectorConfig, ConfigError};
