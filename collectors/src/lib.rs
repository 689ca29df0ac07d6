//! Debugbar Collectors
//!
//! This crate contains the per-request data collectors of the debug toolbar:
//! a message log and a timer for named measurements. Both accumulate events
//! while a request is handled and summarize them into plain serializable data
//! once the request is over.
//!
//! # Modules
//!
//! - [`models`] - Log entries, measures and message values
//! - [`collectors`] - The collector traits and the two collectors
//! - [`clock`] - Time sources
//! - [`memory`] - Memory usage sources
//! - [`format`] - Duration formatting
//! - [`config`] - Collector configuration
//!
//! # Example
//!
//! ```
//! use collectors::clock::ManualClock;
//! use collectors::collectors::{DataCollector, MeasurementTimer, MessageLog};
//! use std::sync::Arc;
//!
//! let clock = ManualClock::new(100.0);
//! let mut log = MessageLog::new();
//! let mut timer = MeasurementTimer::with_clock(Arc::new(clock.clone()), None);
//!
//! log.add_message("request received");
//! timer.start_measure("db", Some("Database query"));
//! clock.advance(0.25);
//! timer.stop_measure("db").unwrap();
//!
//! assert_eq!(log.collect().count, 1);
//! assert_eq!(timer.collect().measures[0].duration, 0.25);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod collectors;
pub mod config;
pub mod format;
pub mod memory;
pub mod models;

/// Re-export common dependencies for convenience.
pub use serde;
pub use serde_json;
pub use validator;
