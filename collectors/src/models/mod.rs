//! Data models for the debugbar collectors.
//!
//! This module contains the structures the collectors accumulate and hand out:
//! log entries with their message values, and timed measures.

pub mod measure;
pub mod message;

pub use measure::{Measure, SpanKey};
pub use message::{LogEntry, MessageValue, Primitive, Severity};
