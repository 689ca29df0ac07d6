//! Measure data model.
//!
//! A measure is a named, closed interval recorded by the measurement timer.

use crate::format::format_duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which a span is tracked.
///
/// Scoped keys are handed out by the timer itself, so they never clash with
/// names chosen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpanKey {
    /// A caller-chosen name.
    Named(String),
    /// A token generated for a scoped measurement.
    Scoped(u64),
}

impl SpanKey {
    /// Returns the caller-chosen name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Scoped(_) => None,
        }
    }
}

impl fmt::Display for SpanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Scoped(token) => write!(f, "scoped#{token}"),
        }
    }
}

impl From<&str> for SpanKey {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for SpanKey {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// A timed interval.
///
/// All timestamps are seconds since the Unix epoch. `relative_start` is the
/// offset from the request start. `relative_end` is the offset from the
/// request end and stays `None` until the timer has been finalized.
///
/// # Example
///
/// ```
/// use collectors::models::Measure;
///
/// let measure = Measure::new("Render", 101.0, 103.5, 100.0);
/// assert_eq!(measure.duration, 2.5);
/// assert_eq!(measure.relative_start, 1.0);
/// assert_eq!(measure.duration_formatted, "2.5s");
/// assert!(measure.relative_end.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    /// Public label of the measure.
    pub label: String,

    /// Start timestamp.
    pub start: f64,

    /// Start relative to the request start.
    pub relative_start: f64,

    /// End timestamp.
    pub end: f64,

    /// End relative to the request end.
    pub relative_end: Option<f64>,

    /// `end - start`, in seconds.
    pub duration: f64,

    /// Human-readable duration.
    #[serde(rename = "duration_str")]
    pub duration_formatted: String,
}

impl Measure {
    /// Creates a measure against the given request start.
    #[must_use]
    pub fn new(label: impl Into<String>, start: f64, end: f64, request_start: f64) -> Self {
        let duration = end - start;
        Self {
            label: label.into(),
            start,
            relative_start: start - request_start,
            end,
            relative_end: None,
            duration,
            duration_formatted: format_duration(duration),
        }
    }

    /// Sets `relative_end` against the given request end.
    pub fn anchor_end(&mut self, request_end: f64) {
        self.relative_end = Some(self.end - request_end);
    }

    /// Returns true if the measure ends before it starts.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.duration < 0.0
    }
}
