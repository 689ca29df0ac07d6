//! Measurement timer collector.
//!
//! Tracks the request start, lets callers open and close named spans while
//! the request runs, and on collection closes whatever is still open and
//! stamps the request end.

use super::{DataCollector, Renderable, WidgetDefinition, Widgets};
use crate::clock::{Clock, SystemClock};
use crate::format::format_duration;
use crate::models::{Measure, SpanKey};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the measurement timer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasurementError {
    /// Stopping a span that is not open.
    #[error("Failed stopping measure '{0}' because it hasn't been started")]
    NotStarted(String),
}

/// Summary produced by [`MeasurementTimer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    /// Request start timestamp.
    pub start: f64,
    /// Request end timestamp.
    pub end: f64,
    /// Request duration in seconds.
    pub duration: f64,
    /// Human-readable request duration.
    #[serde(rename = "duration_str")]
    pub duration_formatted: String,
    /// All measures in the order they were first recorded.
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone)]
struct OpenSpan {
    label: Option<String>,
    start: f64,
}

/// Collects timing information about the request and about named spans
/// inside it.
///
/// Each span goes from unstarted to open (`start_measure`) to closed
/// (`stop_measure`, or forcibly at `collect`). Closed spans become
/// [`Measure`]s; reusing a name overwrites the earlier measure in place.
///
/// # Example
///
/// ```
/// use collectors::clock::ManualClock;
/// use collectors::collectors::{DataCollector, MeasurementTimer};
/// use std::sync::Arc;
///
/// let clock = ManualClock::new(101.0);
/// let mut timer = MeasurementTimer::with_clock(Arc::new(clock.clone()), Some(100.0));
///
/// timer.start_measure("x", Some("X"));
/// clock.set(103.5);
/// timer.stop_measure("x").unwrap();
///
/// let measure = timer.get_measure("x").unwrap();
/// assert_eq!(measure.label, "X");
/// assert_eq!(measure.duration, 2.5);
///
/// clock.set(104.0);
/// let data = timer.collect();
/// assert_eq!(data.duration, 4.0);
/// assert_eq!(data.measures[0].relative_end, Some(-0.5));
/// ```
#[derive(Debug)]
pub struct MeasurementTimer {
    clock: Arc<dyn Clock>,
    request_start_time: f64,
    request_end_time: Option<f64>,
    started: Vec<(SpanKey, OpenSpan)>,
    measures: Vec<(SpanKey, Measure)>,
    next_token: u64,
}

impl MeasurementTimer {
    /// Creates a timer on the system clock.
    ///
    /// `request_start_time` defaults to the current time when `None`.
    #[must_use]
    pub fn new(request_start_time: Option<f64>) -> Self {
        Self::with_clock(Arc::new(SystemClock), request_start_time)
    }

    /// Creates a timer on the given clock.
    ///
    /// `request_start_time` defaults to the clock's current time when `None`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>, request_start_time: Option<f64>) -> Self {
        let request_start_time = request_start_time.unwrap_or_else(|| clock.now());
        Self {
            clock,
            request_start_time,
            request_end_time: None,
            started: Vec::new(),
            measures: Vec::new(),
            next_token: 0,
        }
    }

    /// Opens a span under `name`, replacing any span already open under it.
    ///
    /// Without a label, or with an empty one, the measure is labelled with its
    /// name.
    pub fn start_measure(&mut self, name: impl Into<String>, label: Option<&str>) {
        self.start_key(SpanKey::Named(name.into()), label.map(str::to_string));
    }

    /// Closes the span open under `name` and records it as a measure.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError::NotStarted`] if no span is open under
    /// `name`. The timer is left unchanged.
    pub fn stop_measure(&mut self, name: &str) -> Result<(), MeasurementError> {
        let end = self.clock.now();
        self.stop_key(&SpanKey::Named(name.to_string()), end)
    }

    /// Records a measure with explicit timestamps.
    pub fn add_measure(
        &mut self,
        name: impl Into<String>,
        start: f64,
        end: f64,
        label: Option<&str>,
    ) {
        self.insert_measure(
            SpanKey::Named(name.into()),
            label.map(str::to_string),
            start,
            end,
        );
    }

    /// Opens a span that is closed when the returned guard is dropped.
    ///
    /// The guard dereferences to the timer, so further measures can be taken
    /// while it is alive.
    ///
    /// # Example
    ///
    /// ```
    /// use collectors::collectors::MeasurementTimer;
    ///
    /// let mut timer = MeasurementTimer::new(None);
    /// {
    ///     let mut scope = timer.scope("Outer");
    ///     scope.start_measure("inner", None);
    ///     scope.stop_measure("inner").unwrap();
    /// }
    /// assert_eq!(timer.measures().len(), 2);
    /// assert!(timer.open_measures().is_empty());
    /// ```
    pub fn scope(&mut self, label: impl Into<String>) -> MeasureScope<'_> {
        let key = SpanKey::Scoped(self.next_token);
        self.next_token += 1;
        self.start_key(key.clone(), Some(label.into()));
        MeasureScope { timer: self, key }
    }

    /// Runs `operation` inside a span labelled `label`.
    ///
    /// The span is closed however `operation` ends, including by panicking.
    pub fn measure<F, R>(&mut self, label: impl Into<String>, operation: F) -> R
    where
        F: FnOnce(&mut MeasurementTimer) -> R,
    {
        let mut scope = self.scope(label);
        operation(&mut *scope)
    }

    /// Returns all measures with their keys, in the order they were first
    /// recorded.
    #[must_use]
    pub fn measures(&self) -> &[(SpanKey, Measure)] {
        &self.measures
    }

    /// Returns the measure recorded under `name`.
    #[must_use]
    pub fn get_measure(&self, name: &str) -> Option<&Measure> {
        self.measures
            .iter()
            .find(|(key, _)| key.name() == Some(name))
            .map(|(_, measure)| measure)
    }

    /// Returns the keys of the spans that are still open.
    #[must_use]
    pub fn open_measures(&self) -> Vec<&SpanKey> {
        self.started.iter().map(|(key, _)| key).collect()
    }

    /// Returns the request start timestamp.
    #[must_use]
    pub fn request_start_time(&self) -> f64 {
        self.request_start_time
    }

    /// Returns the request end timestamp, set once the timer is collected.
    #[must_use]
    pub fn request_end_time(&self) -> Option<f64> {
        self.request_end_time
    }

    /// Returns the request duration.
    ///
    /// Before collection this is the time elapsed so far.
    #[must_use]
    pub fn request_duration(&self) -> f64 {
        let end = self.request_end_time.unwrap_or_else(|| self.clock.now());
        end - self.request_start_time
    }

    fn start_key(&mut self, key: SpanKey, label: Option<String>) {
        let start = self.clock.now();
        tracing::debug!(measure = %key, start, "Measure started");
        let span = OpenSpan { label, start };
        match self.started.iter_mut().find(|(k, _)| *k == key) {
            Some((_, open)) => *open = span,
            None => self.started.push((key, span)),
        }
    }

    fn stop_key(&mut self, key: &SpanKey, end: f64) -> Result<(), MeasurementError> {
        let Some(index) = self.started.iter().position(|(k, _)| k == key) else {
            return Err(MeasurementError::NotStarted(key.to_string()));
        };
        let (key, span) = self.started.remove(index);
        self.close_span(key, span, end);
        Ok(())
    }

    fn close_span(&mut self, key: SpanKey, span: OpenSpan, end: f64) {
        tracing::debug!(measure = %key, duration = end - span.start, "Measure stopped");
        self.insert_measure(key, span.label, span.start, end);
    }

    /// Empty labels count as missing and fall back to the key.
    fn insert_measure(&mut self, key: SpanKey, label: Option<String>, start: f64, end: f64) {
        let label = label
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| key.to_string());
        let mut measure = Measure::new(label, start, end, self.request_start_time);
        if measure.is_inverted() {
            tracing::warn!(
                measure = %key,
                start,
                end,
                "Measure ends before it starts"
            );
        }
        if let Some(request_end) = self.request_end_time {
            measure.anchor_end(request_end);
        }
        match self.measures.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = measure,
            None => self.measures.push((key, measure)),
        }
    }
}

impl DataCollector for MeasurementTimer {
    type Data = TimelineData;

    fn name(&self) -> &'static str {
        "time"
    }

    /// Finalizes the timer.
    ///
    /// Stamps the request end, closes every open span at that instant and
    /// anchors all measures to it. Calling it again re-stamps the end.
    fn collect(&mut self) -> TimelineData {
        let end = self.clock.now();
        if let Some(previous) = self.request_end_time.replace(end) {
            tracing::debug!(previous, end, "Timer finalized again, request end re-stamped");
        }

        let open = std::mem::take(&mut self.started);
        let force_closed = open.len();
        for (key, span) in open {
            self.close_span(key, span, end);
        }

        for (_, measure) in &mut self.measures {
            measure.anchor_end(end);
        }

        let duration = end - self.request_start_time;
        tracing::debug!(
            duration,
            measures = self.measures.len(),
            force_closed,
            "Timer finalized"
        );

        TimelineData {
            start: self.request_start_time,
            end,
            duration,
            duration_formatted: format_duration(duration),
            measures: self
                .measures
                .iter()
                .map(|(_, measure)| measure.clone())
                .collect(),
        }
    }
}

impl Renderable for MeasurementTimer {
    fn widgets(&self) -> Widgets {
        Widgets::from([
            (
                "time".to_string(),
                WidgetDefinition::new("time.duration_str", "'0ms'")
                    .with_icon("time")
                    .with_tooltip("Request Duration"),
            ),
            (
                "timeline".to_string(),
                WidgetDefinition::new("time", "{}")
                    .with_widget("PhpDebugBar.Widgets.TimelineWidget"),
            ),
        ])
    }
}

/// Guard returned by [`MeasurementTimer::scope`].
///
/// Closes its span when dropped. Dereferences to the timer.
#[derive(Debug)]
pub struct MeasureScope<'a> {
    timer: &'a mut MeasurementTimer,
    key: SpanKey,
}

impl Deref for MeasureScope<'_> {
    type Target = MeasurementTimer;

    fn deref(&self) -> &MeasurementTimer {
        self.timer
    }
}

impl DerefMut for MeasureScope<'_> {
    fn deref_mut(&mut self) -> &mut MeasurementTimer {
        self.timer
    }
}

impl Drop for MeasureScope<'_> {
    fn drop(&mut self) {
        let end = self.timer.clock.now();
        // The span may already be closed if the timer was collected inside
        // the scope.
        if let Err(err) = self.timer.stop_key(&self.key, end) {
            tracing::warn!(measure = %self.key, error = %err, "Scoped measure was already closed");
        }
    }
}
