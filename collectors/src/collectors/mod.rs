//! Collector traits and implementations.
//!
//! A collector accumulates observations while a request is handled and
//! summarizes them on demand. The toolbar serializes each summary under the
//! collector's name and uses the widget declarations to decide how to show it.

pub mod messages;
pub mod time;

pub use messages::{MessageLog, MessagesData};
pub use time::{MeasureScope, MeasurementError, MeasurementTimer, TimelineData};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Widget declarations keyed by widget name.
pub type Widgets = BTreeMap<String, WidgetDefinition>;

/// A component that accumulates data during a request.
pub trait DataCollector {
    /// The summary produced by [`DataCollector::collect`].
    type Data: Serialize;

    /// Returns the name the summary is published under.
    fn name(&self) -> &'static str;

    /// Summarizes the accumulated state.
    fn collect(&mut self) -> Self::Data;
}

/// A collector that declares how its data should be displayed.
pub trait Renderable {
    /// Returns the widgets this collector contributes.
    fn widgets(&self) -> Widgets;
}

/// How the rendering layer should display one piece of collected data.
///
/// `map` is a dotted path into the collected data, and `default` is the
/// literal the renderer falls back to when that path is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDefinition {
    /// Frontend widget class, absent for badges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,

    /// Icon shown next to the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Tooltip text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    /// Path of the data to display.
    pub map: String,

    /// Fallback literal.
    pub default: String,
}

impl WidgetDefinition {
    /// Creates a definition without a widget class.
    #[must_use]
    pub fn new(map: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            widget: None,
            icon: None,
            tooltip: None,
            map: map.into(),
            default: default.into(),
        }
    }

    /// Sets the widget class.
    #[must_use]
    pub fn with_widget(mut self, widget: impl Into<String>) -> Self {
        self.widget = Some(widget.into());
        self
    }

    /// Sets the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the tooltip.
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}
