//! Message log collector.
//!
//! Records arbitrary application messages with a label, a timestamp and a
//! memory usage snapshot, in the order they were logged.

use super::{DataCollector, Renderable, WidgetDefinition, Widgets};
use crate::clock::{Clock, SystemClock};
use crate::config::CollectorConfig;
use crate::memory::{FixedMemory, MemorySource, ProcessMemory};
use crate::models::{LogEntry, MessageValue, Severity};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summary produced by [`MessageLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesData {
    /// Number of messages.
    pub count: usize,
    /// All messages in logging order.
    pub messages: Vec<LogEntry>,
}

/// Collects log messages for the current request.
///
/// # Example
///
/// ```
/// use collectors::collectors::{DataCollector, MessageLog};
/// use collectors::models::Severity;
/// use serde_json::json;
///
/// let mut log = MessageLog::new();
/// log.add_message("cache miss");
/// log.log(Severity::Warning, json!({"key": "user:1"}));
///
/// let data = log.collect();
/// assert_eq!(data.count, 2);
/// assert_eq!(data.messages[0].label, "info");
/// assert!(data.messages[0].is_text);
/// assert_eq!(data.messages[1].label, "warning");
/// assert!(!data.messages[1].is_text);
/// ```
#[derive(Debug)]
pub struct MessageLog {
    clock: Arc<dyn Clock>,
    memory: Arc<dyn MemorySource>,
    default_label: String,
    messages: Vec<LogEntry>,
}

impl MessageLog {
    /// Creates an empty log with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CollectorConfig::default())
    }

    /// Creates an empty log from a configuration.
    #[must_use]
    pub fn with_config(config: &CollectorConfig) -> Self {
        let memory: Arc<dyn MemorySource> = if config.capture_memory {
            Arc::new(ProcessMemory)
        } else {
            Arc::new(FixedMemory(0))
        };
        Self {
            clock: Arc::new(SystemClock),
            memory,
            default_label: config.default_label.clone(),
            messages: Vec::new(),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the memory source.
    #[must_use]
    pub fn with_memory_source(mut self, memory: Arc<dyn MemorySource>) -> Self {
        self.memory = memory;
        self
    }

    /// Logs a message under an arbitrary level.
    ///
    /// The level is used as the label verbatim.
    pub fn log(&mut self, level: impl Into<String>, message: impl Into<MessageValue>) {
        self.add_message_with_label(message, level);
    }

    /// Adds a message under the default label.
    pub fn add_message(&mut self, message: impl Into<MessageValue>) {
        let label = self.default_label.clone();
        self.add_message_with_label(message, label);
    }

    /// Adds a message under the given label.
    pub fn add_message_with_label(
        &mut self,
        message: impl Into<MessageValue>,
        label: impl Into<String>,
    ) {
        let message = message.into();
        let entry = LogEntry::new(
            &message,
            label,
            self.clock.now(),
            self.memory.current_usage(),
        );
        tracing::trace!(label = %entry.label, is_text = entry.is_text, "Message logged");
        self.messages.push(entry);
    }

    /// Logs at emergency level.
    pub fn emergency(&mut self, message: impl Into<MessageValue>) {
        self.log(Severity::Emergency, message);
    }

    /// Logs at alert level.
    pub fn alert(&mut self, message: impl Into<MessageValue>) {
        self.log(Severity::Alert, message);
    }

    /// Logs at critical level.
    pub fn critical(&mut self, message: impl Into<MessageValue>) {
        self.log(Severity::Critical, message);
    }

    /// Logs at error level.
    pub fn error(&mut self, message: impl Into<MessageValue>) {
        self.log(Severity::Error, message);
    }

    /// Logs at warning level.
    pub fn warning(&mut self, message: impl Into<MessageValue>) {
        self.log(Severity::Warning, message);
    }

    /// Logs at notice level.
    pub fn notice(&mut self, message: impl Into<MessageValue>) {
        self.log(Severity::Notice, message);
    }

    /// Logs at info level.
    pub fn info(&mut self, message: impl Into<MessageValue>) {
        self.log(Severity::Info, message);
    }

    /// Logs at debug level.
    pub fn debug(&mut self, message: impl Into<MessageValue>) {
        self.log(Severity::Debug, message);
    }

    /// Returns all messages in logging order.
    #[must_use]
    pub fn messages(&self) -> &[LogEntry] {
        &self.messages
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DataCollector for MessageLog {
    type Data = MessagesData;

    fn name(&self) -> &'static str {
        "messages"
    }

    fn collect(&mut self) -> MessagesData {
        MessagesData {
            count: self.messages.len(),
            messages: self.messages.clone(),
        }
    }
}

impl Renderable for MessageLog {
    fn widgets(&self) -> Widgets {
        Widgets::from([
            (
                "messages".to_string(),
                WidgetDefinition::new("messages.messages", "[]")
                    .with_widget("PhpDebugBar.Widgets.MessagesWidget"),
            ),
            (
                "messages:badge".to_string(),
                WidgetDefinition::new("messages.count", "null"),
            ),
        ])
    }
}
