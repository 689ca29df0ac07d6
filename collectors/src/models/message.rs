//! Message data model.
//!
//! Defines the `LogEntry` recorded by the message log and the `MessageValue`
//! variants that can be logged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard log severities.
///
/// The message log accepts any label string; these are the common ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// System is unusable.
    Emergency,
    /// Action must be taken immediately.
    Alert,
    /// Critical conditions.
    Critical,
    /// Runtime errors.
    Error,
    /// Exceptional occurrences that are not errors.
    Warning,
    /// Normal but significant events.
    Notice,
    /// Interesting events.
    #[default]
    Info,
    /// Detailed debug information.
    Debug,
}

impl Severity {
    /// Returns the label used for this severity.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Alert => "alert",
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

/// A scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Anything that can be written to the message log.
///
/// Plain text is kept as is. Every other variant is turned into text by
/// [`MessageValue::describe`], which never fails.
///
/// # Example
///
/// ```
/// use collectors::models::MessageValue;
/// use serde_json::json;
///
/// assert!(MessageValue::from("hello").is_text());
/// assert_eq!(MessageValue::from(42).describe(), "42");
///
/// let structured = MessageValue::from(json!({"user": "ada"}));
/// assert!(!structured.is_text());
/// assert!(structured.describe().contains("\"user\": \"ada\""));
///
/// let opaque = MessageValue::opaque(&Some(3));
/// assert_eq!(opaque.describe(), "Some(\n    3,\n)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum MessageValue {
    /// A plain string.
    Text(String),
    /// A scalar.
    Primitive(Primitive),
    /// A tree of arrays, maps and scalars.
    Structured(serde_json::Value),
    /// Any other value, pre-rendered through its `Debug` implementation.
    Opaque {
        /// Rust type name of the original value.
        type_name: &'static str,
        /// The `Debug` rendering.
        rendered: String,
    },
}

impl MessageValue {
    /// Builds a structured value from anything serializable.
    ///
    /// Values that fail to serialize are kept as opaque values named after
    /// their type.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::from(value),
            Err(err) => Self::Opaque {
                type_name: std::any::type_name::<T>(),
                rendered: format!("<unserializable: {err}>"),
            },
        }
    }

    /// Builds an opaque value from its `Debug` rendering.
    pub fn opaque<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::Opaque {
            type_name: std::any::type_name::<T>(),
            rendered: format!("{value:#?}"),
        }
    }

    /// Returns true if the value was plain text.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Renders the value as display text.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Primitive(primitive) => primitive.to_string(),
            Self::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Opaque {
                type_name,
                rendered,
            } => {
                if rendered.is_empty() {
                    format!("<{type_name}>")
                } else {
                    rendered.clone()
                }
            }
        }
    }
}

impl From<&str> for MessageValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for MessageValue {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<bool> for MessageValue {
    fn from(value: bool) -> Self {
        Self::Primitive(Primitive::Bool(value))
    }
}

impl From<i32> for MessageValue {
    fn from(value: i32) -> Self {
        Self::Primitive(Primitive::Int(i64::from(value)))
    }
}

impl From<i64> for MessageValue {
    fn from(value: i64) -> Self {
        Self::Primitive(Primitive::Int(value))
    }
}

impl From<u32> for MessageValue {
    fn from(value: u32) -> Self {
        Self::Primitive(Primitive::UInt(u64::from(value)))
    }
}

impl From<u64> for MessageValue {
    fn from(value: u64) -> Self {
        Self::Primitive(Primitive::UInt(value))
    }
}

impl From<usize> for MessageValue {
    fn from(value: usize) -> Self {
        Self::Primitive(Primitive::UInt(value as u64))
    }
}

impl From<f64> for MessageValue {
    fn from(value: f64) -> Self {
        Self::Primitive(Primitive::Float(value))
    }
}

impl From<Primitive> for MessageValue {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl<T: Into<MessageValue>> From<Option<T>> for MessageValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Primitive(Primitive::Null), Into::into)
    }
}

impl From<serde_json::Value> for MessageValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(text) => Self::Text(text),
            Value::Null => Self::Primitive(Primitive::Null),
            Value::Bool(b) => Self::Primitive(Primitive::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Primitive(Primitive::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Self::Primitive(Primitive::UInt(u))
                } else {
                    Self::Primitive(Primitive::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            structured @ (Value::Array(_) | Value::Object(_)) => Self::Structured(structured),
        }
    }
}

/// A single message recorded by the message log.
///
/// Serializes with the field names the toolbar frontend expects
/// (`message`, `is_string`, `label`, `time`, `memory_usage`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Display text of the message.
    #[serde(rename = "message")]
    pub text: String,

    /// Whether the message was logged as plain text.
    #[serde(rename = "is_string")]
    pub is_text: bool,

    /// Severity or category label.
    pub label: String,

    /// Wall-clock seconds at capture.
    #[serde(rename = "time")]
    pub timestamp: f64,

    /// Process memory usage at capture, in bytes.
    #[serde(rename = "memory_usage")]
    pub memory_bytes: u64,
}

impl LogEntry {
    /// Creates an entry from a message value.
    #[must_use]
    pub fn new(
        message: &MessageValue,
        label: impl Into<String>,
        timestamp: f64,
        memory_bytes: u64,
    ) -> Self {
        Self {
            text: message.describe(),
            is_text: message.is_text(),
            label: label.into(),
            timestamp,
            memory_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Connection {
        id: u32,
    }

    struct EmptyDebug;

    impl fmt::Debug for EmptyDebug {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    #[test]
    fn test_text_passes_through() {
        let value = MessageValue::from("plain message");
        assert!(value.is_text());
        assert_eq!(value.describe(), "plain message");

        let value = MessageValue::from(String::new());
        assert!(value.is_text());
        assert_eq!(value.describe(), "");
    }

    #[test]
    fn test_primitives_describe() {
        assert_eq!(MessageValue::from(true).describe(), "true");
        assert_eq!(MessageValue::from(false).describe(), "false");
        assert_eq!(MessageValue::from(-7).describe(), "-7");
        assert_eq!(MessageValue::from(7_u64).describe(), "7");
        assert_eq!(MessageValue::from(1.5).describe(), "1.5");
        assert_eq!(MessageValue::from(None::<i32>).describe(), "null");
        assert!(!MessageValue::from(0).is_text());
    }

    #[test]
    fn test_json_string_is_text() {
        let value = MessageValue::from(json!("from json"));
        assert!(value.is_text());
        assert_eq!(value.describe(), "from json");
    }

    #[test]
    fn test_json_scalars_are_primitives() {
        assert_eq!(
            MessageValue::from(json!(12)),
            MessageValue::Primitive(Primitive::Int(12))
        );
        assert_eq!(
            MessageValue::from(json!(u64::MAX)),
            MessageValue::Primitive(Primitive::UInt(u64::MAX))
        );
        assert_eq!(
            MessageValue::from(json!(null)),
            MessageValue::Primitive(Primitive::Null)
        );
    }

    #[test]
    fn test_structured_describe_is_pretty() {
        let value = MessageValue::from(json!({"id": 1, "tags": ["a", "b"]}));
        assert!(!value.is_text());

        let text = value.describe();
        assert!(text.contains('\n'));
        assert!(text.contains("\"id\": 1"));
        assert!(text.contains("\"a\""));
    }

    #[test]
    fn test_structured_from_serialize() {
        let value = MessageValue::structured(&vec![1, 2, 3]);
        assert!(matches!(value, MessageValue::Structured(_)));
        assert_eq!(value.describe(), "[\n  1,\n  2,\n  3\n]");
    }

    #[test]
    fn test_structured_falls_back_when_unserializable() {
        use std::collections::HashMap;

        // JSON object keys must be strings
        let map: HashMap<(i32, i32), i32> = HashMap::from([((1, 2), 3)]);
        let value = MessageValue::structured(&map);

        assert!(matches!(value, MessageValue::Opaque { .. }));
        assert!(!value.describe().is_empty());
    }

    #[test]
    fn test_opaque_uses_debug() {
        let value = MessageValue::opaque(&Connection { id: 9 });
        assert!(!value.is_text());
        assert!(value.describe().contains("Connection"));
        assert!(value.describe().contains("id: 9"));
    }

    #[test]
    fn test_opaque_empty_debug_falls_back_to_type_name() {
        let text = MessageValue::opaque(&EmptyDebug).describe();
        assert!(text.contains("EmptyDebug"));
    }

    #[test]
    fn test_log_entry_serialization_field_names() {
        let entry = LogEntry::new(&MessageValue::from("hi"), "warning", 12.5, 2048);
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            json!({
                "message": "hi",
                "is_string": true,
                "label": "warning",
                "time": 12.5,
                "memory_usage": 2048
            })
        );
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::default(), Severity::Info);
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(String::from(Severity::Emergency), "emergency");
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
    }
}
