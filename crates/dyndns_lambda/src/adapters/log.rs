use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl LogRecord {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            error: None,
            details: None,
        }
    }
}

pub trait LogSink {
    fn emit(&self, record: LogRecord);
}

/// Production sink: one JSON object per line on stderr, tagged with the
/// emitting component and an RFC 3339 timestamp.
pub struct JsonLineSink {
    component: &'static str,
}

impl JsonLineSink {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

impl LogSink for JsonLineSink {
    fn emit(&self, record: LogRecord) {
        let mut line = json!({
            "component": self.component,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        let fields = serde_json::to_value(&record)
            .expect("serialization of a log record should not fail");
        if let (Some(line_map), Some(field_map)) = (line.as_object_mut(), fields.as_object()) {
            for (key, value) in field_map {
                line_map.insert(key.clone(), value.clone());
            }
        }
        eprintln!("{line}");
    }
}
