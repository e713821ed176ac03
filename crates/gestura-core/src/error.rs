//! Error types for gestura-core.
//!
//! Recognition itself never fails; these cover loading options and traces and
//! listener rejections.

use thiserror::Error;

/// Errors from loading or validating [`GestureOptions`](crate::GestureOptions).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading an options file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML.
    #[error("invalid TOML options: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed YAML.
    #[error("invalid YAML options: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Malformed JSON.
    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension not recognised.
    #[error("unsupported options format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Raised by a [`GestureSink`](crate::GestureSink) that rejects an event.
///
/// Never propagated back into recognizers; the emitter logs and drops it.
#[derive(Debug, Error)]
#[error("listener rejected {event}: {reason}")]
pub struct SinkError {
    /// Event name, e.g. `gesture:tap`
    pub event: &'static str,
    /// Listener-supplied reason
    pub reason: String,
}

impl SinkError {
    /// Create a sink error for an event name.
    pub fn new(event: &'static str, reason: impl Into<String>) -> Self {
        Self {
            event,
            reason: reason.into(),
        }
    }
}

/// Errors from loading a replay trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// IO error while reading a trace file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON trace.
    #[error("invalid JSON trace: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML trace.
    #[error("invalid YAML trace: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// File extension not recognised.
    #[error("unsupported trace format: {0}")]
    UnsupportedFormat(String),

    /// Trace options failed validation.
    #[error("trace options: {0}")]
    Options(#[from] ConfigError),
}
