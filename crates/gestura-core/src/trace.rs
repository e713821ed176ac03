//! Recorded input traces.
//!
//! A trace is a surface, a set of options and a list of timestamped inputs.
//! Replaying it through a fresh processor gives the exact gesture stream a
//! host would have seen, which makes traces useful as fixtures and bug
//! reports.
//!
//! ```json
//! {
//!   "surface": { "x": 0, "y": 0, "width": 320, "height": 240 },
//!   "options": { "suppressTapOnLongPress": false },
//!   "events": [
//!     { "phase": "start", "input": { "source": "mouse", "position": { "x": 10, "y": 10 }, "timestamp": 0 } },
//!     { "phase": "end",   "input": { "source": "mouse", "position": { "x": 10, "y": 10 }, "timestamp": 80 } }
//!   ],
//!   "until": 1000
//! }
//! ```

use crate::config::GestureOptions;
use crate::error::TraceError;
use crate::event::{Phase, RawInput};
use crate::geometry::Rect;
use crate::gesture::GestureEvent;
use crate::processor::EventProcessor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Phase the host delivered the input in
    pub phase: Phase,
    /// The input itself
    pub input: RawInput,
}

impl TraceEvent {
    /// Create a trace event.
    pub const fn new(phase: Phase, input: RawInput) -> Self {
        Self { phase, input }
    }
}

/// A replayable input recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Options for the replay processor
    #[serde(default)]
    pub options: GestureOptions,
    /// Surface bounds
    #[serde(default)]
    pub surface: Rect,
    /// Recorded inputs in delivery order
    pub events: Vec<TraceEvent>,
    /// Time to advance to after the last input, flushing timers due by then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<f64>,
}

impl Trace {
    /// Empty trace with default options.
    pub fn new(surface: Rect) -> Self {
        Self {
            options: GestureOptions::default(),
            surface,
            events: Vec::new(),
            until: None,
        }
    }

    /// Append an input.
    pub fn push(&mut self, phase: Phase, input: RawInput) {
        self.events.push(TraceEvent::new(phase, input));
    }

    /// Parse a JSON trace.
    pub fn from_json_str(source: &str) -> Result<Self, TraceError> {
        let trace: Self = serde_json::from_str(source)?;
        trace.options.validate()?;
        Ok(trace)
    }

    /// Parse a YAML trace.
    pub fn from_yaml_str(source: &str) -> Result<Self, TraceError> {
        let trace: Self = serde_yaml_ng::from_str(source)?;
        trace.options.validate()?;
        Ok(trace)
    }

    /// Load a `.json` or `.yaml`/`.yml` trace file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let parse: fn(&str) -> Result<Self, TraceError> = match extension.as_str() {
            "json" => Self::from_json_str,
            "yaml" | "yml" => Self::from_yaml_str,
            other => return Err(TraceError::UnsupportedFormat(other.to_string())),
        };
        let trace = parse(&fs::read_to_string(path)?)?;
        log::debug!(
            "loaded trace with {} events from {}",
            trace.events.len(),
            path.display()
        );
        Ok(trace)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Run the trace through a fresh processor and collect every event.
    pub fn replay(&self) -> Vec<GestureEvent> {
        let mut processor = EventProcessor::recording(self.options.clone(), self.surface);
        for event in &self.events {
            processor.process(&event.input, event.phase);
        }
        if let Some(until) = self.until {
            processor.tick(until);
        }
        processor.into_sink().take()
    }
}
