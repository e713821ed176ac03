//! Raw input events delivered by the input surface.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw input event, one of the three device families a surface can report.
///
/// Timestamps are monotonic milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawInput {
    /// Single-pointer mouse input (identifier 0)
    Mouse {
        /// Absolute position
        position: Point,
        /// Event time in milliseconds
        timestamp: f64,
    },
    /// Pointer-capable device (unified mouse/touch/pen)
    Pointer {
        /// Device-reported pointer ID
        pointer_id: PointerId,
        /// Device kind
        pointer_type: PointerKind,
        /// Absolute position
        position: Point,
        /// Pressure (0.0 to 1.0)
        #[serde(default)]
        pressure: f32,
        /// Tilt along the x axis in degrees
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tilt_x: Option<f32>,
        /// Tilt along the y axis in degrees
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tilt_y: Option<f32>,
        /// Event time in milliseconds
        timestamp: f64,
    },
    /// Multi-touch input
    Touch {
        /// All touches currently on the surface
        #[serde(default)]
        touches: Vec<TouchContact>,
        /// Touches that changed in this event
        #[serde(default)]
        changed_touches: Vec<TouchContact>,
        /// Event time in milliseconds
        timestamp: f64,
    },
}

impl RawInput {
    /// Mouse input at `(x, y)`.
    #[must_use]
    pub const fn mouse(x: f32, y: f32, timestamp: f64) -> Self {
        Self::Mouse {
            position: Point::new(x, y),
            timestamp,
        }
    }

    /// Pointer-device input with no pressure or tilt.
    #[must_use]
    pub const fn pointer(id: u32, kind: PointerKind, x: f32, y: f32, timestamp: f64) -> Self {
        Self::Pointer {
            pointer_id: PointerId(id),
            pointer_type: kind,
            position: Point::new(x, y),
            pressure: 0.0,
            tilt_x: None,
            tilt_y: None,
            timestamp,
        }
    }

    /// Touch input where a single contact changed and is still down.
    #[must_use]
    pub fn touch(id: u32, x: f32, y: f32, timestamp: f64) -> Self {
        let contact = TouchContact::new(id, x, y);
        Self::Touch {
            touches: vec![contact],
            changed_touches: vec![contact],
            timestamp,
        }
    }

    /// Touch input where a single contact was lifted.
    #[must_use]
    pub fn touch_lifted(id: u32, x: f32, y: f32, timestamp: f64) -> Self {
        Self::Touch {
            touches: Vec::new(),
            changed_touches: vec![TouchContact::new(id, x, y)],
            timestamp,
        }
    }

    /// Set pressure on pointer input. Other sources are returned unchanged.
    #[must_use]
    pub fn with_pressure(mut self, value: f32) -> Self {
        if let Self::Pointer { pressure, .. } = &mut self {
            *pressure = value;
        }
        self
    }

    /// Set tilt on pointer input. Other sources are returned unchanged.
    #[must_use]
    pub fn with_tilt(mut self, x: f32, y: f32) -> Self {
        if let Self::Pointer { tilt_x, tilt_y, .. } = &mut self {
            *tilt_x = Some(x);
            *tilt_y = Some(y);
        }
        self
    }

    /// Event time in milliseconds.
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        match self {
            Self::Mouse { timestamp, .. }
            | Self::Pointer { timestamp, .. }
            | Self::Touch { timestamp, .. } => *timestamp,
        }
    }
}

/// One finger on a touch surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchContact {
    /// Touch identifier
    pub identifier: u32,
    /// Absolute position
    pub position: Point,
}

impl TouchContact {
    /// Create a touch contact.
    #[must_use]
    pub const fn new(identifier: u32, x: f32, y: f32) -> Self {
        Self {
            identifier,
            position: Point::new(x, y),
        }
    }
}

/// Pointer identifier, unique among currently active pointers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PointerId(pub u32);

impl PointerId {
    /// Identifier reserved for single-pointer mouse input.
    pub const MOUSE: Self = Self(0);

    /// Create a new pointer ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Mouse pointer
    #[default]
    Mouse,
    /// Pen/stylus pointer
    Pen,
    /// Touch pointer
    Touch,
}

/// Lifecycle stage of an incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Contact began
    Start,
    /// Contact moved
    Move,
    /// Contact lifted
    End,
    /// Contact aborted by the surface
    Cancel,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Start, Self::Move, Self::End, Self::Cancel];

    /// Lowercase name of the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Move => "move",
            Self::End => "end",
            Self::Cancel => "cancel",
        }
    }

    /// Whether this phase terminates a contact.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::End | Self::Cancel)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_input_timestamp() {
        assert_eq!(RawInput::mouse(1.0, 2.0, 10.0).timestamp(), 10.0);
        assert_eq!(
            RawInput::pointer(3, PointerKind::Pen, 1.0, 2.0, 20.0).timestamp(),
            20.0
        );
        assert_eq!(RawInput::touch(1, 1.0, 2.0, 30.0).timestamp(), 30.0);
    }

    #[test]
    fn test_with_pressure_and_tilt() {
        let input = RawInput::pointer(1, PointerKind::Pen, 0.0, 0.0, 0.0)
            .with_pressure(0.7)
            .with_tilt(10.0, -5.0);
        match input {
            RawInput::Pointer {
                pressure,
                tilt_x,
                tilt_y,
                ..
            } => {
                assert!((pressure - 0.7).abs() < f32::EPSILON);
                assert_eq!(tilt_x, Some(10.0));
                assert_eq!(tilt_y, Some(-5.0));
            }
            other => panic!("unexpected input {other:?}"),
        }
    }

    #[test]
    fn test_with_pressure_ignores_mouse() {
        let input = RawInput::mouse(1.0, 1.0, 0.0).with_pressure(0.9);
        assert_eq!(input, RawInput::mouse(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_touch_lifted_has_no_active_touches() {
        match RawInput::touch_lifted(4, 1.0, 1.0, 0.0) {
            RawInput::Touch {
                touches,
                changed_touches,
                ..
            } => {
                assert!(touches.is_empty());
                assert_eq!(changed_touches[0].identifier, 4);
            }
            other => panic!("unexpected input {other:?}"),
        }
    }

    #[test]
    fn test_raw_input_deserialize_tagged() {
        let json = r#"{"source":"pointer","pointer_id":7,"pointer_type":"pen",
            "position":{"x":1.0,"y":2.0},"pressure":0.4,"timestamp":5.0}"#;
        let input: RawInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            input,
            RawInput::pointer(7, PointerKind::Pen, 1.0, 2.0, 5.0).with_pressure(0.4)
        );
    }

    #[test]
    fn test_phase_names() {
        let names: Vec<_> = Phase::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["start", "move", "end", "cancel"]);
        assert!(Phase::End.is_terminal());
        assert!(Phase::Cancel.is_terminal());
        assert!(!Phase::Move.is_terminal());
    }

    #[test]
    fn test_pointer_id_mouse() {
        assert_eq!(PointerId::MOUSE, PointerId::new(0));
        assert_eq!(PointerId::default(), PointerId::MOUSE);
    }
}
