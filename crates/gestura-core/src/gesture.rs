#![allow(clippy::many_single_char_names)]
//! Gesture events, the listener sink and the contract shared by recognizers.
//!
//! Recognizers never hold references to each other. Cross-recognizer
//! suppression goes through the [`Coordinator`] owned by the event processor.

use crate::error::SinkError;
use crate::event::{Phase, RawInput};
use crate::pointer::{Pointer, PointerTracker};
use crate::timer::{TimerHandle, TimerQueue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureKind {
    /// Single tap
    Tap,
    /// Two taps on the same spot
    DoubleTap,
    /// Contact held in place
    LongPress,
    /// Fast directional stroke
    Swipe,
    /// Lifecycle: a contact started
    Start,
    /// Lifecycle: a contact moved
    Move,
    /// Lifecycle: a contact ended or was cancelled
    End,
}

impl GestureKind {
    /// Short name, e.g. `double-tap`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::DoubleTap => "double-tap",
            Self::LongPress => "long-press",
            Self::Swipe => "swipe",
            Self::Start => "start",
            Self::Move => "move",
            Self::End => "end",
        }
    }

    /// Name of the event delivered to listeners, e.g. `gesture:double-tap`.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Tap => "gesture:tap",
            Self::DoubleTap => "gesture:double-tap",
            Self::LongPress => "gesture:long-press",
            Self::Swipe => "gesture:swipe",
            Self::Start => "gesture:start",
            Self::Move => "gesture:move",
            Self::End => "gesture:end",
        }
    }

    /// Whether this is a lifecycle event rather than a classification.
    #[must_use]
    pub const fn is_lifecycle(self) -> bool {
        matches!(self, Self::Start | Self::Move | Self::End)
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cardinal direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Positive y
    Down,
    /// Negative x
    Left,
    /// Positive x
    Right,
    /// Negative y
    Up,
}

impl SwipeDirection {
    /// Lowercase name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a swipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeGesture {
    /// End pointer snapshot
    #[serde(flatten)]
    pub pointer: Pointer,
    /// Angle of the net displacement in degrees, (-180, 180]
    pub angle: f32,
    /// Direction derived from the angle
    pub direction: SwipeDirection,
    /// Distance per millisecond
    pub velocity: f64,
}

/// Event delivered to the listener sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum GestureEvent {
    /// Single tap
    Tap(Pointer),
    /// Double tap
    DoubleTap(Pointer),
    /// Long press
    LongPress(Pointer),
    /// Swipe
    Swipe(SwipeGesture),
    /// Active pointers after a contact started
    Start(Vec<Pointer>),
    /// Active pointers after a contact moved
    Move(Vec<Pointer>),
    /// Active pointers when a contact ended or was cancelled
    End(Vec<Pointer>),
}

impl GestureEvent {
    /// Kind of this event.
    #[must_use]
    pub const fn kind(&self) -> GestureKind {
        match self {
            Self::Tap(_) => GestureKind::Tap,
            Self::DoubleTap(_) => GestureKind::DoubleTap,
            Self::LongPress(_) => GestureKind::LongPress,
            Self::Swipe(_) => GestureKind::Swipe,
            Self::Start(_) => GestureKind::Start,
            Self::Move(_) => GestureKind::Move,
            Self::End(_) => GestureKind::End,
        }
    }

    /// The single pointer a classification carries. `None` for lifecycle events.
    #[must_use]
    pub const fn pointer(&self) -> Option<&Pointer> {
        match self {
            Self::Tap(p) | Self::DoubleTap(p) | Self::LongPress(p) => Some(p),
            Self::Swipe(swipe) => Some(&swipe.pointer),
            Self::Start(_) | Self::Move(_) | Self::End(_) => None,
        }
    }
}

/// Receives emitted gesture events.
pub trait GestureSink {
    /// Deliver one event. Errors are logged by the emitter and otherwise ignored.
    fn deliver(&mut self, event: &GestureEvent) -> Result<(), SinkError>;
}

impl GestureSink for Vec<GestureEvent> {
    fn deliver(&mut self, event: &GestureEvent) -> Result<(), SinkError> {
        self.push(event.clone());
        Ok(())
    }
}

impl<S: GestureSink + ?Sized> GestureSink for Box<S> {
    fn deliver(&mut self, event: &GestureEvent) -> Result<(), SinkError> {
        (**self).deliver(event)
    }
}

/// Sink that records every event, for tests and trace replay.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<GestureEvent>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events in emission order.
    #[must_use]
    pub fn events(&self) -> &[GestureEvent] {
        &self.events
    }

    /// Recorded events of one kind.
    pub fn of_kind(&self, kind: GestureKind) -> impl Iterator<Item = &GestureEvent> + '_ {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    /// Number of recorded events of one kind.
    #[must_use]
    pub fn count(&self, kind: GestureKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Recorded classifications, skipping lifecycle events.
    pub fn gestures(&self) -> impl Iterator<Item = &GestureEvent> + '_ {
        self.events.iter().filter(|e| !e.kind().is_lifecycle())
    }

    /// Take the recorded events, leaving the sink empty.
    pub fn take(&mut self) -> Vec<GestureEvent> {
        std::mem::take(&mut self.events)
    }
}

impl GestureSink for RecordingSink {
    fn deliver(&mut self, event: &GestureEvent) -> Result<(), SinkError> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Sink that forwards events to a closure.
pub struct CallbackSink<F>(pub F);

impl<F> GestureSink for CallbackSink<F>
where
    F: FnMut(&GestureEvent) -> Result<(), SinkError>,
{
    fn deliver(&mut self, event: &GestureEvent) -> Result<(), SinkError> {
        (self.0)(event)
    }
}

impl<F> fmt::Debug for CallbackSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackSink")
    }
}

// =============================================================================
// Shared math
// =============================================================================

/// Angle of `(dx, dy)` in degrees, in (-180, 180].
#[must_use]
pub fn angle(dx: f32, dy: f32) -> f32 {
    let radians = dy.atan2(dx);
    // atan2(-0.0, -x) lands on -pi
    if radians <= -std::f32::consts::PI {
        180.0
    } else {
        radians.to_degrees()
    }
}

/// `distance / (t1 - t0)`, or 0 when `t1 <= t0`.
#[must_use]
pub fn velocity(t0: f64, t1: f64, distance: f32) -> f64 {
    let elapsed = t1 - t0;
    if elapsed > 0.0 {
        f64::from(distance) / elapsed
    } else {
        0.0
    }
}

/// Map an angle in degrees to a cardinal direction.
///
/// Right is (-45, 45), down [45, 135), up [-135, -45] and left the rest, so
/// 45 is down, -45 and -135 are up, and 135 and 180 are left.
#[must_use]
pub fn direction_from_angle(angle: f32) -> SwipeDirection {
    if angle > -45.0 && angle < 45.0 {
        SwipeDirection::Right
    } else if (45.0..135.0).contains(&angle) {
        SwipeDirection::Down
    } else if (-135.0..=-45.0).contains(&angle) {
        SwipeDirection::Up
    } else {
        SwipeDirection::Left
    }
}

// =============================================================================
// Recognizer contract
// =============================================================================

/// Suppression bus shared by the recognizers of one processor.
#[derive(Debug, Default)]
pub struct Coordinator {
    tap_cancel_requested: bool,
    long_press_active: bool,
    double_tap_fired: bool,
}

impl Coordinator {
    /// Ask for any armed or held tap to be dropped.
    ///
    /// The processor applies the request as soon as the requesting recognizer
    /// returns, before the next recognizer sees the event.
    pub fn cancel_pending_tap(&mut self) {
        self.tap_cancel_requested = true;
    }

    /// Consume a pending tap-cancel request.
    pub fn take_tap_cancel(&mut self) -> bool {
        std::mem::take(&mut self.tap_cancel_requested)
    }

    /// Whether a long press fired for the current contact.
    #[must_use]
    pub const fn is_long_press_active(&self) -> bool {
        self.long_press_active
    }

    /// Whether the latest qualifying tap completed a double-tap.
    #[must_use]
    pub const fn did_double_tap_fire(&self) -> bool {
        self.double_tap_fired
    }

    pub(crate) fn set_long_press_active(&mut self, active: bool) {
        self.long_press_active = active;
    }

    pub(crate) fn set_double_tap_fired(&mut self, fired: bool) {
        self.double_tap_fired = fired;
    }
}

/// Everything a recognizer may touch while handling an event or timer.
pub struct RecognizerContext<'a> {
    /// Read-only pointer state
    pub tracker: &'a PointerTracker,
    /// Timer queue for scheduling and cancelling
    pub timers: &'a mut TimerQueue,
    /// Suppression bus
    pub coordinator: &'a mut Coordinator,
    sink: &'a mut dyn GestureSink,
}

impl<'a> RecognizerContext<'a> {
    /// Bundle the processor's parts for one recognizer call.
    pub fn new(
        tracker: &'a PointerTracker,
        timers: &'a mut TimerQueue,
        coordinator: &'a mut Coordinator,
        sink: &'a mut dyn GestureSink,
    ) -> Self {
        Self {
            tracker,
            timers,
            coordinator,
            sink,
        }
    }

    /// Deliver an event to the sink. Listener failures stop here.
    pub fn emit(&mut self, event: GestureEvent) {
        let kind = event.kind();
        if kind.is_lifecycle() {
            log::trace!("emit {}", kind.event_name());
        } else {
            log::debug!("emit {}", kind.event_name());
        }
        if let Err(err) = self.sink.deliver(&event) {
            log::warn!("dropped {}: {err}", kind.event_name());
        }
    }
}

impl fmt::Debug for RecognizerContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecognizerContext")
            .field("tracker", &self.tracker)
            .field("timers", &self.timers)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

/// A state machine recognizing one gesture kind.
pub trait Recognizer {
    /// Gesture this recognizer emits.
    fn kind(&self) -> GestureKind;

    /// Handle one raw event. The sole entry point for input.
    fn on_event(&mut self, input: &RawInput, phase: Phase, ctx: &mut RecognizerContext<'_>);

    /// Handle one of this recognizer's timers coming due.
    ///
    /// Must be a no-op for a handle the recognizer no longer expects.
    fn on_timer(&mut self, _handle: TimerHandle, _ctx: &mut RecognizerContext<'_>) {}

    /// Drop all state and cancel owned timers.
    fn reset(&mut self, timers: &mut TimerQueue);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_angle_axes() {
        assert!((angle(1.0, 0.0) - 0.0).abs() < 1e-4);
        assert!((angle(0.0, 1.0) - 90.0).abs() < 1e-4);
        assert!((angle(-1.0, 0.0) - 180.0).abs() < 1e-4);
        assert!((angle(0.0, -1.0) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_basic() {
        assert!((velocity(0.0, 50.0, 100.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_zero_elapsed() {
        assert_eq!(velocity(10.0, 10.0, 100.0), 0.0);
        assert_eq!(velocity(20.0, 10.0, 100.0), 0.0);
    }

    #[test]
    fn test_direction_boundaries() {
        assert_eq!(direction_from_angle(0.0), SwipeDirection::Right);
        assert_eq!(direction_from_angle(45.0), SwipeDirection::Down);
        assert_eq!(direction_from_angle(-45.0), SwipeDirection::Up);
        assert_eq!(direction_from_angle(135.0), SwipeDirection::Left);
        assert_eq!(direction_from_angle(-135.0), SwipeDirection::Up);
        assert_eq!(direction_from_angle(180.0), SwipeDirection::Left);
        assert_eq!(direction_from_angle(-180.0), SwipeDirection::Left);
        assert_eq!(direction_from_angle(44.999), SwipeDirection::Right);
        assert_eq!(direction_from_angle(-135.001), SwipeDirection::Left);
        assert_eq!(direction_from_angle(-44.999), SwipeDirection::Right);
    }

    #[test]
    fn test_up_right_diagonal_is_up() {
        let a = angle(100.0, -100.0);
        assert!((a + 45.0).abs() < 1e-4);
        assert_eq!(direction_from_angle(-45.0), SwipeDirection::Up);
    }

    #[test]
    fn test_angle_negative_zero_is_180() {
        assert_eq!(angle(-1.0, -0.0), 180.0);
        assert_eq!(angle(-1.0, 0.0), 180.0);
        assert_eq!(
            direction_from_angle(angle(-1.0, -0.0)),
            SwipeDirection::Left
        );
    }

    #[test]
    fn test_gesture_kind_event_names() {
        assert_eq!(GestureKind::Tap.event_name(), "gesture:tap");
        assert_eq!(GestureKind::DoubleTap.event_name(), "gesture:double-tap");
        assert_eq!(GestureKind::LongPress.event_name(), "gesture:long-press");
        assert_eq!(GestureKind::Swipe.event_name(), "gesture:swipe");
        assert_eq!(GestureKind::End.to_string(), "end");
        assert!(GestureKind::Move.is_lifecycle());
        assert!(!GestureKind::Swipe.is_lifecycle());
    }

    #[test]
    fn test_gesture_event_kind_and_pointer() {
        let event = GestureEvent::Start(Vec::new());
        assert_eq!(event.kind(), GestureKind::Start);
        assert!(event.pointer().is_none());
    }

    #[test]
    fn test_coordinator_take_tap_cancel() {
        let mut coordinator = Coordinator::default();
        assert!(!coordinator.take_tap_cancel());
        coordinator.cancel_pending_tap();
        coordinator.cancel_pending_tap();
        assert!(coordinator.take_tap_cancel());
        assert!(!coordinator.take_tap_cancel());
    }

    #[test]
    fn test_emit_swallows_sink_errors() {
        let tracker = PointerTracker::default();
        let mut timers = TimerQueue::new();
        let mut coordinator = Coordinator::default();
        let mut calls = 0;
        let mut sink = CallbackSink(|event: &GestureEvent| -> Result<(), SinkError> {
            calls += 1;
            Err(SinkError::new(event.kind().event_name(), "listener failed"))
        });

        let mut ctx = RecognizerContext::new(&tracker, &mut timers, &mut coordinator, &mut sink);
        ctx.emit(GestureEvent::End(Vec::new()));
        ctx.emit(GestureEvent::Move(Vec::new()));
        drop(ctx);
        drop(sink);

        assert_eq!(calls, 2);
    }

    #[test]
    fn test_recording_sink_filters() {
        let mut sink = RecordingSink::new();
        sink.deliver(&GestureEvent::Start(Vec::new())).ok();
        sink.deliver(&GestureEvent::End(Vec::new())).ok();
        assert_eq!(sink.count(GestureKind::Start), 1);
        assert_eq!(sink.gestures().count(), 0);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.events().is_empty());
    }

    proptest! {
        #[test]
        fn prop_velocity_never_negative(t0 in -1e6f64..1e6, t1 in -1e6f64..1e6, d in 0.0f32..1e4) {
            let v = velocity(t0, t1, d);
            prop_assert!(v >= 0.0);
            if t1 <= t0 {
                prop_assert_eq!(v, 0.0);
            }
        }

        #[test]
        fn prop_angle_in_range(dx in -1e3f32..1e3, dy in -1e3f32..1e3) {
            let a = angle(dx, dy);
            prop_assert!(a > -180.0 && a <= 180.0);
        }

        #[test]
        fn prop_direction_matches_dominant_axis(dx in -1e3f32..1e3, dy in -1e3f32..1e3) {
            prop_assume!((dx.abs() - dy.abs()).abs() > 1.0);
            let direction = direction_from_angle(angle(dx, dy));
            let expected = if dx.abs() > dy.abs() {
                if dx > 0.0 { SwipeDirection::Right } else { SwipeDirection::Left }
            } else if dy > 0.0 {
                SwipeDirection::Down
            } else {
                SwipeDirection::Up
            };
            prop_assert_eq!(direction, expected);
        }
    }
}
