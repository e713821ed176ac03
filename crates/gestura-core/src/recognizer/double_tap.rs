//! Double-tap recognition.

use crate::config::GestureOptions;
use crate::event::{Phase, RawInput};
use crate::geometry::Point;
use crate::gesture::{GestureEvent, GestureKind, Recognizer, RecognizerContext};
use crate::timer::{TimerHandle, TimerKind, TimerQueue};

#[derive(Debug, Clone, Copy)]
struct LastTap {
    position: Point,
    time: f64,
}

/// Recognizes two quick taps on roughly the same spot.
///
/// Only releases that would qualify as taps are considered. A match fires
/// `gesture:double-tap`, records the fact on the coordinator and asks for the
/// pending single tap to be cancelled.
#[derive(Debug)]
pub struct DoubleTapRecognizer {
    options: GestureOptions,
    last_tap: Option<LastTap>,
    window: Option<TimerHandle>,
}

impl DoubleTapRecognizer {
    /// Create a double-tap recognizer.
    pub fn new(options: GestureOptions) -> Self {
        Self {
            options,
            last_tap: None,
            window: None,
        }
    }

    /// Whether a first tap is waiting for its partner.
    pub fn is_waiting(&self) -> bool {
        self.last_tap.is_some()
    }

    fn close_window(&mut self, timers: &mut TimerQueue) {
        if let Some(handle) = self.window.take() {
            timers.cancel(handle);
        }
    }

    fn pairs_with(&self, position: Point, now: f64) -> bool {
        self.last_tap.is_some_and(|last| {
            now - last.time < self.options.double_tap_max_delay as f64
                && last.position.distance_squared(&position)
                    < self.options.double_tap_radius_squared()
        })
    }
}

impl Recognizer for DoubleTapRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::DoubleTap
    }

    fn on_event(&mut self, input: &RawInput, phase: Phase, ctx: &mut RecognizerContext<'_>) {
        if phase != Phase::End {
            return;
        }
        let Some(pointer) = ctx.tracker.measure(input) else {
            return;
        };
        if pointer.duration > self.options.tap_max_duration as f64
            || pointer.distance > self.options.tap_max_distance
        {
            return;
        }

        let now = pointer.timestamp;
        self.close_window(ctx.timers);

        if self.pairs_with(pointer.position, now) {
            self.last_tap = None;
            ctx.coordinator.set_double_tap_fired(true);
            ctx.coordinator.cancel_pending_tap();
            ctx.emit(GestureEvent::DoubleTap(pointer));
        } else {
            ctx.coordinator.set_double_tap_fired(false);
            self.last_tap = Some(LastTap {
                position: pointer.position,
                time: now,
            });
            let delay = self.options.double_tap_max_delay;
            self.window = Some(ctx.timers.schedule(TimerKind::DoubleTapWindow, delay));
        }
    }

    fn on_timer(&mut self, handle: TimerHandle, _ctx: &mut RecognizerContext<'_>) {
        if self.window == Some(handle) {
            log::trace!("double-tap window closed");
            self.window = None;
            self.last_tap = None;
        }
    }

    fn reset(&mut self, timers: &mut TimerQueue) {
        self.close_window(timers);
        self.last_tap = None;
    }
}
