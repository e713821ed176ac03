//! Single-tap recognition with held release.

use crate::config::GestureOptions;
use crate::event::{Phase, PointerId, RawInput};
use crate::gesture::{GestureEvent, GestureKind, Recognizer, RecognizerContext};
use crate::pointer::Pointer;
use crate::timer::{TimerHandle, TimerKind, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapState {
    Idle,
    Armed { identifier: PointerId },
}

/// A released tap waiting for its suppression check.
#[derive(Debug, Clone)]
struct HeldTap {
    handle: TimerHandle,
    pointer: Pointer,
}

/// Recognizes a short contact that stays in place.
///
/// When either suppression option is set, a released tap is held for
/// `double_tap_max_delay` and dropped if a long press or a double-tap claimed
/// it in the meantime. Otherwise it is emitted on release.
#[derive(Debug)]
pub struct TapRecognizer {
    options: GestureOptions,
    state: TapState,
    held: Option<HeldTap>,
}

impl TapRecognizer {
    /// Create a tap recognizer.
    pub fn new(options: GestureOptions) -> Self {
        Self {
            options,
            state: TapState::Idle,
            held: None,
        }
    }

    /// Veto the tap in flight: disarm the current contact and drop any held tap.
    ///
    /// Safe to call any number of times.
    pub fn cancel_tap(&mut self, timers: &mut TimerQueue) {
        if self.state != TapState::Idle || self.held.is_some() {
            log::debug!("tap cancelled");
        }
        self.state = TapState::Idle;
        if let Some(held) = self.held.take() {
            timers.cancel(held.handle);
        }
    }

    /// Whether a contact is currently a tap candidate.
    pub fn is_armed(&self) -> bool {
        matches!(self.state, TapState::Armed { .. })
    }

    /// Whether a released tap is waiting to be emitted.
    pub fn has_held_tap(&self) -> bool {
        self.held.is_some()
    }

    fn armed_on(&self, input: &RawInput, ctx: &RecognizerContext<'_>) -> Option<PointerId> {
        match self.state {
            TapState::Armed { identifier } if ctx.tracker.id_of(input) == Some(identifier) => {
                Some(identifier)
            }
            _ => None,
        }
    }

    fn release(&mut self, pointer: Pointer, ctx: &mut RecognizerContext<'_>) {
        self.state = TapState::Idle;

        if !self.options.holds_taps() {
            ctx.emit(GestureEvent::Tap(pointer));
            return;
        }

        if let Some(previous) = self.held.take() {
            ctx.timers.cancel(previous.handle);
        }
        let handle = ctx
            .timers
            .schedule(TimerKind::TapRelease, self.options.double_tap_max_delay);
        log::debug!("tap held for {}ms", self.options.double_tap_max_delay);
        self.held = Some(HeldTap { handle, pointer });
    }
}

impl Recognizer for TapRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Tap
    }

    fn on_event(&mut self, input: &RawInput, phase: Phase, ctx: &mut RecognizerContext<'_>) {
        if !self.options.enable_tap {
            return;
        }

        match phase {
            Phase::Start => {
                let Some(pointer) = ctx.tracker.id_of(input).and_then(|id| ctx.tracker.get(id))
                else {
                    log::trace!("tap: start without a tracked pointer");
                    return;
                };
                self.state = TapState::Armed {
                    identifier: pointer.identifier,
                };
            }
            Phase::Move => {
                let Some(identifier) = self.armed_on(input, ctx) else {
                    return;
                };
                let moved_too_far = ctx
                    .tracker
                    .get(identifier)
                    .is_some_and(|p| p.distance > self.options.tap_max_distance);
                if moved_too_far {
                    log::debug!("tap cancelled: pointer {identifier} moved too far");
                    self.state = TapState::Idle;
                }
            }
            Phase::End => {
                if self.armed_on(input, ctx).is_none() {
                    return;
                }
                match ctx.tracker.measure(input) {
                    Some(pointer) if pointer.duration <= self.options.tap_max_duration as f64 => {
                        self.release(pointer, ctx);
                    }
                    _ => self.state = TapState::Idle,
                }
            }
            Phase::Cancel => self.state = TapState::Idle,
        }
    }

    fn on_timer(&mut self, handle: TimerHandle, ctx: &mut RecognizerContext<'_>) {
        if self.held.as_ref().map(|h| h.handle) != Some(handle) {
            return;
        }
        let Some(held) = self.held.take() else {
            return;
        };

        let suppressed = (self.options.suppress_tap_on_long_press
            && ctx.coordinator.is_long_press_active())
            || (self.options.suppress_tap_on_double_tap && ctx.coordinator.did_double_tap_fire());

        if suppressed {
            log::debug!("held tap suppressed");
        } else {
            ctx.emit(GestureEvent::Tap(held.pointer));
        }
    }

    fn reset(&mut self, timers: &mut TimerQueue) {
        self.cancel_tap(timers);
    }
}
