//! Long-press recognition.

use crate::config::GestureOptions;
use crate::event::{Phase, PointerId, RawInput};
use crate::gesture::{GestureEvent, GestureKind, Recognizer, RecognizerContext};
use crate::pointer::Pointer;
use crate::timer::{TimerHandle, TimerKind, TimerQueue};

#[derive(Debug, Clone)]
struct PendingPress {
    identifier: PointerId,
    handle: TimerHandle,
    /// Snapshot at contact start, used if the pointer is gone when the timer fires
    pointer: Pointer,
}

/// Recognizes a contact held in place for `long_press_delay`.
///
/// Once fired, the press stays active until the next contact starts or is
/// cancelled, so a tap released right after it can still be suppressed.
#[derive(Debug)]
pub struct LongPressRecognizer {
    options: GestureOptions,
    pending: Option<PendingPress>,
    active: bool,
}

impl LongPressRecognizer {
    /// Create a long-press recognizer.
    pub fn new(options: GestureOptions) -> Self {
        Self {
            options,
            pending: None,
            active: false,
        }
    }

    /// Whether a long press fired for the latest contact.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a hold timer is running.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn abort(&mut self, timers: &mut TimerQueue) {
        if let Some(pending) = self.pending.take() {
            timers.cancel(pending.handle);
        }
    }

    fn deactivate(&mut self, ctx: &mut RecognizerContext<'_>) {
        self.active = false;
        ctx.coordinator.set_long_press_active(false);
    }
}

impl Recognizer for LongPressRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::LongPress
    }

    fn on_event(&mut self, input: &RawInput, phase: Phase, ctx: &mut RecognizerContext<'_>) {
        match phase {
            Phase::Start => {
                self.abort(ctx.timers);
                self.deactivate(ctx);

                let Some(pointer) = ctx.tracker.id_of(input).and_then(|id| ctx.tracker.get(id))
                else {
                    return;
                };
                let handle = ctx
                    .timers
                    .schedule(TimerKind::LongPress, self.options.long_press_delay);
                self.pending = Some(PendingPress {
                    identifier: pointer.identifier,
                    handle,
                    pointer: pointer.clone(),
                });
            }
            Phase::Move => {
                let Some(identifier) = self.pending.as_ref().map(|p| p.identifier) else {
                    return;
                };
                if ctx.tracker.id_of(input) != Some(identifier) {
                    return;
                }
                let moved_too_far = ctx
                    .tracker
                    .get(identifier)
                    .is_some_and(|p| p.distance > self.options.tap_max_distance);
                if moved_too_far {
                    log::debug!("long press cancelled: pointer {identifier} moved too far");
                    self.abort(ctx.timers);
                }
            }
            Phase::End => self.abort(ctx.timers),
            Phase::Cancel => {
                self.abort(ctx.timers);
                self.deactivate(ctx);
            }
        }
    }

    fn on_timer(&mut self, handle: TimerHandle, ctx: &mut RecognizerContext<'_>) {
        if self.pending.as_ref().map(|p| p.handle) != Some(handle) {
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        self.active = true;
        ctx.coordinator.set_long_press_active(true);
        if self.options.suppress_tap_on_long_press {
            ctx.coordinator.cancel_pending_tap();
        }

        let pointer = ctx
            .tracker
            .get(pending.identifier)
            .cloned()
            .unwrap_or(pending.pointer);
        ctx.emit(GestureEvent::LongPress(pointer));
    }

    fn reset(&mut self, timers: &mut TimerQueue) {
        self.abort(timers);
        self.active = false;
    }
}
