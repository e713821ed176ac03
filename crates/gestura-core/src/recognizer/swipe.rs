//! Swipe recognition.

use crate::config::GestureOptions;
use crate::event::{Phase, PointerId, RawInput};
use crate::gesture::{
    angle, direction_from_angle, velocity, GestureEvent, GestureKind, Recognizer,
    RecognizerContext, SwipeGesture,
};
use crate::pointer::Pointer;
use crate::timer::TimerQueue;

/// Recognizes a fast directional stroke.
///
/// A contact becomes a swipe candidate once it travels past
/// `swipe_threshold`. On release it is classified by the displacement from
/// its start and the average velocity over the whole contact.
#[derive(Debug, Default)]
pub struct SwipeRecognizer {
    options: GestureOptions,
    start: Option<Pointer>,
    current: Option<Pointer>,
    swiping: bool,
}

impl SwipeRecognizer {
    /// Create a swipe recognizer.
    pub fn new(options: GestureOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Whether the tracked contact has passed the swipe threshold.
    pub fn is_swiping(&self) -> bool {
        self.swiping
    }

    fn tracked(&self) -> Option<PointerId> {
        self.start.as_ref().map(|p| p.identifier)
    }

    fn clear(&mut self) {
        self.start = None;
        self.current = None;
        self.swiping = false;
    }

    /// Build the swipe for a released contact, or `None` if it was too slow
    /// or took too long.
    fn classify(&self, end: Pointer) -> Option<SwipeGesture> {
        let displacement = end.position - end.start;
        let distance = displacement.x.hypot(displacement.y);
        let speed = velocity(end.original_timestamp, end.timestamp, distance);

        if speed < self.options.swipe_min_velocity {
            log::debug!("swipe rejected: velocity {speed:.3} below minimum");
            return None;
        }
        if end.duration > self.options.swipe_max_duration as f64 {
            log::debug!("swipe rejected: took {}ms", end.duration);
            return None;
        }

        let angle = angle(displacement.x, displacement.y);
        Some(SwipeGesture {
            direction: direction_from_angle(angle),
            angle,
            velocity: speed,
            pointer: end,
        })
    }
}

impl Recognizer for SwipeRecognizer {
    fn kind(&self) -> GestureKind {
        GestureKind::Swipe
    }

    fn on_event(&mut self, input: &RawInput, phase: Phase, ctx: &mut RecognizerContext<'_>) {
        if !self.options.enable_swipe {
            return;
        }

        match phase {
            Phase::Start => {
                let Some(pointer) = ctx.tracker.id_of(input).and_then(|id| ctx.tracker.get(id))
                else {
                    return;
                };
                self.start = Some(pointer.clone());
                self.current = Some(pointer.clone());
                self.swiping = false;
            }
            Phase::Move => {
                let Some(identifier) = self.tracked() else {
                    return;
                };
                if ctx.tracker.id_of(input) != Some(identifier) {
                    return;
                }
                let Some(pointer) = ctx.tracker.get(identifier) else {
                    return;
                };
                if !self.swiping && pointer.distance > self.options.swipe_threshold {
                    log::trace!("pointer {identifier} is swiping");
                    self.swiping = true;
                }
                self.current = Some(pointer.clone());
            }
            Phase::End => {
                let Some(identifier) = self.tracked() else {
                    return;
                };
                if ctx.tracker.id_of(input) != Some(identifier) {
                    return;
                }
                let swipe = if self.swiping && self.current.is_some() {
                    ctx.tracker.measure(input).and_then(|end| self.classify(end))
                } else {
                    None
                };
                self.clear();
                if let Some(swipe) = swipe {
                    ctx.emit(GestureEvent::Swipe(swipe));
                }
            }
            Phase::Cancel => self.clear(),
        }
    }

    fn reset(&mut self, _timers: &mut TimerQueue) {
        self.clear();
    }
}
