//! Event processing pipeline.
//!
//! For every input the processor:
//!
//! 1. fires timers that came due before the input's timestamp,
//! 2. updates the pointer tracker,
//! 3. emits the lifecycle event (`gesture:start`, `gesture:move`, `gesture:end`),
//! 4. runs the recognizers in order: long press, double-tap, tap, swipe,
//! 5. forgets the pointer on end or cancel.
//!
//! Tap-cancel requests raised on the [`Coordinator`] are settled after each
//! recognizer call and each timer, so a later recognizer in the same pass
//! already sees the tap withdrawn.

use crate::config::GestureOptions;
use crate::error::ConfigError;
use crate::event::{Phase, RawInput};
use crate::gesture::{
    Coordinator, GestureEvent, GestureSink, Recognizer, RecognizerContext, RecordingSink,
};
use crate::pointer::{PointerTracker, Surface};
use crate::recognizer::{DoubleTapRecognizer, LongPressRecognizer, SwipeRecognizer, TapRecognizer};
use crate::timer::{TimerKind, TimerQueue};

#[derive(Debug, Clone, Copy)]
enum Slot {
    LongPress,
    DoubleTap,
    Tap,
    Swipe,
}

impl Slot {
    const ORDER: [Self; 4] = [Self::LongPress, Self::DoubleTap, Self::Tap, Self::Swipe];

    const fn owning(kind: TimerKind) -> Self {
        match kind {
            TimerKind::LongPress => Self::LongPress,
            TimerKind::DoubleTapWindow => Self::DoubleTap,
            TimerKind::TapRelease => Self::Tap,
        }
    }
}

#[derive(Debug)]
struct Recognizers {
    long_press: LongPressRecognizer,
    double_tap: DoubleTapRecognizer,
    tap: TapRecognizer,
    swipe: SwipeRecognizer,
}

impl Recognizers {
    fn new(options: &GestureOptions) -> Self {
        Self {
            long_press: LongPressRecognizer::new(options.clone()),
            double_tap: DoubleTapRecognizer::new(options.clone()),
            tap: TapRecognizer::new(options.clone()),
            swipe: SwipeRecognizer::new(options.clone()),
        }
    }

    fn get_mut(&mut self, slot: Slot) -> &mut dyn Recognizer {
        match slot {
            Slot::LongPress => &mut self.long_press,
            Slot::DoubleTap => &mut self.double_tap,
            Slot::Tap => &mut self.tap,
            Slot::Swipe => &mut self.swipe,
        }
    }

    /// Apply a pending tap-cancel request.
    fn settle(&mut self, coordinator: &mut Coordinator, timers: &mut TimerQueue) {
        if coordinator.take_tap_cancel() {
            self.tap.cancel_tap(timers);
        }
    }

    fn reset(&mut self, timers: &mut TimerQueue) {
        for slot in Slot::ORDER {
            self.get_mut(slot).reset(timers);
        }
    }
}

/// Turns raw input into gesture events delivered to a [`GestureSink`].
///
/// Time only moves with input timestamps and [`tick`](Self::tick); there are
/// no background threads.
#[derive(Debug)]
pub struct EventProcessor<S: GestureSink = RecordingSink> {
    options: GestureOptions,
    tracker: PointerTracker,
    timers: TimerQueue,
    coordinator: Coordinator,
    recognizers: Recognizers,
    sink: S,
}

impl EventProcessor<RecordingSink> {
    /// Processor that records every event, handy for tests and replays.
    pub fn recording(options: GestureOptions, surface: impl Surface + 'static) -> Self {
        Self::new(options, surface, RecordingSink::new())
    }
}

impl<S: GestureSink> EventProcessor<S> {
    /// Create a processor for `surface` delivering to `sink`.
    ///
    /// `options` are taken as given; use [`try_new`](Self::try_new) for
    /// options that have not been through [`GestureOptions::validate`].
    pub fn new(options: GestureOptions, surface: impl Surface + 'static, sink: S) -> Self {
        Self {
            recognizers: Recognizers::new(&options),
            options,
            tracker: PointerTracker::new(surface),
            timers: TimerQueue::new(),
            coordinator: Coordinator::default(),
            sink,
        }
    }

    /// Validate `options`, then create the processor.
    pub fn try_new(
        options: GestureOptions,
        surface: impl Surface + 'static,
        sink: S,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self::new(options, surface, sink))
    }

    /// Process one input in the given phase.
    pub fn process(&mut self, input: &RawInput, phase: Phase) {
        self.fire_due(input.timestamp());

        match phase {
            Phase::Start => {
                if self.tracker.begin(input).is_none() {
                    log::trace!("start without a changed contact");
                }
            }
            Phase::Move => {
                self.tracker.update(input);
            }
            Phase::End | Phase::Cancel => {}
        }

        let active = self.tracker.all();
        let lifecycle = match phase {
            Phase::Start => GestureEvent::Start(active),
            Phase::Move => GestureEvent::Move(active),
            Phase::End | Phase::Cancel => GestureEvent::End(active),
        };
        self.context().emit(lifecycle);

        for slot in Slot::ORDER {
            let mut ctx = RecognizerContext::new(
                &self.tracker,
                &mut self.timers,
                &mut self.coordinator,
                &mut self.sink,
            );
            let recognizer = self.recognizers.get_mut(slot);
            log::trace!("{} recognizer sees {phase:?}", recognizer.kind());
            recognizer.on_event(input, phase, &mut ctx);
            self.recognizers.settle(&mut self.coordinator, &mut self.timers);
        }

        if phase.is_terminal() {
            self.tracker.end(input);
        }
    }

    /// Advance time to `now` without input, firing due timers.
    pub fn tick(&mut self, now: f64) {
        self.fire_due(now);
    }

    /// Veto the tap in flight from outside the recognizers.
    pub fn cancel_tap(&mut self) {
        self.recognizers.tap.cancel_tap(&mut self.timers);
    }

    /// Drop every tracked contact, pending timer and recognizer state.
    pub fn reset(&mut self) {
        self.recognizers.reset(&mut self.timers);
        self.timers.clear();
        self.tracker.clear();
        self.coordinator = Coordinator::default();
    }

    /// Replace the options, starting over with fresh recognizers.
    pub fn reconfigure(&mut self, options: GestureOptions) {
        self.reset();
        self.recognizers = Recognizers::new(&options);
        self.options = options;
    }

    /// Active options.
    pub const fn options(&self) -> &GestureOptions {
        &self.options
    }

    /// Pointer tracker.
    pub const fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    /// Current virtual time.
    pub const fn now(&self) -> f64 {
        self.timers.now()
    }

    /// When the next timer is due, if any. Hosts call [`tick`](Self::tick) then.
    pub fn next_due(&self) -> Option<f64> {
        self.timers.next_due()
    }

    /// Tap recognizer state, for hosts that want to inspect it.
    pub const fn tap(&self) -> &TapRecognizer {
        &self.recognizers.tap
    }

    /// Double-tap recognizer state.
    pub const fn double_tap(&self) -> &DoubleTapRecognizer {
        &self.recognizers.double_tap
    }

    /// Long-press recognizer state.
    pub const fn long_press(&self) -> &LongPressRecognizer {
        &self.recognizers.long_press
    }

    /// Swipe recognizer state.
    pub const fn swipe(&self) -> &SwipeRecognizer {
        &self.recognizers.swipe
    }

    /// Suppression flags shared by the recognizers.
    pub const fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Event sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable event sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the processor, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn context(&mut self) -> RecognizerContext<'_> {
        RecognizerContext::new(
            &self.tracker,
            &mut self.timers,
            &mut self.coordinator,
            &mut self.sink,
        )
    }

    fn fire_due(&mut self, until: f64) {
        while let Some(expired) = self.timers.pop_due(until) {
            let mut ctx = RecognizerContext::new(
                &self.tracker,
                &mut self.timers,
                &mut self.coordinator,
                &mut self.sink,
            );
            let recognizer = self.recognizers.get_mut(Slot::owning(expired.kind));
            log::trace!(
                "{:?} timer for {} fired at {}",
                expired.kind,
                recognizer.kind(),
                expired.due
            );
            recognizer.on_timer(expired.handle, &mut ctx);
            self.recognizers.settle(&mut self.coordinator, &mut self.timers);
        }
        self.timers.set_now(until);
    }
}
