//! Pointer gesture recognition.
//!
//! This crate turns raw mouse, pen and touch input into gesture events:
//! - Contact tracking: [`PointerTracker`] producing normalized [`Pointer`] snapshots
//! - Recognizers: tap, double-tap, long press and swipe, see [`recognizer`]
//! - Pipeline: [`EventProcessor`] with cooperative timers on a virtual clock
//! - Host facade: [`GestureController`]
//! - Options and replay: [`GestureOptions`], [`Trace`]
//!
//! Gestures are delivered to a [`GestureSink`]; [`RecordingSink`] keeps them
//! in memory.
//!
//! ```
//! use gestura_core::{EventProcessor, GestureKind, GestureOptions, Phase, RawInput, Rect};
//!
//! let options = GestureOptions {
//!     suppress_tap_on_long_press: false,
//!     ..GestureOptions::default()
//! };
//! let mut processor = EventProcessor::recording(options, Rect::new(0.0, 0.0, 320.0, 240.0));
//! processor.process(&RawInput::mouse(10.0, 10.0, 0.0), Phase::Start);
//! processor.process(&RawInput::mouse(10.0, 10.0, 90.0), Phase::End);
//!
//! assert_eq!(processor.sink().count(GestureKind::Tap), 1);
//! ```

mod config;
mod controller;
mod error;
mod event;
mod geometry;
mod gesture;
mod pointer;
mod processor;
pub mod recognizer;
mod timer;
mod trace;

pub use config::GestureOptions;
pub use controller::{
    EventFamily, GestureController, ListenerOptions, Subscription, SurfaceCapabilities,
};
pub use error::{ConfigError, SinkError, TraceError};
pub use event::{Phase, PointerId, PointerKind, RawInput, TouchContact};
pub use geometry::{Point, Rect};
pub use gesture::{
    angle, direction_from_angle, velocity, CallbackSink, Coordinator, GestureEvent, GestureKind,
    GestureSink, Recognizer, RecognizerContext, RecordingSink, SwipeDirection, SwipeGesture,
};
pub use pointer::{Pointer, PointerTracker, Surface, TOUCH_PRESSURE};
pub use processor::EventProcessor;
pub use recognizer::{DoubleTapRecognizer, LongPressRecognizer, SwipeRecognizer, TapRecognizer};
pub use timer::{Expired, TimerHandle, TimerKind, TimerQueue};
pub use trace::{Trace, TraceEvent};
