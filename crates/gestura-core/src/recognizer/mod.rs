//! Gesture state machines.
//!
//! Each recognizer sees every processed event in a fixed order and owns its
//! own timers. They only talk to each other through the
//! [`Coordinator`](crate::gesture::Coordinator).

mod double_tap;
mod long_press;
mod swipe;
mod tap;

pub use double_tap::DoubleTapRecognizer;
pub use long_press::LongPressRecognizer;
pub use swipe::SwipeRecognizer;
pub use tap::TapRecognizer;
