//! Host-facing controller.
//!
//! Hosts deliver native input events by name (`pointerdown`, `touchmove`,
//! `mouseleave`, ...). The controller picks which event family to listen to,
//! translates names into phases and forwards them to an [`EventProcessor`]
//! while enabled.

use crate::config::GestureOptions;
use crate::error::ConfigError;
use crate::event::{Phase, RawInput};
use crate::gesture::{GestureSink, RecordingSink};
use crate::pointer::Surface;
use crate::processor::EventProcessor;
use serde::{Deserialize, Serialize};

/// Input APIs the host surface supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceCapabilities {
    /// Unified pointer events
    pub pointer_events: bool,
    /// Touch events
    pub touch_events: bool,
}

impl SurfaceCapabilities {
    /// Surface supporting every input API.
    pub const ALL: Self = Self {
        pointer_events: true,
        touch_events: true,
    };
}

/// Family of native events the controller subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFamily {
    /// `pointerdown`, `pointermove`, `pointerup`, `pointercancel`
    Pointer,
    /// `touchstart`, `touchmove`, `touchend`, `touchcancel`
    Touch,
    /// `mousedown`, `mousemove`, `mouseup`, `mouseleave`
    Mouse,
}

impl EventFamily {
    /// Best family for a surface: pointer, then touch, then mouse.
    #[must_use]
    pub const fn detect(capabilities: SurfaceCapabilities) -> Self {
        if capabilities.pointer_events {
            Self::Pointer
        } else if capabilities.touch_events {
            Self::Touch
        } else {
            Self::Mouse
        }
    }

    /// Native event name for a phase.
    #[must_use]
    pub const fn event_name(self, phase: Phase) -> &'static str {
        match (self, phase) {
            (Self::Pointer, Phase::Start) => "pointerdown",
            (Self::Pointer, Phase::Move) => "pointermove",
            (Self::Pointer, Phase::End) => "pointerup",
            (Self::Pointer, Phase::Cancel) => "pointercancel",
            (Self::Touch, Phase::Start) => "touchstart",
            (Self::Touch, Phase::Move) => "touchmove",
            (Self::Touch, Phase::End) => "touchend",
            (Self::Touch, Phase::Cancel) => "touchcancel",
            (Self::Mouse, Phase::Start) => "mousedown",
            (Self::Mouse, Phase::Move) => "mousemove",
            (Self::Mouse, Phase::End) => "mouseup",
            (Self::Mouse, Phase::Cancel) => "mouseleave",
        }
    }

    /// Phase for a native event name of this family.
    #[must_use]
    pub fn phase_of(self, name: &str) -> Option<Phase> {
        Phase::ALL
            .into_iter()
            .find(|phase| self.event_name(*phase) == name)
    }
}

/// Flags for the host's native listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Listen during the capture phase
    pub capture: bool,
    /// Always `false`: the listener may prevent default handling
    pub passive: bool,
}

/// A native listener the host should install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    /// Native event name
    pub event: &'static str,
    /// Phase the event maps to
    pub phase: Phase,
    /// Listener flags
    pub options: ListenerOptions,
}

/// Gesture recognition bound to one surface.
#[derive(Debug)]
pub struct GestureController<S: GestureSink = RecordingSink> {
    family: EventFamily,
    enabled: bool,
    processor: EventProcessor<S>,
}

impl<S: GestureSink> GestureController<S> {
    /// Create an enabled controller.
    pub fn new(
        options: GestureOptions,
        surface: impl Surface + 'static,
        capabilities: SurfaceCapabilities,
        sink: S,
    ) -> Result<Self, ConfigError> {
        let processor = EventProcessor::try_new(options, surface, sink)?;
        let family = EventFamily::detect(capabilities);
        log::debug!("gesture controller listening to {family:?} events");
        Ok(Self {
            family,
            enabled: true,
            processor,
        })
    }

    /// Event family in use.
    pub const fn family(&self) -> EventFamily {
        self.family
    }

    /// Flags for every native listener.
    pub const fn listener_options(&self) -> ListenerOptions {
        ListenerOptions {
            capture: self.processor.options().capture_events,
            passive: false,
        }
    }

    /// The four listeners the host should install while enabled.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        let options = self.listener_options();
        Phase::ALL
            .into_iter()
            .map(|phase| Subscription {
                event: self.family.event_name(phase),
                phase,
                options,
            })
            .collect()
    }

    /// Start forwarding input. Does nothing if already enabled.
    pub fn enable(&mut self) {
        if !self.enabled {
            log::debug!("gesture controller enabled");
            self.enabled = true;
        }
    }

    /// Stop forwarding input and drop in-flight gestures. Does nothing if
    /// already disabled.
    pub fn disable(&mut self) {
        if self.enabled {
            log::debug!("gesture controller disabled");
            self.enabled = false;
            self.processor.reset();
        }
    }

    /// Whether input is forwarded.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Handle a native event by name. Returns whether it was consumed.
    ///
    /// Names from other families are ignored.
    pub fn handle_event(&mut self, name: &str, input: &RawInput) -> bool {
        match self.family.phase_of(name) {
            Some(phase) => self.handle(input, phase),
            None => {
                log::trace!("ignoring {name} for {:?} family", self.family);
                false
            }
        }
    }

    /// Handle input in a known phase. Returns whether it was consumed.
    pub fn handle(&mut self, input: &RawInput, phase: Phase) -> bool {
        if !self.enabled {
            return false;
        }
        self.processor.process(input, phase);
        true
    }

    /// Advance time without input.
    pub fn tick(&mut self, now: f64) {
        if self.enabled {
            self.processor.tick(now);
        }
    }

    /// Veto the tap in flight.
    pub fn cancel_tap(&mut self) {
        self.processor.cancel_tap();
    }

    /// Merge option changes, validate them and apply them.
    ///
    /// In-flight gestures are dropped. On error the old options stay.
    pub fn update_options(
        &mut self,
        update: impl FnOnce(&mut GestureOptions),
    ) -> Result<(), ConfigError> {
        let mut options = self.processor.options().clone();
        update(&mut options);
        options.validate()?;
        self.processor.reconfigure(options);
        Ok(())
    }

    /// Active options.
    pub const fn options(&self) -> &GestureOptions {
        self.processor.options()
    }

    /// Underlying processor, for inspecting recognizer state.
    pub const fn processor(&self) -> &EventProcessor<S> {
        &self.processor
    }

    /// Event sink.
    pub const fn sink(&self) -> &S {
        self.processor.sink()
    }

    /// Consume the controller, returning its sink.
    pub fn into_sink(self) -> S {
        self.processor.into_sink()
    }
}
