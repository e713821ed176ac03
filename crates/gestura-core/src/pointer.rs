//! Pointer tracking: normalizes mouse, pen and touch input into one model.
//!
//! [`PointerTracker`] owns one [`Pointer`] per active identifier. Every update
//! replaces the stored record; the start and original fields of a contact are
//! carried over from the record that began it.

use crate::event::{PointerId, PointerKind, RawInput};
use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Pressure reported for touch contacts, which carry no pressure data.
pub const TOUCH_PRESSURE: f32 = 0.5;

/// The input region that supplies bounding geometry.
///
/// Queried on every extraction since the bounds can change between events.
pub trait Surface {
    /// Current bounding box in surface space.
    fn bounds(&self) -> Rect;
}

impl Surface for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl Surface for Cell<Rect> {
    fn bounds(&self) -> Rect {
        self.get()
    }
}

impl<S: Surface + ?Sized> Surface for Rc<S> {
    fn bounds(&self) -> Rect {
        (**self).bounds()
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn bounds(&self) -> Rect {
        (**self).bounds()
    }
}

/// Normalized snapshot of one contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    /// Pointer identifier
    pub identifier: PointerId,
    /// Device kind
    pub kind: PointerKind,
    /// Current absolute position
    pub position: Point,
    /// Position at first observation of this contact
    pub start: Point,
    /// Baseline position for distance, never changed once set
    pub original_start: Point,
    /// Baseline time for duration, never changed once set
    pub original_timestamp: f64,
    /// Time of the event this snapshot was computed from
    pub timestamp: f64,
    /// Position relative to the surface's top-left corner
    pub scaled: Point,
    /// Position normalized by surface size (unclamped)
    pub relative: Point,
    /// Distance from the original start
    pub distance: f32,
    /// Milliseconds since the original timestamp, never negative
    pub duration: f64,
    /// Pressure (0.0 to 1.0)
    pub pressure: f32,
    /// Pen tilt along x, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_x: Option<f32>,
    /// Pen tilt along y, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_y: Option<f32>,
}

/// Device fields pulled out of a raw event.
#[derive(Debug, Clone, Copy)]
struct Sample {
    identifier: PointerId,
    kind: PointerKind,
    position: Point,
    pressure: f32,
    tilt_x: Option<f32>,
    tilt_y: Option<f32>,
    timestamp: f64,
}

impl Sample {
    fn extract(input: &RawInput) -> Option<Self> {
        match input {
            RawInput::Mouse {
                position,
                timestamp,
            } => Some(Self {
                identifier: PointerId::MOUSE,
                kind: PointerKind::Mouse,
                position: *position,
                pressure: 0.0,
                tilt_x: None,
                tilt_y: None,
                timestamp: *timestamp,
            }),
            RawInput::Pointer {
                pointer_id,
                pointer_type,
                position,
                pressure,
                tilt_x,
                tilt_y,
                timestamp,
            } => Some(Self {
                identifier: *pointer_id,
                kind: *pointer_type,
                position: *position,
                pressure: *pressure,
                tilt_x: *tilt_x,
                tilt_y: *tilt_y,
                timestamp: *timestamp,
            }),
            RawInput::Touch {
                changed_touches,
                timestamp,
                ..
            } => {
                let touch = changed_touches.first()?;
                Some(Self {
                    identifier: PointerId(touch.identifier),
                    kind: PointerKind::Touch,
                    position: touch.position,
                    pressure: TOUCH_PRESSURE,
                    tilt_x: None,
                    tilt_y: None,
                    timestamp: *timestamp,
                })
            }
        }
    }
}

/// Tracks one [`Pointer`] per active identifier.
pub struct PointerTracker {
    surface: Box<dyn Surface>,
    /// Active pointers in insertion order.
    pointers: Vec<Pointer>,
}

impl PointerTracker {
    /// Create a tracker reading bounds from `surface`.
    pub fn new(surface: impl Surface + 'static) -> Self {
        Self {
            surface: Box::new(surface),
            pointers: Vec::new(),
        }
    }

    /// Begin a contact. The pointer becomes its own baseline.
    ///
    /// Overwrites any pointer already tracked under the same identifier.
    /// Returns `None` when a touch event carries no changed touches.
    pub fn begin(&mut self, input: &RawInput) -> Option<Pointer> {
        let sample = Sample::extract(input)?;
        let pointer = self.compose(sample, None);
        match self.index_of(pointer.identifier) {
            Some(index) => self.pointers[index] = pointer.clone(),
            None => self.pointers.push(pointer.clone()),
        }
        Some(pointer)
    }

    /// Update a tracked contact, keeping its start and original fields.
    ///
    /// Returns `None` without mutating anything if the identifier is not tracked.
    pub fn update(&mut self, input: &RawInput) -> Option<Pointer> {
        let sample = Sample::extract(input)?;
        let index = self.index_of(sample.identifier)?;
        let pointer = self.compose(sample, Some(&self.pointers[index]));
        self.pointers[index] = pointer.clone();
        Some(pointer)
    }

    /// End a contact and stop tracking it.
    ///
    /// The final snapshot is returned even if the identifier was never tracked,
    /// in which case it is computed against itself.
    pub fn end(&mut self, input: &RawInput) -> Option<Pointer> {
        let sample = Sample::extract(input)?;
        let index = self.index_of(sample.identifier);
        let pointer = self.compose(sample, index.map(|i| &self.pointers[i]));
        if let Some(index) = index {
            self.pointers.remove(index);
        }
        Some(pointer)
    }

    /// Compute the snapshot `update` would store, without storing it.
    pub fn measure(&self, input: &RawInput) -> Option<Pointer> {
        let sample = Sample::extract(input)?;
        let index = self.index_of(sample.identifier)?;
        Some(self.compose(sample, Some(&self.pointers[index])))
    }

    /// Get a tracked pointer by identifier.
    pub fn get(&self, identifier: PointerId) -> Option<&Pointer> {
        self.pointers.iter().find(|p| p.identifier == identifier)
    }

    /// Snapshot of all tracked pointers in insertion order.
    pub fn all(&self) -> Vec<Pointer> {
        self.pointers.clone()
    }

    /// Drop every tracked pointer.
    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    /// Identifier carried by an event, without touching tracker state.
    pub fn id_of(&self, input: &RawInput) -> Option<PointerId> {
        match input {
            RawInput::Mouse { .. } => Some(PointerId::MOUSE),
            RawInput::Pointer { pointer_id, .. } => Some(*pointer_id),
            RawInput::Touch {
                changed_touches, ..
            } => changed_touches.first().map(|t| PointerId(t.identifier)),
        }
    }

    /// Number of tracked pointers.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Whether no pointer is tracked.
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    fn index_of(&self, identifier: PointerId) -> Option<usize> {
        self.pointers
            .iter()
            .position(|p| p.identifier == identifier)
    }

    fn compose(&self, sample: Sample, baseline: Option<&Pointer>) -> Pointer {
        let bounds = self.surface.bounds();
        let scaled = bounds.to_local(sample.position);
        let relative = bounds.normalize(scaled);

        let (start, original_start, original_timestamp) = baseline.map_or(
            (sample.position, sample.position, sample.timestamp),
            |p| (p.start, p.original_start, p.original_timestamp),
        );

        let elapsed = sample.timestamp - original_timestamp;

        Pointer {
            identifier: sample.identifier,
            kind: sample.kind,
            position: sample.position,
            start,
            original_start,
            original_timestamp,
            timestamp: sample.timestamp,
            scaled,
            relative,
            distance: original_start.distance(&sample.position),
            duration: if elapsed > 0.0 { elapsed } else { 0.0 },
            pressure: sample.pressure,
            tilt_x: sample.tilt_x,
            tilt_y: sample.tilt_y,
        }
    }
}

impl fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerTracker")
            .field("bounds", &self.surface.bounds())
            .field("pointers", &self.pointers)
            .finish()
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::TouchContact;
    use proptest::prelude::*;

    fn tracker() -> PointerTracker {
        PointerTracker::new(Rect::new(10.0, 20.0, 200.0, 100.0))
    }

    #[test]
    fn test_begin_mouse_is_own_baseline() {
        let mut tracker = tracker();
        let p = tracker.begin(&RawInput::mouse(60.0, 70.0, 100.0)).unwrap();

        assert_eq!(p.identifier, PointerId::MOUSE);
        assert_eq!(p.kind, PointerKind::Mouse);
        assert_eq!(p.start, Point::new(60.0, 70.0));
        assert_eq!(p.original_start, Point::new(60.0, 70.0));
        assert_eq!(p.distance, 0.0);
        assert_eq!(p.duration, 0.0);
        assert_eq!(p.pressure, 0.0);
        assert_eq!(p.scaled, Point::new(50.0, 50.0));
        assert!((p.relative.x - 0.25).abs() < 1e-6);
        assert!((p.relative.y - 0.5).abs() < 1e-6);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_begin_pointer_passes_device_fields() {
        let mut tracker = tracker();
        let input = RawInput::pointer(5, PointerKind::Pen, 10.0, 20.0, 0.0)
            .with_pressure(0.8)
            .with_tilt(15.0, -15.0);
        let p = tracker.begin(&input).unwrap();

        assert_eq!(p.identifier, PointerId(5));
        assert_eq!(p.kind, PointerKind::Pen);
        assert_eq!(p.pressure, 0.8);
        assert_eq!(p.tilt_x, Some(15.0));
        assert_eq!(p.tilt_y, Some(-15.0));
    }

    #[test]
    fn test_begin_touch_uses_first_changed_touch() {
        let mut tracker = tracker();
        let input = RawInput::Touch {
            touches: vec![TouchContact::new(1, 0.0, 0.0), TouchContact::new(2, 5.0, 5.0)],
            changed_touches: vec![TouchContact::new(2, 5.0, 5.0)],
            timestamp: 0.0,
        };
        let p = tracker.begin(&input).unwrap();

        assert_eq!(p.identifier, PointerId(2));
        assert_eq!(p.kind, PointerKind::Touch);
        assert_eq!(p.pressure, TOUCH_PRESSURE);
        assert_eq!(p.tilt_x, None);
    }

    #[test]
    fn test_begin_empty_touch_is_ignored() {
        let mut tracker = tracker();
        let input = RawInput::Touch {
            touches: Vec::new(),
            changed_touches: Vec::new(),
            timestamp: 0.0,
        };
        assert!(tracker.begin(&input).is_none());
        assert!(tracker.is_empty());
        assert_eq!(tracker.id_of(&input), None);
    }

    #[test]
    fn test_update_keeps_baseline() {
        let mut tracker = tracker();
        tracker.begin(&RawInput::mouse(0.0, 0.0, 100.0));
        let p = tracker.update(&RawInput::mouse(3.0, 4.0, 150.0)).unwrap();

        assert_eq!(p.start, Point::ORIGIN);
        assert_eq!(p.original_start, Point::ORIGIN);
        assert_eq!(p.original_timestamp, 100.0);
        assert!((p.distance - 5.0).abs() < 1e-6);
        assert_eq!(p.duration, 50.0);
        assert_eq!(
            tracker.get(PointerId::MOUSE).unwrap().position,
            Point::new(3.0, 4.0)
        );
    }

    #[test]
    fn test_update_untracked_is_noop() {
        let mut tracker = tracker();
        tracker.begin(&RawInput::pointer(1, PointerKind::Touch, 0.0, 0.0, 0.0));

        let result = tracker.update(&RawInput::pointer(9, PointerKind::Touch, 5.0, 5.0, 10.0));

        assert!(result.is_none());
        assert_eq!(tracker.len(), 1);
        assert!(tracker.get(PointerId(9)).is_none());
    }

    #[test]
    fn test_negative_duration_is_zero() {
        let mut tracker = tracker();
        tracker.begin(&RawInput::mouse(0.0, 0.0, 100.0));
        let p = tracker.update(&RawInput::mouse(1.0, 0.0, 40.0)).unwrap();
        assert_eq!(p.duration, 0.0);
    }

    #[test]
    fn test_end_removes_and_returns_snapshot() {
        let mut tracker = tracker();
        tracker.begin(&RawInput::touch(3, 0.0, 0.0, 0.0));
        let p = tracker.end(&RawInput::touch_lifted(3, 6.0, 8.0, 30.0)).unwrap();

        assert!((p.distance - 10.0).abs() < 1e-6);
        assert_eq!(p.duration, 30.0);
        assert!(tracker.get(PointerId(3)).is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_end_untracked_returns_self_baseline() {
        let mut tracker = tracker();
        let p = tracker.end(&RawInput::mouse(6.0, 8.0, 30.0)).unwrap();
        assert_eq!(p.distance, 0.0);
        assert_eq!(p.duration, 0.0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_measure_does_not_store() {
        let mut tracker = tracker();
        tracker.begin(&RawInput::mouse(0.0, 0.0, 0.0));
        let p = tracker.measure(&RawInput::mouse(10.0, 0.0, 20.0)).unwrap();

        assert_eq!(p.distance, 10.0);
        assert_eq!(
            tracker.get(PointerId::MOUSE).unwrap().position,
            Point::ORIGIN
        );
        assert!(tracker
            .measure(&RawInput::pointer(4, PointerKind::Pen, 0.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_rebegin_resets_start_and_keeps_slot() {
        let mut tracker = tracker();
        tracker.begin(&RawInput::pointer(1, PointerKind::Touch, 0.0, 0.0, 0.0));
        tracker.begin(&RawInput::pointer(2, PointerKind::Touch, 9.0, 9.0, 0.0));
        let p = tracker
            .begin(&RawInput::pointer(1, PointerKind::Touch, 50.0, 50.0, 100.0))
            .unwrap();

        assert_eq!(p.start, Point::new(50.0, 50.0));
        assert_eq!(p.original_timestamp, 100.0);
        let ids: Vec<_> = tracker.all().iter().map(|p| p.identifier).collect();
        assert_eq!(ids, vec![PointerId(1), PointerId(2)]);
    }

    #[test]
    fn test_all_is_insertion_ordered_and_clear() {
        let mut tracker = tracker();
        for id in [4, 1, 3] {
            tracker.begin(&RawInput::pointer(id, PointerKind::Touch, 0.0, 0.0, 0.0));
        }
        let ids: Vec<_> = tracker.all().iter().map(|p| p.identifier.0).collect();
        assert_eq!(ids, vec![4, 1, 3]);

        tracker.clear();
        assert!(tracker.all().is_empty());
    }

    #[test]
    fn test_id_of() {
        let tracker = tracker();
        assert_eq!(
            tracker.id_of(&RawInput::mouse(0.0, 0.0, 0.0)),
            Some(PointerId::MOUSE)
        );
        assert_eq!(
            tracker.id_of(&RawInput::pointer(7, PointerKind::Pen, 0.0, 0.0, 0.0)),
            Some(PointerId(7))
        );
        assert_eq!(
            tracker.id_of(&RawInput::touch(3, 0.0, 0.0, 0.0)),
            Some(PointerId(3))
        );
    }

    #[test]
    fn test_surface_queried_on_every_extraction() {
        let bounds = Rc::new(Cell::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let mut tracker = PointerTracker::new(Rc::clone(&bounds));

        let first = tracker.begin(&RawInput::mouse(50.0, 50.0, 0.0)).unwrap();
        assert_eq!(first.scaled, Point::new(50.0, 50.0));

        bounds.set(Rect::new(25.0, 0.0, 50.0, 100.0));
        let second = tracker.update(&RawInput::mouse(50.0, 50.0, 10.0)).unwrap();
        assert_eq!(second.scaled, Point::new(25.0, 50.0));
        assert!((second.relative.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tracker_debug() {
        let debug = format!("{:?}", tracker());
        assert!(debug.contains("PointerTracker"));
    }

    proptest! {
        #[test]
        fn prop_removed_after_end(id in 0u32..16, x in -500.0f32..500.0, y in -500.0f32..500.0) {
            let mut tracker = tracker();
            tracker.begin(&RawInput::pointer(id, PointerKind::Touch, x, y, 0.0));
            tracker.end(&RawInput::pointer(id, PointerKind::Touch, x, y, 10.0));
            prop_assert!(tracker.get(PointerId(id)).is_none());
        }

        #[test]
        fn prop_distance_and_duration_non_negative(
            x0 in -500.0f32..500.0, y0 in -500.0f32..500.0,
            x1 in -500.0f32..500.0, y1 in -500.0f32..500.0,
            t0 in 0.0f64..1e6, t1 in 0.0f64..1e6,
        ) {
            let mut tracker = tracker();
            tracker.begin(&RawInput::mouse(x0, y0, t0));
            let p = tracker.update(&RawInput::mouse(x1, y1, t1)).unwrap();
            prop_assert!(p.distance >= 0.0);
            prop_assert!(p.duration >= 0.0);
            prop_assert_eq!(p.original_start, Point::new(x0, y0));
        }
    }
}
