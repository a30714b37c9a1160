//! Platform-neutral pointer, wheel and touch events.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Identifier of one finger, stable from `Started` to `Ended`/`Cancelled`.
pub type TouchId = u64;

/// Lifecycle phase of a touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// A raw input event in device coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        position: Point,
        button: MouseButton,
    },
    PointerMove {
        position: Point,
    },
    PointerUp {
        position: Point,
        button: MouseButton,
    },
    /// Wheel scroll at `position`; `delta.y < 0` means scrolling up.
    Wheel {
        position: Point,
        delta: Vec2,
    },
    /// One touch point changed. Multi-touch arrives as one event per finger.
    Touch {
        id: TouchId,
        phase: TouchPhase,
        position: Point,
    },
}

/// Fingers currently on the surface, in the order they went down.
#[derive(Debug, Clone, Default)]
pub struct TouchSet {
    touches: Vec<(TouchId, Point)>,
}

impl TouchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new finger, or move it if the id is already known.
    pub fn insert(&mut self, id: TouchId, position: Point) {
        match self.touches.iter_mut().find(|(tid, _)| *tid == id) {
            Some(entry) => entry.1 = position,
            None => self.touches.push((id, position)),
        }
    }

    /// Update a known finger. Returns `false` for unknown ids.
    pub fn update(&mut self, id: TouchId, position: Point) -> bool {
        match self.touches.iter_mut().find(|(tid, _)| *tid == id) {
            Some(entry) => {
                entry.1 = position;
                true
            }
            None => false,
        }
    }

    /// Forget a finger. Returns `false` for unknown ids.
    pub fn remove(&mut self, id: TouchId) -> bool {
        let before = self.touches.len();
        self.touches.retain(|(tid, _)| *tid != id);
        self.touches.len() != before
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// Whether `id` is one of the first two fingers (the pinch pair).
    pub fn is_pinch_finger(&self, id: TouchId) -> bool {
        self.touches.iter().take(2).any(|(tid, _)| *tid == id)
    }

    /// Positions of the first two fingers, if at least two are down.
    pub fn pinch_pair(&self) -> Option<(Point, Point)> {
        match self.touches.as_slice() {
            [(_, a), (_, b), ..] => Some((*a, *b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_set_order_and_pair() {
        let mut set = TouchSet::new();
        set.insert(7, Point::new(1.0, 1.0));
        assert!(set.pinch_pair().is_none());

        set.insert(3, Point::new(2.0, 2.0));
        set.insert(9, Point::new(3.0, 3.0));
        assert_eq!(set.pinch_pair(), Some((Point::new(1.0, 1.0), Point::new(2.0, 2.0))));
        assert!(set.is_pinch_finger(3));
        assert!(!set.is_pinch_finger(9));
    }

    #[test]
    fn test_touch_set_update_and_remove() {
        let mut set = TouchSet::new();
        set.insert(1, Point::ZERO);
        assert!(set.update(1, Point::new(4.0, 4.0)));
        assert!(!set.update(2, Point::ZERO));

        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert!(set.is_empty());
    }

    #[test]
    fn test_reinsert_moves_existing_touch() {
        let mut set = TouchSet::new();
        set.insert(1, Point::ZERO);
        set.insert(1, Point::new(5.0, 0.0));
        assert_eq!(set.len(), 1);
    }
}
