//! Stroke model: the ordered collection of drawn polylines.

use crate::color::StrokeColor;
use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One continuous drawn path in logical space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Tool the stroke was made with.
    pub tool: ToolKind,
    /// Stroke colour.
    pub color: StrokeColor,
    /// Points in draw order. Never empty.
    pub points: Vec<Point>,
}

impl Stroke {
    /// Create a stroke holding only its down position.
    pub fn new(tool: ToolKind, color: StrokeColor, start: Point) -> Self {
        Self {
            tool,
            color,
            points: vec![start],
        }
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any of the stroke's points lies strictly within `radius` of `point`.
    ///
    /// Only recorded points are tested, not the segments between them.
    pub fn passes_near(&self, point: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance(point) < radius)
    }
}

/// Exclusive owner of every stroke on the board.
///
/// Strokes are held behind `Arc` so snapshots can share them; the active
/// stroke is copied on write if a snapshot still references it.
#[derive(Debug, Clone, Default)]
pub struct StrokeModel {
    strokes: Vec<Arc<Stroke>>,
    /// Whether the last stroke is receiving points.
    active: bool,
}

impl StrokeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new single-point stroke and make it the active one.
    pub fn begin_stroke(&mut self, tool: ToolKind, color: StrokeColor, point: Point) {
        self.strokes.push(Arc::new(Stroke::new(tool, color, point)));
        self.active = true;
    }

    /// Append a point to the active stroke.
    ///
    /// Must only be called between [`begin_stroke`](Self::begin_stroke) and
    /// [`end_stroke`](Self::end_stroke).
    pub fn append_to_active_stroke(&mut self, point: Point) {
        debug_assert!(self.active, "append_to_active_stroke without an active stroke");
        if !self.active {
            log::warn!("Dropping point {point:?}: no active stroke");
            return;
        }
        if let Some(last) = self.strokes.last_mut() {
            Arc::make_mut(last).points.push(point);
        }
    }

    /// Mark that no stroke is receiving points any more.
    pub fn end_stroke(&mut self) {
        self.active = false;
    }

    /// The stroke currently receiving points, if any.
    pub fn active_stroke(&self) -> Option<&Stroke> {
        if self.active {
            self.strokes.last().map(|s| s.as_ref())
        } else {
            None
        }
    }

    /// Remove every stroke with a point within `radius` of `point`.
    ///
    /// Strokes are deleted whole, never trimmed. Returns how many were removed.
    pub fn erase_near(&mut self, point: Point, radius: f64) -> usize {
        if self.active
            && self
                .strokes
                .last()
                .is_some_and(|s| s.passes_near(point, radius))
        {
            self.active = false;
        }

        let before = self.strokes.len();
        self.strokes.retain(|s| !s.passes_near(point, radius));
        before - self.strokes.len()
    }

    /// Remove all strokes.
    pub fn clear_all(&mut self) {
        self.strokes.clear();
        self.active = false;
    }

    /// Strokes in draw order (back to front).
    pub fn strokes(&self) -> &[Arc<Stroke>] {
        &self.strokes
    }

    /// Immutable copy of the stroke list for rendering or export.
    pub fn snapshot(&self) -> Arc<[Arc<Stroke>]> {
        self.strokes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
