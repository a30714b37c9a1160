//! Gesture recognizer: turns raw pointer, wheel and touch events into
//! stroke edits and view changes.
//!
//! ```text
//!            down / 1st touch            2nd touch
//!   Idle ─────────────────────▶ Drawing ───────────▶ PinchZooming
//!    ▲ ◀──────── up / end ─────────┘                      │
//!    └────────────── fewer than two touches left ─────────┘
//! ```
//!
//! Wheel events zoom in every state.

use crate::camera::{ViewState, wheel_factor};
use crate::config::{BoardConfig, TouchDrawMode};
use crate::input::{InputEvent, MouseButton, TouchId, TouchPhase, TouchSet};
use crate::stroke::StrokeModel;
use crate::tools::{ToolKind, ToolSettings};
use kurbo::Point;

/// Input device feeding the current stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeSource {
    Pointer,
    Touch(TouchId),
}

/// Recognizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// A stroke is in progress; `tool` is fixed for the whole gesture.
    Drawing { tool: ToolKind, source: StrokeSource },
    PinchZooming,
}

/// What a handled event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effect {
    pub strokes_changed: bool,
    pub view_changed: bool,
}

impl Effect {
    pub const NONE: Effect = Effect {
        strokes_changed: false,
        view_changed: false,
    };

    const STROKES: Effect = Effect {
        strokes_changed: true,
        view_changed: false,
    };

    fn view(changed: bool) -> Effect {
        Effect {
            strokes_changed: false,
            view_changed: changed,
        }
    }

    pub fn changed(self) -> bool {
        self.strokes_changed || self.view_changed
    }

    pub fn merge(self, other: Effect) -> Effect {
        Effect {
            strokes_changed: self.strokes_changed || other.strokes_changed,
            view_changed: self.view_changed || other.view_changed,
        }
    }
}

/// Classifies input into draw, wheel-zoom and pinch-zoom intents.
///
/// The recognizer is the only writer of the stroke model and view during a
/// gesture; both are passed in explicitly on every event.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    phase: GesturePhase,
    touches: TouchSet,
    last_pinch_center: Option<Point>,
    last_pinch_distance: Option<f64>,
    /// Deferred mode: first finger's id and device position, not yet drawn.
    pending_touch: Option<(TouchId, Point)>,
    touch_mode: TouchDrawMode,
    erase_radius: f64,
    zoom_step: f64,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl GestureRecognizer {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            phase: GesturePhase::Idle,
            touches: TouchSet::new(),
            last_pinch_center: None,
            last_pinch_distance: None,
            pending_touch: None,
            touch_mode: config.touch_draw_mode,
            erase_radius: config.erase_radius,
            zoom_step: config.zoom_step,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, GesturePhase::Drawing { .. })
    }

    /// Reference center and distance of the pinch in progress.
    pub fn pinch_reference(&self) -> Option<(Point, f64)> {
        self.last_pinch_center.zip(self.last_pinch_distance)
    }

    /// Number of fingers currently down.
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Drop the stroke in progress without touching the stroke model.
    ///
    /// Used when the model is edited outside a gesture, e.g. cleared while a
    /// finger or button is still down. Input for the interrupted gesture is
    /// ignored until the next down. Pinches and wheel zoom are unaffected.
    pub fn abort_stroke(&mut self) {
        self.pending_touch = None;
        if self.is_drawing() {
            log::debug!("Stroke aborted");
            self.phase = GesturePhase::Idle;
        }
    }

    /// Eraser radius in logical units at the given view.
    pub fn erase_radius_at(&self, view: &ViewState) -> f64 {
        self.erase_radius / view.scale()
    }

    /// Process one input event.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        strokes: &mut StrokeModel,
        view: &mut ViewState,
        tools: &ToolSettings,
    ) -> Effect {
        match *event {
            InputEvent::PointerDown {
                position,
                button: MouseButton::Left,
            } => {
                if self.phase == GesturePhase::Idle {
                    self.begin(StrokeSource::Pointer, position, strokes, view, tools)
                } else {
                    Effect::NONE
                }
            }
            InputEvent::PointerMove { position } => match self.phase {
                GesturePhase::Drawing {
                    tool,
                    source: StrokeSource::Pointer,
                } => self.extend(tool, position, strokes, view),
                _ => Effect::NONE,
            },
            InputEvent::PointerUp {
                button: MouseButton::Left,
                ..
            } => {
                if let GesturePhase::Drawing {
                    source: StrokeSource::Pointer,
                    ..
                } = self.phase
                {
                    self.finish(strokes);
                }
                Effect::NONE
            }
            InputEvent::PointerDown { .. } | InputEvent::PointerUp { .. } => Effect::NONE,
            InputEvent::Wheel { position, delta } => {
                Effect::view(view.zoom_at(position, wheel_factor(delta.y, self.zoom_step)))
            }
            InputEvent::Touch {
                id,
                phase,
                position,
            } => match phase {
                TouchPhase::Started => self.touch_started(id, position, strokes, view, tools),
                TouchPhase::Moved => self.touch_moved(id, position, strokes, view, tools),
                TouchPhase::Ended => self.touch_ended(id, strokes, view, tools),
                TouchPhase::Cancelled => {
                    if self.pending_touch.is_some_and(|(pid, _)| pid == id) {
                        self.pending_touch = None;
                    }
                    self.touch_ended(id, strokes, view, tools)
                }
            },
        }
    }

    fn touch_started(
        &mut self,
        id: TouchId,
        position: Point,
        strokes: &mut StrokeModel,
        view: &mut ViewState,
        tools: &ToolSettings,
    ) -> Effect {
        self.touches.insert(id, position);

        match self.touches.len() {
            1 if self.phase == GesturePhase::Idle => match self.touch_mode {
                TouchDrawMode::Immediate => {
                    self.begin(StrokeSource::Touch(id), position, strokes, view, tools)
                }
                TouchDrawMode::Deferred => {
                    self.pending_touch = Some((id, position));
                    Effect::NONE
                }
            },
            2 => {
                self.start_pinch(strokes);
                Effect::NONE
            }
            _ => Effect::NONE,
        }
    }

    fn touch_moved(
        &mut self,
        id: TouchId,
        position: Point,
        strokes: &mut StrokeModel,
        view: &mut ViewState,
        tools: &ToolSettings,
    ) -> Effect {
        if !self.touches.update(id, position) {
            log::debug!("Move for unknown touch {id}");
            return Effect::NONE;
        }

        match self.phase {
            GesturePhase::Drawing {
                tool,
                source: StrokeSource::Touch(tid),
            } if tid == id && self.touches.len() == 1 => self.extend(tool, position, strokes, view),
            GesturePhase::Idle => match self.pending_touch {
                Some((pid, down)) if pid == id && self.touches.len() == 1 => {
                    self.pending_touch = None;
                    let began = self.begin(StrokeSource::Touch(id), down, strokes, view, tools);
                    let tool = tools.tool;
                    began.merge(self.extend(tool, position, strokes, view))
                }
                _ => Effect::NONE,
            },
            GesturePhase::PinchZooming if self.touches.is_pinch_finger(id) => {
                Effect::view(self.pinch_move(view))
            }
            _ => Effect::NONE,
        }
    }

    fn touch_ended(
        &mut self,
        id: TouchId,
        strokes: &mut StrokeModel,
        view: &mut ViewState,
        tools: &ToolSettings,
    ) -> Effect {
        self.touches.remove(id);

        // Deferred tap without movement still leaves a dot
        if let Some((pid, down)) = self.pending_touch {
            if pid == id {
                self.pending_touch = None;
                let effect = self.begin(StrokeSource::Touch(id), down, strokes, view, tools);
                self.finish(strokes);
                return effect;
            }
        }

        match self.phase {
            GesturePhase::Drawing {
                source: StrokeSource::Touch(tid),
                ..
            } if tid == id => self.finish(strokes),
            GesturePhase::PinchZooming if self.touches.len() < 2 => {
                log::debug!("Pinch ended");
                self.last_pinch_center = None;
                self.last_pinch_distance = None;
                self.phase = GesturePhase::Idle;
            }
            GesturePhase::PinchZooming => {
                // The pinch pair may now be a different pair of fingers
                self.seed_pinch();
            }
            _ => {}
        }
        Effect::NONE
    }

    fn begin(
        &mut self,
        source: StrokeSource,
        device: Point,
        strokes: &mut StrokeModel,
        view: &ViewState,
        tools: &ToolSettings,
    ) -> Effect {
        let logical = view.to_logical(device);
        strokes.begin_stroke(tools.tool, tools.color.clone(), logical);
        self.phase = GesturePhase::Drawing {
            tool: tools.tool,
            source,
        };
        log::debug!("{} stroke started at {logical:?}", tools.tool.name());
        Effect::STROKES
    }

    fn extend(
        &mut self,
        tool: ToolKind,
        device: Point,
        strokes: &mut StrokeModel,
        view: &ViewState,
    ) -> Effect {
        let logical = view.to_logical(device);
        match tool {
            ToolKind::Pen => {
                strokes.append_to_active_stroke(logical);
                Effect::STROKES
            }
            ToolKind::Eraser => {
                let removed = strokes.erase_near(logical, self.erase_radius_at(view));
                if removed > 0 {
                    log::debug!("Erased {removed} stroke(s) near {logical:?}");
                    Effect::STROKES
                } else {
                    Effect::NONE
                }
            }
        }
    }

    fn finish(&mut self, strokes: &mut StrokeModel) {
        strokes.end_stroke();
        self.phase = GesturePhase::Idle;
    }

    fn start_pinch(&mut self, strokes: &mut StrokeModel) {
        if self.is_drawing() {
            // The eager stroke stays on the board
            strokes.end_stroke();
        }
        self.pending_touch = None;

        self.seed_pinch();
        self.phase = GesturePhase::PinchZooming;
        log::debug!("Pinch started: {:?}", self.pinch_reference());
    }

    /// Take the current pinch pair as the reference for the next move.
    fn seed_pinch(&mut self) {
        let pair = self.touches.pinch_pair();
        self.last_pinch_center = pair.map(|(a, b)| a.midpoint(b));
        self.last_pinch_distance = pair.map(|(a, b)| a.distance(b));
    }

    /// Scale by the change in finger distance since the previous move,
    /// anchored at the new pinch center.
    fn pinch_move(&mut self, view: &mut ViewState) -> bool {
        let Some((a, b)) = self.touches.pinch_pair() else {
            return false;
        };
        let center = a.midpoint(b);
        let distance = a.distance(b);

        let changed = match self.last_pinch_distance {
            Some(last) if last > f64::EPSILON => view.zoom_at(center, distance / last),
            _ => false,
        };

        self.last_pinch_center = Some(center);
        self.last_pinch_distance = Some(distance);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    struct Harness {
        recognizer: GestureRecognizer,
        strokes: StrokeModel,
        view: ViewState,
        tools: ToolSettings,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_config(BoardConfig::default())
        }

        fn with_config(config: BoardConfig) -> Self {
            Self {
                recognizer: GestureRecognizer::new(&config),
                strokes: StrokeModel::new(),
                view: config.initial_view(),
                tools: ToolSettings::new(),
            }
        }

        fn send(&mut self, event: InputEvent) -> Effect {
            self.recognizer
                .handle(&event, &mut self.strokes, &mut self.view, &self.tools)
        }

        fn down(&mut self, x: f64, y: f64) -> Effect {
            self.send(InputEvent::PointerDown {
                position: Point::new(x, y),
                button: MouseButton::Left,
            })
        }

        fn move_to(&mut self, x: f64, y: f64) -> Effect {
            self.send(InputEvent::PointerMove {
                position: Point::new(x, y),
            })
        }

        fn up(&mut self, x: f64, y: f64) -> Effect {
            self.send(InputEvent::PointerUp {
                position: Point::new(x, y),
                button: MouseButton::Left,
            })
        }

        fn touch(&mut self, id: TouchId, phase: TouchPhase, x: f64, y: f64) -> Effect {
            self.send(InputEvent::Touch {
                id,
                phase,
                position: Point::new(x, y),
            })
        }

        fn pen_stroke(&mut self, points: &[(f64, f64)]) {
            let (x, y) = points[0];
            self.down(x, y);
            for &(x, y) in &points[1..] {
                self.move_to(x, y);
            }
            let (x, y) = points[points.len() - 1];
            self.up(x, y);
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_draw_scenario_identity_view() {
        let mut h = Harness::new();
        assert!(h.down(100.0, 100.0).strokes_changed);
        assert!(h.recognizer.is_drawing());
        h.move_to(150.0, 100.0);
        h.up(150.0, 100.0);

        assert_eq!(h.recognizer.phase(), GesturePhase::Idle);
        assert_eq!(h.strokes.len(), 1);
        assert_eq!(
            h.strokes.strokes()[0].points,
            vec![Point::new(100.0, 100.0), Point::new(150.0, 100.0)]
        );
        assert!(h.strokes.active_stroke().is_none());
    }

    #[test]
    fn test_draw_uses_logical_coordinates() {
        let mut h = Harness::new();
        h.view = ViewState::from_parts(2.0, Vec2::new(10.0, 20.0));
        h.pen_stroke(&[(110.0, 220.0), (130.0, 240.0)]);

        assert_eq!(
            h.strokes.strokes()[0].points,
            vec![Point::new(50.0, 100.0), Point::new(60.0, 110.0)]
        );
    }

    #[test]
    fn test_stroke_records_tool_and_color() {
        let mut h = Harness::new();
        h.tools.set_color("#00ff00").unwrap();
        h.pen_stroke(&[(0.0, 0.0)]);

        let stroke = &h.strokes.strokes()[0];
        assert_eq!(stroke.tool, ToolKind::Pen);
        assert_eq!(stroke.color.as_str(), "#00ff00");
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut h = Harness::new();
        assert_eq!(h.move_to(10.0, 10.0), Effect::NONE);
        assert!(h.strokes.is_empty());
    }

    #[test]
    fn test_right_button_does_not_draw() {
        let mut h = Harness::new();
        h.send(InputEvent::PointerDown {
            position: Point::ZERO,
            button: MouseButton::Right,
        });
        assert_eq!(h.recognizer.phase(), GesturePhase::Idle);
        assert!(h.strokes.is_empty());
    }

    #[test]
    fn test_eraser_scenario() {
        let mut h = Harness::new();
        h.pen_stroke(&[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0)]);
        h.pen_stroke(&[(0.0, 200.0), (40.0, 200.0)]);
        let second = h.strokes.strokes()[1].clone();

        h.tools.set_tool(ToolKind::Eraser);
        // Down far from everything, then move to 3 units from (20, 0)
        h.down(100.0, 100.0);
        let effect = h.move_to(20.0, 3.0);
        h.up(20.0, 3.0);

        assert!(effect.strokes_changed);
        let remaining: Vec<_> = h
            .strokes
            .strokes()
            .iter()
            .filter(|s| s.tool == ToolKind::Pen)
            .collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(**remaining[0], *second);
    }

    #[test]
    fn test_eraser_radius_scales_with_zoom() {
        let mut h = Harness::new();
        h.pen_stroke(&[(0.0, 0.0)]);
        h.view = ViewState::from_parts(4.0, Vec2::ZERO);
        h.tools.set_tool(ToolKind::Eraser);

        // 10 device px at 4x zoom is 2.5 logical units; (3, 0) is out of reach
        h.down(400.0, 400.0);
        h.move_to(12.0, 0.0);
        assert!(h.strokes.strokes().iter().any(|s| s.tool == ToolKind::Pen));

        // (2, 0) logical is within reach
        h.move_to(8.0, 0.0);
        assert!(h.strokes.strokes().iter().all(|s| s.tool == ToolKind::Eraser));
    }

    #[test]
    fn test_tool_is_fixed_for_gesture() {
        let mut h = Harness::new();
        h.down(0.0, 0.0);
        h.tools.set_tool(ToolKind::Eraser);
        h.move_to(1.0, 1.0);
        h.up(1.0, 1.0);

        assert_eq!(h.strokes.strokes()[0].points.len(), 2);
    }

    #[test]
    fn test_wheel_zoom_anchored_at_pointer() {
        let mut h = Harness::new();
        let pointer = Point::new(300.0, 200.0);
        let before = h.view.to_logical(pointer);

        let effect = h.send(InputEvent::Wheel {
            position: pointer,
            delta: Vec2::new(0.0, -100.0),
        });
        assert!(effect.view_changed);
        assert!(approx(h.view.scale(), 1.1));
        let after = h.view.to_logical(pointer);
        assert!(approx(before.x, after.x) && approx(before.y, after.y));

        h.send(InputEvent::Wheel {
            position: pointer,
            delta: Vec2::new(0.0, 100.0),
        });
        assert!(approx(h.view.scale(), 1.0));
    }

    #[test]
    fn test_zero_wheel_delta_zooms_out() {
        let mut h = Harness::new();
        let effect = h.send(InputEvent::Wheel {
            position: Point::ZERO,
            delta: Vec2::ZERO,
        });
        assert!(effect.view_changed);
        assert!(h.view.scale() < 1.0);
    }

    #[test]
    fn test_wheel_while_drawing_keeps_stroke() {
        let mut h = Harness::new();
        h.down(10.0, 10.0);
        h.send(InputEvent::Wheel {
            position: Point::new(10.0, 10.0),
            delta: Vec2::new(0.0, -1.0),
        });
        h.move_to(20.0, 10.0);
        assert!(h.recognizer.is_drawing());
        assert_eq!(h.strokes.strokes()[0].len(), 2);
    }

    #[test]
    fn test_single_touch_draws() {
        let mut h = Harness::new();
        h.touch(1, TouchPhase::Started, 10.0, 10.0);
        h.touch(1, TouchPhase::Moved, 20.0, 10.0);
        h.touch(1, TouchPhase::Ended, 20.0, 10.0);

        assert_eq!(h.recognizer.phase(), GesturePhase::Idle);
        assert_eq!(
            h.strokes.strokes()[0].points,
            vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)]
        );
    }

    #[test]
    fn test_pinch_scale_is_incremental() {
        let mut h = Harness::new();
        // Eager mode: first finger starts a spurious one-point stroke
        h.touch(1, TouchPhase::Started, 100.0, 100.0);
        h.touch(2, TouchPhase::Started, 200.0, 100.0); // d0 = 100
        assert_eq!(h.recognizer.phase(), GesturePhase::PinchZooming);
        assert_eq!(h.strokes.len(), 1);
        assert!(h.strokes.active_stroke().is_none());

        let s0 = h.view.scale();
        h.touch(2, TouchPhase::Moved, 250.0, 100.0); // d1 = 150
        let s1 = h.view.scale();
        assert!(approx(s1, s0 * (150.0 / 100.0)));

        h.touch(1, TouchPhase::Moved, 130.0, 100.0); // d2 = 120
        let s2 = h.view.scale();
        assert!(approx(s2, s1 * (120.0 / 150.0)));
        assert!(approx(s2, s0 * (120.0 / 100.0)));

        // Fingers never append to the spurious stroke
        assert_eq!(h.strokes.strokes()[0].len(), 1);
    }

    #[test]
    fn test_pinch_anchored_at_center() {
        let mut h = Harness::new();
        h.touch(1, TouchPhase::Started, 100.0, 100.0);
        h.touch(2, TouchPhase::Started, 200.0, 100.0);

        // Zoom is anchored at the center after the move
        let center = Point::new(125.0, 100.0);
        let before = h.view.to_logical(center);
        h.touch(1, TouchPhase::Moved, 50.0, 100.0);
        let after = h.view.to_logical(center);
        assert!(approx(before.x, after.x) && approx(before.y, after.y));

        let (ref_center, ref_distance) = h.recognizer.pinch_reference().unwrap();
        assert_eq!(ref_center, Point::new(125.0, 100.0));
        assert!(approx(ref_distance, 150.0));
    }

    #[test]
    fn test_pinch_end_returns_to_idle() {
        let mut h = Harness::new();
        h.touch(1, TouchPhase::Started, 0.0, 0.0);
        h.touch(2, TouchPhase::Started, 100.0, 0.0);
        h.touch(2, TouchPhase::Ended, 100.0, 0.0);

        assert_eq!(h.recognizer.phase(), GesturePhase::Idle);
        assert!(h.recognizer.pinch_reference().is_none());

        // Remaining finger does not draw
        h.touch(1, TouchPhase::Moved, 50.0, 50.0);
        assert_eq!(h.strokes.strokes()[0].len(), 1);

        h.touch(1, TouchPhase::Ended, 50.0, 50.0);
        assert_eq!(h.recognizer.touch_count(), 0);
    }

    #[test]
    fn test_third_finger_ignored_for_pinch() {
        let mut h = Harness::new();
        h.touch(1, TouchPhase::Started, 0.0, 0.0);
        h.touch(2, TouchPhase::Started, 100.0, 0.0);
        h.touch(3, TouchPhase::Started, 500.0, 500.0);
        let scale = h.view.scale();

        assert_eq!(h.touch(3, TouchPhase::Moved, 900.0, 900.0), Effect::NONE);
        assert!(approx(h.view.scale(), scale));

        // Lifting the third finger keeps the pinch alive
        h.touch(3, TouchPhase::Ended, 900.0, 900.0);
        assert_eq!(h.recognizer.phase(), GesturePhase::PinchZooming);
    }

    #[test]
    fn test_lifting_pinch_finger_reseeds_reference() {
        let mut h = Harness::new();
        h.touch(1, TouchPhase::Started, 0.0, 0.0);
        h.touch(2, TouchPhase::Started, 100.0, 0.0);
        h.touch(3, TouchPhase::Started, 300.0, 0.0);

        // Pair becomes fingers 2 and 3, 200 apart
        h.touch(1, TouchPhase::Ended, 0.0, 0.0);
        assert_eq!(h.recognizer.phase(), GesturePhase::PinchZooming);
        assert_eq!(h.recognizer.pinch_reference(), Some((Point::new(200.0, 0.0), 200.0)));

        h.touch(2, TouchPhase::Moved, 101.0, 0.0);
        assert!(approx(h.view.scale(), 199.0 / 200.0));
    }

    #[test]
    fn test_coincident_fingers_do_not_divide_by_zero() {
        let mut h = Harness::new();
        h.touch(1, TouchPhase::Started, 50.0, 50.0);
        h.touch(2, TouchPhase::Started, 50.0, 50.0);
        h.touch(2, TouchPhase::Moved, 80.0, 50.0);

        assert!(h.view.scale().is_finite());
        assert!(approx(h.view.scale(), 1.0));
        // Next move scales relative to the refreshed reference
        h.touch(2, TouchPhase::Moved, 110.0, 50.0);
        assert!(approx(h.view.scale(), 2.0));
    }

    #[test]
    fn test_deferred_mode_discards_stroke_on_pinch() {
        let mut h = Harness::with_config(BoardConfig {
            touch_draw_mode: TouchDrawMode::Deferred,
            ..BoardConfig::default()
        });
        h.touch(1, TouchPhase::Started, 100.0, 100.0);
        assert!(h.strokes.is_empty());

        h.touch(2, TouchPhase::Started, 200.0, 100.0);
        assert_eq!(h.recognizer.phase(), GesturePhase::PinchZooming);
        assert!(h.strokes.is_empty());
    }

    #[test]
    fn test_deferred_mode_commits_on_move() {
        let mut h = Harness::with_config(BoardConfig {
            touch_draw_mode: TouchDrawMode::Deferred,
            ..BoardConfig::default()
        });
        h.touch(1, TouchPhase::Started, 10.0, 10.0);
        let effect = h.touch(1, TouchPhase::Moved, 30.0, 10.0);
        assert!(effect.strokes_changed);
        h.touch(1, TouchPhase::Ended, 30.0, 10.0);

        assert_eq!(
            h.strokes.strokes()[0].points,
            vec![Point::new(10.0, 10.0), Point::new(30.0, 10.0)]
        );
    }

    #[test]
    fn test_deferred_tap_leaves_dot() {
        let mut h = Harness::with_config(BoardConfig {
            touch_draw_mode: TouchDrawMode::Deferred,
            ..BoardConfig::default()
        });
        h.touch(4, TouchPhase::Started, 10.0, 10.0);
        h.touch(4, TouchPhase::Ended, 10.0, 10.0);

        assert_eq!(h.strokes.strokes()[0].points, vec![Point::new(10.0, 10.0)]);
        assert_eq!(h.recognizer.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_deferred_cancel_discards() {
        let mut h = Harness::with_config(BoardConfig {
            touch_draw_mode: TouchDrawMode::Deferred,
            ..BoardConfig::default()
        });
        h.touch(4, TouchPhase::Started, 10.0, 10.0);
        h.touch(4, TouchPhase::Cancelled, 10.0, 10.0);
        assert!(h.strokes.is_empty());
    }

    #[test]
    fn test_touch_cancel_ends_stroke() {
        let mut h = Harness::new();
        h.touch(1, TouchPhase::Started, 0.0, 0.0);
        h.touch(1, TouchPhase::Cancelled, 0.0, 0.0);
        assert_eq!(h.recognizer.phase(), GesturePhase::Idle);
        assert!(h.strokes.active_stroke().is_none());
    }

    #[test]
    fn test_pointer_ignored_while_pinching() {
        let mut h = Harness::new();
        h.touch(1, TouchPhase::Started, 0.0, 0.0);
        h.touch(2, TouchPhase::Started, 100.0, 0.0);
        assert_eq!(h.down(5.0, 5.0), Effect::NONE);
        assert_eq!(h.recognizer.phase(), GesturePhase::PinchZooming);
    }

    #[test]
    fn test_unknown_touch_move_ignored() {
        let mut h = Harness::new();
        assert_eq!(h.touch(42, TouchPhase::Moved, 1.0, 1.0), Effect::NONE);
        assert_eq!(h.touch(42, TouchPhase::Ended, 1.0, 1.0), Effect::NONE);
        assert!(h.strokes.is_empty());
    }
}
