//! Translation of winit window events into board input events.

use kurbo::{Point, Vec2};
use slate_core::input::{InputEvent, MouseButton, TouchPhase};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};

/// Pixels scrolled per wheel line.
const LINE_HEIGHT: f64 = 20.0;

/// Tracks pointer state and converts winit events, which carry physical
/// pixels, into board events in logical (CSS) pixels.
pub struct EventHandler {
    /// Last known pointer position in logical pixels.
    cursor: Point,
    /// Whether the mouse pointer is over the window.
    cursor_inside: bool,
    scale_factor: f64,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl EventHandler {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            cursor: Point::ZERO,
            cursor_inside: false,
            scale_factor,
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Pointer position in logical pixels, if the pointer is over the window.
    pub fn hover_position(&self) -> Option<Point> {
        self.cursor_inside.then_some(self.cursor)
    }

    /// Translate one window event. Returns `None` for events the board
    /// does not consume.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(self.cursor_moved(*position)),
            WindowEvent::CursorEntered { .. } => {
                self.cursor_inside = true;
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_inside = false;
                None
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => self.mouse_wheel(*delta),
            WindowEvent::Touch(touch) => Some(self.touch(touch.id, touch.phase, touch.location)),
            _ => None,
        }
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Point {
        Point::new(position.x / self.scale_factor, position.y / self.scale_factor)
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        self.cursor = self.to_logical(position);
        self.cursor_inside = true;
        InputEvent::PointerMove { position: self.cursor }
    }

    pub fn mouse_input(&self, state: ElementState, button: winit::event::MouseButton) -> Option<InputEvent> {
        let button = match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => return None,
        };
        let position = self.cursor;
        Some(match state {
            ElementState::Pressed => InputEvent::PointerDown { position, button },
            ElementState::Released => InputEvent::PointerUp { position, button },
        })
    }

    /// Wheel events use browser orientation: negative `y` scrolls up.
    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> Option<InputEvent> {
        let delta = match delta {
            MouseScrollDelta::LineDelta(x, y) => Vec2::new(-x as f64 * LINE_HEIGHT, -y as f64 * LINE_HEIGHT),
            MouseScrollDelta::PixelDelta(pos) => {
                Vec2::new(-pos.x / self.scale_factor, -pos.y / self.scale_factor)
            }
        };
        if delta.y == 0.0 {
            return None;
        }
        Some(InputEvent::Wheel {
            position: self.cursor,
            delta,
        })
    }

    pub fn touch(&self, id: u64, phase: winit::event::TouchPhase, location: PhysicalPosition<f64>) -> InputEvent {
        let phase = match phase {
            winit::event::TouchPhase::Started => TouchPhase::Started,
            winit::event::TouchPhase::Moved => TouchPhase::Moved,
            winit::event::TouchPhase::Ended => TouchPhase::Ended,
            winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
        };
        InputEvent::Touch {
            id,
            phase,
            position: self.to_logical(location),
        }
    }
}

/// Whether an event starts an interaction. These are withheld from the board
/// while egui has the pointer; moves and releases always pass through so a
/// stroke dragged over the toolbar still ends.
pub fn starts_interaction(event: &InputEvent) -> bool {
    matches!(
        event,
        InputEvent::PointerDown { .. }
            | InputEvent::Wheel { .. }
            | InputEvent::Touch {
                phase: TouchPhase::Started,
                ..
            }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_converted_to_logical() {
        let mut handler = EventHandler::new(2.0);
        let event = handler.cursor_moved(PhysicalPosition::new(200.0, 100.0));
        assert_eq!(
            event,
            InputEvent::PointerMove {
                position: Point::new(100.0, 50.0)
            }
        );
        assert_eq!(handler.hover_position(), Some(Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_scale_factor_change_applies_to_next_event() {
        let mut handler = EventHandler::new(1.0);
        handler.set_scale_factor(2.0);
        let event = handler.touch(1, winit::event::TouchPhase::Started, PhysicalPosition::new(300.0, 100.0));
        assert_eq!(
            event,
            InputEvent::Touch {
                id: 1,
                phase: TouchPhase::Started,
                position: Point::new(150.0, 50.0),
            }
        );
    }

    #[test]
    fn test_mouse_buttons_use_last_cursor() {
        let mut handler = EventHandler::default();
        handler.cursor_moved(PhysicalPosition::new(10.0, 20.0));

        let down = handler.mouse_input(ElementState::Pressed, winit::event::MouseButton::Left);
        assert_eq!(
            down,
            Some(InputEvent::PointerDown {
                position: Point::new(10.0, 20.0),
                button: MouseButton::Left,
            })
        );
        let up = handler.mouse_input(ElementState::Released, winit::event::MouseButton::Right);
        assert!(matches!(
            up,
            Some(InputEvent::PointerUp {
                button: MouseButton::Right,
                ..
            })
        ));
        assert!(
            handler
                .mouse_input(ElementState::Pressed, winit::event::MouseButton::Back)
                .is_none()
        );
    }

    #[test]
    fn test_wheel_up_is_negative() {
        let handler = EventHandler::default();
        let Some(InputEvent::Wheel { delta, .. }) = handler.mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0)) else {
            panic!("expected wheel event");
        };
        assert!(delta.y < 0.0);

        let Some(InputEvent::Wheel { delta, .. }) =
            handler.mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -30.0)))
        else {
            panic!("expected wheel event");
        };
        assert!(delta.y > 0.0);
    }

    #[test]
    fn test_horizontal_only_wheel_dropped() {
        let handler = EventHandler::default();
        assert!(handler.mouse_wheel(MouseScrollDelta::LineDelta(1.0, 0.0)).is_none());
    }

    #[test]
    fn test_touch_mapping() {
        let handler = EventHandler::new(2.0);
        let event = handler.touch(7, winit::event::TouchPhase::Cancelled, PhysicalPosition::new(40.0, 60.0));
        assert_eq!(
            event,
            InputEvent::Touch {
                id: 7,
                phase: TouchPhase::Cancelled,
                position: Point::new(20.0, 30.0),
            }
        );
    }

    #[test]
    fn test_starts_interaction() {
        assert!(starts_interaction(&InputEvent::PointerDown {
            position: Point::ZERO,
            button: MouseButton::Left,
        }));
        assert!(!starts_interaction(&InputEvent::PointerUp {
            position: Point::ZERO,
            button: MouseButton::Left,
        }));
        assert!(!starts_interaction(&InputEvent::Touch {
            id: 1,
            phase: TouchPhase::Moved,
            position: Point::ZERO,
        }));
    }
}
