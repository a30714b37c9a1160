//! Slate Core Library
//!
//! Platform-agnostic input pipeline for the Slate whiteboard: the view
//! transform, the stroke model and the gesture recognizer that drives both.

pub mod board;
pub mod camera;
pub mod color;
pub mod config;
pub mod gesture;
pub mod input;
pub mod stroke;
pub mod tools;

pub use board::{Board, BoardSnapshot, SubscriptionId};
pub use camera::ViewState;
pub use color::{ColorError, StrokeColor};
pub use config::{BoardConfig, ConfigError, TouchDrawMode};
pub use gesture::{Effect, GesturePhase, GestureRecognizer};
pub use input::{InputEvent, MouseButton, TouchId, TouchPhase};
pub use stroke::{Stroke, StrokeModel};
pub use tools::{ToolKind, ToolSettings};
