//! Board session: owns the stroke model, the view and the recognizer, and
//! publishes an immutable snapshot after every change.

use crate::camera::ViewState;
use crate::color::ColorError;
use crate::config::BoardConfig;
use crate::gesture::{Effect, GestureRecognizer};
use crate::input::InputEvent;
use crate::stroke::{Stroke, StrokeModel};
use crate::tools::{ToolKind, ToolSettings};
use kurbo::Point;
use std::fmt;
use std::sync::Arc;

/// Handle returned by [`Board::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Everything a render surface needs to paint one frame.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    /// Incremented on every published change.
    pub revision: u64,
    /// Strokes in draw order.
    pub strokes: Arc<[Arc<Stroke>]>,
    pub view: ViewState,
    pub tools: ToolSettings,
}

type Subscriber = Box<dyn FnMut(&BoardSnapshot)>;

/// A single whiteboard session.
pub struct Board {
    strokes: StrokeModel,
    view: ViewState,
    gestures: GestureRecognizer,
    tools: ToolSettings,
    config: BoardConfig,
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("strokes", &self.strokes.len())
            .field("view", &self.view)
            .field("phase", &self.gestures.phase())
            .field("tools", &self.tools)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            strokes: StrokeModel::new(),
            view: config.initial_view(),
            gestures: GestureRecognizer::new(&config),
            tools: ToolSettings::with_color(config.default_color.clone()),
            config,
            revision: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Feed one input event through the gesture recognizer.
    pub fn handle_input(&mut self, event: &InputEvent) -> Effect {
        let effect = self
            .gestures
            .handle(event, &mut self.strokes, &mut self.view, &self.tools);
        if effect.changed() {
            self.publish();
        }
        effect
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.tool
    }

    /// Select the tool for the next stroke.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tools.tool != tool {
            log::info!("Tool: {}", tool.name());
            self.tools.set_tool(tool);
            self.publish();
        }
    }

    /// Select the colour for the next stroke.
    pub fn set_color(&mut self, color: &str) -> Result<(), ColorError> {
        self.tools.set_color(color)?;
        self.publish();
        Ok(())
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// Remove every stroke. Bypasses the gesture pipeline; a stroke in
    /// progress is dropped and its remaining input ignored.
    pub fn clear_all(&mut self) {
        let had_strokes = !self.strokes.is_empty();
        self.gestures.abort_stroke();
        self.strokes.clear_all();
        if had_strokes {
            log::info!("Board cleared");
            self.publish();
        }
    }

    /// Zoom by `factor` around a device point (zoom buttons, shortcuts).
    pub fn zoom_by(&mut self, anchor: Point, factor: f64) -> bool {
        let changed = self.view.zoom_at(anchor, factor);
        if changed {
            self.publish();
        }
        changed
    }

    /// Zoom one configured step in (`true`) or out around `anchor`.
    pub fn zoom_step(&mut self, anchor: Point, zoom_in: bool) -> bool {
        let step = self.config.zoom_step;
        self.zoom_by(anchor, if zoom_in { step } else { 1.0 / step })
    }

    /// Return to scale 1 with no offset.
    pub fn reset_view(&mut self) {
        self.view.reset();
        self.publish();
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn strokes(&self) -> &StrokeModel {
        &self.strokes
    }

    pub fn gestures(&self) -> &GestureRecognizer {
        &self.gestures
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current state as an immutable value.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            revision: self.revision,
            strokes: self.strokes.snapshot(),
            view: self.view,
            tools: self.tools.clone(),
        }
    }

    /// Call `callback` with a fresh snapshot after every change.
    pub fn subscribe(&mut self, callback: impl FnMut(&BoardSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Stop notifying a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn publish(&mut self) {
        self.revision += 1;
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, callback) in &mut self.subscribers {
            callback(&snapshot);
        }
    }
}
