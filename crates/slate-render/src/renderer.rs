//! Renderer trait abstraction.

use kurbo::{Affine, Point, Size};
use peniko::Color;
use slate_core::board::BoardSnapshot;
use slate_core::config::BoardConfig;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Background grid style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// Plain background.
    None,
    /// Dots at grid intersections.
    #[default]
    Dots,
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The board state to render.
    pub snapshot: &'a BoardSnapshot,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Grid spacing in logical units.
    pub grid_spacing: f64,
    /// Stroke width in device pixels, independent of zoom.
    pub stroke_width: f64,
    /// Curve smoothing tension.
    pub tension: f64,
    /// Eraser outline: pointer position in device pixels and radius.
    pub eraser_cursor: Option<(Point, f64)>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with default styling.
    pub fn new(snapshot: &'a BoardSnapshot, viewport_size: Size) -> Self {
        let defaults = BoardConfig::default();
        Self {
            snapshot,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(240, 240, 240, 255),
            grid_style: GridStyle::Dots,
            grid_spacing: defaults.grid_spacing,
            stroke_width: defaults.stroke_width,
            tension: defaults.tension,
            eraser_cursor: None,
        }
    }

    /// Take stroke width, tension and grid spacing from a board config.
    pub fn with_config(mut self, config: &BoardConfig) -> Self {
        self.grid_spacing = config.grid_spacing;
        self.stroke_width = config.stroke_width;
        self.tension = config.tension;
        self
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Show the eraser outline at a device position.
    pub fn with_eraser_cursor(mut self, cursor: Option<(Point, f64)>) -> Self {
        self.eraser_cursor = cursor;
        self
    }

    /// Logical-to-physical-pixel transform for this frame.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.snapshot.view.transform()
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
