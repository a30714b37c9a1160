//! Vello-based renderer implementation.

use crate::renderer::{GridStyle, RenderContext, Renderer};
use crate::smoothing::smooth_path;
use kurbo::{Affine, BezPath, Cap, Circle, Join, Point, Rect, Stroke};
use peniko::{Color, Fill};
use slate_core::stroke::Stroke as BoardStroke;
use slate_core::tools::ToolKind;
use vello::Scene;

/// Dot grids denser than this (device pixels between dots) are skipped.
const MIN_GRID_PIXELS: f64 = 4.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    grid_color: Color,
    eraser_color: Color,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            grid_color: Color::from_rgba8(204, 204, 204, 255),
            eraser_color: Color::from_rgba8(120, 120, 120, 200),
        }
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Build a scene for PNG export: the strokes as currently framed by the
    /// view, on white, without grid or eraser outline.
    ///
    /// Returns the scene and the output bounds in physical pixels, or `None`
    /// when the viewport has no area.
    pub fn build_export_scene(&mut self, ctx: &RenderContext) -> (Scene, Option<Rect>) {
        self.scene.reset();

        let width = ctx.viewport_size.width.round();
        let height = ctx.viewport_size.height.round();
        if width < 1.0 || height < 1.0 {
            return (std::mem::take(&mut self.scene), None);
        }

        let bounds = Rect::new(0.0, 0.0, width, height);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::WHITE, None, &bounds);
        self.render_strokes(ctx);

        (std::mem::take(&mut self.scene), Some(bounds))
    }

    fn render_strokes(&mut self, ctx: &RenderContext) {
        let transform = ctx.transform();
        // Constant on-screen width at any zoom
        let width = ctx.stroke_width / ctx.snapshot.view.scale();
        let style = Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round);

        for stroke in ctx.snapshot.strokes.iter() {
            self.render_stroke(stroke, &style, transform, ctx.tension);
        }
    }

    fn render_stroke(&mut self, stroke: &BoardStroke, style: &Stroke, transform: Affine, tension: f64) {
        // Eraser strokes only record where the eraser went; they paint nothing.
        if stroke.tool == ToolKind::Eraser || stroke.is_empty() {
            return;
        }
        let path = smooth_path(&stroke.points, tension);
        self.scene
            .stroke(style, transform, stroke.color.to_color(), None, &path);
    }

    /// Outline of the erase radius around the pointer.
    fn render_eraser_cursor(&mut self, position: Point, radius: f64, scale_factor: f64) {
        let circle = Circle::new(
            Point::new(position.x * scale_factor, position.y * scale_factor),
            radius * scale_factor,
        );
        let stroke = Stroke::new(1.0 * scale_factor);
        self.scene
            .stroke(&stroke, Affine::IDENTITY, self.eraser_color, None, &circle);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        let transform = ctx.transform();
        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);

        match ctx.grid_style {
            GridStyle::None => {}
            GridStyle::Dots => {
                let zoom = ctx.snapshot.view.scale() * ctx.scale_factor;
                if ctx.grid_spacing * zoom >= MIN_GRID_PIXELS {
                    self.render_grid_dots(viewport, transform, ctx.grid_spacing, zoom);
                }
            }
        }

        self.render_strokes(ctx);

        if let Some((position, radius)) = ctx.eraser_cursor {
            self.render_eraser_cursor(position, radius, ctx.scale_factor);
        }
    }
}

impl VelloRenderer {
    /// Calculate grid bounds from viewport and transform.
    fn grid_bounds(&self, viewport: Rect, transform: Affine, grid_size: f64) -> (f64, f64, f64, f64) {
        let inv = transform.inverse();
        let world_tl = inv * Point::new(viewport.x0, viewport.y0);
        let world_br = inv * Point::new(viewport.x1, viewport.y1);

        let start_x = (world_tl.x / grid_size).floor() * grid_size;
        let start_y = (world_tl.y / grid_size).floor() * grid_size;
        let end_x = (world_br.x / grid_size).ceil() * grid_size;
        let end_y = (world_br.y / grid_size).ceil() * grid_size;

        (start_x, start_y, end_x, end_y)
    }

    /// Render grid as dots at intersections, batched into one path.
    fn render_grid_dots(&mut self, viewport: Rect, transform: Affine, grid_size: f64, zoom: f64) {
        // One device pixel either side, whatever the zoom
        let dot_size = 1.0 / zoom;

        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport, transform, grid_size);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            let mut y = start_y;
            while y <= end_y {
                path.move_to(Point::new(x - dot_size, y - dot_size));
                path.line_to(Point::new(x + dot_size, y - dot_size));
                path.line_to(Point::new(x + dot_size, y + dot_size));
                path.line_to(Point::new(x - dot_size, y + dot_size));
                path.close_path();
                y += grid_size;
            }
            x += grid_size;
        }

        self.scene
            .fill(Fill::NonZero, transform, self.grid_color, None, &path);
    }
}
