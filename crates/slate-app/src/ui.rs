//! UI components using egui.

use egui::{
    Align2, Color32, Context, CornerRadius, CursorIcon, FontId, Frame, Margin, Sense, Stroke, Vec2, vec2,
};
use slate_core::board::BoardSnapshot;
use slate_core::tools::ToolKind;

/// Toolbar colours.
mod theme {
    use egui::Color32;

    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    pub const HOVER_BG: Color32 = Color32::from_rgb(235, 235, 235);
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}

const BUTTON_SIZE: f32 = 32.0;

/// UI state mirrored from the board each frame.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current stroke colour as sRGB.
    pub stroke_color: [u8; 3],
    /// Current zoom for display, 1.0 = 100%.
    pub zoom: f64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::Pen,
            stroke_color: [0, 0, 0],
            zoom: 1.0,
        }
    }
}

impl UiState {
    /// Refresh from the latest board snapshot.
    pub fn sync(&mut self, snapshot: &BoardSnapshot) {
        self.current_tool = snapshot.tools.tool;
        self.stroke_color = snapshot.tools.color.rgb8();
        self.zoom = snapshot.view.scale();
    }
}

/// Actions that can be triggered by UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Select a tool.
    SetTool(ToolKind),
    /// Set the stroke colour (`#rrggbb`).
    SetColor(String),
    /// Remove every stroke.
    ClearAll,
    /// Save the board as a PNG image.
    ExportPng,
    /// Zoom in one step around the viewport centre.
    ZoomIn,
    /// Zoom out one step around the viewport centre.
    ZoomOut,
    /// Back to 100% with no offset.
    ResetView,
}

struct Tool {
    kind: ToolKind,
    glyph: &'static str,
    shortcut: &'static str,
}

const TOOLS: [Tool; 2] = [
    Tool {
        kind: ToolKind::Pen,
        glyph: "✏",
        shortcut: "P",
    },
    Tool {
        kind: ToolKind::Eraser,
        glyph: "⌫",
        shortcut: "E",
    },
];

/// Render all UI and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let toolbar_action = render_toolbar(ctx, ui_state);
    let zoom_action = render_zoom_controls(ctx, ui_state);
    toolbar_action.or(zoom_action)
}

/// Floating toolbar on the right edge, vertically centred.
fn render_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::RIGHT_CENTER, Vec2::new(-12.0, 0.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(0.0, 4.0);

                    for tool in &TOOLS {
                        let selected = ui_state.current_tool == tool.kind;
                        if tool_button(ui, tool.glyph, tool.kind.name(), Some(tool.shortcut), selected) {
                            action = Some(UiAction::SetTool(tool.kind));
                        }
                    }

                    panel_separator(ui);

                    let mut color = ui_state.stroke_color;
                    let response = ui
                        .color_edit_button_srgb(&mut color)
                        .on_hover_text("Stroke colour");
                    if response.changed() {
                        action = Some(UiAction::SetColor(color_hex(color)));
                    }

                    panel_separator(ui);

                    if tool_button(ui, "🗑", "Clear board", Some("Delete"), false) {
                        action = Some(UiAction::ClearAll);
                    }
                    if tool_button(ui, "💾", "Save as PNG", Some("Ctrl+S"), false) {
                        action = Some(UiAction::ExportPng);
                    }
                });
            });
        });

    action
}

/// Zoom out / percentage / zoom in, bottom right.
fn render_zoom_controls(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("zoom_controls"))
        .anchor(Align2::RIGHT_BOTTOM, Vec2::new(-12.0, -12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(2.0, 0.0);
                    if tool_button(ui, "−", "Zoom out", Some("-"), false) {
                        action = Some(UiAction::ZoomOut);
                    }
                    let label = egui::Button::new(
                        egui::RichText::new(zoom_label(ui_state.zoom)).color(theme::TEXT),
                    )
                    .frame(false)
                    .min_size(vec2(52.0, BUTTON_SIZE));
                    if ui.add(label).on_hover_text("Reset zoom (0)").clicked() {
                        action = Some(UiAction::ResetView);
                    }
                    if tool_button(ui, "+", "Zoom in", Some("+"), false) {
                        action = Some(UiAction::ZoomIn);
                    }
                });
            });
        });

    action
}

/// Square button showing a glyph, solid accent when selected.
fn tool_button(ui: &mut egui::Ui, glyph: &str, tooltip: &str, shortcut: Option<&str>, selected: bool) -> bool {
    let (rect, response) = ui.allocate_exact_size(vec2(BUTTON_SIZE, BUTTON_SIZE), Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if selected {
            theme::ACCENT
        } else if response.hovered() {
            theme::HOVER_BG
        } else {
            Color32::TRANSPARENT
        };
        ui.painter().rect_filled(rect, CornerRadius::same(6), bg_color);

        let text_color = if selected { Color32::WHITE } else { theme::TEXT };
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            glyph,
            FontId::proportional(18.0),
            text_color,
        );
    }

    let clicked = response.clicked();
    let hover = match shortcut {
        Some(shortcut) => format!("{tooltip} ({shortcut})"),
        None => tooltip.to_string(),
    };
    response.on_hover_text(hover).on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

/// Common panel frame style.
fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(6))
}

/// Horizontal rule between toolbar groups.
fn panel_separator(ui: &mut egui::Ui) {
    let (rect, _) = ui.allocate_exact_size(vec2(BUTTON_SIZE - 8.0, 1.0), Sense::hover());
    ui.painter().rect_filled(rect, 0.0, theme::BORDER);
}

/// Format an sRGB triple as `#rrggbb`.
pub fn color_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn zoom_label(zoom: f64) -> String {
    format!("{:.0}%", zoom * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_core::Board;

    #[test]
    fn test_color_hex() {
        assert_eq!(color_hex([0, 0, 0]), "#000000");
        assert_eq!(color_hex([255, 16, 170]), "#ff10aa");
    }

    #[test]
    fn test_zoom_label() {
        assert_eq!(zoom_label(1.0), "100%");
        assert_eq!(zoom_label(0.05), "5%");
        assert_eq!(zoom_label(1.21), "121%");
    }

    #[test]
    fn test_sync_from_snapshot() {
        let mut board = Board::default();
        board.set_tool(ToolKind::Eraser);
        board.set_color("#102030").unwrap();

        let mut state = UiState::default();
        state.sync(&board.snapshot());
        assert_eq!(state.current_tool, ToolKind::Eraser);
        assert_eq!(state.stroke_color, [0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_render_without_input_triggers_nothing() {
        let ctx = Context::default();
        let state = UiState::default();
        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, &state);
        });
        assert!(action.is_none());
    }
}
