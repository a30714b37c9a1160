//! Tool selection for the whiteboard.

use crate::color::{ColorError, StrokeColor};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
}

impl ToolKind {
    /// Display name for tooltips and logs.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Eraser => "Eraser",
        }
    }
}

/// The tool and colour new strokes are created with.
///
/// Set by the toolbar; read by the gesture recognizer when a stroke begins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Currently selected tool.
    pub tool: ToolKind,
    /// Colour applied to new strokes.
    pub color: StrokeColor,
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(color: StrokeColor) -> Self {
        Self {
            tool: ToolKind::default(),
            color,
        }
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    /// Set the current colour from a `#rrggbb` string.
    pub fn set_color(&mut self, color: &str) -> Result<(), ColorError> {
        self.color = StrokeColor::parse(color)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        let mut settings = ToolSettings::new();
        assert_eq!(settings.tool, ToolKind::Pen);

        settings.set_tool(ToolKind::Eraser);
        assert_eq!(settings.tool, ToolKind::Eraser);
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut settings = ToolSettings::new();
        settings.set_color("#ff0000").unwrap();
        assert!(settings.set_color("not a color").is_err());
        assert_eq!(settings.color.as_str(), "#ff0000");
    }

    #[test]
    fn test_tool_serde_names() {
        assert_eq!(serde_json::to_string(&ToolKind::Eraser).unwrap(), "\"eraser\"");
    }
}
