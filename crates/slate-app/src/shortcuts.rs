//! Keyboard shortcut registry and documentation.

use crate::ui::UiAction;
use slate_core::tools::ToolKind;
use winit::keyboard::{Key, NamedKey};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub description: &'static str,
    pub action: UiAction,
}

impl Shortcut {
    pub fn new(key: &'static str, ctrl: bool, description: &'static str, action: UiAction) -> Self {
        Self {
            key,
            ctrl,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", self.key)
        } else {
            self.key.to_string()
        }
    }

    fn matches(&self, key: &str, ctrl: bool) -> bool {
        self.ctrl == ctrl && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("P", false, "Pen", UiAction::SetTool(ToolKind::Pen)),
            Shortcut::new("E", false, "Eraser", UiAction::SetTool(ToolKind::Eraser)),
            Shortcut::new("S", true, "Save as PNG", UiAction::ExportPng),
            Shortcut::new("Delete", false, "Clear board", UiAction::ClearAll),
            Shortcut::new("Backspace", false, "Clear board", UiAction::ClearAll),
            Shortcut::new("0", false, "Reset zoom", UiAction::ResetView),
            Shortcut::new("+", false, "Zoom in", UiAction::ZoomIn),
            Shortcut::new("=", false, "Zoom in", UiAction::ZoomIn),
            Shortcut::new("-", false, "Zoom out", UiAction::ZoomOut),
        ]
    }

    /// Action bound to a key, if any.
    pub fn lookup(key: &str, ctrl: bool) -> Option<UiAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, ctrl))
            .map(|shortcut| shortcut.action)
    }

    /// Action bound to a winit logical key, if any.
    pub fn lookup_key(key: &Key, ctrl: bool) -> Option<UiAction> {
        match key {
            Key::Character(c) => Self::lookup(c.as_str(), ctrl),
            Key::Named(NamedKey::Delete) => Self::lookup("Delete", ctrl),
            Key::Named(NamedKey::Backspace) => Self::lookup("Backspace", ctrl),
            _ => None,
        }
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:12} {}", shortcut.format(), shortcut.description);
        }
    }
}
