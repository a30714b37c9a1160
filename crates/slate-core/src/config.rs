//! Board configuration.

use crate::camera::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, ViewState};
use crate::color::StrokeColor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How a single finger touching the surface is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchDrawMode {
    /// The first finger starts a stroke on touch-down. A slow two-finger
    /// pinch leaves a short mark from the first finger.
    #[default]
    Immediate,
    /// The first finger's down position is held until it moves; a second
    /// finger arriving first discards it.
    Deferred,
}

/// Tunables for the input pipeline and rendering of a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Multiplicative zoom per wheel notch.
    pub zoom_step: f64,
    /// Eraser hit radius in device pixels (divided by the zoom when testing).
    pub erase_radius: f64,
    /// Stroke width in device pixels (divided by the zoom when drawing).
    pub stroke_width: f64,
    /// Curve smoothing tension for rendered strokes (0 = straight segments).
    pub tension: f64,
    /// Background dot spacing in logical units.
    pub grid_spacing: f64,
    /// Lower zoom bound.
    pub min_scale: f64,
    /// Upper zoom bound.
    pub max_scale: f64,
    /// Single-finger behaviour on touch screens.
    pub touch_draw_mode: TouchDrawMode,
    /// Colour selected when the board starts.
    pub default_color: StrokeColor,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.1,
            erase_radius: 10.0,
            stroke_width: 5.0,
            tension: 0.5,
            grid_spacing: 20.0,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            touch_draw_mode: TouchDrawMode::Immediate,
            default_color: StrokeColor::default(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded board config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        positive("zoom_step", self.zoom_step)?;
        positive("erase_radius", self.erase_radius)?;
        positive("stroke_width", self.stroke_width)?;
        positive("grid_spacing", self.grid_spacing)?;
        positive("min_scale", self.min_scale)?;
        positive("max_scale", self.max_scale)?;

        if !(0.0..=1.0).contains(&self.tension) {
            return Err(ConfigError::Invalid {
                field: "tension",
                reason: format!("must be within 0..=1, got {}", self.tension),
            });
        }
        if self.min_scale > 1.0 || self.max_scale < 1.0 {
            return Err(ConfigError::Invalid {
                field: "min_scale",
                reason: format!(
                    "zoom range {}..={} must contain 1",
                    self.min_scale, self.max_scale
                ),
            });
        }
        Ok(())
    }

    /// Initial view honouring the configured zoom bounds.
    pub fn initial_view(&self) -> ViewState {
        ViewState::with_limits(self.min_scale, self.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        BoardConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BoardConfig::from_json_str(r##"{ "zoom_step": 1.25, "default_color": "#ff0000" }"##).unwrap();
        assert!((config.zoom_step - 1.25).abs() < f64::EPSILON);
        assert!((config.erase_radius - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.default_color.as_str(), "#ff0000");
        assert_eq!(config.touch_draw_mode, TouchDrawMode::Immediate);
    }

    #[test]
    fn test_touch_mode_names() {
        let config = BoardConfig::from_json_str(r#"{ "touch_draw_mode": "deferred" }"#).unwrap();
        assert_eq!(config.touch_draw_mode, TouchDrawMode::Deferred);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = BoardConfig::from_json_str(r#"{ "zoom_step": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "zoom_step", .. }));

        let err = BoardConfig::from_json_str(r#"{ "tension": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tension", .. }));

        let err = BoardConfig::from_json_str(r#"{ "min_scale": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        let err = BoardConfig::from_json_str(r#"{ "default_color": "blue" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "stroke_width": 3.0, "max_scale": 8.0 }}"#).unwrap();

        let config = BoardConfig::load(file.path()).unwrap();
        assert!((config.stroke_width - 3.0).abs() < f64::EPSILON);
        assert!((config.initial_view().max_scale() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BoardConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
