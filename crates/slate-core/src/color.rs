//! Stroke colours as CSS hex strings.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Colour string errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 3 or 6 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digit in color: {0:?}")]
    BadDigit(String),
}

/// A validated `#rrggbb` colour, as produced by an HTML colour input.
///
/// Short `#rgb` forms are accepted and expanded; the stored text is always
/// lowercase `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StrokeColor {
    hex: String,
    rgb: [u8; 3],
}

impl StrokeColor {
    pub const BLACK_HEX: &'static str = "#000000";

    /// Parse a colour string.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(s.to_string()));
        }

        let expanded: String = match digits.len() {
            6 => digits.to_ascii_lowercase(),
            3 => digits
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase(),
            _ => return Err(ColorError::BadLength(s.to_string())),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| ColorError::BadDigit(s.to_string()))
        };
        let rgb = [channel(0)?, channel(2)?, channel(4)?];

        Ok(Self {
            hex: format!("#{expanded}"),
            rgb,
        })
    }

    /// Build from RGB channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            hex: format!("#{r:02x}{g:02x}{b:02x}"),
            rgb: [r, g, b],
        }
    }

    /// Normalised `#rrggbb` text.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    pub fn rgb8(&self) -> [u8; 3] {
        self.rgb
    }

    /// Opaque peniko colour for rendering.
    pub fn to_color(&self) -> Color {
        let [r, g, b] = self.rgb;
        Color::from_rgba8(r, g, b, 255)
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::from_rgb8(0, 0, 0)
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl FromStr for StrokeColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StrokeColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StrokeColor> for String {
    fn from(color: StrokeColor) -> Self {
        color.hex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        let c = StrokeColor::parse("#FF8000").unwrap();
        assert_eq!(c.as_str(), "#ff8000");
        assert_eq!(c.rgb8(), [255, 128, 0]);
    }

    #[test]
    fn test_parse_short_form() {
        let c = StrokeColor::parse("#0fa").unwrap();
        assert_eq!(c.as_str(), "#00ffaa");
        assert_eq!(c.rgb8(), [0, 255, 170]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(StrokeColor::parse("000000"), Err(ColorError::MissingHash(_))));
        assert!(matches!(StrokeColor::parse("#0000"), Err(ColorError::BadLength(_))));
        assert!(matches!(StrokeColor::parse("#gg0000"), Err(ColorError::BadDigit(_))));
        assert!(matches!(StrokeColor::parse("#ééé"), Err(ColorError::BadDigit(_))));
    }

    #[test]
    fn test_default_is_black() {
        assert_eq!(StrokeColor::default().as_str(), StrokeColor::BLACK_HEX);
    }

    #[test]
    fn test_serde_as_string() {
        let c = StrokeColor::from_rgb8(18, 52, 86);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#123456\"");
        let back: StrokeColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<StrokeColor>("\"red\"").is_err());
    }
}
