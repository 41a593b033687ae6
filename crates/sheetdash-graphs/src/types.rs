//! Bitmap chart styling

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Fallback when a configured color is not `#RRGGBB`.
pub const FALLBACK_COLOR: RGBColor = RGBColor(0, 0, 0);

/// Size and style of a rendered chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub width: u32,
    pub height: u32,
    pub style: StyleConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            style: StyleConfig::default(),
        }
    }
}

/// Font configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12,
        }
    }
}

/// Margin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20,
            right: 20,
            bottom: 80,
            left: 80,
        }
    }
}

/// Grid line configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub show_x: bool,
    pub show_y: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            show_x: false,
            show_y: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Fill color of the bars, `#RRGGBB`
    pub bar_color: String,
    pub background_color: String,
    pub title_font: FontConfig,
    pub label_font: FontConfig,
    pub margins: MarginConfig,
    pub grid: GridConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            bar_color: "#1F77B4".to_string(),
            background_color: "#FFFFFF".to_string(),
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 24,
            },
            label_font: FontConfig::default(),
            margins: MarginConfig::default(),
            grid: GridConfig::default(),
        }
    }
}

/// Parse `#RRGGBB` into a color.
pub fn parse_hex_color(value: &str) -> Option<RGBColor> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Like [`parse_hex_color`], falling back to black.
pub fn color_or_fallback(value: &str) -> RGBColor {
    parse_hex_color(value).unwrap_or(FALLBACK_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_hex_color("#00ff00"), Some(RGBColor(0, 255, 0)));
        assert_eq!(parse_hex_color(" #0000FF "), Some(RGBColor(0, 0, 255)));
        assert_eq!(parse_hex_color("FF0000"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#ZZ0000"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_color_fallback() {
        assert_eq!(color_or_fallback("invalid"), FALLBACK_COLOR);
        assert_eq!(color_or_fallback("#FFFFFF"), RGBColor(255, 255, 255));
    }

    #[test]
    fn test_default_style() {
        let config = GraphConfig::default();
        assert_eq!((config.width, config.height), (1000, 600));
        assert_eq!(config.style.title_font.size, 24);
        assert!(parse_hex_color(&config.style.bar_color).is_some());
        assert!(parse_hex_color(&config.style.background_color).is_some());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: GraphConfig = serde_json::from_str(r#"{"width": 640}"#).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 600);
        assert_eq!(config.style, StyleConfig::default());
    }
}
