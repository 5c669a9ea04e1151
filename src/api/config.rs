use serde::{Deserialize, Serialize};

use crate::core::YScaleMode;
use crate::error::{ChartError, ChartResult};
use crate::interaction::CrosshairMode;
use crate::render::{Color, LineStrokeStyle};

const DEFAULT_PALETTE_RGB: [(u8, u8, u8); 18] = [
    (0x5C, 0xB8, 0xE6),
    (0xCF, 0x5C, 0xE6),
    (0x79, 0x61, 0xF2),
    (0xE6, 0x5C, 0x73),
    (0xE5, 0xB8, 0x5C),
    (0x78, 0xE6, 0x5C),
    (0x91, 0xD2, 0xF2),
    (0xE2, 0x91, 0xF2),
    (0xA0, 0x90, 0xF1),
    (0xF2, 0x91, 0xA1),
    (0xF2, 0xD3, 0x91),
    (0xA5, 0xF2, 0x91),
    (0x3D, 0x7B, 0x99),
    (0x8A, 0x3D, 0x99),
    (0x57, 0x47, 0xA7),
    (0x99, 0x3D, 0x4D),
    (0x99, 0x7B, 0x3D),
    (0x50, 0x99, 0x3D),
];

const MAX_LABEL_DECIMALS: usize = 10;

fn rgb8(red: u8, green: u8, blue: u8) -> Color {
    Color::rgb(
        f64::from(red) / 255.0,
        f64::from(green) / 255.0,
        f64::from(blue) / 255.0,
    )
}

/// Default series palette; series `i` uses entry `i % len`.
#[must_use]
pub fn default_palette() -> Vec<Color> {
    DEFAULT_PALETTE_RGB
        .iter()
        .map(|&(red, green, blue)| rgb8(red, green, blue))
        .collect()
}

/// Chart styling and behavior.
///
/// Serializable so hosts can persist chart setup; missing JSON fields take
/// their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Inset of the plot area from every viewport edge.
    pub padding_px: f64,
    pub palette: Vec<Color>,
    pub series_line_width_px: f64,
    pub crosshair_line_width_px: f64,
    pub cursor_line_width_px: f64,
    pub cursor_point_radius_px: f64,
    pub dash_px: f64,
    pub dash_gap_px: f64,
    pub cursor_color: Color,
    pub cursor_fill_color: Color,
    pub label_font_size_px: f64,
    pub label_box_height_px: f64,
    pub label_padding_px: f64,
    pub label_decimals: usize,
    pub label_text_color: Color,
    pub crosshair_mode: CrosshairMode,
    pub y_scale_mode: YScaleMode,
    /// Draw last-row value labels even without a cursor.
    pub show_last_value_labels: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            padding_px: 40.0,
            palette: default_palette(),
            series_line_width_px: 4.0,
            crosshair_line_width_px: 1.0,
            cursor_line_width_px: 2.0,
            cursor_point_radius_px: 5.0,
            dash_px: 5.0,
            dash_gap_px: 4.0,
            cursor_color: rgb8(0xD3, 0xD3, 0xD3),
            cursor_fill_color: rgb8(0x19, 0x19, 0x1A),
            label_font_size_px: 14.0,
            label_box_height_px: 20.0,
            label_padding_px: 5.0,
            label_decimals: 2,
            label_text_color: Color::WHITE,
            crosshair_mode: CrosshairMode::Magnet,
            y_scale_mode: YScaleMode::PerSeries,
            show_last_value_labels: true,
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn with_padding_px(mut self, padding_px: f64) -> Self {
        self.padding_px = padding_px;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_crosshair_mode(mut self, mode: CrosshairMode) -> Self {
        self.crosshair_mode = mode;
        self
    }

    #[must_use]
    pub fn with_y_scale_mode(mut self, mode: YScaleMode) -> Self {
        self.y_scale_mode = mode;
        self
    }

    #[must_use]
    pub fn with_label_decimals(mut self, decimals: usize) -> Self {
        self.label_decimals = decimals;
        self
    }

    #[must_use]
    pub fn with_last_value_labels(mut self, show: bool) -> Self {
        self.show_last_value_labels = show;
        self
    }

    /// Palette color for the series at `position`, cycling when exhausted.
    #[must_use]
    pub fn series_color(&self, position: usize) -> Color {
        self.palette[position % self.palette.len()]
    }

    #[must_use]
    pub fn dashed_stroke(&self) -> LineStrokeStyle {
        LineStrokeStyle::Dashed {
            dash_px: self.dash_px,
            gap_px: self.dash_gap_px,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.padding_px.is_finite() || self.padding_px < 0.0 {
            return Err(ChartError::InvalidData(
                "padding must be finite and >= 0".to_owned(),
            ));
        }
        if self.palette.is_empty() {
            return Err(ChartError::InvalidData(
                "palette must contain at least one color".to_owned(),
            ));
        }
        for color in &self.palette {
            color.validate()?;
        }
        for (name, value) in [
            ("series line width", self.series_line_width_px),
            ("crosshair line width", self.crosshair_line_width_px),
            ("cursor line width", self.cursor_line_width_px),
            ("cursor point radius", self.cursor_point_radius_px),
            ("label font size", self.label_font_size_px),
            ("label box height", self.label_box_height_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.label_padding_px.is_finite() || self.label_padding_px < 0.0 {
            return Err(ChartError::InvalidData(
                "label padding must be finite and >= 0".to_owned(),
            ));
        }
        if self.label_decimals > MAX_LABEL_DECIMALS {
            return Err(ChartError::InvalidData(format!(
                "label decimals must be <= {MAX_LABEL_DECIMALS}"
            )));
        }
        self.dashed_stroke().validate()?;
        self.cursor_color.validate()?;
        self.cursor_fill_color.validate()?;
        self.label_text_color.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }

    /// Parses and validates a config document.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartConfig, default_palette};
    use crate::core::YScaleMode;
    use crate::interaction::CrosshairMode;
    use crate::render::{Color, LineStrokeStyle};

    #[test]
    fn default_config_is_valid() {
        let config = ChartConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.palette.len(), 18);
        assert_eq!(
            config.palette[0],
            Color::from_hex("#5CB8E6").expect("hex")
        );
    }

    #[test]
    fn series_colors_cycle_through_palette() {
        let config = ChartConfig::default();
        assert_eq!(config.series_color(18), config.series_color(0));
        assert_eq!(config.series_color(19), default_palette()[1]);
    }

    #[test]
    fn default_dash_pattern_is_five_on_four_off() {
        let config = ChartConfig::default();
        assert_eq!(
            config.dashed_stroke(),
            LineStrokeStyle::Dashed {
                dash_px: 5.0,
                gap_px: 4.0
            }
        );

        let parsed = ChartConfig::from_json_str(r#"{ "dash_px": 3.0, "dash_gap_px": 2.0 }"#)
            .expect("config");
        assert_eq!(
            parsed.dashed_stroke(),
            LineStrokeStyle::Dashed {
                dash_px: 3.0,
                gap_px: 2.0
            }
        );
        assert!(ChartConfig::from_json_str(r#"{ "dash_px": 0.0 }"#).is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = ChartConfig::from_json_str(
            r#"{ "padding_px": 24.0, "crosshair_mode": "Normal", "y_scale_mode": "Shared" }"#,
        )
        .expect("config");
        assert_eq!(config.padding_px, 24.0);
        assert_eq!(config.crosshair_mode, CrosshairMode::Normal);
        assert_eq!(config.y_scale_mode, YScaleMode::Shared);
        assert_eq!(config.label_decimals, 2);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = ChartConfig::default()
            .with_padding_px(12.0)
            .with_label_decimals(3)
            .with_last_value_labels(false);
        let json = config.to_json_pretty().expect("serialize");
        let parsed = ChartConfig::from_json_str(&json).expect("parse");
        assert_eq!(parsed.padding_px, 12.0);
        assert_eq!(parsed.label_decimals, 3);
        assert!(!parsed.show_last_value_labels);
        assert_eq!(parsed.palette.len(), config.palette.len());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ChartConfig::default().with_palette(Vec::new()).validate().is_err());
        assert!(ChartConfig::default().with_padding_px(-1.0).validate().is_err());
        assert!(ChartConfig::default().with_label_decimals(11).validate().is_err());
        assert!(ChartConfig::from_json_str(r#"{ "series_line_width_px": 0.0 }"#).is_err());
        assert!(ChartConfig::from_json_str("not json").is_err());
    }
}
