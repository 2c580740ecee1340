//! Chart style configuration.
//!
//! Read from the `[style]` table of the run configuration. Lengths and font
//! sizes are in points, figure size in centimetres, margins are fractions of
//! the figure (left/right from the left edge, top/bottom from the bottom edge).

use crate::utils::error::ConfigError;
use serde::Deserialize;

/// Which axes frame lines are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpineVisibility {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Default for SpineVisibility {
    fn default() -> Self {
        Self {
            top: false,
            right: false,
            bottom: true,
            left: false,
        }
    }
}

/// Visual style of the stacked chart
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartStyle {
    /// Width and height in cm
    pub figure_size: [f64; 2],
    pub font: String,
    pub font_size: f64,
    pub font_weight: String,
    pub axis_width: f64,
    pub line_width: f64,
    pub major_tick_length: f64,
    pub major_tick_width: f64,
    pub minor_tick_length: f64,
    pub minor_tick_width: f64,
    pub tick_font: String,
    pub tick_font_size: f64,
    pub tick_font_weight: String,
    pub adjust_left: f64,
    pub adjust_right: f64,
    pub adjust_top: f64,
    pub adjust_bottom: f64,

    #[serde(default = "default_line_color")]
    pub line_color: String,

    #[serde(default)]
    pub spines: SpineVisibility,

    #[serde(default)]
    pub show_y_axis: bool,
}

fn default_line_color() -> String {
    "black".to_string()
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            figure_size: [7.62, 7.62],
            font: "Arial".to_string(),
            font_size: 9.0,
            font_weight: "normal".to_string(),
            axis_width: 1.5,
            line_width: 1.0,
            major_tick_length: 4.0,
            major_tick_width: 1.0,
            minor_tick_length: 2.0,
            minor_tick_width: 1.0,
            tick_font: "Arial".to_string(),
            tick_font_size: 9.0,
            tick_font_weight: "normal".to_string(),
            adjust_left: 0.12,
            adjust_right: 0.88,
            adjust_top: 0.9,
            adjust_bottom: 0.14,
            line_color: default_line_color(),
            spines: SpineVisibility::default(),
            show_y_axis: false,
        }
    }
}

impl ChartStyle {
    /// Check every numeric field is usable for layout
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [width, height] = self.figure_size;
        positive("style.figure_size", width)?;
        positive("style.figure_size", height)?;
        positive("style.font_size", self.font_size)?;
        positive("style.tick_font_size", self.tick_font_size)?;
        positive("style.line_width", self.line_width)?;

        non_negative("style.axis_width", self.axis_width)?;
        non_negative("style.major_tick_length", self.major_tick_length)?;
        non_negative("style.major_tick_width", self.major_tick_width)?;
        non_negative("style.minor_tick_length", self.minor_tick_length)?;
        non_negative("style.minor_tick_width", self.minor_tick_width)?;

        for (key, value) in [
            ("style.adjust_left", self.adjust_left),
            ("style.adjust_right", self.adjust_right),
            ("style.adjust_top", self.adjust_top),
            ("style.adjust_bottom", self.adjust_bottom),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(key, format!("{} is outside [0, 1]", value)));
            }
        }
        if self.adjust_left >= self.adjust_right {
            return Err(ConfigError::invalid(
                "style.adjust_left",
                "must be less than adjust_right",
            ));
        }
        if self.adjust_bottom >= self.adjust_top {
            return Err(ConfigError::invalid(
                "style.adjust_bottom",
                "must be less than adjust_top",
            ));
        }

        for (key, value) in [
            ("style.font", &self.font),
            ("style.tick_font", &self.tick_font),
            ("style.line_color", &self.line_color),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(key, "must not be empty"));
            }
        }

        Ok(())
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("{} must be positive", value)))
    }
}

fn non_negative(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("{} must not be negative", value)))
    }
}
