//! Canvas configuration.

use kurbo::Size;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{UiError, UiResult};

/// Logical width of the design canvas.
pub const CANVAS_WIDTH: f64 = 1920.0;
/// Logical height of the design canvas.
pub const CANVAS_HEIGHT: f64 = 1080.0;

/// Press duration after which holding the button over a widget starts a drag.
pub const LONG_CLICK_DURATION_MS: u64 = 150;

/// Smallest widget scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest widget scale.
pub const MAX_SCALE: f64 = 2.0;
/// Widget scale change per wheel notch while dragging.
pub const RESCALE_INCREMENT: f64 = 0.01;

/// Minimum scrollbar thumb length in screen pixels.
pub const MIN_THUMB_LENGTH: f64 = 10.0;

/// Caret blink half-period.
pub const CARET_BLINK_RATE_MS: u64 = 500;

/// Tunables for a canvas instance.
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Name used in log messages.
    pub name: String,
    /// Logical design space all positions are expressed in.
    pub design_size: Size,
    pub long_click_duration_ms: u64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub rescale_increment: f64,
    pub min_thumb_length: f64,
    pub caret_blink_rate_ms: u64,
    /// Cursor glyph size in logical units.
    pub cursor_size: Size,
    /// Maximum log level to enable when the canvas is created.
    ///
    /// The `log` filter is process-wide, so setting this overrides the host
    /// logger's level for every canvas. `None` leaves it alone.
    pub log_level: Option<LevelFilter>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            design_size: Size::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            long_click_duration_ms: LONG_CLICK_DURATION_MS,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            rescale_increment: RESCALE_INCREMENT,
            min_thumb_length: MIN_THUMB_LENGTH,
            caret_blink_rate_ms: CARET_BLINK_RATE_MS,
            cursor_size: Size::new(16.0, 16.0),
            log_level: None,
        }
    }
}

impl CanvasConfig {
    /// Create a config with the given canvas name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> UiResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the sizes and scale range can be laid out.
    pub fn validate(&self) -> UiResult<()> {
        match self.problems().into_iter().next() {
            Some((property, value)) => Err(UiError::InvalidValue {
                property: property.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }

    /// Replace every invalid field with its default, logging each one.
    pub fn repaired(mut self) -> Self {
        let defaults = Self::default();
        for (property, value) in self.problems() {
            log::warn!("[{}] invalid {} {}, using the default", self.name, property, value);
            match property {
                "design_size" => self.design_size = defaults.design_size,
                "scale range" => {
                    self.min_scale = defaults.min_scale;
                    self.max_scale = defaults.max_scale;
                }
                "rescale_increment" => self.rescale_increment = defaults.rescale_increment,
                "min_thumb_length" => self.min_thumb_length = defaults.min_thumb_length,
                _ => {}
            }
        }
        self
    }

    fn problems(&self) -> Vec<(&'static str, String)> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let mut problems = Vec::new();
        if !positive(self.design_size.width) || !positive(self.design_size.height) {
            problems.push(("design_size", format!("{:?}", self.design_size)));
        }
        if !positive(self.min_scale) || !positive(self.max_scale) || self.min_scale > self.max_scale {
            problems.push(("scale range", format!("{}..{}", self.min_scale, self.max_scale)));
        }
        if !self.rescale_increment.is_finite() || self.rescale_increment < 0.0 {
            problems.push(("rescale_increment", self.rescale_increment.to_string()));
        }
        if !self.min_thumb_length.is_finite() || self.min_thumb_length < 0.0 {
            problems.push(("min_thumb_length", self.min_thumb_length.to_string()));
        }
        problems
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> UiResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn long_click_duration(&self) -> Duration {
        Duration::from_millis(self.long_click_duration_ms)
    }

    pub fn caret_blink_rate(&self) -> Duration {
        Duration::from_millis(self.caret_blink_rate_ms)
    }

    /// Clamp a widget scale into the configured range.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}
