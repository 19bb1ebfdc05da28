//! Engine configuration.

use crate::objects::SerializableColor;
use crate::page::PageSettings;
use crate::smoothing::{JITTER_THRESHOLD, SEGMENTS_PER_CURVE, SmoothingParams};
use crate::tools::ToolStyle;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid engine config: {0}")]
    Invalid(String),
}

/// Tunables for the drawing engine. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial background surface width.
    pub width: u32,
    /// Initial background surface height.
    pub height: u32,
    pub jitter_threshold: f64,
    pub segments_per_curve: usize,
    /// Radius of the disc that erases on contact.
    pub eraser_contact_radius: f64,
    /// Radius of the hover preview disc.
    pub eraser_hover_radius: f64,
    pub handle_size: f64,
    /// Smallest per-axis factor a resize step may apply.
    pub min_scale_factor: f64,
    pub redraw_interval_ms: u64,
    pub pen_width: f64,
    pub pen_color: SerializableColor,
    pub rectangle_color: SerializableColor,
    pub circle_color: SerializableColor,
    pub page: PageSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let style = ToolStyle::default();
        Self {
            width: 800,
            height: 600,
            jitter_threshold: JITTER_THRESHOLD,
            segments_per_curve: SEGMENTS_PER_CURVE,
            eraser_contact_radius: crate::eraser::CONTACT_RADIUS,
            eraser_hover_radius: crate::eraser::HOVER_RADIUS,
            handle_size: crate::selection::HANDLE_SIZE,
            min_scale_factor: crate::selection::MIN_SCALE_FACTOR,
            redraw_interval_ms: 16,
            pen_width: style.pen_width,
            pen_color: style.pen_color.into(),
            rectangle_color: style.rectangle_color.into(),
            circle_color: style.circle_color.into(),
            page: PageSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        };
        positive("jitter_threshold", self.jitter_threshold)?;
        positive("eraser_contact_radius", self.eraser_contact_radius)?;
        positive("eraser_hover_radius", self.eraser_hover_radius)?;
        positive("handle_size", self.handle_size)?;
        positive("min_scale_factor", self.min_scale_factor)?;
        positive("pen_width", self.pen_width)?;
        if self.segments_per_curve == 0 {
            return Err(ConfigError::Invalid("segments_per_curve must be at least 1".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn smoothing(&self) -> SmoothingParams {
        SmoothingParams {
            jitter_threshold: self.jitter_threshold,
            segments_per_curve: self.segments_per_curve,
        }
    }

    pub fn style(&self) -> ToolStyle {
        ToolStyle {
            pen_width: self.pen_width,
            pen_color: self.pen_color.into(),
            rectangle_color: self.rectangle_color.into(),
            circle_color: self.circle_color.into(),
        }
    }

    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert!((config.eraser_contact_radius - 10.0).abs() < f64::EPSILON);
        assert!((config.eraser_hover_radius - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.segments_per_curve, 12);
        assert_eq!(config.pen_color, SerializableColor::new(0, 0, 204, 255));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(r#"{"pen_width": 5.0, "width": 320}"#).unwrap();
        assert!((config.pen_width - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 600);
    }

    #[test]
    fn test_invalid_values() {
        let err = EngineConfig::from_json(r#"{"eraser_contact_radius": -1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = EngineConfig::from_json(r#"{"segments_per_curve": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse engine config"));
    }

    #[test]
    fn test_json_roundtrip_keeps_page() {
        let mut config = EngineConfig::default();
        config.page.pattern = crate::page::PagePattern::Grid;
        let json = config.to_json().unwrap();
        let back = EngineConfig::from_json(&json).unwrap();
        assert_eq!(back.page.pattern, crate::page::PagePattern::Grid);
    }
}
