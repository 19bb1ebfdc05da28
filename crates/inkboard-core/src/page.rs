//! Page background settings.

use serde::{Deserialize, Serialize};

/// Smallest accepted pattern scale.
pub const MIN_PATTERN_SCALE: f64 = 0.5;
/// Largest accepted pattern scale.
pub const MAX_PATTERN_SCALE: f64 = 3.0;

/// Background pattern drawn behind the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePattern {
    #[default]
    Plain,
    Lined,
    Grid,
    Dotted,
    Graph,
}

impl PagePattern {
    /// Parse a pattern name, accepting display names like "Graph Paper".
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(PagePattern::Plain),
            "lined" => Some(PagePattern::Lined),
            "grid" => Some(PagePattern::Grid),
            "dotted" => Some(PagePattern::Dotted),
            "graph" | "graph paper" => Some(PagePattern::Graph),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PagePattern::Plain => "plain",
            PagePattern::Lined => "lined",
            PagePattern::Grid => "grid",
            PagePattern::Dotted => "dotted",
            PagePattern::Graph => "graph",
        }
    }

    /// Base pattern spacing in pixels at scale 1.
    pub fn base_spacing(self) -> Option<f64> {
        match self {
            PagePattern::Plain => None,
            PagePattern::Lined => Some(25.0),
            PagePattern::Grid => Some(20.0),
            PagePattern::Dotted => Some(15.0),
            PagePattern::Graph => Some(10.0),
        }
    }

    /// Spacing of the heavier lines on graph paper.
    pub fn major_spacing(self) -> Option<f64> {
        match self {
            PagePattern::Graph => Some(50.0),
            _ => None,
        }
    }
}

/// Page pattern and its scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSettings {
    pub pattern: PagePattern,
    pub scale: f64,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            pattern: PagePattern::Plain,
            scale: 1.0,
        }
    }
}

impl PageSettings {
    /// Set the scale, clamped to the accepted range. Non-finite values are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(MIN_PATTERN_SCALE, MAX_PATTERN_SCALE);
        }
    }

    /// Minor spacing after scaling.
    pub fn spacing(&self) -> Option<f64> {
        self.pattern.base_spacing().map(|s| s * self.scale)
    }

    /// Major spacing after scaling.
    pub fn major_spacing(&self) -> Option<f64> {
        self.pattern.major_spacing().map(|s| s * self.scale)
    }
}
