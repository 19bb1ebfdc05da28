//! Geometry and color helpers shared across the engine.

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// A raw pointer sample as captured by the host.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Position in canvas coordinates.
    pub position: Point,
    /// Capture time. Carried along but not used by smoothing.
    pub timestamp: Instant,
}

impl Sample {
    /// Create a sample stamped with the current time.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            timestamp: Instant::now(),
        }
    }
}

/// Axis-aligned box in origin/size form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a box spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::from_rect(Rect::from_points(a, b))
    }

    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Inclusive overlap test; touching edges count as overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }

    /// Grow the box by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self::from_rect(self.to_rect().union(other.to_rect()))
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }
}

/// Build a color from floating point channels in `[0, 1]`.
pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Color {
    Color::new([
        unit(r) as f32,
        unit(g) as f32,
        unit(b) as f32,
        unit(a) as f32,
    ])
}

/// Replace the alpha channel of a color.
pub fn with_alpha(color: Color, alpha: f64) -> Color {
    color.with_alpha(unit(alpha) as f32)
}

/// Alpha channel of a color.
pub fn alpha_of(color: Color) -> f64 {
    f64::from(color.components[3])
}

fn unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Distance from `point` to the segment `a..b`.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < f64::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}
