//! Freehand stroke.

use super::{ObjectTrait, STROKE_HIT_SLOP, scale_point};
use crate::geometry::{BoundingBox, Sample, rgba};
use crate::render::Painter;
use crate::smoothing::{SmoothingParams, smooth};
use kurbo::{BezPath, Cap, Join, Point, Vec2};
use peniko::Color;

/// Default pen width in pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

/// A freehand stroke built from pointer samples.
///
/// Raw samples are kept while the stroke is being drawn and the smoothed
/// points are recomputed from them after every new sample. Completing the
/// stroke drops the raw samples; only the smoothed points are rendered.
#[derive(Debug, Clone)]
pub struct Stroke {
    raw: Vec<Sample>,
    points: Vec<Point>,
    /// Line width in pixels.
    pub width: f64,
    /// Stroke color, alpha included.
    pub color: Color,
    params: SmoothingParams,
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(DEFAULT_STROKE_WIDTH, rgba(0.0, 0.0, 0.8, 1.0))
    }
}

impl Stroke {
    pub fn new(width: f64, color: Color) -> Self {
        Self::with_params(width, color, SmoothingParams::default())
    }

    pub fn with_params(width: f64, color: Color, params: SmoothingParams) -> Self {
        Self {
            raw: Vec::new(),
            points: Vec::new(),
            width,
            color,
            params,
        }
    }

    /// Build a completed stroke directly from render points.
    pub fn from_points(points: Vec<Point>, width: f64, color: Color) -> Self {
        Self {
            raw: Vec::new(),
            points,
            width,
            color,
            params: SmoothingParams::default(),
        }
    }

    /// Append a raw sample and refresh the smoothed points.
    pub fn add_point(&mut self, position: Point) {
        self.raw.push(Sample::new(position));
        let raw: Vec<Point> = self.raw.iter().map(|s| s.position).collect();
        self.points = smooth(&raw, &self.params);
    }

    /// Discard the raw samples, keeping the smoothed points.
    pub fn complete(&mut self) {
        self.raw.clear();
        self.raw.shrink_to_fit();
    }

    /// Smoothed render points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Raw samples still held by the stroke.
    pub fn samples(&self) -> &[Sample] {
        &self.raw
    }

    /// Last smoothed point, used for the jitter gate while drawing.
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Polyline through the smoothed points.
    pub fn path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
        }
        path
    }

    /// Round-capped, round-joined stroke style at the given width.
    pub fn style(width: f64) -> kurbo::Stroke {
        kurbo::Stroke::new(width)
            .with_caps(Cap::Round)
            .with_join(Join::Round)
    }

    /// Draw with an overridden color and width. Needs at least two points.
    pub fn draw_with(&self, painter: &mut dyn Painter, color: Color, width: f64) {
        if self.points.len() < 2 {
            return;
        }
        painter.stroke_path(&self.path(), &Self::style(width), color);
    }
}

impl ObjectTrait for Stroke {
    fn bounding_box(&self) -> BoundingBox {
        let Some((first, rest)) = self.points.split_first() else {
            return BoundingBox::default();
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in rest {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y).inflate(self.width / 2.0)
    }

    /// Point-proximity test against the smoothed points only.
    fn hit_test(&self, point: Point) -> bool {
        let tolerance = self.width / 2.0 + STROKE_HIT_SLOP;
        self.points.iter().any(|p| p.distance(point) <= tolerance)
    }

    fn intersects_disc(&self, center: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance(center) <= radius)
    }

    fn intersects_rect(&self, rect: &BoundingBox) -> bool {
        self.points.iter().any(|p| rect.contains(*p))
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    fn scale(&mut self, sx: f64, sy: f64, origin: Point) {
        for point in &mut self.points {
            *point = scale_point(*point, sx, sy, origin);
        }
        self.width *= sx.min(sy);
    }

    fn draw(&self, painter: &mut dyn Painter) {
        self.draw_with(painter, self.color, self.width);
    }
}
