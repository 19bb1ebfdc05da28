//! Outlined circles, committed in batches.

use super::{ObjectTrait, SHAPE_LINE_WIDTH, scale_point};
use crate::geometry::BoundingBox;
use crate::render::Painter;
use kurbo::{BezPath, Circle, Point, Shape as KurboShape, Vec2};
use peniko::Color;

/// An outlined circle.
#[derive(Debug, Clone, Copy)]
pub struct CircleShape {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
}

impl CircleShape {
    pub fn new(center: Point, radius: f64, color: Color) -> Self {
        Self {
            center,
            radius: radius.abs(),
            color,
        }
    }

    /// Circle centered on `center` passing through `edge`.
    pub fn through(center: Point, edge: Point, color: Color) -> Self {
        Self::new(center, center.distance(edge), color)
    }

    /// Bounding square of the circle.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.radius
    }

    pub fn path(&self) -> BezPath {
        Circle::new(self.center, self.radius).to_path(0.1)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Scale the center about `origin`; the radius follows the smaller factor.
    pub fn scale(&mut self, sx: f64, sy: f64, origin: Point) {
        self.center = scale_point(self.center, sx, sy, origin);
        self.radius *= sx.min(sy);
    }

    pub fn draw_with(&self, painter: &mut dyn Painter, color: Color, width: f64) {
        painter.stroke_path(&self.path(), &kurbo::Stroke::new(width), color);
    }
}

/// One or more circles committed as a single object.
#[derive(Debug, Clone, Default)]
pub struct CircleBatch {
    pub circles: Vec<CircleShape>,
}

impl CircleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(circle: CircleShape) -> Self {
        Self {
            circles: vec![circle],
        }
    }

    pub fn add_circle(&mut self, circle: CircleShape) {
        self.circles.push(circle);
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CircleShape> {
        self.circles.iter()
    }
}

impl ObjectTrait for CircleBatch {
    fn bounding_box(&self) -> BoundingBox {
        self.circles
            .iter()
            .map(CircleShape::bounding_box)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default()
    }

    fn hit_test(&self, point: Point) -> bool {
        self.circles.iter().any(|c| c.contains(point))
    }

    fn intersects_disc(&self, center: Point, radius: f64) -> bool {
        self.circles
            .iter()
            .any(|c| c.center.distance(center) <= radius + c.radius)
    }

    fn intersects_rect(&self, rect: &BoundingBox) -> bool {
        self.circles.iter().any(|c| c.bounding_box().overlaps(rect))
    }

    fn translate(&mut self, delta: Vec2) {
        for circle in &mut self.circles {
            circle.translate(delta);
        }
    }

    fn scale(&mut self, sx: f64, sy: f64, origin: Point) {
        for circle in &mut self.circles {
            circle.scale(sx, sy, origin);
        }
    }

    fn draw(&self, painter: &mut dyn Painter) {
        for circle in &self.circles {
            circle.draw_with(painter, circle.color, SHAPE_LINE_WIDTH);
        }
    }
}
