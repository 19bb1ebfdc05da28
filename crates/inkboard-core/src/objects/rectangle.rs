//! Axis-aligned rectangles, committed in batches.

use super::{ObjectTrait, SHAPE_LINE_WIDTH, scale_point};
use crate::geometry::BoundingBox;
use crate::render::Painter;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use peniko::Color;

/// An outlined rectangle with a normalized origin and size.
#[derive(Debug, Clone, Copy)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl RectShape {
    /// Create a rectangle, normalizing negative extents.
    pub fn new(x: f64, y: f64, width: f64, height: f64, color: Color) -> Self {
        Self::from_corners(Point::new(x, y), Point::new(x + width, y + height), color)
    }

    /// Create a rectangle spanning two corner points.
    pub fn from_corners(p1: Point, p2: Point, color: Color) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            color,
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounding_box().contains(point)
    }

    /// Distance from `point` to the filled rectangle; zero inside.
    pub fn distance_to(&self, point: Point) -> f64 {
        let closest = Point::new(
            point.x.clamp(self.x, self.x + self.width),
            point.y.clamp(self.y, self.y + self.height),
        );
        closest.distance(point)
    }

    pub fn path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn scale(&mut self, sx: f64, sy: f64, origin: Point) {
        let origin_corner = scale_point(Point::new(self.x, self.y), sx, sy, origin);
        self.x = origin_corner.x;
        self.y = origin_corner.y;
        self.width *= sx;
        self.height *= sy;
    }

    pub fn draw_with(&self, painter: &mut dyn Painter, color: Color, width: f64) {
        painter.stroke_path(&self.path(), &kurbo::Stroke::new(width), color);
    }
}

/// One or more rectangles committed as a single object.
#[derive(Debug, Clone, Default)]
pub struct RectangleBatch {
    pub rects: Vec<RectShape>,
}

impl RectangleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(rect: RectShape) -> Self {
        Self { rects: vec![rect] }
    }

    pub fn add_rect(&mut self, rect: RectShape) {
        self.rects.push(rect);
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RectShape> {
        self.rects.iter()
    }
}

impl ObjectTrait for RectangleBatch {
    fn bounding_box(&self) -> BoundingBox {
        self.rects
            .iter()
            .map(RectShape::bounding_box)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default()
    }

    fn hit_test(&self, point: Point) -> bool {
        self.rects.iter().any(|r| r.contains(point))
    }

    fn intersects_disc(&self, center: Point, radius: f64) -> bool {
        self.rects.iter().any(|r| r.distance_to(center) <= radius)
    }

    fn intersects_rect(&self, rect: &BoundingBox) -> bool {
        self.rects.iter().any(|r| r.bounding_box().overlaps(rect))
    }

    fn translate(&mut self, delta: Vec2) {
        for rect in &mut self.rects {
            rect.translate(delta);
        }
    }

    fn scale(&mut self, sx: f64, sy: f64, origin: Point) {
        for rect in &mut self.rects {
            rect.scale(sx, sy, origin);
        }
    }

    fn draw(&self, painter: &mut dyn Painter) {
        for rect in &self.rects {
            rect.draw_with(painter, rect.color, SHAPE_LINE_WIDTH);
        }
    }
}
