//! Drawable objects: freehand strokes and batches of rectangles and circles.

mod circle;
mod rectangle;
mod stroke;

pub use circle::{CircleBatch, CircleShape};
pub use rectangle::{RectShape, RectangleBatch};
pub use stroke::Stroke;

use crate::geometry::BoundingBox;
use crate::render::Painter;
use kurbo::{Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for committed objects.
pub type ObjectId = Uuid;

/// Line width used to outline rectangles and circles.
pub const SHAPE_LINE_WIDTH: f64 = 2.0;

/// Extra slop added to half the stroke width when hit-testing strokes.
pub const STROKE_HIT_SLOP: f64 = 2.0;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Behaviour shared by every drawable variant.
pub trait ObjectTrait {
    /// Axis-aligned bounds in canvas coordinates.
    fn bounding_box(&self) -> BoundingBox;

    /// Whether a click at `point` lands on the object.
    fn hit_test(&self, point: Point) -> bool;

    /// Whether a disc of `radius` around `center` touches the object.
    fn intersects_disc(&self, center: Point, radius: f64) -> bool;

    /// Whether the object falls inside a drag-selection rectangle.
    fn intersects_rect(&self, rect: &BoundingBox) -> bool;

    fn translate(&mut self, delta: Vec2);

    /// Scale about `origin`.
    fn scale(&mut self, sx: f64, sy: f64, origin: Point);

    /// Draw the object with its own colors.
    fn draw(&self, painter: &mut dyn Painter);
}

/// The variant payload of a drawable object.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Stroke(Stroke),
    Rectangle(RectangleBatch),
    Circle(CircleBatch),
}

impl ObjectKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Stroke(_) => "stroke",
            ObjectKind::Rectangle(_) => "rectangle",
            ObjectKind::Circle(_) => "circle",
        }
    }

    fn as_trait(&self) -> &dyn ObjectTrait {
        match self {
            ObjectKind::Stroke(s) => s,
            ObjectKind::Rectangle(r) => r,
            ObjectKind::Circle(c) => c,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ObjectTrait {
        match self {
            ObjectKind::Stroke(s) => s,
            ObjectKind::Rectangle(r) => r,
            ObjectKind::Circle(c) => c,
        }
    }
}

impl From<Stroke> for ObjectKind {
    fn from(stroke: Stroke) -> Self {
        ObjectKind::Stroke(stroke)
    }
}

impl From<RectangleBatch> for ObjectKind {
    fn from(batch: RectangleBatch) -> Self {
        ObjectKind::Rectangle(batch)
    }
}

impl From<CircleBatch> for ObjectKind {
    fn from(batch: CircleBatch) -> Self {
        ObjectKind::Circle(batch)
    }
}

/// A committed object with identity and selection state.
///
/// The selected flag can only be changed from inside the crate so that it
/// always mirrors the selection manager's list.
#[derive(Debug, Clone)]
pub struct DrawableObject {
    id: ObjectId,
    kind: ObjectKind,
    selected: bool,
}

impl DrawableObject {
    pub fn new(kind: impl Into<ObjectKind>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            selected: false,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    pub fn into_kind(self) -> ObjectKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

impl ObjectTrait for DrawableObject {
    fn bounding_box(&self) -> BoundingBox {
        self.kind.as_trait().bounding_box()
    }

    fn hit_test(&self, point: Point) -> bool {
        self.kind.as_trait().hit_test(point)
    }

    fn intersects_disc(&self, center: Point, radius: f64) -> bool {
        self.kind.as_trait().intersects_disc(center, radius)
    }

    fn intersects_rect(&self, rect: &BoundingBox) -> bool {
        self.kind.as_trait().intersects_rect(rect)
    }

    fn translate(&mut self, delta: Vec2) {
        self.kind.as_trait_mut().translate(delta);
    }

    fn scale(&mut self, sx: f64, sy: f64, origin: Point) {
        self.kind.as_trait_mut().scale(sx, sy, origin);
    }

    fn draw(&self, painter: &mut dyn Painter) {
        self.kind.as_trait().draw(painter);
    }
}

/// Scale a point about an origin.
pub(crate) fn scale_point(point: Point, sx: f64, sy: f64, origin: Point) -> Point {
    Point::new(
        origin.x + (point.x - origin.x) * sx,
        origin.y + (point.y - origin.y) * sy,
    )
}
