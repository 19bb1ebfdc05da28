//! Selection state and the eight-handle resize system.

use crate::canvas::CanvasDocument;
use crate::geometry::BoundingBox;
use crate::objects::{ObjectId, ObjectTrait};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Handle edge length in pixels.
pub const HANDLE_SIZE: f64 = 8.0;
/// Smallest per-axis scale factor a resize step may apply.
pub const MIN_SCALE_FACTOR: f64 = 0.1;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge midpoint positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Type of resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

impl HandleKind {
    /// Every handle in hit-test priority order: corners, then edges.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
        HandleKind::Edge(Edge::Right),
    ];

    /// Where this handle sits on a bounding box.
    pub fn position(self, bbox: &BoundingBox) -> Point {
        let mid_x = bbox.x + bbox.width / 2.0;
        let mid_y = bbox.y + bbox.height / 2.0;
        match self {
            HandleKind::Corner(Corner::TopLeft) => Point::new(bbox.x, bbox.y),
            HandleKind::Corner(Corner::TopRight) => Point::new(bbox.right(), bbox.y),
            HandleKind::Corner(Corner::BottomLeft) => Point::new(bbox.x, bbox.bottom()),
            HandleKind::Corner(Corner::BottomRight) => Point::new(bbox.right(), bbox.bottom()),
            HandleKind::Edge(Edge::Top) => Point::new(mid_x, bbox.y),
            HandleKind::Edge(Edge::Bottom) => Point::new(mid_x, bbox.bottom()),
            HandleKind::Edge(Edge::Left) => Point::new(bbox.x, mid_y),
            HandleKind::Edge(Edge::Right) => Point::new(bbox.right(), mid_y),
        }
    }
}

/// A resize handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Center of the handle square.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Square hit test with the given handle edge length.
    pub fn hit_test(&self, point: Point, size: f64) -> bool {
        let half = size / 2.0;
        (point.x - self.position.x).abs() <= half && (point.y - self.position.y).abs() <= half
    }
}

/// The eight handles around a bounding box.
pub fn get_handles(bbox: &BoundingBox) -> Vec<Handle> {
    HandleKind::ALL
        .iter()
        .map(|&kind| Handle::new(kind.position(bbox), kind))
        .collect()
}

/// First handle of `bbox` under `point`, corners taking priority.
pub fn hit_test_handles(bbox: &BoundingBox, point: Point, size: f64) -> Option<HandleKind> {
    get_handles(bbox)
        .into_iter()
        .find(|h| h.hit_test(point, size))
        .map(|h| h.kind)
}

/// A scale about a fixed origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin: Point,
}

impl ScaleTransform {
    /// Whether either factor is at or below `min` or not finite.
    pub fn is_degenerate(&self, min: f64) -> bool {
        let valid = |s: f64| s.is_finite() && s > min;
        !(valid(self.scale_x) && valid(self.scale_y))
    }
}

/// Scale produced by dragging `handle` of `bounds` by `delta`.
///
/// The edge or corner opposite the dragged handle stays fixed.
pub fn resize_transform(handle: HandleKind, bounds: &BoundingBox, delta: Vec2) -> ScaleTransform {
    let grow_x = |dx: f64| (bounds.width + dx) / bounds.width;
    let grow_y = |dy: f64| (bounds.height + dy) / bounds.height;
    let (left, top, right, bottom) = (bounds.x, bounds.y, bounds.right(), bounds.bottom());
    let center = bounds.center();

    let (scale_x, scale_y, origin) = match handle {
        HandleKind::Corner(Corner::TopLeft) => {
            (grow_x(-delta.x), grow_y(-delta.y), Point::new(right, bottom))
        }
        HandleKind::Corner(Corner::TopRight) => {
            (grow_x(delta.x), grow_y(-delta.y), Point::new(left, bottom))
        }
        HandleKind::Corner(Corner::BottomLeft) => {
            (grow_x(-delta.x), grow_y(delta.y), Point::new(right, top))
        }
        HandleKind::Corner(Corner::BottomRight) => {
            (grow_x(delta.x), grow_y(delta.y), Point::new(left, top))
        }
        HandleKind::Edge(Edge::Left) => (grow_x(-delta.x), 1.0, Point::new(right, center.y)),
        HandleKind::Edge(Edge::Right) => (grow_x(delta.x), 1.0, Point::new(left, center.y)),
        HandleKind::Edge(Edge::Top) => (1.0, grow_y(-delta.y), Point::new(center.x, bottom)),
        HandleKind::Edge(Edge::Bottom) => (1.0, grow_y(delta.y), Point::new(center.x, top)),
    };

    ScaleTransform {
        scale_x,
        scale_y,
        origin,
    }
}

/// The ordered list of selected objects.
///
/// Every mutation goes through the document so each object's selected flag
/// stays in step with membership here.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Vec<ObjectId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order.
    pub fn selected(&self) -> &[ObjectId] {
        &self.selected
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected.contains(&id)
    }

    /// Select an object. Returns false if it is unknown or already selected.
    pub fn add(&mut self, doc: &mut CanvasDocument, id: ObjectId) -> bool {
        if self.is_selected(id) {
            return false;
        }
        let Some(object) = doc.get_mut(id) else {
            return false;
        };
        object.set_selected(true);
        self.selected.push(id);
        true
    }

    /// Deselect an object. Returns false if it was not selected.
    pub fn remove(&mut self, doc: &mut CanvasDocument, id: ObjectId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|&other| other != id);
        if let Some(object) = doc.get_mut(id) {
            object.set_selected(false);
        }
        self.selected.len() != before
    }

    /// Flip membership of an object.
    pub fn toggle(&mut self, doc: &mut CanvasDocument, id: ObjectId) {
        if self.is_selected(id) {
            self.remove(doc, id);
        } else {
            self.add(doc, id);
        }
    }

    pub fn clear(&mut self, doc: &mut CanvasDocument) {
        for id in self.selected.drain(..) {
            if let Some(object) = doc.get_mut(id) {
                object.set_selected(false);
            }
        }
    }

    /// Drop an id whose object has already left the document.
    pub fn forget(&mut self, id: ObjectId) {
        self.selected.retain(|&other| other != id);
    }

    /// Union of the selected objects' bounds.
    pub fn bounds(&self, doc: &CanvasDocument) -> Option<BoundingBox> {
        self.selected
            .iter()
            .filter_map(|&id| doc.get(id))
            .map(|o| o.bounding_box())
            .reduce(|a, b| a.union(&b))
    }

    /// Whether `point` hits any selected object.
    pub fn hits_selected(&self, doc: &CanvasDocument, point: Point) -> bool {
        self.selected
            .iter()
            .filter_map(|&id| doc.get(id))
            .any(|o| o.hit_test(point))
    }

    /// First handle under `point` across the selected objects' own bounds.
    pub fn handle_at(&self, doc: &CanvasDocument, point: Point, size: f64) -> Option<HandleKind> {
        self.selected
            .iter()
            .filter_map(|&id| doc.get(id))
            .find_map(|o| hit_test_handles(&o.bounding_box(), point, size))
    }

    pub fn move_by(&self, doc: &mut CanvasDocument, delta: Vec2) {
        for &id in &self.selected {
            if let Some(object) = doc.get_mut(id) {
                object.translate(delta);
            }
        }
    }

    pub fn scale_by(&self, doc: &mut CanvasDocument, transform: &ScaleTransform) {
        for &id in &self.selected {
            if let Some(object) = doc.get_mut(id) {
                object.scale(transform.scale_x, transform.scale_y, transform.origin);
            }
        }
    }
}
