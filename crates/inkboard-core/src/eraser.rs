//! Eraser collision and preview state.
//!
//! Objects touched by the eraser are removed from the document immediately
//! and moved into the preview lists so they can be drawn faded until the
//! gesture ends. While the eraser hovers without being pressed the same lists
//! hold copies of the objects that a press would remove.

use crate::canvas::CanvasDocument;
use crate::objects::{CircleShape, DrawableObject, ObjectKind, ObjectTrait, RectShape, Stroke};
use kurbo::Point;

/// Radius of the disc that removes objects on contact.
pub const CONTACT_RADIUS: f64 = 10.0;
/// Radius of the hover preview disc.
pub const HOVER_RADIUS: f64 = 20.0;
/// Opacity used to draw the eraser preview.
pub const PREVIEW_ALPHA: f64 = 0.5;

/// Objects currently shown as eraser previews.
#[derive(Debug, Clone, Default)]
pub struct EraserState {
    pub strokes_to_erase: Vec<Stroke>,
    pub rects_to_erase: Vec<RectShape>,
    pub circles_to_erase: Vec<CircleShape>,
}

impl EraserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes_to_erase.is_empty()
            && self.rects_to_erase.is_empty()
            && self.circles_to_erase.is_empty()
    }

    /// Total number of previewed shapes.
    pub fn len(&self) -> usize {
        self.strokes_to_erase.len() + self.rects_to_erase.len() + self.circles_to_erase.len()
    }

    pub fn clear(&mut self) {
        self.strokes_to_erase.clear();
        self.rects_to_erase.clear();
        self.circles_to_erase.clear();
    }

    /// Move a removed object into the preview lists.
    pub fn stash(&mut self, object: DrawableObject) {
        match object.into_kind() {
            ObjectKind::Stroke(stroke) => self.strokes_to_erase.push(stroke),
            ObjectKind::Rectangle(batch) => self.rects_to_erase.extend(batch.rects),
            ObjectKind::Circle(batch) => self.circles_to_erase.extend(batch.circles),
        }
    }

    /// Replace the preview with copies of the shapes a press at `center` would touch.
    ///
    /// Batches are split so only the members inside the disc are previewed.
    pub fn preview(&mut self, doc: &CanvasDocument, center: Point, radius: f64) {
        self.clear();
        for object in doc.objects_ordered() {
            match object.kind() {
                ObjectKind::Stroke(stroke) => {
                    if stroke.intersects_disc(center, radius) {
                        self.strokes_to_erase.push(stroke.clone());
                    }
                }
                ObjectKind::Rectangle(batch) => self.rects_to_erase.extend(
                    batch
                        .iter()
                        .filter(|r| r.distance_to(center) <= radius)
                        .copied(),
                ),
                ObjectKind::Circle(batch) => self.circles_to_erase.extend(
                    batch
                        .iter()
                        .filter(|c| c.center.distance(center) <= radius + c.radius)
                        .copied(),
                ),
            }
        }
    }
}
