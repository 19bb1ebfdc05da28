//! Committed object store.

use crate::geometry::BoundingBox;
use crate::objects::{DrawableObject, ObjectId, ObjectTrait};
use kurbo::Point;
use std::collections::HashMap;

/// Every committed drawable object, in draw order.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    objects: HashMap<ObjectId, DrawableObject>,
    /// Z-order of objects (back to front).
    z_order: Vec<ObjectId>,
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object on top of the stack.
    pub fn add_object(&mut self, object: DrawableObject) -> ObjectId {
        let id = object.id();
        self.objects.insert(id, object);
        self.z_order.push(id);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<DrawableObject> {
        let removed = self.objects.remove(&id)?;
        self.z_order.retain(|&other| other != id);
        Some(removed)
    }

    /// Remove the most recently committed object.
    pub fn pop_last(&mut self) -> Option<DrawableObject> {
        let id = self.z_order.pop()?;
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DrawableObject> {
        self.objects.get_mut(&id)
    }

    /// Ids from back to front.
    pub fn z_order(&self) -> &[ObjectId] {
        &self.z_order
    }

    /// Objects from back to front.
    pub fn objects_ordered(&self) -> impl Iterator<Item = &DrawableObject> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.z_order.clear();
    }

    /// Number of objects of the given type name.
    pub fn count_of(&self, type_name: &str) -> usize {
        self.objects
            .values()
            .filter(|o| o.type_name() == type_name)
            .count()
    }

    /// Topmost object under `point`.
    pub fn topmost_at(&self, point: Point) -> Option<ObjectId> {
        self.z_order
            .iter()
            .rev()
            .find(|id| self.objects.get(id).is_some_and(|o| o.hit_test(point)))
            .copied()
    }

    /// Objects touched by a disc, back to front.
    pub fn objects_touching(&self, center: Point, radius: f64) -> Vec<ObjectId> {
        self.objects_ordered()
            .filter(|o| o.intersects_disc(center, radius))
            .map(DrawableObject::id)
            .collect()
    }

    /// Objects matched by a drag-selection rectangle, back to front.
    pub fn objects_in_rect(&self, rect: &BoundingBox) -> Vec<ObjectId> {
        self.objects_ordered()
            .filter(|o| o.intersects_rect(rect))
            .map(DrawableObject::id)
            .collect()
    }
}
