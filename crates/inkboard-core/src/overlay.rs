//! Per-frame overlays drawn on top of the cached layer.

use crate::canvas::CanvasDocument;
use crate::eraser::{EraserState, PREVIEW_ALPHA};
use crate::geometry::{BoundingBox, with_alpha};
use crate::objects::{CircleShape, ObjectKind, ObjectTrait, RectShape, SHAPE_LINE_WIDTH};
use crate::render::Painter;
use crate::selection::{SelectionManager, get_handles};
use kurbo::{Point, Rect, Shape as KurboShape};
use peniko::Color;

/// Highlight color for selected objects.
pub const HIGHLIGHT_COLOR: Color = Color::new([0.8, 0.4, 0.2, 1.0]);
pub const STROKE_HIGHLIGHT_ALPHA: f64 = 0.6;
pub const SHAPE_HIGHLIGHT_ALPHA: f64 = 0.4;
/// Extra width added around selected strokes.
pub const STROKE_HIGHLIGHT_GROWTH: f64 = 4.0;
pub const SHAPE_HIGHLIGHT_WIDTH: f64 = 4.0;
/// Outset of shape highlights from the shape outline.
pub const SHAPE_HIGHLIGHT_OUTSET: f64 = 2.0;

pub const HANDLE_FILL: Color = Color::new([0.2, 0.6, 1.0, 1.0]);
pub const HANDLE_BORDER: Color = Color::new([0.0, 0.0, 0.0, 1.0]);

pub const SELECTION_FILL: Color = Color::new([0.2, 0.4, 0.8, 0.3]);
pub const SELECTION_BORDER: Color = Color::new([0.2, 0.4, 0.8, 0.8]);

/// Color of rectangle and circle drag previews.
pub const PREVIEW_COLOR: Color = Color::new([0.0, 0.0, 0.8, 0.5]);
pub const PREVIEW_LINE_WIDTH: f64 = 1.0;

/// Draw a highlight around every selected object.
pub fn draw_selection_highlights(painter: &mut dyn Painter, doc: &CanvasDocument) {
    for object in doc.objects_ordered().filter(|o| o.is_selected()) {
        match object.kind() {
            ObjectKind::Stroke(stroke) => stroke.draw_with(
                painter,
                with_alpha(HIGHLIGHT_COLOR, STROKE_HIGHLIGHT_ALPHA),
                stroke.width + STROKE_HIGHLIGHT_GROWTH,
            ),
            ObjectKind::Rectangle(batch) => {
                let color = with_alpha(HIGHLIGHT_COLOR, SHAPE_HIGHLIGHT_ALPHA);
                for rect in batch.iter() {
                    let outset = rect.as_rect().inflate(SHAPE_HIGHLIGHT_OUTSET, SHAPE_HIGHLIGHT_OUTSET);
                    painter.stroke_path(
                        &outset.to_path(0.1),
                        &kurbo::Stroke::new(SHAPE_HIGHLIGHT_WIDTH),
                        color,
                    );
                }
            }
            ObjectKind::Circle(batch) => {
                let color = with_alpha(HIGHLIGHT_COLOR, SHAPE_HIGHLIGHT_ALPHA);
                for circle in batch.iter() {
                    let outset = CircleShape::new(
                        circle.center,
                        circle.radius + SHAPE_HIGHLIGHT_OUTSET,
                        color,
                    );
                    outset.draw_with(painter, color, SHAPE_HIGHLIGHT_WIDTH);
                }
            }
        }
    }
}

/// Draw resize handles around each selected object.
pub fn draw_selection_handles(
    painter: &mut dyn Painter,
    doc: &CanvasDocument,
    selection: &SelectionManager,
    handle_size: f64,
) {
    let border = kurbo::Stroke::new(1.0);
    for object in selection.selected().iter().filter_map(|&id| doc.get(id)) {
        for handle in get_handles(&object.bounding_box()) {
            let square = Rect::from_center_size(handle.position, (handle_size, handle_size));
            let path = square.to_path(0.1);
            painter.fill_path(&path, HANDLE_FILL);
            painter.stroke_path(&path, &border, HANDLE_BORDER);
        }
    }
}

/// Draw the rubber-band selection rectangle.
pub fn draw_selection_rect(painter: &mut dyn Painter, start: Point, current: Point) {
    let path = BoundingBox::from_corners(start, current).to_rect().to_path(0.1);
    painter.fill_path(&path, SELECTION_FILL);
    painter.stroke_path(&path, &kurbo::Stroke::new(1.0), SELECTION_BORDER);
}

/// Preview of a rectangle being dragged out.
pub fn draw_rectangle_preview(painter: &mut dyn Painter, start: Point, current: Point) {
    RectShape::from_corners(start, current, PREVIEW_COLOR).draw_with(
        painter,
        PREVIEW_COLOR,
        PREVIEW_LINE_WIDTH,
    );
}

/// Preview of a circle being dragged out.
pub fn draw_circle_preview(painter: &mut dyn Painter, center: Point, current: Point) {
    CircleShape::through(center, current, PREVIEW_COLOR).draw_with(
        painter,
        PREVIEW_COLOR,
        PREVIEW_LINE_WIDTH,
    );
}

/// Draw eraser previews faded to half opacity.
pub fn draw_eraser_preview(painter: &mut dyn Painter, eraser: &EraserState) {
    for stroke in &eraser.strokes_to_erase {
        stroke.draw_with(painter, with_alpha(stroke.color, PREVIEW_ALPHA), stroke.width);
    }
    for rect in &eraser.rects_to_erase {
        rect.draw_with(painter, with_alpha(rect.color, PREVIEW_ALPHA), SHAPE_LINE_WIDTH);
    }
    for circle in &eraser.circles_to_erase {
        circle.draw_with(painter, with_alpha(circle.color, PREVIEW_ALPHA), SHAPE_LINE_WIDTH);
    }
}
