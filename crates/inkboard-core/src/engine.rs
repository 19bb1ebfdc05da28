//! The pointer-driven drawing controller.
//!
//! [`Engine`] owns the committed objects, the selection, the eraser preview
//! and the cached background layer. Committing a new object draws it onto
//! the layer incrementally; anything that changes existing objects (erasing,
//! moving, resizing, deleting, undo) rebuilds the layer from the document.

use crate::canvas::CanvasDocument;
use crate::config::{ConfigError, EngineConfig};
use crate::eraser::EraserState;
use crate::geometry::BoundingBox;
use crate::input::{FrameThrottle, PointerEvent, Redraw};
use crate::objects::{
    CircleBatch, CircleShape, DrawableObject, ObjectId, ObjectKind, ObjectTrait, RectShape,
    RectangleBatch,
};
use crate::overlay;
use crate::page::{PagePattern, PageSettings};
use crate::render::{CachedLayer, FrameTarget, LayerStats, SurfaceError};
use crate::selection::{HandleKind, SelectionManager, resize_transform};
use crate::tools::{ToolKind, ToolManager, ToolState};
use kurbo::Point;
use peniko::Color;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Drawing engine generic over the cached layer implementation.
pub struct Engine<L: CachedLayer> {
    config: EngineConfig,
    document: CanvasDocument,
    selection: SelectionManager,
    eraser: EraserState,
    tools: ToolManager,
    page: PageSettings,
    throttle: FrameThrottle,
    layer: L,
    stats: LayerStats,
}

impl<L: CachedLayer> Engine<L> {
    /// Create an engine with the default configuration.
    pub fn new(layer: L) -> Result<Self, SurfaceError> {
        Self::with_config(layer, EngineConfig::default())
    }

    /// Create an engine and allocate the layer at the configured size.
    pub fn with_config(mut layer: L, config: EngineConfig) -> Result<Self, SurfaceError> {
        layer.reallocate(config.width, config.height)?;
        let tools = ToolManager {
            style: config.style(),
            smoothing: config.smoothing(),
            ..ToolManager::default()
        };
        log::debug!("Engine created with {}x{} layer", config.width, config.height);
        Ok(Self {
            page: config.page,
            throttle: FrameThrottle::new(config.redraw_interval()),
            config,
            document: CanvasDocument::new(),
            selection: SelectionManager::new(),
            eraser: EraserState::new(),
            tools,
            layer,
            stats: LayerStats {
                reallocations: 1,
                ..LayerStats::default()
            },
        })
    }

    /// Create an engine from a JSON configuration.
    pub fn from_json_config(layer: L, json: &str) -> Result<Self, ConfigError> {
        let config = EngineConfig::from_json(json)?;
        Self::with_config(layer, config).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn eraser(&self) -> &EraserState {
        &self.eraser
    }

    pub fn tool_state(&self) -> &ToolState {
        &self.tools.state
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn stats(&self) -> LayerStats {
        self.stats
    }

    pub fn page_settings(&self) -> PageSettings {
        self.page
    }

    // --- Tools and styling ---

    pub fn active_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Switch tools by name. Leaving the select tool clears the selection.
    pub fn set_active_tool(&mut self, name: &str) -> Redraw {
        let tool = ToolKind::from_name(name);
        if tool == ToolKind::Unknown && !name.is_empty() {
            log::warn!("Unknown tool '{name}'");
        }
        self.tools.set_tool(tool);
        self.eraser.clear();
        if tool != ToolKind::Select {
            self.selection.clear(&mut self.document);
        }
        log::debug!("Active tool: {tool:?}");
        Redraw::Now
    }

    /// Cursor name for the active tool.
    pub fn cursor(&self) -> &'static str {
        self.tools.current_tool.cursor()
    }

    /// Pen styling applies to the next stroke and to one in progress.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.tools.set_pen_width(width);
        self.restyle_live_stroke();
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.tools.style.pen_color = color;
        self.restyle_live_stroke();
    }

    pub fn set_stroke_opacity(&mut self, opacity: f64) {
        self.tools.set_pen_opacity(opacity);
        self.restyle_live_stroke();
    }

    fn restyle_live_stroke(&mut self) {
        if let ToolState::Drawing(stroke) = &mut self.tools.state {
            stroke.width = self.tools.style.pen_width;
            stroke.color = self.tools.style.pen_color;
        }
    }

    pub fn set_rectangle_color(&mut self, color: Color) {
        self.tools.style.rectangle_color = color;
    }

    pub fn set_circle_color(&mut self, color: Color) {
        self.tools.style.circle_color = color;
    }

    /// Set the page pattern by name. Unknown names are ignored.
    pub fn set_page_pattern(&mut self, name: &str) -> bool {
        match PagePattern::from_name(name) {
            Some(pattern) => {
                self.page.pattern = pattern;
                true
            }
            None => {
                log::warn!("Unknown page pattern '{name}'");
                false
            }
        }
    }

    pub fn set_page_scale(&mut self, scale: f64) {
        self.page.set_scale(scale);
    }

    // --- Pointer input ---

    /// Dispatch a pointer event to the matching handler.
    pub fn handle_event(&mut self, event: PointerEvent) -> Redraw {
        let position = event.position();
        match event {
            PointerEvent::Down { .. } => self.pointer_down(position),
            PointerEvent::Move { .. } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(position),
        }
    }

    pub fn pointer_down(&mut self, point: Point) -> Redraw {
        let next = match self.tools.current_tool {
            ToolKind::Pen => {
                let mut stroke = self.tools.new_stroke();
                stroke.add_point(point);
                self.throttle.reset();
                ToolState::Drawing(stroke)
            }
            ToolKind::Rectangle => ToolState::Rectangle {
                start: point,
                current: point,
            },
            ToolKind::Circle => ToolState::Circle {
                center: point,
                current: point,
            },
            ToolKind::Eraser => {
                self.eraser.clear();
                self.update_eraser_collision(point);
                ToolState::Erasing
            }
            ToolKind::Select => self.begin_select(point),
            ToolKind::Arrow | ToolKind::Line | ToolKind::Text | ToolKind::Unknown => {
                return Redraw::Skip;
            }
        };
        self.tools.state = next;
        Redraw::Now
    }

    fn begin_select(&mut self, point: Point) -> ToolState {
        let handle_size = self.config.handle_size;
        if let Some(handle) = self.selection.handle_at(&self.document, point, handle_size) {
            return ToolState::Resizing {
                handle,
                last: point,
            };
        }
        if self.selection.hits_selected(&self.document, point) {
            return ToolState::Moving { last: point };
        }
        self.selection.clear(&mut self.document);
        ToolState::Selecting {
            start: point,
            current: point,
        }
    }

    pub fn pointer_move(&mut self, point: Point) -> Redraw {
        let state = std::mem::take(&mut self.tools.state);
        let (next, redraw) = match state {
            ToolState::Drawing(mut stroke) => {
                let far_enough = stroke
                    .last_point()
                    .is_none_or(|last| last.distance(point) >= self.config.jitter_threshold);
                let redraw = if far_enough {
                    stroke.add_point(point);
                    if self.throttle.should_redraw(Instant::now()) {
                        Redraw::Now
                    } else {
                        Redraw::Skip
                    }
                } else {
                    Redraw::Skip
                };
                (ToolState::Drawing(stroke), redraw)
            }
            ToolState::Rectangle { start, .. } => (
                ToolState::Rectangle {
                    start,
                    current: point,
                },
                Redraw::Now,
            ),
            ToolState::Circle { center, .. } => (
                ToolState::Circle {
                    center,
                    current: point,
                },
                Redraw::Now,
            ),
            ToolState::Erasing => {
                self.update_eraser_collision(point);
                (ToolState::Erasing, Redraw::Now)
            }
            ToolState::Selecting { start, .. } => (
                ToolState::Selecting {
                    start,
                    current: point,
                },
                Redraw::Now,
            ),
            ToolState::Moving { last } => {
                if self.selection.has_selection() {
                    self.selection.move_by(&mut self.document, point - last);
                    self.rebuild_layer();
                }
                (ToolState::Moving { last: point }, Redraw::Now)
            }
            ToolState::Resizing { handle, last } => {
                let last = self.perform_resize(handle, last, point);
                (ToolState::Resizing { handle, last }, Redraw::Now)
            }
            ToolState::Idle => {
                if self.tools.current_tool == ToolKind::Eraser {
                    self.update_eraser_preview(point);
                    (ToolState::Idle, Redraw::Now)
                } else {
                    (ToolState::Idle, Redraw::Skip)
                }
            }
        };
        self.tools.state = next;
        redraw
    }

    pub fn pointer_up(&mut self, point: Point) -> Redraw {
        let state = std::mem::take(&mut self.tools.state);
        match state {
            ToolState::Drawing(mut stroke) => {
                stroke.add_point(point);
                stroke.complete();
                self.commit(ObjectKind::Stroke(stroke));
            }
            ToolState::Rectangle { start, .. } => {
                let color = self.tools.style.rectangle_color;
                let rect = RectShape::from_corners(start, point, color);
                self.commit(ObjectKind::Rectangle(RectangleBatch::single(rect)));
            }
            ToolState::Circle { center, .. } => {
                let color = self.tools.style.circle_color;
                let circle = CircleShape::through(center, point, color);
                self.commit(ObjectKind::Circle(CircleBatch::single(circle)));
            }
            ToolState::Erasing => {
                self.eraser.clear();
            }
            ToolState::Selecting { start, .. } => {
                let count = self.select_in_rect(start, point);
                log::debug!("Rubber-band selected {count} objects");
            }
            ToolState::Moving { .. } | ToolState::Resizing { .. } => {}
            ToolState::Idle => return Redraw::Skip,
        }
        Redraw::Now
    }

    /// Select every object matched by the rectangle spanning two corners.
    pub fn select_in_rect(&mut self, a: Point, b: Point) -> usize {
        let rect = BoundingBox::from_corners(a, b);
        let hits = self.document.objects_in_rect(&rect);
        hits.into_iter()
            .filter(|&id| self.selection.add(&mut self.document, id))
            .count()
    }

    /// Click selection. With `multi` the hit object is toggled, otherwise it
    /// replaces the selection; a miss without `multi` clears it.
    pub fn select_at(&mut self, point: Point, multi: bool) -> Option<ObjectId> {
        let hit = self.document.topmost_at(point);
        match (hit, multi) {
            (Some(id), true) => self.selection.toggle(&mut self.document, id),
            (Some(id), false) => {
                self.selection.clear(&mut self.document);
                self.selection.add(&mut self.document, id);
            }
            (None, false) => self.selection.clear(&mut self.document),
            (None, true) => {}
        }
        hit
    }

    pub fn select_all(&mut self) -> usize {
        let ids = self.document.z_order().to_vec();
        ids.into_iter()
            .filter(|&id| self.selection.add(&mut self.document, id))
            .count()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.document);
    }

    /// Remove every selected object.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.selected().to_vec();
        self.selection.clear(&mut self.document);
        let removed = ids
            .into_iter()
            .filter(|&id| self.document.remove_object(id).is_some())
            .count();
        if removed > 0 {
            log::info!("Deleted {removed} selected objects");
            self.rebuild_layer();
        }
        removed
    }

    // --- Eraser ---

    /// Remove every object within the contact radius of `point`.
    ///
    /// Removed objects move into the eraser preview and leave the selection.
    /// The layer is rebuilt once per removed object.
    pub fn update_eraser_collision(&mut self, point: Point) -> usize {
        let hits = self
            .document
            .objects_touching(point, self.config.eraser_contact_radius);
        let mut erased = 0;
        for id in hits {
            if let Some(object) = self.document.remove_object(id) {
                log::debug!("Erased {} {id}", object.type_name());
                self.selection.forget(id);
                self.eraser.stash(object);
                self.rebuild_layer();
                erased += 1;
            }
        }
        erased
    }

    /// Recompute the hover preview around `point` without removing anything.
    pub fn update_eraser_preview(&mut self, point: Point) {
        self.eraser
            .preview(&self.document, point, self.config.eraser_hover_radius);
    }

    // --- Canvas-wide operations ---

    /// Remove every object and reset the layer.
    pub fn clear_canvas(&mut self) {
        self.selection.clear(&mut self.document);
        self.document.clear();
        self.eraser.clear();
        self.tools.state = ToolState::Idle;
        self.rebuild_layer();
        log::info!("Canvas cleared");
    }

    /// Remove the most recently committed object, whatever its kind.
    pub fn undo(&mut self) -> bool {
        let Some(object) = self.document.pop_last() else {
            return false;
        };
        self.selection.forget(object.id());
        self.rebuild_layer();
        log::debug!("Undid {} {}", object.type_name(), object.id());
        true
    }

    // --- Rendering ---

    /// Reallocate the layer for a new viewport and redraw every object.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.layer.reallocate(width, height)?;
        self.stats.reallocations += 1;
        self.rebuild_layer();
        log::debug!("Layer resized to {width}x{height}");
        Ok(())
    }

    /// Compose one frame: the cached layer followed by the live overlays.
    pub fn render_frame<F: FrameTarget<L>>(&mut self, frame: &mut F) -> Result<(), SurfaceError> {
        let (width, height) = frame.size();
        if self.layer.size() != Some((width, height)) {
            self.resize(width, height)?;
        }

        frame.clear();
        frame.blit(&self.layer);

        overlay::draw_selection_highlights(frame, &self.document);
        if let ToolState::Selecting { start, current } = self.tools.state {
            overlay::draw_selection_rect(frame, start, current);
        }
        overlay::draw_selection_handles(frame, &self.document, &self.selection, self.config.handle_size);

        match &self.tools.state {
            ToolState::Drawing(stroke) => stroke.draw(frame),
            ToolState::Rectangle { start, current } => {
                overlay::draw_rectangle_preview(frame, *start, *current)
            }
            ToolState::Circle { center, current } => {
                overlay::draw_circle_preview(frame, *center, *current)
            }
            _ => {}
        }

        if !self.eraser.is_empty() {
            overlay::draw_eraser_preview(frame, &self.eraser);
        }
        Ok(())
    }

    fn commit(&mut self, kind: ObjectKind) -> ObjectId {
        let object = DrawableObject::new(kind);
        object.draw(self.layer.painter());
        self.stats.appends += 1;
        let id = self.document.add_object(object);
        log::debug!("Committed object {id} ({} total)", self.document.len());
        id
    }

    fn rebuild_layer(&mut self) {
        let painter = self.layer.painter();
        painter.clear();
        for object in self.document.objects_ordered() {
            object.draw(painter);
        }
        self.stats.rebuilds += 1;
    }

    /// Apply one incremental resize step. Returns the new anchor point.
    fn perform_resize(&mut self, handle: HandleKind, last: Point, point: Point) -> Point {
        let Some(bounds) = self.selection.bounds(&self.document) else {
            return last;
        };
        let transform = resize_transform(handle, &bounds, point - last);
        if transform.is_degenerate(self.config.min_scale_factor) {
            return last;
        }
        self.selection.scale_by(&mut self.document, &transform);
        self.rebuild_layer();
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{alpha_of, rgba};
    use crate::render::testing::{PaintOp, RecordingFrame, RecordingLayer};

    fn engine() -> Engine<RecordingLayer> {
        Engine::new(RecordingLayer::default()).unwrap()
    }

    fn drag(engine: &mut Engine<RecordingLayer>, from: (f64, f64), to: (f64, f64)) {
        engine.pointer_down(Point::new(from.0, from.1));
        engine.pointer_move(Point::new(to.0, to.1));
        engine.pointer_up(Point::new(to.0, to.1));
    }

    fn first_rect(engine: &Engine<RecordingLayer>) -> RectShape {
        engine
            .document()
            .objects_ordered()
            .find_map(|o| match o.kind() {
                ObjectKind::Rectangle(batch) => batch.rects.first().copied(),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_new_allocates_layer() {
        let engine = engine();
        assert_eq!(engine.layer().size, Some((800, 600)));
        assert_eq!(engine.active_tool(), ToolKind::Unknown);
        assert!(engine.document().is_empty());
    }

    #[test]
    fn test_invalid_initial_size() {
        let config = EngineConfig {
            width: 0,
            ..EngineConfig::default()
        };
        assert!(Engine::with_config(RecordingLayer::default(), config).is_err());
    }

    #[test]
    fn test_pen_stroke_commits_incrementally() {
        let mut engine = engine();
        engine.set_active_tool("pen");
        assert_eq!(engine.pointer_down(Point::new(10.0, 10.0)), Redraw::Now);
        for i in 1..10 {
            engine.pointer_move(Point::new(10.0 + i as f64 * 5.0, 10.0));
        }
        assert!(matches!(engine.tool_state(), ToolState::Drawing(_)));
        engine.pointer_up(Point::new(60.0, 10.0));

        assert_eq!(engine.document().count_of("stroke"), 1);
        assert!(engine.tool_state().is_idle());
        assert_eq!(engine.stats().appends, 1);
        assert_eq!(engine.stats().rebuilds, 0);
        assert_eq!(engine.layer().painter.strokes(), 1);

        let object = engine.document().objects_ordered().next().unwrap();
        let ObjectKind::Stroke(stroke) = object.kind() else {
            panic!("expected a stroke");
        };
        assert!(stroke.samples().is_empty());
        assert_eq!(stroke.points().first().copied(), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_stroke_commit_leaves_shapes_untouched() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (100.0, 100.0), (150.0, 150.0));
        engine.set_active_tool("circle");
        drag(&mut engine, (300.0, 300.0), (320.0, 300.0));
        let appends = engine.stats().appends;

        engine.set_active_tool("pen");
        engine.pointer_down(Point::new(0.0, 0.0));
        engine.pointer_move(Point::new(1.0, 0.0));
        engine.pointer_move(Point::new(2.0, 0.0));
        engine.pointer_up(Point::new(10.0, 10.0));

        let stroke = engine
            .document()
            .objects_ordered()
            .find_map(|o| match o.kind() {
                ObjectKind::Stroke(stroke) => Some(stroke),
                _ => None,
            })
            .unwrap();
        assert!(stroke.points().len() >= 2);
        assert_eq!(engine.document().count_of("rectangle"), 1);
        assert_eq!(engine.document().count_of("circle"), 1);
        assert_eq!(engine.stats().appends, appends + 1);
        assert_eq!(engine.stats().rebuilds, 0);
    }

    #[test]
    fn test_pen_jitter_gate() {
        let mut engine = engine();
        engine.set_active_tool("pen");
        engine.pointer_down(Point::new(10.0, 10.0));
        assert_eq!(engine.pointer_move(Point::new(10.2, 10.1)), Redraw::Skip);
        let ToolState::Drawing(stroke) = engine.tool_state() else {
            panic!("expected drawing state");
        };
        assert_eq!(stroke.samples().len(), 1);
    }

    #[test]
    fn test_pen_throttle() {
        let mut engine = engine();
        engine.set_active_tool("pen");
        engine.pointer_down(Point::new(0.0, 0.0));
        assert_eq!(engine.pointer_move(Point::new(10.0, 0.0)), Redraw::Now);
        assert_eq!(engine.pointer_move(Point::new(20.0, 0.0)), Redraw::Skip);
        let ToolState::Drawing(stroke) = engine.tool_state() else {
            panic!("expected drawing state");
        };
        // Throttled moves still record the sample.
        assert_eq!(stroke.samples().len(), 3);
    }

    #[test]
    fn test_stroke_uses_pen_style() {
        let mut engine = engine();
        engine.set_active_tool("pen");
        engine.set_stroke_width(8.0);
        engine.set_stroke_color(rgba(1.0, 0.0, 0.0, 1.0));
        engine.set_stroke_opacity(0.25);
        drag(&mut engine, (0.0, 0.0), (30.0, 30.0));

        let object = engine.document().objects_ordered().next().unwrap();
        let ObjectKind::Stroke(stroke) = object.kind() else {
            panic!("expected a stroke");
        };
        assert!((stroke.width - 8.0).abs() < f64::EPSILON);
        assert!((alpha_of(stroke.color) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rectangle_normalized() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (100.0, 100.0), (20.0, 40.0));
        let rect = first_rect(&engine);
        assert!((rect.x - 20.0).abs() < f64::EPSILON);
        assert!((rect.y - 40.0).abs() < f64::EPSILON);
        assert!((rect.width - 80.0).abs() < f64::EPSILON);
        assert!((rect.height - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_radius_from_drag() {
        let mut engine = engine();
        engine.set_active_tool("circle");
        drag(&mut engine, (50.0, 50.0), (53.0, 54.0));
        let object = engine.document().objects_ordered().next().unwrap();
        let ObjectKind::Circle(batch) = object.kind() else {
            panic!("expected a circle");
        };
        assert!((batch.circles[0].radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shape_preview_while_dragging() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        engine.pointer_down(Point::new(10.0, 10.0));
        engine.pointer_move(Point::new(40.0, 40.0));

        let mut frame = RecordingFrame::new(800, 600);
        engine.render_frame(&mut frame).unwrap();
        let preview = frame.painter.ops.iter().any(|op| {
            matches!(op, PaintOp::Stroke { width, color }
                if (*width - overlay::PREVIEW_LINE_WIDTH).abs() < f64::EPSILON
                    && (alpha_of(*color) - 0.5).abs() < 1e-6)
        });
        assert!(preview);
        assert!(engine.document().is_empty());
    }

    #[test]
    fn test_eraser_contact_removes_and_previews() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.set_active_tool("eraser");
        let rebuilds = engine.stats().rebuilds;

        engine.pointer_down(Point::new(100.0, 100.0));
        assert_eq!(engine.document().len(), 1);
        engine.pointer_move(Point::new(15.0, 5.0));
        assert!(engine.document().is_empty());
        assert_eq!(engine.eraser().rects_to_erase.len(), 1);
        assert_eq!(engine.stats().rebuilds, rebuilds + 1);

        engine.pointer_up(Point::new(15.0, 5.0));
        assert!(engine.eraser().is_empty());
    }

    #[test]
    fn test_eraser_contact_radius_boundary() {
        let mut engine = engine();
        engine.set_active_tool("circle");
        drag(&mut engine, (0.0, 0.0), (10.0, 0.0));
        // Center distance 20.5 > 10 + 10.
        assert_eq!(engine.update_eraser_collision(Point::new(20.5, 0.0)), 0);
        assert_eq!(engine.update_eraser_collision(Point::new(19.5, 0.0)), 1);
    }

    #[test]
    fn test_erased_rect_stays_in_preview() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));

        assert_eq!(engine.update_eraser_collision(Point::new(5.0, 5.0)), 1);
        assert!(engine.document().is_empty());
        assert_eq!(engine.eraser().rects_to_erase.len(), 1);

        assert_eq!(engine.update_eraser_collision(Point::new(1000.0, 1000.0)), 0);
        assert!(engine.document().is_empty());
        assert_eq!(engine.eraser().rects_to_erase.len(), 1);
    }

    #[test]
    fn test_eraser_hover_preview() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.set_active_tool("eraser");

        assert_eq!(engine.pointer_move(Point::new(25.0, 5.0)), Redraw::Now);
        assert_eq!(engine.eraser().rects_to_erase.len(), 1);
        assert_eq!(engine.document().len(), 1);

        engine.pointer_move(Point::new(200.0, 200.0));
        assert!(engine.eraser().is_empty());
    }

    #[test]
    fn test_erase_removes_from_selection() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        drag(&mut engine, (100.0, 100.0), (110.0, 110.0));
        engine.set_active_tool("select");
        assert_eq!(engine.select_all(), 2);

        engine.update_eraser_collision(Point::new(5.0, 5.0));
        assert_eq!(engine.selection().len(), 1);
        assert_eq!(engine.document().len(), 1);
    }

    #[test]
    fn test_rubber_band_selection() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (10.0, 10.0), (20.0, 20.0));
        drag(&mut engine, (300.0, 300.0), (320.0, 320.0));
        engine.set_active_tool("select");

        engine.pointer_down(Point::new(50.0, 50.0));
        engine.pointer_move(Point::new(0.0, 0.0));
        assert!(matches!(engine.tool_state(), ToolState::Selecting { .. }));
        engine.pointer_up(Point::new(0.0, 0.0));

        assert_eq!(engine.selection().len(), 1);
        let selected = engine.selection().selected()[0];
        assert!(engine.document().get(selected).unwrap().is_selected());
    }

    #[test]
    fn test_move_selection() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (10.0, 10.0), (50.0, 50.0));
        engine.set_active_tool("select");
        engine.select_all();

        engine.pointer_down(Point::new(30.0, 30.0));
        assert!(matches!(engine.tool_state(), ToolState::Moving { .. }));
        engine.pointer_move(Point::new(40.0, 35.0));
        engine.pointer_up(Point::new(40.0, 35.0));

        let rect = first_rect(&engine);
        assert!((rect.x - 20.0).abs() < f64::EPSILON);
        assert!((rect.y - 15.0).abs() < f64::EPSILON);
        assert!(engine.stats().rebuilds >= 1);
    }

    #[test]
    fn test_resize_from_corner_handle() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (100.0, 100.0));
        engine.set_active_tool("select");
        engine.select_all();

        engine.pointer_down(Point::new(100.0, 100.0));
        assert!(matches!(engine.tool_state(), ToolState::Resizing { .. }));
        engine.pointer_move(Point::new(150.0, 150.0));
        let rect = first_rect(&engine);
        assert!((rect.width - 150.0).abs() < 1e-9);
        assert!(rect.x.abs() < 1e-9);

        // A step that would shrink below the minimum factor is ignored.
        engine.pointer_move(Point::new(10.0, 150.0));
        let rect = first_rect(&engine);
        assert!((rect.width - 150.0).abs() < 1e-9);
        engine.pointer_up(Point::new(10.0, 150.0));
    }

    #[test]
    fn test_click_outside_clears_selection() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.set_active_tool("select");
        engine.select_all();

        engine.pointer_down(Point::new(500.0, 500.0));
        assert!(!engine.selection().has_selection());
        engine.pointer_up(Point::new(500.0, 500.0));
    }

    #[test]
    fn test_tool_change_clears_selection() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.set_active_tool("select");
        engine.select_all();
        engine.set_active_tool("select");
        assert!(engine.selection().has_selection());
        engine.set_active_tool("pen");
        assert!(!engine.selection().has_selection());
        assert!(engine.document().objects_ordered().all(|o| !o.is_selected()));
    }

    #[test]
    fn test_select_at_toggle_and_replace() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        drag(&mut engine, (20.0, 0.0), (30.0, 10.0));

        let a = engine.select_at(Point::new(5.0, 5.0), false).unwrap();
        let b = engine.select_at(Point::new(25.0, 5.0), true).unwrap();
        assert_eq!(engine.selection().selected(), &[a, b]);

        engine.select_at(Point::new(5.0, 5.0), true);
        assert_eq!(engine.selection().selected(), &[b]);

        engine.select_at(Point::new(5.0, 5.0), false);
        assert_eq!(engine.selection().selected(), &[a]);

        assert!(engine.select_at(Point::new(500.0, 5.0), false).is_none());
        assert!(!engine.selection().has_selection());
    }

    #[test]
    fn test_delete_selected() {
        let mut engine = engine();
        engine.set_active_tool("circle");
        drag(&mut engine, (50.0, 50.0), (60.0, 50.0));
        drag(&mut engine, (200.0, 200.0), (210.0, 200.0));
        engine.select_at(Point::new(50.0, 50.0), false);
        assert_eq!(engine.delete_selected(), 1);
        assert_eq!(engine.document().len(), 1);
        assert!(!engine.selection().has_selection());
        assert_eq!(engine.delete_selected(), 0);
    }

    #[test]
    fn test_undo_any_kind() {
        let mut engine = engine();
        engine.set_active_tool("pen");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.set_active_tool("circle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));

        assert!(engine.undo());
        assert_eq!(engine.document().count_of("circle"), 0);
        assert!(engine.undo());
        assert_eq!(engine.document().count_of("rectangle"), 0);
        assert!(engine.undo());
        assert!(engine.document().is_empty());
        assert!(!engine.undo());
    }

    #[test]
    fn test_clear_canvas() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.select_all();
        engine.clear_canvas();
        assert!(engine.document().is_empty());
        assert!(!engine.selection().has_selection());
        assert!(matches!(engine.layer().painter.ops.as_slice(), [PaintOp::Clear]));
    }

    #[test]
    fn test_unimplemented_tools_ignore_input() {
        let mut engine = engine();
        for tool in ["arrow", "line", "text", "lasso"] {
            engine.set_active_tool(tool);
            assert_eq!(engine.pointer_down(Point::new(1.0, 1.0)), Redraw::Skip);
            assert_eq!(engine.pointer_move(Point::new(5.0, 5.0)), Redraw::Skip);
            assert_eq!(engine.pointer_up(Point::new(5.0, 5.0)), Redraw::Skip);
        }
        assert!(engine.document().is_empty());
        assert_eq!(engine.cursor(), "default");
    }

    #[test]
    fn test_style_change_updates_live_stroke() {
        let mut engine = engine();
        engine.set_active_tool("pen");
        engine.pointer_down(Point::new(10.0, 10.0));
        engine.set_stroke_width(7.0);
        engine.set_stroke_opacity(0.25);
        match engine.tool_state() {
            ToolState::Drawing(stroke) => {
                assert!((stroke.width - 7.0).abs() < f64::EPSILON);
                assert!((alpha_of(stroke.color) - 0.25).abs() < 0.01);
            }
            other => panic!("unexpected state: {other:?}"),
        }
        engine.pointer_up(Point::new(40.0, 10.0));
        assert!(engine.tool_state().is_idle());
    }

    #[test]
    fn test_render_frame_reallocates_on_resize() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));

        let mut frame = RecordingFrame::new(800, 600);
        engine.render_frame(&mut frame).unwrap();
        assert_eq!(engine.stats().rebuilds, 0);
        assert!(matches!(frame.painter.ops[0], PaintOp::Clear));
        assert!(matches!(frame.painter.ops[1], PaintOp::Blit));

        let mut frame = RecordingFrame::new(1024, 768);
        engine.render_frame(&mut frame).unwrap();
        assert_eq!(engine.layer().size, Some((1024, 768)));
        assert_eq!(engine.stats().rebuilds, 1);
        assert_eq!(engine.stats().reallocations, 2);
        // The rebuilt layer holds the committed rectangle again.
        assert_eq!(engine.layer().painter.strokes(), 1);

        let mut frame = RecordingFrame::new(0, 768);
        assert!(engine.render_frame(&mut frame).is_err());
    }

    #[test]
    fn test_render_frame_draws_handles_for_selection() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        drag(&mut engine, (0.0, 0.0), (10.0, 10.0));
        engine.set_active_tool("select");
        engine.select_all();

        let mut frame = RecordingFrame::new(800, 600);
        engine.render_frame(&mut frame).unwrap();
        assert_eq!(frame.painter.fills(), 8);
    }

    #[test]
    fn test_page_settings() {
        let mut engine = engine();
        assert!(engine.set_page_pattern("Graph Paper"));
        assert!(!engine.set_page_pattern("hexagons"));
        engine.set_page_scale(2.0);
        let page = engine.page_settings();
        assert_eq!(page.pattern, PagePattern::Graph);
        assert!((page.scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_event_dispatch() {
        let mut engine = engine();
        engine.set_active_tool("rectangle");
        engine.handle_event(PointerEvent::Down { x: 0.0, y: 0.0 });
        engine.handle_event(PointerEvent::Move { x: 5.0, y: 5.0 });
        engine.handle_event(PointerEvent::Up { x: 5.0, y: 5.0 });
        assert_eq!(engine.document().count_of("rectangle"), 1);
    }
}
