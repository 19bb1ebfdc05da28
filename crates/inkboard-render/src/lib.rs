//! Inkboard Render Library
//!
//! CPU raster implementation of the Inkboard layer and frame traits, plus
//! page backdrop rendering.

pub mod page;
pub mod raster;
mod surface;

pub use page::{draw_pattern, render_page};
pub use surface::RasterSurface;

use image::RgbaImage;
use inkboard_core::render::SurfaceError;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Size mismatch: page is {page:?}, frame is {frame:?}")]
    SizeMismatch { page: (u32, u32), frame: (u32, u32) },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Flatten a rendered frame over its page backdrop into one opaque image.
pub fn compose_onto_page(page: &RasterSurface, frame: &RasterSurface) -> RenderResult<RgbaImage> {
    let page_size = (page.width(), page.height());
    let frame_size = (frame.width(), frame.height());
    if page_size != frame_size {
        return Err(RendererError::SizeMismatch {
            page: page_size,
            frame: frame_size,
        });
    }
    let mut composed = page.clone();
    composed.draw_surface(frame);
    Ok(composed.into_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::geometry::rgba;
    use inkboard_core::page::{PagePattern, PageSettings};
    use inkboard_core::{CachedLayer, Engine};
    use kurbo::Point;

    fn drag(engine: &mut Engine<RasterSurface>, from: Point, to: Point) {
        engine.pointer_down(from);
        engine.pointer_move(to);
        engine.pointer_up(to);
    }

    #[test]
    fn test_engine_draws_committed_rectangle() {
        let mut engine = Engine::new(RasterSurface::unallocated()).unwrap();
        engine.set_active_tool("rectangle");
        engine.set_rectangle_color(rgba(1.0, 0.0, 0.0, 1.0));
        drag(&mut engine, Point::new(10.5, 10.5), Point::new(50.5, 40.5));

        assert_eq!(engine.layer().pixel(10, 20), Some([255, 0, 0, 255]));
        assert_eq!(engine.layer().pixel(30, 25), Some([0, 0, 0, 0]));

        let mut frame = RasterSurface::new(800, 600).unwrap();
        engine.render_frame(&mut frame).unwrap();
        assert_eq!(frame.pixel(10, 20), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_eraser_rebuild_clears_pixels() {
        let mut engine = Engine::new(RasterSurface::unallocated()).unwrap();
        engine.set_active_tool("pen");
        drag(&mut engine, Point::new(100.0, 100.0), Point::new(200.0, 100.0));
        assert!(engine.layer().painted_pixels() > 0);

        engine.set_active_tool("eraser");
        engine.pointer_down(Point::new(150.0, 105.0));
        engine.pointer_up(Point::new(150.0, 105.0));
        assert!(engine.document().is_empty());
        assert_eq!(engine.layer().painted_pixels(), 0);
    }

    #[test]
    fn test_live_stroke_not_on_layer() {
        let mut engine = Engine::new(RasterSurface::unallocated()).unwrap();
        engine.set_active_tool("pen");
        engine.pointer_down(Point::new(10.0, 10.0));
        engine.pointer_move(Point::new(60.0, 10.0));

        let mut frame = RasterSurface::new(800, 600).unwrap();
        engine.render_frame(&mut frame).unwrap();
        assert_eq!(engine.layer().painted_pixels(), 0);
        assert!(frame.painted_pixels() > 0);
    }

    #[test]
    fn test_render_frame_follows_viewport() {
        let mut engine = Engine::new(RasterSurface::unallocated()).unwrap();
        let mut frame = RasterSurface::new(320, 200).unwrap();
        engine.render_frame(&mut frame).unwrap();
        assert_eq!(CachedLayer::size(engine.layer()), Some((320, 200)));
    }

    #[test]
    fn test_compose_onto_page() {
        let settings = PageSettings {
            pattern: PagePattern::Lined,
            scale: 1.0,
        };
        let page = render_page(&settings, 50, 50).unwrap();
        let frame = RasterSurface::new(50, 50).unwrap();
        let composed = compose_onto_page(&page, &frame).unwrap();
        assert_eq!(composed.get_pixel(5, 24).0, [221, 221, 221, 255]);

        let small = RasterSurface::new(10, 10).unwrap();
        assert!(matches!(
            compose_onto_page(&page, &small),
            Err(RendererError::SizeMismatch { .. })
        ));
    }
}
