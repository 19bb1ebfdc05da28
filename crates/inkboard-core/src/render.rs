//! Rendering seams between the engine and a concrete raster backend.

use kurbo::BezPath;
use peniko::Color;
use thiserror::Error;

/// Largest surface edge the engine will ask a backend to allocate.
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;

/// Errors raised when allocating drawing surfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Surface too large: {width}x{height} (max {max})")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Check that a requested surface size is allocatable.
pub fn validate_surface_size(width: u32, height: u32) -> Result<(), SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::InvalidSize { width, height });
    }
    if width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
        return Err(SurfaceError::TooLarge {
            width,
            height,
            max: MAX_SURFACE_DIMENSION,
        });
    }
    Ok(())
}

/// Vector drawing operations on some pixel target.
pub trait Painter {
    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Stroke a path with the given style and color.
    fn stroke_path(&mut self, path: &BezPath, style: &kurbo::Stroke, color: Color);

    /// Fill a path using the even-odd rule.
    fn fill_path(&mut self, path: &BezPath, color: Color);
}

/// The persistent raster holding every committed object.
pub trait CachedLayer {
    /// Current pixel size, or `None` before the first allocation.
    fn size(&self) -> Option<(u32, u32)>;

    /// Replace the backing storage with a transparent surface of the given size.
    fn reallocate(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;

    /// Painter that draws into the layer.
    fn painter(&mut self) -> &mut dyn Painter;
}

/// A per-frame target the cached layer is composited onto.
pub trait FrameTarget<L: CachedLayer>: Painter {
    /// Viewport size in pixels.
    fn size(&self) -> (u32, u32);

    /// Composite the cached layer at the origin.
    fn blit(&mut self, layer: &L);
}

/// Counters describing how the cached layer has been maintained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    /// Objects drawn incrementally onto the layer.
    pub appends: u64,
    /// Full clears followed by a redraw of the store.
    pub rebuilds: u64,
    /// Surface reallocations.
    pub reallocations: u64,
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording doubles for the rendering traits.

    use super::*;

    /// A single recorded paint call.
    #[derive(Debug, Clone)]
    pub enum PaintOp {
        Clear,
        Stroke { width: f64, color: Color },
        Fill { color: Color },
        Blit,
    }

    #[derive(Debug, Default)]
    pub struct RecordingPainter {
        pub ops: Vec<PaintOp>,
    }

    impl RecordingPainter {
        pub fn strokes(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, PaintOp::Stroke { .. })).count()
        }

        pub fn fills(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, PaintOp::Fill { .. })).count()
        }
    }

    impl Painter for RecordingPainter {
        fn clear(&mut self) {
            self.ops.clear();
            self.ops.push(PaintOp::Clear);
        }

        fn stroke_path(&mut self, _path: &BezPath, style: &kurbo::Stroke, color: Color) {
            self.ops.push(PaintOp::Stroke {
                width: style.width,
                color,
            });
        }

        fn fill_path(&mut self, _path: &BezPath, color: Color) {
            self.ops.push(PaintOp::Fill { color });
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingLayer {
        pub size: Option<(u32, u32)>,
        pub painter: RecordingPainter,
    }

    impl CachedLayer for RecordingLayer {
        fn size(&self) -> Option<(u32, u32)> {
            self.size
        }

        fn reallocate(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
            validate_surface_size(width, height)?;
            self.size = Some((width, height));
            self.painter.ops.clear();
            Ok(())
        }

        fn painter(&mut self) -> &mut dyn Painter {
            &mut self.painter
        }
    }

    #[derive(Debug)]
    pub struct RecordingFrame {
        pub size: (u32, u32),
        pub painter: RecordingPainter,
    }

    impl RecordingFrame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                painter: RecordingPainter::default(),
            }
        }
    }

    impl Painter for RecordingFrame {
        fn clear(&mut self) {
            self.painter.clear();
        }

        fn stroke_path(&mut self, path: &BezPath, style: &kurbo::Stroke, color: Color) {
            self.painter.stroke_path(path, style, color);
        }

        fn fill_path(&mut self, path: &BezPath, color: Color) {
            self.painter.fill_path(path, color);
        }
    }

    impl FrameTarget<RecordingLayer> for RecordingFrame {
        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn blit(&mut self, _layer: &RecordingLayer) {
            self.painter.ops.push(PaintOp::Blit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_surface_size() {
        assert!(validate_surface_size(800, 600).is_ok());
        assert_eq!(
            validate_surface_size(0, 600),
            Err(SurfaceError::InvalidSize {
                width: 0,
                height: 600
            })
        );
        assert!(matches!(
            validate_surface_size(MAX_SURFACE_DIMENSION + 1, 10),
            Err(SurfaceError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = SurfaceError::InvalidSize {
            width: 0,
            height: 0,
        };
        assert_eq!(err.to_string(), "Invalid surface size: 0x0");
    }
}
