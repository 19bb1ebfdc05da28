//! CPU raster surface used both as the cached layer and as the frame target.

use crate::raster;
use image::{Rgba, RgbaImage};
use inkboard_core::render::{CachedLayer, FrameTarget, Painter, SurfaceError, validate_surface_size};
use kurbo::BezPath;
use peniko::Color;

/// A straight-alpha RGBA pixel buffer.
#[derive(Debug, Clone, Default)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        validate_surface_size(width, height)?;
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    /// A surface with no pixels yet; the engine allocates it on construction.
    pub fn unallocated() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// RGBA value at a pixel, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Fill every pixel with an opaque or translucent color.
    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        let value = Rgba([rgba.r, rgba.g, rgba.b, rgba.a]);
        for pixel in self.image.pixels_mut() {
            *pixel = value;
        }
    }

    /// Source-over composite another surface at the origin.
    pub fn draw_surface(&mut self, other: &RasterSurface) {
        image::imageops::overlay(&mut self.image, &other.image, 0, 0);
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p[3] > 0).count()
    }
}

impl Painter for RasterSurface {
    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn stroke_path(&mut self, path: &BezPath, style: &kurbo::Stroke, color: Color) {
        raster::stroke_path(&mut self.image, path, style.width, color);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        raster::fill_path(&mut self.image, path, color);
    }
}

impl CachedLayer for RasterSurface {
    fn size(&self) -> Option<(u32, u32)> {
        if self.image.width() == 0 || self.image.height() == 0 {
            None
        } else {
            Some(self.image.dimensions())
        }
    }

    fn reallocate(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        validate_surface_size(width, height)?;
        self.image = RgbaImage::new(width, height);
        log::trace!("Raster layer reallocated at {width}x{height}");
        Ok(())
    }

    fn painter(&mut self) -> &mut dyn Painter {
        self
    }
}

impl FrameTarget<RasterSurface> for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn blit(&mut self, layer: &RasterSurface) {
        self.draw_surface(layer);
    }
}
