//! Page backdrop patterns.

use crate::surface::RasterSurface;
use inkboard_core::page::{PagePattern, PageSettings};
use inkboard_core::render::{Painter, SurfaceError};
use kurbo::{BezPath, Circle, Point, Shape as KurboShape, Stroke};
use peniko::Color;

/// Paper color behind every pattern.
pub const PAPER_COLOR: Color = Color::from_rgba8(255, 255, 255, 255);
/// Pattern line color.
pub const PATTERN_COLOR: Color = Color::from_rgba8(221, 221, 221, 255);
/// Minor line color on graph paper.
pub const GRAPH_MINOR_COLOR: Color = Color::from_rgba8(238, 238, 238, 255);

/// Render the page pattern into a new opaque surface.
pub fn render_page(
    settings: &PageSettings,
    width: u32,
    height: u32,
) -> Result<RasterSurface, SurfaceError> {
    let mut surface = RasterSurface::new(width, height)?;
    surface.fill(PAPER_COLOR);
    draw_pattern(&mut surface, settings, f64::from(width), f64::from(height));
    Ok(surface)
}

/// Draw the pattern lines or dots for `settings` over a `width` x `height` area.
pub fn draw_pattern(painter: &mut dyn Painter, settings: &PageSettings, width: f64, height: f64) {
    let Some(spacing) = settings.spacing().filter(|s| *s >= 1.0) else {
        return;
    };
    let hairline = Stroke::new(1.0);
    match settings.pattern {
        PagePattern::Plain => {}
        PagePattern::Lined => {
            // A rule along the bottom of each band.
            let path = horizontal_lines(spacing, spacing - 0.5, width, height);
            painter.stroke_path(&path, &hairline, PATTERN_COLOR);
        }
        PagePattern::Grid => {
            let path = grid_lines(spacing, width, height);
            painter.stroke_path(&path, &hairline, PATTERN_COLOR);
        }
        PagePattern::Dotted => {
            let mut dots = BezPath::new();
            let mut y = spacing / 2.0;
            while y < height {
                let mut x = spacing / 2.0;
                while x < width {
                    dots.extend(Circle::new(Point::new(x, y), 1.0).path_elements(0.1));
                    x += spacing;
                }
                y += spacing;
            }
            painter.fill_path(&dots, PATTERN_COLOR);
        }
        PagePattern::Graph => {
            painter.stroke_path(&grid_lines(spacing, width, height), &hairline, GRAPH_MINOR_COLOR);
            if let Some(major) = settings.major_spacing() {
                painter.stroke_path(&grid_lines(major, width, height), &hairline, PATTERN_COLOR);
            }
        }
    }
}

fn horizontal_lines(spacing: f64, offset: f64, width: f64, height: f64) -> BezPath {
    let mut path = BezPath::new();
    let mut y = offset;
    while y < height {
        path.move_to((0.0, y));
        path.line_to((width, y));
        y += spacing;
    }
    path
}

fn vertical_lines(spacing: f64, offset: f64, width: f64, height: f64) -> BezPath {
    let mut path = BezPath::new();
    let mut x = offset;
    while x < width {
        path.move_to((x, 0.0));
        path.line_to((x, height));
        x += spacing;
    }
    path
}

fn grid_lines(spacing: f64, width: f64, height: f64) -> BezPath {
    let mut path = vertical_lines(spacing, 0.5, width, height);
    path.extend(horizontal_lines(spacing, 0.5, width, height).elements().iter().copied());
    path
}
