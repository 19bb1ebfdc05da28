//! Scanline helpers for painting kurbo paths into RGBA buffers.

use image::{Rgba, RgbaImage};
use inkboard_core::geometry::distance_to_segment;
use kurbo::{BezPath, PathEl, Point, Rect};
use peniko::Color;

/// Flattening tolerance in pixels.
pub const FLATTEN_TOLERANCE: f64 = 0.1;
/// Vertical samples per pixel row when filling.
const FILL_SUBSAMPLES: usize = 4;

/// Flatten a path into polylines, one per subpath. Closed subpaths repeat
/// their first point at the end.
pub fn polylines(path: &BezPath) -> Vec<Vec<Point>> {
    let mut lines: Vec<Vec<Point>> = Vec::new();
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => lines.push(vec![p]),
        PathEl::LineTo(p) => match lines.last_mut() {
            Some(line) => line.push(p),
            None => lines.push(vec![p]),
        },
        PathEl::ClosePath => {
            if let Some(line) = lines.last_mut() {
                if let Some(&first) = line.first() {
                    line.push(first);
                }
            }
        }
        // flatten only emits lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    lines
}

/// Integer pixel range covering `rect`, clipped to the image.
fn pixel_range(image: &RgbaImage, rect: Rect) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (f64::from(image.width()), f64::from(image.height()));
    let x0 = rect.x0.floor().max(0.0);
    let y0 = rect.y0.floor().max(0.0);
    let x1 = rect.x1.ceil().min(w);
    let y1 = rect.y1.ceil().min(h);
    if !(x0 < x1 && y0 < y1) {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

fn points_bounds(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
    )
}

/// Per-pixel coverage for a region of the image.
struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let width = x1 - x0;
        Self {
            x0,
            y0,
            width,
            data: vec![0.0; (width * (y1 - y0)) as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y - self.y0) * self.width + (x - self.x0)) as usize
    }

    fn max(&mut self, x: u32, y: u32, coverage: f32) {
        let i = self.index(x, y);
        if coverage > self.data[i] {
            self.data[i] = coverage;
        }
    }

    fn add(&mut self, x: u32, y: u32, coverage: f32) {
        let i = self.index(x, y);
        self.data[i] += coverage;
    }

    fn composite(&self, image: &mut RgbaImage, color: Color) {
        for (i, &coverage) in self.data.iter().enumerate() {
            if coverage <= 0.0 {
                continue;
            }
            let x = self.x0 + (i as u32 % self.width);
            let y = self.y0 + (i as u32 / self.width);
            blend_pixel(image.get_pixel_mut(x, y), color, coverage.min(1.0));
        }
    }
}

/// Stroke a path with round caps and joins, anti-aliased by distance.
pub fn stroke_path(image: &mut RgbaImage, path: &BezPath, width: f64, color: Color) {
    let half = (width / 2.0).max(0.5);
    let lines = polylines(path);
    let Some(bounds) = lines
        .iter()
        .filter_map(|line| points_bounds(line))
        .reduce(|a, b| a.union(b))
    else {
        return;
    };
    let Some((x0, y0, x1, y1)) = pixel_range(image, bounds.inflate(half + 1.0, half + 1.0)) else {
        return;
    };

    let mut mask = CoverageMask::new(x0, y0, x1, y1);
    for line in &lines {
        let segments: Vec<(Point, Point)> = match line.as_slice() {
            [only] => vec![(*only, *only)],
            points => points.windows(2).map(|w| (w[0], w[1])).collect(),
        };
        for (a, b) in segments {
            let reach = Rect::from_points(a, b).inflate(half + 1.0, half + 1.0);
            let Some((sx0, sy0, sx1, sy1)) = pixel_range(image, reach) else {
                continue;
            };
            for y in sy0..sy1 {
                for x in sx0..sx1 {
                    let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                    let d = distance_to_segment(center, a, b);
                    let coverage = (half + 0.5 - d).clamp(0.0, 1.0) as f32;
                    if coverage > 0.0 {
                        mask.max(x, y, coverage);
                    }
                }
            }
        }
    }
    mask.composite(image, color);
}

/// Fill a path with the even-odd rule.
///
/// Each pixel row is sampled at several heights; horizontal coverage within
/// a sample is exact.
pub fn fill_path(image: &mut RgbaImage, path: &BezPath, color: Color) {
    let lines = polylines(path);
    let mut edges: Vec<(Point, Point)> = Vec::new();
    for line in &lines {
        edges.extend(line.windows(2).map(|w| (w[0], w[1])));
        if let (Some(&first), Some(&last)) = (line.first(), line.last()) {
            if first != last {
                edges.push((last, first));
            }
        }
    }
    let Some(bounds) = lines
        .iter()
        .filter_map(|line| points_bounds(line))
        .reduce(|a, b| a.union(b))
    else {
        return;
    };
    let Some((x0, y0, x1, y1)) = pixel_range(image, bounds) else {
        return;
    };

    let mut mask = CoverageMask::new(x0, y0, x1, y1);
    let weight = 1.0 / FILL_SUBSAMPLES as f64;
    let mut crossings: Vec<f64> = Vec::new();
    for y in y0..y1 {
        for sub in 0..FILL_SUBSAMPLES {
            let sy = f64::from(y) + (sub as f64 + 0.5) * weight;
            crossings.clear();
            for &(a, b) in &edges {
                if (a.y <= sy) != (b.y <= sy) {
                    crossings.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let left = span[0].max(f64::from(x0));
                let right = span[1].min(f64::from(x1));
                if left >= right {
                    continue;
                }
                let first = left.floor() as u32;
                let last = (right.ceil() as u32).min(x1);
                for x in first..last {
                    let overlap = right.min(f64::from(x) + 1.0) - left.max(f64::from(x));
                    if overlap > 0.0 {
                        mask.add(x, y, (overlap * weight) as f32);
                    }
                }
            }
        }
    }
    mask.composite(image, color);
}

/// Source-over blend of `color` at `coverage` onto a straight-alpha pixel.
pub fn blend_pixel(pixel: &mut Rgba<u8>, color: Color, coverage: f32) {
    let [r, g, b, a] = color.components;
    let src_a = (a * coverage).clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = f32::from(pixel[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    for (channel, src) in [r, g, b].into_iter().enumerate() {
        let dst = f32::from(pixel[channel]) / 255.0;
        let out = (src.clamp(0.0, 1.0) * src_a + dst * dst_a * (1.0 - src_a)) / out_a;
        pixel[channel] = (out * 255.0).round() as u8;
    }
    pixel[3] = (out_a * 255.0).round() as u8;
}
