//! Stroke smoothing: jitter simplification followed by Catmull-Rom interpolation.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Minimum spacing between kept samples.
pub const JITTER_THRESHOLD: f64 = 0.5;
/// Interpolated points emitted per source segment.
pub const SEGMENTS_PER_CURVE: usize = 12;

/// Tunables for the smoothing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    pub jitter_threshold: f64,
    pub segments_per_curve: usize,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            jitter_threshold: JITTER_THRESHOLD,
            segments_per_curve: SEGMENTS_PER_CURVE,
        }
    }
}

/// Drop interior samples closer than `threshold` to the last kept sample.
///
/// The first and last samples always survive, so the output keeps the
/// stroke's endpoints even when the final sample sits on top of its
/// predecessor.
pub fn simplify(points: &[Point], threshold: f64) -> Vec<Point> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let Some((&last, interior)) = rest.split_last() else {
        return vec![first];
    };

    let mut simplified = Vec::with_capacity(points.len());
    simplified.push(first);
    let mut kept = first;
    for &point in interior {
        if kept.distance(point) >= threshold {
            simplified.push(point);
            kept = point;
        }
    }
    simplified.push(last);
    simplified
}

/// Evaluate a uniform Catmull-Rom segment between `p1` and `p2` at `t` in `[0, 1]`.
pub fn catmull_rom_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let blend = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point::new(
        blend(p0.x, p1.x, p2.x, p3.x),
        blend(p0.y, p1.y, p2.y, p3.y),
    )
}

/// Interpolate a Catmull-Rom spline through `points`.
///
/// Fewer than three points are returned as-is. Otherwise the output starts
/// with the first point and adds `segments` points per source segment; the
/// neighbours past either end are clamped to the end points.
pub fn interpolate(points: &[Point], segments: usize) -> Vec<Point> {
    if points.len() < 3 || segments == 0 {
        return points.to_vec();
    }

    let mut smoothed = Vec::with_capacity(1 + (points.len() - 1) * segments);
    smoothed.push(points[0]);
    for i in 0..points.len() - 1 {
        let p0 = if i > 0 { points[i - 1] } else { points[i] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < points.len() {
            points[i + 2]
        } else {
            points[i + 1]
        };
        for j in 1..=segments {
            let t = j as f64 / segments as f64;
            smoothed.push(catmull_rom_point(p0, p1, p2, p3, t));
        }
    }
    smoothed
}

/// Full pipeline from raw samples to render points.
pub fn smooth(raw: &[Point], params: &SmoothingParams) -> Vec<Point> {
    if raw.len() < 2 {
        return raw.to_vec();
    }
    let simplified = simplify(raw, params.jitter_threshold);
    interpolate(&simplified, params.segments_per_curve)
}
